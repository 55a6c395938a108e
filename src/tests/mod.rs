mod helper;
mod notes;
mod root;
mod shares;
