//! All things related to the storage of users, teams, folders, notes and shares

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::folders::Folder;
use crate::notes::Note;
use crate::shares::Access;
use crate::shares::FolderShare;
use crate::shares::NoteShare;
use crate::shares::Upsert;
use crate::teams::Membership;
use crate::teams::Team;
use crate::teams::TeamRole;
use crate::users::Role;
use crate::users::User;

// only the tests run on memory when Postgres is available
#[cfg_attr(all(feature = "postgres", not(test)), allow(unused_imports))]
pub use memory::Memory;
#[cfg(feature = "postgres")]
pub use postgres::Postgres;

#[cfg_attr(all(feature = "postgres", not(test)), allow(dead_code))]
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> anyhow::Result<Memory> {
    tracing::warn!("Running with in-memory storage, nothing survives a restart");

    Ok(Memory::new())
}

/// Setup the storage
///
/// Uses the `DATABASE_URL` environment variable
#[cfg(feature = "postgres")]
pub async fn setup() -> anyhow::Result<Postgres> {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),

    /// A unique or foreign key constraint was violated
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A row that should be there is gone
    #[error("Row not found: {0}")]
    RowNotFound(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The username, unique
    pub username: &'a str,

    /// The email address, unique
    pub email: &'a str,

    /// The role of the user
    pub role: Role,

    /// The hashed password
    pub hashed_password: &'a str,
}

/// Values to create a Team
pub struct CreateTeamValues<'a> {
    /// Name of the team
    pub name: &'a str,

    /// Users managing the team, without duplicates
    pub manager_ids: &'a [Uuid],

    /// Users in the team, without duplicates
    pub member_ids: &'a [Uuid],
}

/// Values to create a Folder
pub struct CreateFolderValues<'a> {
    /// The owner of the folder
    pub owner: &'a User,

    /// Name of the folder
    pub name: &'a str,
}

/// Values to update a Folder
pub struct UpdateFolderValues<'a> {
    /// New name of the folder
    pub name: &'a str,
}

/// Values to create a Note
pub struct CreateNoteValues<'a> {
    /// The owner of the note
    pub owner: &'a User,

    /// Title of the note
    pub title: &'a str,

    /// Body of the note
    ///
    /// Can be anything
    pub body: &'a str,
}

/// Values to update a Note
pub struct UpdateNoteValues<'a> {
    /// New title of the note
    pub title: &'a str,

    /// New body of the note
    pub body: &'a str,
}

/// A single step of a cascading delete
///
/// Folder deletes run all steps in order, note deletes only `NoteShares` and `Notes`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CascadeStep {
    /// Hard-delete the shares of the affected notes
    NoteShares,

    /// Soft-delete the affected notes
    Notes,

    /// Hard-delete the shares of the folder
    FolderShares,

    /// Soft-delete the folder
    Folder,
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoteShares => write!(f, "note shares"),
            Self::Notes => write!(f, "notes"),
            Self::FolderShares => write!(f, "folder shares"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

/// Storage with all supported operations
///
/// Lists are returned in the order they were persisted
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Finds all users
    async fn find_all_users(&self) -> Result<Vec<User>>;

    /// Finds all users with one of the given IDs
    async fn find_all_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;

    /// Finds a single user by its ID
    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Finds a single user that has the username or the email address
    async fn find_single_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>>;

    /// Create a single user
    async fn create_user(&self, values: &CreateUserValues) -> Result<User>;

    /// Find a single team by ID
    async fn find_single_team_by_id(&self, id: &Uuid) -> Result<Option<Team>>;

    /// Create a team together with its managers and members
    ///
    /// Either everything is created or nothing is
    async fn create_team(&self, values: &CreateTeamValues) -> Result<Team>;

    /// Find all memberships of a team for a role
    async fn find_all_memberships(&self, team: &Team, role: TeamRole) -> Result<Vec<Membership>>;

    /// Find the membership of a user in a team for a role
    async fn find_single_membership(
        &self,
        team: &Team,
        user_id: &Uuid,
        role: TeamRole,
    ) -> Result<Option<Membership>>;

    /// Create a membership
    ///
    /// Returns `None` when the user already holds the role in the team
    async fn create_membership(
        &self,
        team: &Team,
        user: &User,
        role: TeamRole,
    ) -> Result<Option<Membership>>;

    /// Delete a membership
    async fn delete_membership(&self, membership: &Membership, role: TeamRole) -> Result<()>;

    /// Find a single folder by ID
    ///
    /// Respects the soft-delete
    async fn find_single_folder_by_id(&self, id: &Uuid) -> Result<Option<Folder>>;

    /// Find all folders with one of the given IDs
    ///
    /// Respects the soft-delete
    async fn find_all_folders_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Folder>>;

    /// Find all folders owned by one of the given users
    ///
    /// Respects the soft-delete
    async fn find_all_folders_by_owners(&self, owner_ids: &[Uuid]) -> Result<Vec<Folder>>;

    /// Create a folder
    async fn create_folder(&self, values: &CreateFolderValues) -> Result<Folder>;

    /// Update a folder
    async fn update_folder(&self, folder: &Folder, values: &UpdateFolderValues) -> Result<Folder>;

    /// Delete a folder, its notes and all shares of both
    ///
    /// Either everything is deleted or nothing is
    async fn delete_folder(&self, folder: &Folder) -> Result<()>;

    /// Find a single note by ID
    ///
    /// Respects the soft-delete
    async fn find_single_note_by_id(&self, id: &Uuid) -> Result<Option<Note>>;

    /// Find all notes with one of the given IDs
    ///
    /// Respects the soft-delete
    async fn find_all_notes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Note>>;

    /// Find all notes owned by one of the given users
    ///
    /// Respects the soft-delete
    async fn find_all_notes_by_owners(&self, owner_ids: &[Uuid]) -> Result<Vec<Note>>;

    /// Create a note in a folder
    async fn create_note(&self, folder: &Folder, values: &CreateNoteValues) -> Result<Note>;

    /// Update a note
    async fn update_note(&self, note: &Note, values: &UpdateNoteValues) -> Result<Note>;

    /// Delete a note and its shares
    ///
    /// Either everything is deleted or nothing is
    async fn delete_note(&self, note: &Note) -> Result<()>;

    /// Find all folder shares targeting one of the given users
    ///
    /// Shares of soft-deleted folders are left out
    async fn find_all_folder_shares_by_users(&self, user_ids: &[Uuid])
    -> Result<Vec<FolderShare>>;

    /// Find the share of a folder for a user
    async fn find_single_folder_share(
        &self,
        folder_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<FolderShare>>;

    /// Share a folder with a user, updating the existing share if there is one
    async fn upsert_folder_share(
        &self,
        folder: &Folder,
        user: &User,
        access: Access,
    ) -> Result<Upsert<FolderShare>>;

    /// Revoke a folder share
    async fn delete_folder_share(&self, share: &FolderShare) -> Result<()>;

    /// Find all note shares targeting one of the given users
    ///
    /// Shares of soft-deleted notes are left out
    async fn find_all_note_shares_by_users(&self, user_ids: &[Uuid]) -> Result<Vec<NoteShare>>;

    /// Find the share of a note for a user
    async fn find_single_note_share(
        &self,
        note_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<NoteShare>>;

    /// Share a note with a user, updating the existing share if there is one
    async fn upsert_note_share(
        &self,
        note: &Note,
        user: &User,
        access: Access,
    ) -> Result<Upsert<NoteShare>>;

    /// Revoke a note share
    async fn delete_note_share(&self, share: &NoteShare) -> Result<()>;
}
