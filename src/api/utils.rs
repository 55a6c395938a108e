//! Utility functions for the API

use std::collections::HashMap;

use uuid::Uuid;

use crate::folders::Folder;
use crate::notes::Note;
use crate::storage::Storage;
use crate::teams::Team;
use crate::users::User;

use super::Error;

/// Fetch user from storage
///
/// The not found message differs per usage: owner, manager, member...
pub async fn fetch_user<S: Storage>(
    storage: &S,
    user_id: &Uuid,
    not_found: &'static str,
) -> Result<User, Error> {
    storage
        .find_single_user_by_id(user_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found(not_found)), Ok)
}

/// Fetch team from storage
pub async fn fetch_team<S: Storage>(storage: &S, team_id: &Uuid) -> Result<Team, Error> {
    storage
        .find_single_team_by_id(team_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Team not found")), Ok)
}

/// Fetch folder from storage
pub async fn fetch_folder<S: Storage>(storage: &S, folder_id: &Uuid) -> Result<Folder, Error> {
    storage
        .find_single_folder_by_id(folder_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Folder not found")), Ok)
}

/// Fetch note from storage
pub async fn fetch_note<S: Storage>(storage: &S, note_id: &Uuid) -> Result<Note, Error> {
    storage
        .find_single_note_by_id(note_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Note not found")), Ok)
}

/// Fetch all users with one of the IDs in a single lookup, keyed by ID
pub async fn fetch_users_by_ids<S, I>(
    storage: &S,
    user_ids: I,
) -> Result<HashMap<Uuid, User>, Error>
where
    S: Storage,
    I: IntoIterator<Item = Uuid>,
{
    let user_ids = unique(user_ids);

    let users = storage
        .find_all_users_by_ids(&user_ids)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(users.into_iter().map(|user| (user.id, user)).collect())
}

/// Fetch all folders with one of the IDs in a single lookup, keyed by ID
pub async fn fetch_folders_by_ids<S, I>(
    storage: &S,
    folder_ids: I,
) -> Result<HashMap<Uuid, Folder>, Error>
where
    S: Storage,
    I: IntoIterator<Item = Uuid>,
{
    let folder_ids = unique(folder_ids);

    let folders = storage
        .find_all_folders_by_ids(&folder_ids)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(folders
        .into_iter()
        .map(|folder| (folder.id, folder))
        .collect())
}

/// Drop repeated IDs, first occurrence wins
pub fn unique<I>(ids: I) -> Vec<Uuid>
where
    I: IntoIterator<Item = Uuid>,
{
    let mut unique_ids = Vec::new();

    for id in ids {
        if !unique_ids.contains(&id) {
            unique_ids.push(id);
        }
    }

    unique_ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        assert_eq!(vec![first, second], unique([first, second, first, second]));
        assert!(unique(Vec::<Uuid>::new()).is_empty());
    }
}
