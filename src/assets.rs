//! Access resolution
//!
//! Everything a user, or the members of a team, can reach: the folders and notes they own plus
//! the ones shared with them. Owned entries come first, shared entries follow in the order the
//! shares were made. Nothing is sorted or deduplicated, sharing a folder does not share its notes.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::folders::Folder;
use crate::notes::Note;
use crate::shares::Access;
use crate::storage::Result;
use crate::storage::Storage;
use crate::teams::Team;
use crate::teams::TeamRole;
use crate::users::User;

/// How a folder or note is reachable
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    Owner,
    Read,
    Write,
}

impl From<Access> for AccessType {
    fn from(access: Access) -> Self {
        match access {
            Access::Read => Self::Read,
            Access::Write => Self::Write,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FolderWithAccess {
    pub folder: Folder,
    pub access_type: AccessType,
}

#[derive(Clone, Debug)]
pub struct NoteWithAccess {
    pub note: Note,
    pub access_type: AccessType,
}

/// All reachable folders and notes
#[derive(Debug, Default)]
pub struct Assets {
    pub folders: Vec<FolderWithAccess>,
    pub notes: Vec<NoteWithAccess>,
}

/// Resolve the assets of a single user
pub async fn resolve_for_user<S: Storage>(storage: &S, user: &User) -> Result<Assets> {
    resolve_for_users(storage, &[user.id]).await
}

/// Resolve the assets of all members of a team
///
/// Managers only count when they are a member as well
pub async fn resolve_for_team<S: Storage>(storage: &S, team: &Team) -> Result<Assets> {
    let members = storage.find_all_memberships(team, TeamRole::Member).await?;

    if members.is_empty() {
        tracing::debug!("Team {} has no members, no assets to resolve", team.id);

        return Ok(Assets::default());
    }

    let user_ids = members
        .iter()
        .map(|membership| membership.user_id)
        .collect::<Vec<Uuid>>();

    resolve_for_users(storage, &user_ids).await
}

/// Every lookup runs once for the whole set of users
async fn resolve_for_users<S: Storage>(storage: &S, user_ids: &[Uuid]) -> Result<Assets> {
    let owned_folders = storage.find_all_folders_by_owners(user_ids).await?;
    let folder_shares = storage.find_all_folder_shares_by_users(user_ids).await?;

    let shared_folder_ids = folder_shares
        .iter()
        .map(|share| share.folder_id)
        .collect::<Vec<Uuid>>();
    let shared_folders = by_id(
        storage.find_all_folders_by_ids(&shared_folder_ids).await?,
        |folder| folder.id,
    );

    let folders = owned_folders
        .into_iter()
        .map(|folder| FolderWithAccess {
            folder,
            access_type: AccessType::Owner,
        })
        .chain(folder_shares.iter().filter_map(|share| {
            shared_folders
                .get(&share.folder_id)
                .map(|folder| FolderWithAccess {
                    folder: folder.clone(),
                    access_type: share.access.into(),
                })
        }))
        .collect();

    let owned_notes = storage.find_all_notes_by_owners(user_ids).await?;
    let note_shares = storage.find_all_note_shares_by_users(user_ids).await?;

    let shared_note_ids = note_shares
        .iter()
        .map(|share| share.note_id)
        .collect::<Vec<Uuid>>();
    let shared_notes = by_id(
        storage.find_all_notes_by_ids(&shared_note_ids).await?,
        |note| note.id,
    );

    let notes = owned_notes
        .into_iter()
        .map(|note| NoteWithAccess {
            note,
            access_type: AccessType::Owner,
        })
        .chain(note_shares.iter().filter_map(|share| {
            shared_notes.get(&share.note_id).map(|note| NoteWithAccess {
                note: note.clone(),
                access_type: share.access.into(),
            })
        }))
        .collect();

    Ok(Assets { folders, notes })
}

fn by_id<T>(items: Vec<T>, id: fn(&T) -> Uuid) -> HashMap<Uuid, T> {
    items.into_iter().map(|item| (id(&item), item)).collect()
}
