//! Responses for resolved assets
//!
//! Owners and folders of all entries are loaded with a single lookup each

use serde::Serialize;

use crate::assets::AccessType;
use crate::assets::Assets;
use crate::storage::Storage;

use super::Error;
use super::folders::FolderResponse;
use super::notes::NoteResponse;
use super::utils::fetch_folders_by_ids;
use super::utils::fetch_users_by_ids;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderWithAccessResponse {
    #[serde(flatten)]
    folder: FolderResponse,
    access_type: AccessType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteWithAccessResponse {
    #[serde(flatten)]
    note: NoteResponse,
    access_type: AccessType,
}

#[derive(Debug, Serialize)]
pub struct AssetsResponse {
    folders: Vec<FolderWithAccessResponse>,
    notes: Vec<NoteWithAccessResponse>,
}

impl AssetsResponse {
    /// Create an assets response, populating owners and folders
    pub async fn from_assets<S: Storage>(storage: &S, assets: Assets) -> Result<Self, Error> {
        let owner_ids = assets
            .folders
            .iter()
            .map(|entry| entry.folder.owner_id)
            .chain(assets.notes.iter().map(|entry| entry.note.owner_id));
        let users = fetch_users_by_ids(storage, owner_ids).await?;

        let folder_ids = assets.notes.iter().map(|entry| entry.note.folder_id);
        let folders = fetch_folders_by_ids(storage, folder_ids).await?;

        Ok(Self {
            folders: assets
                .folders
                .into_iter()
                .map(|entry| FolderWithAccessResponse {
                    folder: FolderResponse::from_folder_with_owner(entry.folder, &users),
                    access_type: entry.access_type,
                })
                .collect(),
            notes: assets
                .notes
                .into_iter()
                .map(|entry| NoteWithAccessResponse {
                    note: NoteResponse::from_note(entry.note, &folders, &users),
                    access_type: entry.access_type,
                })
                .collect(),
        })
    }
}
