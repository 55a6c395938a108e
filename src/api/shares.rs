//! Folder and note sharing
//!
//! Sharing again with the same user updates the access of the existing share

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::shares::Access;
use crate::shares::FolderShare;
use crate::shares::NoteShare;
use crate::storage::Storage;
use crate::users::User;

use super::Error;
use super::Form;
use super::Named;
use super::PathParameters;
use super::Success;
use super::folders::FolderResponse;
use super::folders::folder_response;
use super::notes::NoteResponse;
use super::notes::note_response;
use super::request::parse_access;
use super::users::UserResponse;
use super::utils::fetch_folder;
use super::utils::fetch_note;
use super::utils::fetch_user;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderShareResponse {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub user_id: Uuid,
    pub access: Access,
    pub folder: FolderResponse,
    pub user: UserResponse,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FolderShareResponse {
    fn from_share(share: FolderShare, folder: FolderResponse, user: User) -> Self {
        Self {
            id: share.id,
            folder_id: share.folder_id,
            user_id: share.user_id,
            access: share.access,
            folder,
            user: UserResponse::from_user(user),
            created_at: share.created_at,
            updated_at: share.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteShareResponse {
    pub id: Uuid,
    pub note_id: Uuid,
    pub user_id: Uuid,
    pub access: Access,
    pub note: NoteResponse,
    pub user: UserResponse,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NoteShareResponse {
    fn from_share(share: NoteShare, note: NoteResponse, user: User) -> Self {
        Self {
            id: share.id,
            note_id: share.note_id,
            user_id: share.user_id,
            access: share.access,
            note,
            user: UserResponse::from_user(user),
            created_at: share.created_at,
            updated_at: share.updated_at,
        }
    }
}

/// Share form, for folders and notes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareForm {
    /// The user to share with
    user_id: Uuid,

    /// Either `read` or `write`
    access: String,
}

/// Share a folder with a user
///
/// Responds with `201 Created` for a new share, `200 OK` when the access of an existing share is
/// updated
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "userId": "<uuid>", "access": "read" }' \
///     http://localhost:8080/folders/<uuid>/share
/// ```
///
/// Response:
/// ```json
/// { "message": "Folder shared successfully", "share": { "id": "<uuid>", "access": "read" ... } }
/// ```
pub async fn share_folder<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(folder_id): PathParameters<Uuid>,
    Form(form): Form<ShareForm>,
) -> Result<Success<Named<FolderShareResponse>>, Error> {
    let access = parse_access(&form.access)?;
    let folder = fetch_folder(&storage, &folder_id).await?;
    let user = fetch_user(&storage, &form.user_id, "User not found").await?;

    let upsert = storage
        .upsert_folder_share(&folder, &user, access)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::debug!(
        "Shared folder {} with {} ({access}), created: {}",
        folder.id,
        user.username,
        upsert.is_created()
    );

    let is_created = upsert.is_created();
    let share = upsert.into_inner();
    let folder = folder_response(&storage, folder).await?;
    let response = FolderShareResponse::from_share(share, folder, user);

    if is_created {
        Ok(Success::created("Folder shared successfully", "share", response))
    } else {
        Ok(Success::updated(
            "Folder share updated successfully",
            "share",
            response,
        ))
    }
}

/// Revoke the folder share of a user
///
/// Request:
/// ```sh
/// curl -v -XDELETE http://localhost:8080/folders/<uuid>/share/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "message": "Folder share revoked successfully" }
/// ```
pub async fn revoke_folder_share<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters((folder_id, user_id)): PathParameters<(Uuid, Uuid)>,
) -> Result<Success<()>, Error> {
    let share = storage
        .find_single_folder_share(&folder_id, &user_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Folder share not found")), Ok)?;

    storage
        .delete_folder_share(&share)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::message("Folder share revoked successfully"))
}

/// Share a note with a user
///
/// Responds with `201 Created` for a new share, `200 OK` when the access of an existing share is
/// updated
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "userId": "<uuid>", "access": "write" }' \
///     http://localhost:8080/notes/<uuid>/share
/// ```
///
/// Response:
/// ```json
/// { "message": "Note shared successfully", "share": { "id": "<uuid>", "access": "write" ... } }
/// ```
pub async fn share_note<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<Uuid>,
    Form(form): Form<ShareForm>,
) -> Result<Success<Named<NoteShareResponse>>, Error> {
    let access = parse_access(&form.access)?;
    let note = fetch_note(&storage, &note_id).await?;
    let user = fetch_user(&storage, &form.user_id, "User not found").await?;

    let upsert = storage
        .upsert_note_share(&note, &user, access)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::debug!(
        "Shared note {} with {} ({access}), created: {}",
        note.id,
        user.username,
        upsert.is_created()
    );

    let is_created = upsert.is_created();
    let share = upsert.into_inner();
    let note = note_response(&storage, note).await?;
    let response = NoteShareResponse::from_share(share, note, user);

    if is_created {
        Ok(Success::created("Note shared successfully", "share", response))
    } else {
        Ok(Success::updated(
            "Note share updated successfully",
            "share",
            response,
        ))
    }
}

/// Revoke the note share of a user
///
/// Request:
/// ```sh
/// curl -v -XDELETE http://localhost:8080/notes/<uuid>/share/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "message": "Note share revoked successfully" }
/// ```
pub async fn revoke_note_share<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters((note_id, user_id)): PathParameters<(Uuid, Uuid)>,
) -> Result<Success<()>, Error> {
    let share = storage
        .find_single_note_share(&note_id, &user_id)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(|| Err(Error::not_found("Note share not found")), Ok)?;

    storage
        .delete_note_share(&share)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::message("Note share revoked successfully"))
}
