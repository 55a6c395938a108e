//! Folder API management

use std::collections::HashMap;

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::folders::Folder;
use crate::storage::CreateFolderValues;
use crate::storage::Storage;
use crate::storage::UpdateFolderValues;
use crate::users::User;

use super::Error;
use super::Form;
use super::Named;
use super::PathParameters;
use super::Success;
use super::request::parse_name;
use super::users::UserResponse;
use super::utils::fetch_folder;
use super::utils::fetch_user;
use super::utils::fetch_users_by_ids;

/// The folder response information
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    pub folder_id: Uuid,
    pub name: String,
    pub owner_id: Uuid,

    /// Left out when the folder is nested in a note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserResponse>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl FolderResponse {
    /// Create a folder response without its owner
    pub fn from_folder(folder: Folder) -> Self {
        Self {
            folder_id: folder.id,
            name: folder.name,
            owner_id: folder.owner_id,
            owner: None,
            created_at: folder.created_at,
            updated_at: folder.updated_at,
        }
    }

    /// Create a folder response, the owner is taken from the users
    pub fn from_folder_with_owner(folder: Folder, users: &HashMap<Uuid, User>) -> Self {
        let owner = users
            .get(&folder.owner_id)
            .cloned()
            .map(UserResponse::from_user);

        Self {
            owner,
            ..Self::from_folder(folder)
        }
    }
}

/// Create a folder response with its owner
pub async fn folder_response<S: Storage>(
    storage: &S,
    folder: Folder,
) -> Result<FolderResponse, Error> {
    let users = fetch_users_by_ids(storage, [folder.owner_id]).await?;

    Ok(FolderResponse::from_folder_with_owner(folder, &users))
}

/// Get a single folder
///
/// Request:
/// ```sh
/// curl -v http://localhost:8080/folders/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "folder": { "folderId": "<uuid>", "name": "Work", "owner": { ... } ... } }
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(folder_id): PathParameters<Uuid>,
) -> Result<Success<Named<FolderResponse>>, Error> {
    let folder = fetch_folder(&storage, &folder_id).await?;

    Ok(Success::ok(
        "folder",
        folder_response(&storage, folder).await?,
    ))
}

/// Create folder form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderForm {
    /// Name of the folder, can not be empty
    name: String,

    /// The user owning the folder
    owner_id: Uuid,
}

/// Create a folder based on the [`CreateFolderForm`](CreateFolderForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "name": "Work", "ownerId": "<uuid>" }' \
///     http://localhost:8080/folders
/// ```
///
/// Response:
/// ```json
/// { "message": "Folder created successfully", "folder": { "folderId": "<uuid>" ... } }
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<CreateFolderForm>,
) -> Result<Success<Named<FolderResponse>>, Error> {
    let name = parse_name("Name", &form.name)?;
    let owner = fetch_user(&storage, &form.owner_id, "Owner not found").await?;

    let values = CreateFolderValues {
        owner: &owner,
        name: &name,
    };

    let folder = storage
        .create_folder(&values)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::debug!("Created folder {} for {}", folder.id, owner.username);

    let users = HashMap::from([(owner.id, owner)]);

    Ok(Success::created(
        "Folder created successfully",
        "folder",
        FolderResponse::from_folder_with_owner(folder, &users),
    ))
}

/// Update folder form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFolderForm {
    /// New name of the folder, can not be empty
    name: String,
}

/// Update a folder based on the [`UpdateFolderForm`](UpdateFolderForm) form
///
/// The owner of a folder never changes
///
/// Request:
/// ```sh
/// curl -v -XPUT -H 'Content-Type: application/json' \
///     -d '{ "name": "Archive" }' \
///     http://localhost:8080/folders/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "message": "Folder updated successfully", "folder": { "folderId": "<uuid>", "name": "Archive" ... } }
/// ```
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(folder_id): PathParameters<Uuid>,
    Form(form): Form<UpdateFolderForm>,
) -> Result<Success<Named<FolderResponse>>, Error> {
    let folder = fetch_folder(&storage, &folder_id).await?;
    let name = parse_name("Name", &form.name)?;

    let values = UpdateFolderValues { name: &name };

    let folder = storage
        .update_folder(&folder, &values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::updated(
        "Folder updated successfully",
        "folder",
        folder_response(&storage, folder).await?,
    ))
}

/// Delete a folder together with its notes and every share of both
///
/// Request:
/// ```sh
/// curl -v -XDELETE http://localhost:8080/folders/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "message": "Folder and its contents deleted successfully" }
/// ```
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(folder_id): PathParameters<Uuid>,
) -> Result<Success<()>, Error> {
    let folder = fetch_folder(&storage, &folder_id).await?;

    storage
        .delete_folder(&folder)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::debug!("Deleted folder {}", folder.id);

    Ok(Success::message(
        "Folder and its contents deleted successfully",
    ))
}
