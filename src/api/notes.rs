//! Note API management

use std::collections::HashMap;

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::folders::Folder;
use crate::notes::Note;
use crate::storage::CreateNoteValues;
use crate::storage::Storage;
use crate::storage::UpdateNoteValues;
use crate::users::User;

use super::Error;
use super::Form;
use super::Named;
use super::PathParameters;
use super::Success;
use super::folders::FolderResponse;
use super::request::parse_name;
use super::users::UserResponse;
use super::utils::fetch_folder;
use super::utils::fetch_folders_by_ids;
use super::utils::fetch_note;
use super::utils::fetch_user;
use super::utils::fetch_users_by_ids;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub note_id: Uuid,
    pub title: String,
    pub body: String,
    pub folder_id: Uuid,
    pub owner_id: Uuid,
    pub folder: Option<FolderResponse>,
    pub owner: Option<UserResponse>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NoteResponse {
    /// Create a note response, folder and owner are taken from the lookups
    pub fn from_note(
        note: Note,
        folders: &HashMap<Uuid, Folder>,
        users: &HashMap<Uuid, User>,
    ) -> Self {
        Self {
            note_id: note.id,
            title: note.title,
            body: note.body,
            folder_id: note.folder_id,
            owner_id: note.owner_id,
            folder: folders
                .get(&note.folder_id)
                .cloned()
                .map(FolderResponse::from_folder),
            owner: users
                .get(&note.owner_id)
                .cloned()
                .map(UserResponse::from_user),
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

/// Create a note response with its folder and owner
pub async fn note_response<S: Storage>(storage: &S, note: Note) -> Result<NoteResponse, Error> {
    let folders = fetch_folders_by_ids(storage, [note.folder_id]).await?;
    let users = fetch_users_by_ids(storage, [note.owner_id]).await?;

    Ok(NoteResponse::from_note(note, &folders, &users))
}

/// Get a single note
///
/// Request:
/// ```sh
/// curl -v http://localhost:8080/notes/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "note": { "noteId": "<uuid>", "title": "Plan", "folder": { ... }, "owner": { ... } ... } }
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<Named<NoteResponse>>, Error> {
    let note = fetch_note(&storage, &note_id).await?;

    Ok(Success::ok("note", note_response(&storage, note).await?))
}

/// Create note form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteForm {
    /// Title of the note, can not be empty
    title: String,

    /// Optional body of the note, empty when left out
    body: Option<String>,

    /// The user owning the note
    owner_id: Uuid,
}

/// Create a note in a folder based on the [`CreateNoteForm`](CreateNoteForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "title": "Plan", "body": "draft", "ownerId": "<uuid>" }' \
///     http://localhost:8080/folders/<uuid>/notes
/// ```
///
/// Response:
/// ```json
/// { "message": "Note created successfully", "note": { "noteId": "<uuid>" ... } }
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(folder_id): PathParameters<Uuid>,
    Form(form): Form<CreateNoteForm>,
) -> Result<Success<Named<NoteResponse>>, Error> {
    let folder = fetch_folder(&storage, &folder_id).await?;
    let owner = fetch_user(&storage, &form.owner_id, "Owner not found").await?;
    let title = parse_name("Title", &form.title)?;

    let values = CreateNoteValues {
        owner: &owner,
        title: &title,
        body: form.body.as_deref().unwrap_or_default(),
    };

    let note = storage
        .create_note(&folder, &values)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::debug!("Created note {} in folder {}", note.id, folder.id);

    let folders = HashMap::from([(folder.id, folder)]);
    let users = HashMap::from([(owner.id, owner)]);

    Ok(Success::created(
        "Note created successfully",
        "note",
        NoteResponse::from_note(note, &folders, &users),
    ))
}

/// Update note form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteForm {
    /// New title of the note, can not be empty
    title: String,

    /// New body of the note, empty when left out
    body: Option<String>,
}

/// Update a note based on the [`UpdateNoteForm`](UpdateNoteForm) form
///
/// Owner and folder of a note never change
///
/// Request:
/// ```sh
/// curl -v -XPUT -H 'Content-Type: application/json' \
///     -d '{ "title": "Plan", "body": "final" }' \
///     http://localhost:8080/notes/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "message": "Note updated successfully", "note": { "noteId": "<uuid>", "body": "final" ... } }
/// ```
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<Uuid>,
    Form(form): Form<UpdateNoteForm>,
) -> Result<Success<Named<NoteResponse>>, Error> {
    let note = fetch_note(&storage, &note_id).await?;
    let title = parse_name("Title", &form.title)?;

    let values = UpdateNoteValues {
        title: &title,
        body: form.body.as_deref().unwrap_or_default(),
    };

    let note = storage
        .update_note(&note, &values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::updated(
        "Note updated successfully",
        "note",
        note_response(&storage, note).await?,
    ))
}

/// Delete a note and its shares
///
/// Request:
/// ```sh
/// curl -v -XDELETE http://localhost:8080/notes/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "message": "Note deleted successfully" }
/// ```
pub async fn delete<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<()>, Error> {
    let note = fetch_note(&storage, &note_id).await?;

    storage
        .delete_note(&note)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::debug!("Deleted note {}", note.id);

    Ok(Success::message("Note deleted successfully"))
}
