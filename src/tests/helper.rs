use axum::Router;
use axum::body::Body;
use axum::body::Bytes;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use tower::Service;
use uuid::Uuid;

use crate::create_router;
use crate::storage::Memory;

/// Test helper version of User struct
#[derive(Debug)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub password: Option<String>,
}

/// Test helper version of Team struct, managers and members by user ID
#[derive(Debug)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub managers: Vec<Uuid>,
    pub members: Vec<Uuid>,
}

/// Test helper version of a manager or member
#[derive(Debug)]
pub struct Membership {
    pub team_id: Uuid,
    pub user_id: Uuid,
}

/// Test helper version of Folder struct
#[derive(Debug)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub owner_username: Option<String>,
}

/// Test helper version of Note struct
#[derive(Debug)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub folder_id: Uuid,
    pub owner_id: Uuid,
    pub folder_name: Option<String>,
}

/// Test helper version of a folder or note share
#[derive(Debug)]
pub struct Share {
    pub id: Uuid,
    pub user_id: Uuid,
    pub access: String,
}

/// Single entry of the assets, name is the folder name or the note title
#[derive(Debug, PartialEq, Eq)]
pub struct Asset {
    pub id: Uuid,
    pub name: String,
    pub access_type: String,
}

/// Test helper version of resolved assets
#[derive(Debug)]
pub struct Assets {
    pub folders: Vec<Asset>,
    pub notes: Vec<Asset>,
}

/// Error response
#[derive(Debug, PartialEq, Eq)]
pub struct Error {
    pub error: String,
    pub description: Option<String>,
}

/// Outcome of a call: status code, the data on success, the error otherwise
pub type Outcome<T> = (StatusCode, Option<T>, Option<Error>);

/// Setup the Folio app on an empty memory storage
pub fn setup_test_app() -> Router {
    setup_test_app_with_storage().0
}

/// Setup the Folio app, the storage is returned to inject failures
pub fn setup_test_app_with_storage() -> (Router, Memory) {
    let storage = Memory::new();

    (create_router(storage.clone()), storage)
}

pub async fn call(
    app: &mut Router,
    method: Method,
    uri: &str,
    payload: Option<Value>,
) -> (StatusCode, Bytes) {
    let builder = Request::builder().method(method).uri(uri);

    let request = if let Some(payload) = payload {
        builder
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status_code, body)
}

pub async fn call_with_raw_body(
    app: &mut Router,
    uri: &str,
    body: &'static str,
    include_content_type: bool,
) -> (StatusCode, Option<Error>) {
    let mut builder = Request::builder().method(Method::POST).uri(uri);

    if include_content_type {
        builder = builder.header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    }

    let request = builder.body(Body::from(body.as_bytes())).unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status_code, Some(get_error(&body)))
}

fn outcome<T>(status_code: StatusCode, body: &Bytes, to_data: fn(&Value) -> T) -> Outcome<T> {
    if status_code.is_success() {
        let value = serde_json::from_slice::<Value>(&body[..]).unwrap();

        (status_code, Some(to_data(&value)), None)
    } else {
        (status_code, None, Some(get_error(body)))
    }
}

pub async fn maybe_create_user(
    app: &mut Router,
    username: &str,
    role: &str,
    password: Option<&str>,
) -> Outcome<User> {
    let mut payload = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "role": role,
    });

    if let Some(password) = password {
        payload["password"] = Value::String(password.to_string());
    }

    let (status_code, body) = call(app, Method::POST, "/users", Some(payload)).await;

    outcome(status_code, &body, |value| value_to_user(&value["user"]))
}

/// Create a member user, every test needs a couple
pub async fn create_user(app: &mut Router, username: &str) -> User {
    let (status_code, user, _) = maybe_create_user(app, username, "member", None).await;
    assert_eq!(StatusCode::CREATED, status_code);

    user.unwrap()
}

pub async fn single_user(app: &mut Router, user_id: &str) -> Outcome<User> {
    let (status_code, body) = call(app, Method::GET, &format!("/users/{user_id}"), None).await;

    outcome(status_code, &body, |value| value_to_user(&value["user"]))
}

pub async fn list_users(app: &mut Router) -> Outcome<Vec<User>> {
    let (status_code, body) = call(app, Method::GET, "/users", None).await;

    outcome(status_code, &body, |value| {
        value["users"].as_array().unwrap().iter().map(value_to_user).collect()
    })
}

pub async fn maybe_create_team(
    app: &mut Router,
    name: &str,
    manager_ids: &[Uuid],
    member_ids: &[Uuid],
) -> Outcome<Team> {
    let managers = manager_ids
        .iter()
        .map(|id| json!({ "managerId": id, "managerName": "ignored" }))
        .collect::<Vec<Value>>();
    let members = member_ids
        .iter()
        .map(|id| json!({ "memberId": id }))
        .collect::<Vec<Value>>();

    let payload = json!({
        "teamName": name,
        "managers": managers,
        "members": members,
    });

    let (status_code, body) = call(app, Method::POST, "/teams", Some(payload)).await;

    outcome(status_code, &body, |value| value_to_team(&value["team"]))
}

pub async fn single_team(app: &mut Router, team_id: &Uuid) -> Outcome<Team> {
    let (status_code, body) = call(app, Method::GET, &format!("/teams/{team_id}"), None).await;

    outcome(status_code, &body, |value| value_to_team(&value["team"]))
}

/// Add a user to a team, `kind` is either `members` or `managers`
pub async fn maybe_add_to_team(
    app: &mut Router,
    kind: &str,
    team_id: &Uuid,
    user_id: &Uuid,
) -> Outcome<Membership> {
    let payload = json!({ "userId": user_id });

    let (status_code, body) = call(
        app,
        Method::POST,
        &format!("/teams/{team_id}/{kind}"),
        Some(payload),
    )
    .await;

    let (status_code, membership, error) = outcome(status_code, &body, |value| value.clone());

    (
        status_code,
        membership.map(|value| {
            let membership = if kind == "members" {
                &value["member"]
            } else {
                &value["manager"]
            };

            Membership {
                team_id: value_to_uuid(&membership["teamId"]),
                user_id: value_to_uuid(&membership["userId"]),
            }
        }),
        error,
    )
}

/// Remove a user from a team, `kind` is either `members` or `managers`
pub async fn maybe_remove_from_team(
    app: &mut Router,
    kind: &str,
    team_id: &Uuid,
    user_id: &Uuid,
) -> Outcome<String> {
    let (status_code, body) = call(
        app,
        Method::DELETE,
        &format!("/teams/{team_id}/{kind}/{user_id}"),
        None,
    )
    .await;

    outcome(status_code, &body, value_to_message)
}

pub async fn maybe_create_folder(app: &mut Router, owner_id: &Uuid, name: &str) -> Outcome<Folder> {
    let payload = json!({ "name": name, "ownerId": owner_id });

    let (status_code, body) = call(app, Method::POST, "/folders", Some(payload)).await;

    outcome(status_code, &body, |value| value_to_folder(&value["folder"]))
}

pub async fn create_folder(app: &mut Router, owner_id: &Uuid, name: &str) -> Folder {
    let (status_code, folder, _) = maybe_create_folder(app, owner_id, name).await;
    assert_eq!(StatusCode::CREATED, status_code);

    folder.unwrap()
}

pub async fn single_folder(app: &mut Router, folder_id: &Uuid) -> Outcome<Folder> {
    let (status_code, body) =
        call(app, Method::GET, &format!("/folders/{folder_id}"), None).await;

    outcome(status_code, &body, |value| value_to_folder(&value["folder"]))
}

pub async fn maybe_update_folder(
    app: &mut Router,
    folder_id: &Uuid,
    name: &str,
) -> Outcome<Folder> {
    let payload = json!({ "name": name });

    let (status_code, body) = call(
        app,
        Method::PUT,
        &format!("/folders/{folder_id}"),
        Some(payload),
    )
    .await;

    outcome(status_code, &body, |value| value_to_folder(&value["folder"]))
}

pub async fn maybe_delete_folder(app: &mut Router, folder_id: &Uuid) -> Outcome<String> {
    let (status_code, body) =
        call(app, Method::DELETE, &format!("/folders/{folder_id}"), None).await;

    outcome(status_code, &body, value_to_message)
}

pub async fn maybe_create_note(
    app: &mut Router,
    folder_id: &Uuid,
    owner_id: &Uuid,
    title: &str,
    body: Option<&str>,
) -> Outcome<Note> {
    let mut payload = json!({ "title": title, "ownerId": owner_id });

    if let Some(body) = body {
        payload["body"] = Value::String(body.to_string());
    }

    let (status_code, body) = call(
        app,
        Method::POST,
        &format!("/folders/{folder_id}/notes"),
        Some(payload),
    )
    .await;

    outcome(status_code, &body, |value| value_to_note(&value["note"]))
}

pub async fn create_note(app: &mut Router, folder_id: &Uuid, owner_id: &Uuid, title: &str) -> Note {
    let (status_code, note, _) = maybe_create_note(app, folder_id, owner_id, title, None).await;
    assert_eq!(StatusCode::CREATED, status_code);

    note.unwrap()
}

pub async fn single_note(app: &mut Router, note_id: &Uuid) -> Outcome<Note> {
    let (status_code, body) = call(app, Method::GET, &format!("/notes/{note_id}"), None).await;

    outcome(status_code, &body, |value| value_to_note(&value["note"]))
}

pub async fn maybe_update_note(
    app: &mut Router,
    note_id: &Uuid,
    title: &str,
    body: Option<&str>,
) -> Outcome<Note> {
    let mut payload = json!({ "title": title });

    if let Some(body) = body {
        payload["body"] = Value::String(body.to_string());
    }

    let (status_code, body) =
        call(app, Method::PUT, &format!("/notes/{note_id}"), Some(payload)).await;

    outcome(status_code, &body, |value| value_to_note(&value["note"]))
}

pub async fn maybe_delete_note(app: &mut Router, note_id: &Uuid) -> Outcome<String> {
    let (status_code, body) = call(app, Method::DELETE, &format!("/notes/{note_id}"), None).await;

    outcome(status_code, &body, value_to_message)
}

/// Share a folder or note, `kind` is either `folders` or `notes`
pub async fn maybe_share(
    app: &mut Router,
    kind: &str,
    resource_id: &Uuid,
    user_id: &Uuid,
    access: &str,
) -> Outcome<Share> {
    let payload = json!({ "userId": user_id, "access": access });

    let (status_code, body) = call(
        app,
        Method::POST,
        &format!("/{kind}/{resource_id}/share"),
        Some(payload),
    )
    .await;

    outcome(status_code, &body, |value| value_to_share(&value["share"]))
}

/// Revoke a folder or note share, `kind` is either `folders` or `notes`
pub async fn maybe_revoke(
    app: &mut Router,
    kind: &str,
    resource_id: &Uuid,
    user_id: &Uuid,
) -> Outcome<String> {
    let (status_code, body) = call(
        app,
        Method::DELETE,
        &format!("/{kind}/{resource_id}/share/{user_id}"),
        None,
    )
    .await;

    outcome(status_code, &body, value_to_message)
}

pub async fn user_assets(app: &mut Router, user_id: &Uuid) -> Outcome<Assets> {
    let (status_code, body) =
        call(app, Method::GET, &format!("/users/{user_id}/assets"), None).await;

    outcome(status_code, &body, |value| value_to_assets(&value["assets"]))
}

pub async fn team_assets(app: &mut Router, team_id: &Uuid) -> Outcome<Assets> {
    let (status_code, body) =
        call(app, Method::GET, &format!("/teams/{team_id}/assets"), None).await;

    outcome(status_code, &body, |value| value_to_assets(&value["assets"]))
}

fn value_to_uuid(value: &Value) -> Uuid {
    value.as_str().map(Uuid::parse_str).unwrap().unwrap()
}

fn value_to_string(value: &Value) -> String {
    value.as_str().map(ToString::to_string).unwrap()
}

fn value_to_message(value: &Value) -> String {
    value_to_string(&value["message"])
}

fn value_to_user(user: &Value) -> User {
    User {
        id: value_to_uuid(&user["userId"]),
        username: value_to_string(&user["username"]),
        email: value_to_string(&user["email"]),
        role: value_to_string(&user["role"]),
        password: user
            .get("password")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}

fn value_to_team(team: &Value) -> Team {
    let user_ids = |users: &Value| -> Vec<Uuid> {
        users
            .as_array()
            .unwrap()
            .iter()
            .map(|user| value_to_uuid(&user["userId"]))
            .collect()
    };

    Team {
        id: value_to_uuid(&team["teamId"]),
        name: value_to_string(&team["teamName"]),
        managers: user_ids(&team["managers"]),
        members: user_ids(&team["members"]),
    }
}

fn value_to_folder(folder: &Value) -> Folder {
    Folder {
        id: value_to_uuid(&folder["folderId"]),
        name: value_to_string(&folder["name"]),
        owner_id: value_to_uuid(&folder["ownerId"]),
        owner_username: folder
            .get("owner")
            .and_then(|owner| owner.get("username"))
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}

fn value_to_note(note: &Value) -> Note {
    Note {
        id: value_to_uuid(&note["noteId"]),
        title: value_to_string(&note["title"]),
        body: value_to_string(&note["body"]),
        folder_id: value_to_uuid(&note["folderId"]),
        owner_id: value_to_uuid(&note["ownerId"]),
        folder_name: note
            .get("folder")
            .and_then(|folder| folder.get("name"))
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}

fn value_to_share(share: &Value) -> Share {
    Share {
        id: value_to_uuid(&share["id"]),
        user_id: value_to_uuid(&share["userId"]),
        access: value_to_string(&share["access"]),
    }
}

fn value_to_assets(assets: &Value) -> Assets {
    let entries = |entries: &Value, id_key: &str, name_key: &str| -> Vec<Asset> {
        entries
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| Asset {
                id: value_to_uuid(&entry[id_key]),
                name: value_to_string(&entry[name_key]),
                access_type: value_to_string(&entry["accessType"]),
            })
            .collect()
    };

    Assets {
        folders: entries(&assets["folders"], "folderId", "name"),
        notes: entries(&assets["notes"], "noteId", "title"),
    }
}

fn value_to_error(error: &Map<String, Value>) -> Error {
    Error {
        error: error["error"].as_str().map(ToString::to_string).unwrap(),
        description: error
            .get("description")
            .and_then(Value::as_str)
            .map(ToString::to_string),
    }
}

fn get_error(body: &Bytes) -> Error {
    serde_json::from_slice::<Value>(&body[..])
        .unwrap()
        .as_object()
        .map(value_to_error)
        .unwrap()
}

/// Shorthand for the expected assets entries
pub fn asset(id: &Uuid, name: &str, access_type: &str) -> Asset {
    Asset {
        id: *id,
        name: name.to_string(),
        access_type: access_type.to_string(),
    }
}
