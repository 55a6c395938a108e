//! User API management

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::assets::resolve_for_user;
use crate::password::generate;
use crate::password::hash;
use crate::storage::CreateUserValues;
use crate::storage::Storage;
use crate::users::Role;
use crate::users::User;

use super::Error;
use super::Form;
use super::Named;
use super::PathParameters;
use super::Success;
use super::assets::AssetsResponse;
use super::request::parse_name;
use super::request::parse_role;
use super::utils::fetch_user;

/// The user response information
///
/// A subset of all the information, ready to be serialized for the outside world
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// The user ID
    pub user_id: Uuid,

    /// The username
    pub username: String,

    /// The email address
    pub email: String,

    /// The role of the user
    pub role: Role,

    /// The password, if generated
    // Password should only be added when newly generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserResponse {
    /// Create a user response from a [`User`](User)
    pub fn from_user(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            password: None,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    /// Add a password to the user response
    ///
    /// This is explicit extra action to take, to make sure this is really what you want to do
    fn set_password(&mut self, password: &str) {
        self.password = Some(password.to_string());
    }

    /// Create a user response from multiple [`User`](User)s
    pub fn from_user_multiple(users: Vec<User>) -> Vec<Self> {
        users.into_iter().map(Self::from_user).collect::<Vec<Self>>()
    }
}

/// List all users, oldest first
///
/// Request:
/// ```sh
/// curl -v http://localhost:8080/users
/// ```
///
/// Response:
/// ```json
/// { "users": [ { "userId": "<uuid>", "username": "some-username" ... } ] }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
) -> Result<Success<Named<Vec<UserResponse>>>, Error> {
    let users = storage
        .find_all_users()
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok("users", UserResponse::from_user_multiple(users)))
}

/// Get a single user
///
/// Request:
/// ```sh
/// curl -v http://localhost:8080/users/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "user": { "userId": "<uuid>", "username": "some-username" ... } }
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(user_id): PathParameters<Uuid>,
) -> Result<Success<Named<UserResponse>>, Error> {
    let user = fetch_user(&storage, &user_id, "User not found").await?;

    Ok(Success::ok("user", UserResponse::from_user(user)))
}

/// Create user form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserForm {
    /// Username of the new user
    username: String,

    /// Email address of the new user
    email: String,

    /// Role of the new user, `manager` or `member`
    role: String,

    /// Optional password of the new user
    ///
    /// When not provided a new password will be generated and returned in the response, this will
    /// be the only time the password is visible -- make sure to capture it.
    password: Option<String>,
}

/// Create a user based on the [`CreateUserForm`](CreateUserForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "username": "ada", "email": "ada@example.com", "role": "member" }' \
///     http://localhost:8080/users
/// ```
///
/// Response
/// ```json
/// { "message": "User created successfully", "user": { "userId": "<uuid>", "password": "generated" ... } }
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<CreateUserForm>,
) -> Result<Success<Named<UserResponse>>, Error> {
    let username = parse_name("Username", &form.username)?;
    let email = parse_name("Email", &form.email)?;
    let role = parse_role(&form.role)?;

    let existing_user = storage
        .find_single_user_by_username_or_email(&username, &email)
        .await
        .map_err(Error::internal_server_error)?;

    if existing_user.is_some() {
        return Err(Error::conflict("Username or email already taken"));
    }

    let (is_generated, password) = match form.password {
        Some(password) if password.is_empty() => {
            return Err(Error::bad_request("Password can not be empty"));
        }
        Some(password) => (false, password),
        None => (true, generate()),
    };

    let hashed_password = hash(&password).map_err(Error::internal_server_error)?;

    let values = CreateUserValues {
        username: &username,
        email: &email,
        role,
        hashed_password: &hashed_password,
    };

    let user = storage
        .create_user(&values)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::debug!("Created user {} ({})", user.username, user.id);

    let mut response = UserResponse::from_user(user);

    // only add the generated password, its the only time the password is known to anybody
    if is_generated {
        response.set_password(&password);
    }

    Ok(Success::created("User created successfully", "user", response))
}

/// Assets of a single user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAssetsResponse {
    user_id: Uuid,
    user: UserResponse,
    assets: AssetsResponse,
}

/// All folders and notes a user owns or has been granted access to
///
/// Request:
/// ```sh
/// curl -v http://localhost:8080/users/<uuid>/assets
/// ```
///
/// Response:
/// ```json
/// { "userId": "<uuid>", "user": { ... }, "assets": { "folders": [ { "accessType": "owner" ... } ], "notes": [] } }
/// ```
pub async fn assets<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(user_id): PathParameters<Uuid>,
) -> Result<Success<UserAssetsResponse>, Error> {
    let user = fetch_user(&storage, &user_id, "User not found").await?;

    let assets = resolve_for_user(&storage, &user)
        .await
        .map_err(Error::internal_server_error)?;

    let assets = AssetsResponse::from_assets(&storage, assets).await?;

    Ok(Success::fields(UserAssetsResponse {
        user_id: user.id,
        user: UserResponse::from_user(user),
        assets,
    }))
}
