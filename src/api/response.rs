//! API response helpers

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;

/// Single named entry of a response body
///
/// `Named("folder", folder)` ends up as `{"folder": ...}`
pub struct Named<V>(pub &'static str, pub V);

impl<V> Serialize for Named<V>
where
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, &self.1)?;
        map.end()
    }
}

/// Hold data for a successful API interaction
pub struct Success<V>
where
    V: Serialize,
{
    status_code: StatusCode,
    message: Option<&'static str>,
    data: Option<V>,
}

impl<V> Success<Named<V>>
where
    V: Serialize,
{
    pub fn ok(key: &'static str, data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            message: None,
            data: Some(Named(key, data)),
        }
    }

    pub fn created(message: &'static str, key: &'static str, data: V) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            message: Some(message),
            data: Some(Named(key, data)),
        }
    }

    pub fn updated(message: &'static str, key: &'static str, data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            message: Some(message),
            data: Some(Named(key, data)),
        }
    }
}

impl<V> Success<V>
where
    V: Serialize,
{
    /// All fields of the data end up at the top level of the body
    pub fn fields(data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            message: None,
            data: Some(data),
        }
    }
}

impl Success<()> {
    pub fn message(message: &'static str) -> Self {
        Self {
            status_code: StatusCode::OK,
            message: Some(message),
            data: None,
        }
    }
}

#[derive(Serialize)]
struct DataWrapper<D>
where
    D: Serialize,
{
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,

    #[serde(flatten)]
    data: Option<D>,
}

impl<V> IntoResponse for Success<V>
where
    V: Serialize,
{
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(DataWrapper {
                message: self.message,
                data: self.data,
            }),
        )
            .into_response()
    }
}

/// Hold data for a failed API interaction
#[derive(Debug)]
pub struct Error {
    status_code: StatusCode,
    message: String,
    description: Option<String>,
}

impl Error {
    pub fn bad_request<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::BAD_REQUEST,
            message: message.to_string(),
            description: None,
        }
    }

    pub fn not_found<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::NOT_FOUND,
            message: message.to_string(),
            description: None,
        }
    }

    pub fn conflict<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::CONFLICT,
            message: message.to_string(),
            description: None,
        }
    }

    pub fn internal_server_error<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
            description: None,
        }
    }

    pub fn with_description<M>(&self, description: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: self.status_code,
            message: self.message.clone(),
            description: Some(description.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorWrapper<D>
where
    D: Serialize,
{
    error: D,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<D>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(ErrorWrapper {
                error: self.message,
                description: self.description,
            }),
        )
            .into_response()
    }
}
