//! API request helpers

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::Json;
use axum::extract::Path;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::shares::Access;
use crate::users::Role;

use super::Error;

/// Parse a name or title, surrounding whitespace is dropped
///
/// ```rust
/// let name = "  Work ";
/// assert_eq!(parse_name("Name", name).unwrap(), "Work".to_string())
/// ```
pub fn parse_name(field: &str, value: &str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Err(Error::bad_request(format!("{field} can not be empty")));
    }

    Ok(value.to_string())
}

/// Parse an access level, only `read` and `write` are known
pub fn parse_access(access: &str) -> Result<Access, Error> {
    access.parse::<Access>().map_err(Error::bad_request)
}

/// Parse a user role, only `manager` and `member` are known
pub fn parse_role(role: &str) -> Result<Role, Error> {
    role.parse::<Role>().map_err(Error::bad_request)
}

/// The underlying serde error, without the generic rejection text
fn error_source<E: std::error::Error>(err: &E) -> String {
    err.source().map_or_else(|| err.to_string(), ToString::to_string)
}

fn parse_json<J>(json: Result<Json<J>, JsonRejection>) -> Result<J, Error> {
    match json {
        Ok(Json(json)) => Ok(json),
        Err(err) => match err {
            JsonRejection::JsonDataError(err) => {
                Err(Error::bad_request("Data error").with_description(error_source(&err)))
            }
            JsonRejection::JsonSyntaxError(err) => {
                Err(Error::bad_request("JSON syntax error").with_description(error_source(&err)))
            }
            JsonRejection::MissingJsonContentType(_err) => Err(Error::bad_request(
                "Missing `application/json` content type",
            )),
            JsonRejection::BytesRejection(err) => {
                Err(Error::bad_request("Invalid characters in JSON").with_description(err))
            }
            err => Err(Error::bad_request("Unknown JSON error").with_description(err)),
        },
    }
}

/// Wrapper for the JSON extractor
pub struct Form<F>(pub F);

impl<S, F> FromRequest<S> for Form<F>
where
    S: Send + Sync,
    F: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = Json::<F>::from_request(req, state).await;

        parse_json(json).map(Form)
    }
}

fn parse_path<P>(path: Result<Path<P>, PathRejection>) -> Result<P, Error> {
    match path {
        Ok(Path(path)) => Ok(path),
        Err(err) => match err {
            PathRejection::FailedToDeserializePathParams(err) => {
                Err(Error::bad_request("Invalid path parameter").with_description(err))
            }
            PathRejection::MissingPathParams(err) => {
                Err(Error::bad_request("Missing path parameter").with_description(err))
            }
            err => Err(Error::bad_request("Unknown path error").with_description(err)),
        },
    }
}

/// Wrapper for the path extractor
pub struct PathParameters<P>(pub P);

impl<S, P> FromRequestParts<S> for PathParameters<P>
where
    S: Send + Sync,
    P: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = Path::<P>::from_request_parts(parts, state).await;

        parse_path(path).map(PathParameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name("Name", "Work").unwrap(), "Work".to_string());
        assert_eq!(parse_name("Name", " Work\n").unwrap(), "Work".to_string());

        assert!(parse_name("Name", "").is_err());
        assert!(parse_name("Title", "   ").is_err());
    }

    #[test]
    fn test_parse_access() {
        assert_eq!(parse_access("read").unwrap(), Access::Read);
        assert_eq!(parse_access("write").unwrap(), Access::Write);

        assert!(parse_access("owner").is_err());
        assert!(parse_access("Write").is_err());
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("manager").unwrap(), Role::Manager);
        assert!(parse_role("admin").is_err());
    }
}
