//! The root!
//!
//! A banner to see the service is up, and the answer for every unknown route

use serde::Serialize;

use crate::api::Error;
use crate::api::Named;
use crate::api::Success;

#[derive(Debug, Serialize)]
pub struct Banner {
    name: &'static str,
    version: &'static str,
}

/// Service banner
///
/// Request:
/// ```sh
/// curl -v http://localhost:8080/
/// ```
///
/// Response:
/// ```json
/// { "service": { "name": "folio", "version": "0.1.0" } }
/// ```
pub async fn root() -> Success<Named<Banner>> {
    Success::ok(
        "service",
        Banner {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// All unknown routes end up here
pub async fn not_found() -> Error {
    Error::not_found("Route not found")
}
