//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;

use crate::storage::Storage;

pub use request::Form;
pub use request::PathParameters;
pub use response::Error;
pub use response::Named;
pub use response::Success;

mod assets;
mod folders;
mod notes;
mod request;
mod response;
mod shares;
mod teams;
mod users;
mod utils;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let users = Router::new()
        .route("/", get(users::list::<S>).post(users::create::<S>))
        .route("/{user}", get(users::single::<S>))
        .route("/{user}/assets", get(users::assets::<S>));

    let teams = Router::new()
        .route("/", post(teams::create::<S>))
        .route("/{team}", get(teams::single::<S>))
        .route("/{team}/assets", get(teams::assets::<S>))
        .route("/{team}/members", post(teams::add_member::<S>))
        .route("/{team}/members/{member}", delete(teams::remove_member::<S>))
        .route("/{team}/managers", post(teams::add_manager::<S>))
        .route(
            "/{team}/managers/{manager}",
            delete(teams::remove_manager::<S>),
        );

    let folders = Router::new()
        .route("/", post(folders::create::<S>))
        .route(
            "/{folder}",
            get(folders::single::<S>)
                .put(folders::update::<S>)
                .delete(folders::delete::<S>),
        )
        .route("/{folder}/notes", post(notes::create::<S>))
        .route("/{folder}/share", post(shares::share_folder::<S>))
        .route(
            "/{folder}/share/{user}",
            delete(shares::revoke_folder_share::<S>),
        );

    let notes = Router::new()
        .route(
            "/{note}",
            get(notes::single::<S>)
                .put(notes::update::<S>)
                .delete(notes::delete::<S>),
        )
        .route("/{note}/share", post(shares::share_note::<S>))
        .route(
            "/{note}/share/{user}",
            delete(shares::revoke_note_share::<S>),
        );

    Router::new()
        .nest("/users", users)
        .nest("/teams", teams)
        .nest("/folders", folders)
        .nest("/notes", notes)
}
