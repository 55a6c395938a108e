use axum::http::StatusCode;
use uuid::Uuid;

use crate::tests::helper;

#[tokio::test]
async fn test_share_folder() {
    let mut app = helper::setup_test_app();

    let ada = helper::create_user(&mut app, "ada").await;
    let grace = helper::create_user(&mut app, "grace").await;
    let work = helper::create_folder(&mut app, &ada.id, "Work").await;

    // new share
    let (status_code, share, _) =
        helper::maybe_share(&mut app, "folders", &work.id, &grace.id, "read").await;
    assert_eq!(StatusCode::CREATED, status_code);
    let share = share.unwrap();
    assert_eq!(grace.id, share.user_id);
    assert_eq!("read".to_string(), share.access);

    // sharing again updates the same share
    let (status_code, updated, _) =
        helper::maybe_share(&mut app, "folders", &work.id, &grace.id, "write").await;
    assert_eq!(StatusCode::OK, status_code);
    let updated = updated.unwrap();
    assert_eq!(share.id, updated.id);
    assert_eq!("write".to_string(), updated.access);

    let (_, assets, _) = helper::user_assets(&mut app, &grace.id).await;
    assert_eq!(
        vec![helper::asset(&work.id, "Work", "write")],
        assets.unwrap().folders
    );

    // revoke
    let (status_code, message, _) =
        helper::maybe_revoke(&mut app, "folders", &work.id, &grace.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some("Folder share revoked successfully".to_string()), message);

    // revoking again changes nothing
    let (status_code, _, error) =
        helper::maybe_revoke(&mut app, "folders", &work.id, &grace.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Folder share not found".to_string(), error.unwrap().error);

    let (_, assets, _) = helper::user_assets(&mut app, &grace.id).await;
    assert!(assets.unwrap().folders.is_empty());
}

#[tokio::test]
async fn test_share_note() {
    let mut app = helper::setup_test_app();

    let ada = helper::create_user(&mut app, "ada").await;
    let grace = helper::create_user(&mut app, "grace").await;
    let work = helper::create_folder(&mut app, &ada.id, "Work").await;
    let plan = helper::create_note(&mut app, &work.id, &ada.id, "Plan").await;

    let (status_code, share, _) =
        helper::maybe_share(&mut app, "notes", &plan.id, &grace.id, "write").await;
    assert_eq!(StatusCode::CREATED, status_code);
    let share = share.unwrap();
    assert_eq!("write".to_string(), share.access);

    let (status_code, updated, _) =
        helper::maybe_share(&mut app, "notes", &plan.id, &grace.id, "read").await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(share.id, updated.unwrap().id);

    // a note share does not expose the folder
    let (_, assets, _) = helper::user_assets(&mut app, &grace.id).await;
    let assets = assets.unwrap();
    assert!(assets.folders.is_empty());
    assert_eq!(vec![helper::asset(&plan.id, "Plan", "read")], assets.notes);

    let (status_code, message, _) =
        helper::maybe_revoke(&mut app, "notes", &plan.id, &grace.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some("Note share revoked successfully".to_string()), message);

    let (status_code, _, error) =
        helper::maybe_revoke(&mut app, "notes", &plan.id, &grace.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Note share not found".to_string(), error.unwrap().error);
}

#[tokio::test]
async fn test_share_validation() {
    let mut app = helper::setup_test_app();

    let ada = helper::create_user(&mut app, "ada").await;
    let grace = helper::create_user(&mut app, "grace").await;
    let work = helper::create_folder(&mut app, &ada.id, "Work").await;

    let (status_code, _, error) =
        helper::maybe_share(&mut app, "folders", &work.id, &grace.id, "owner").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!(
        r#"Access must be either "read" or "write""#.to_string(),
        error.unwrap().error
    );

    let (status_code, _, error) =
        helper::maybe_share(&mut app, "folders", &Uuid::new_v4(), &grace.id, "read").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Folder not found".to_string(), error.unwrap().error);

    let (status_code, _, error) =
        helper::maybe_share(&mut app, "notes", &Uuid::new_v4(), &grace.id, "read").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Note not found".to_string(), error.unwrap().error);

    let (status_code, _, error) =
        helper::maybe_share(&mut app, "folders", &work.id, &Uuid::new_v4(), "read").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("User not found".to_string(), error.unwrap().error);

    // nothing got shared
    let (_, assets, _) = helper::user_assets(&mut app, &grace.id).await;
    assert!(assets.unwrap().folders.is_empty());
}
