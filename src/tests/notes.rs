use axum::http::StatusCode;
use uuid::Uuid;

use crate::tests::helper;

#[tokio::test]
async fn test_notes() {
    let mut app = helper::setup_test_app();

    let ada = helper::create_user(&mut app, "ada").await;
    let work = helper::create_folder(&mut app, &ada.id, "Work").await;

    // create note, folder is included
    let (status_code, note, _) =
        helper::maybe_create_note(&mut app, &work.id, &ada.id, "Plan", Some("draft")).await;
    assert_eq!(StatusCode::CREATED, status_code);
    let note = note.unwrap();
    assert_eq!("Plan".to_string(), note.title);
    assert_eq!("draft".to_string(), note.body);
    assert_eq!(work.id, note.folder_id);
    assert_eq!(ada.id, note.owner_id);
    assert_eq!(Some("Work".to_string()), note.folder_name);

    // verify note
    let (status_code, single, _) = helper::single_note(&mut app, &note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    let single = single.unwrap();
    assert_eq!(note.id, single.id);
    assert_eq!(Some("Work".to_string()), single.folder_name);

    // update note
    let (status_code, updated, _) =
        helper::maybe_update_note(&mut app, &note.id, "Plan B", Some("final")).await;
    assert_eq!(StatusCode::OK, status_code);
    let updated = updated.unwrap();
    assert_eq!("Plan B".to_string(), updated.title);
    assert_eq!("final".to_string(), updated.body);
    assert_eq!(work.id, updated.folder_id);

    // leaving out the body empties it
    let (status_code, updated, _) =
        helper::maybe_update_note(&mut app, &note.id, "Plan C", None).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(String::new(), updated.unwrap().body);

    // delete note
    let (status_code, message, _) = helper::maybe_delete_note(&mut app, &note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some("Note deleted successfully".to_string()), message);

    let (status_code, _, error) = helper::single_note(&mut app, &note.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Note not found".to_string(), error.unwrap().error);

    // the folder is untouched
    let (status_code, _, _) = helper::single_folder(&mut app, &work.id).await;
    assert_eq!(StatusCode::OK, status_code);
}

#[tokio::test]
async fn test_note_validation() {
    let mut app = helper::setup_test_app();

    let ada = helper::create_user(&mut app, "ada").await;
    let work = helper::create_folder(&mut app, &ada.id, "Work").await;

    let (status_code, _, error) =
        helper::maybe_create_note(&mut app, &Uuid::new_v4(), &ada.id, "Plan", None).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Folder not found".to_string(), error.unwrap().error);

    let (status_code, _, error) =
        helper::maybe_create_note(&mut app, &work.id, &Uuid::new_v4(), "Plan", None).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!("Owner not found".to_string(), error.unwrap().error);

    let (status_code, _, error) =
        helper::maybe_create_note(&mut app, &work.id, &ada.id, "", None).await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
    assert_eq!("Title can not be empty".to_string(), error.unwrap().error);

    // no notes in a deleted folder
    helper::maybe_delete_folder(&mut app, &work.id).await;

    let (status_code, _, _) =
        helper::maybe_create_note(&mut app, &work.id, &ada.id, "Plan", None).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
}

#[tokio::test]
async fn test_delete_note_removes_shares() {
    let mut app = helper::setup_test_app();

    let ada = helper::create_user(&mut app, "ada").await;
    let grace = helper::create_user(&mut app, "grace").await;

    let work = helper::create_folder(&mut app, &ada.id, "Work").await;
    let plan = helper::create_note(&mut app, &work.id, &ada.id, "Plan").await;

    helper::maybe_share(&mut app, "notes", &plan.id, &grace.id, "read").await;

    let (status_code, _, _) = helper::maybe_delete_note(&mut app, &plan.id).await;
    assert_eq!(StatusCode::OK, status_code);

    let (status_code, _, _) = helper::maybe_revoke(&mut app, "notes", &plan.id, &grace.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let (_, assets, _) = helper::user_assets(&mut app, &grace.id).await;
    assert!(assets.unwrap().notes.is_empty());
}
