//! Integration tests for notes and tags.

mod helpers;

use notehub_core::config::LimitsConfig;
use notehub_core::error::ErrorKind;
use notehub_core::types::{NoteId, TagId};
use notehub_service::tag::{CreateTagRequest, RenameTagRequest};

use helpers::{TestApp, note_request};

#[tokio::test]
async fn test_create_and_get_note_with_tags() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;
    let zeta = app.tag(&ctx, "zeta").await;
    let alpha = app.tag(&ctx, "alpha").await;

    let id = app.note(&ctx, root.id, "Plan", &[zeta, alpha, zeta]).await;

    let detail = app.services.notes.get(&ctx, id).await.expect("get");
    assert_eq!(detail.note.title, "Plan");
    assert_eq!(
        detail.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["alpha", "zeta"]
    );
}

#[tokio::test]
async fn test_note_tags_must_exist_and_be_owned() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let root = app.root(&alice).await;
    let bobs_tag = app.tag(&bob, "secret").await;

    let err = app
        .services
        .notes
        .create(&alice, note_request(root.id, "x", &[TagId::new()]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .services
        .notes
        .create(&alice, note_request(root.id, "x", &[bobs_tag]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    assert!(
        app.services
            .notes
            .list_by_user(&alice)
            .await
            .expect("list")
            .is_empty()
    );
}

#[tokio::test]
async fn test_note_title_limits() {
    let app = TestApp::with_limits(LimitsConfig {
        max_name_length: 255,
        max_title_length: 5,
    });
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;

    for title in ["", "  ", "too long"] {
        let err = app
            .services
            .notes
            .create(&ctx, note_request(root.id, title, &[]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }
    app.note(&ctx, root.id, "short", &[]).await;
}

#[tokio::test]
async fn test_notes_in_other_users_folders_are_forbidden() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let alice_root = app.root(&alice).await;
    let bob_root = app.root(&bob).await;
    let note = app.note(&alice, alice_root.id, "mine", &[]).await;

    let err = app
        .services
        .notes
        .create(&bob, note_request(alice_root.id, "intruder", &[]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app.services.notes.get(&bob, note).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app
        .services
        .notes
        .update(&alice, note, note_request(bob_root.id, "moved", &[]))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app.services.notes.delete(&bob, note).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_update_moves_note_and_replaces_tags() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;
    let work = app.folder(&ctx, "Work", None).await;
    let a = app.tag(&ctx, "a").await;
    let b = app.tag(&ctx, "b").await;
    let note = app.note(&ctx, root.id, "draft", &[a]).await;

    let updated = app
        .services
        .notes
        .update(&ctx, note, note_request(work.id, "final", &[b]))
        .await
        .expect("update");
    assert_eq!(updated.folder_id, work.id);

    let detail = app.services.notes.get(&ctx, note).await.expect("get");
    assert_eq!(detail.note.title, "final");
    assert_eq!(detail.tags.len(), 1);
    assert_eq!(detail.tags[0].id, b);

    assert!(
        app.services
            .notes
            .list_by_folder(&ctx, root.id)
            .await
            .expect("root notes")
            .is_empty()
    );
    assert_eq!(
        app.services
            .notes
            .list_by_folder(&ctx, work.id)
            .await
            .expect("work notes")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_add_and_remove_tag() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;
    let tag = app.tag(&ctx, "t").await;
    let note = app.note(&ctx, root.id, "n", &[]).await;

    app.services
        .notes
        .add_tag(&ctx, note, tag)
        .await
        .expect("add");
    app.services
        .notes
        .add_tag(&ctx, note, tag)
        .await
        .expect("add twice");
    assert_eq!(
        app.services.notes.get(&ctx, note).await.expect("get").tags.len(),
        1
    );

    app.services
        .notes
        .remove_tag(&ctx, note, tag)
        .await
        .expect("remove");
    let err = app
        .services
        .notes
        .remove_tag(&ctx, note, tag)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_note() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;
    let note = app.note(&ctx, root.id, "n", &[]).await;

    app.services.notes.delete(&ctx, note).await.expect("delete");
    let err = app.services.notes.get(&ctx, note).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = app.services.notes.delete(&ctx, NoteId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_tag_lifecycle() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let root = app.root(&alice).await;

    let work = app.tag(&alice, "work").await;
    app.tag(&bob, "work").await;
    let err = app
        .services
        .tags
        .create(
            &alice,
            CreateTagRequest {
                name: "work".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let home = app.tag(&alice, "home").await;
    let err = app
        .services
        .tags
        .rename(
            &alice,
            home,
            RenameTagRequest {
                name: "work".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let renamed = app
        .services
        .tags
        .rename(
            &alice,
            home,
            RenameTagRequest {
                name: "house".to_string(),
            },
        )
        .await
        .expect("rename");
    assert_eq!(renamed.name, "house");

    let names: Vec<String> = app
        .services
        .tags
        .list_by_user(&alice)
        .await
        .expect("list")
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["house", "work"]);

    let err = app.services.tags.get(&bob, work).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    let err = app.services.tags.delete(&bob, work).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let note = app.note(&alice, root.id, "n", &[work]).await;
    app.services.tags.delete(&alice, work).await.expect("delete");
    assert!(
        app.services
            .notes
            .get(&alice, note)
            .await
            .expect("note survives")
            .tags
            .is_empty()
    );
}

#[tokio::test]
async fn test_list_full_by_user_carries_content_and_tags() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let root = app.root(&alice).await;
    let bob_root = app.root(&bob).await;
    let work = app.tag(&alice, "work").await;
    let home = app.tag(&alice, "home").await;

    let first = app.note(&alice, root.id, "first", &[work, home]).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = app.note(&alice, root.id, "second", &[]).await;
    app.note(&bob, bob_root.id, "bob's", &[]).await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let mut edit = note_request(root.id, "first", &[work, home]);
    edit.content = "body".to_string();
    app.services
        .notes
        .update(&alice, first, edit)
        .await
        .expect("update");

    let notes = app
        .services
        .notes
        .list_full_by_user(&alice)
        .await
        .expect("list");
    assert_eq!(
        notes.iter().map(|d| d.note.id).collect::<Vec<_>>(),
        vec![first, second]
    );
    assert_eq!(notes[0].note.content, "body");
    assert_eq!(
        notes[0].tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["home", "work"]
    );
    assert!(notes[1].tags.is_empty());

    let ghost = notehub_service::RequestContext::new(notehub_core::types::UserId::new());
    let err = app
        .services
        .notes
        .list_full_by_user(&ghost)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
