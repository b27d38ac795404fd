//! Integration tests for the folder hierarchy.

mod helpers;

use std::collections::HashSet;

use notehub_core::error::ErrorKind;
use notehub_core::types::{FolderId, UserId};
use notehub_database::FolderStore;
use notehub_service::RequestContext;
use notehub_service::folder::{CreateFolderRequest, UpdateFolderRequest};

use helpers::TestApp;

fn rename(name: &str, parent_id: Option<FolderId>) -> UpdateFolderRequest {
    UpdateFolderRequest {
        name: name.to_string(),
        parent_id,
    }
}

#[tokio::test]
async fn test_root_is_created_once() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;

    let first = app.root(&ctx).await;
    let second = app.root(&ctx).await;

    assert_eq!(first.id, second.id);
    assert!(first.is_root);
    assert_eq!(first.name, "root");
    assert!(first.parent_id.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_root_creation_converges() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let folders = app.services.folders.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move { folders.get_or_create_root(&ctx).await })
        })
        .collect();

    let ids: HashSet<FolderId> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("join").expect("root").id)
        .collect();

    assert_eq!(ids.len(), 1);
    let stored = app.store.find_root(ctx.user_id).await.expect("find");
    assert_eq!(stored.map(|r| r.id), ids.into_iter().next());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_creates_leave_one_sibling() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let folders = app.services.folders.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                folders
                    .create(
                        &ctx,
                        CreateFolderRequest {
                            name: "Work".to_string(),
                            parent_id: None,
                        },
                    )
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for joined in futures::future::join_all(handles).await {
        match joined.expect("join") {
            Ok(_) => created += 1,
            Err(err) => assert_eq!(err.kind, ErrorKind::Conflict),
        }
    }

    assert_eq!(created, 1);
    let children = app.store.find_children(root.id).await.expect("children");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "Work");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_swap_moves_never_form_a_cycle() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;

    for _ in 0..8 {
        let a = app.folder(&ctx, "A", None).await;
        let b = app.folder(&ctx, "B", None).await;

        let spawn_move = |id: FolderId, name: &'static str, parent: FolderId| {
            let folders = app.services.folders.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                folders.update(&ctx, id, rename(name, Some(parent))).await
            })
        };
        let a_under_b = spawn_move(a.id, "A", b.id);
        let b_under_a = spawn_move(b.id, "B", a.id);

        let results = [
            a_under_b.await.expect("join"),
            b_under_a.await.expect("join"),
        ];
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(succeeded, 1);
        for result in &results {
            if let Err(err) = result {
                assert_eq!(err.kind, ErrorKind::Forbidden);
            }
        }

        for id in [a.id, b.id] {
            let trail = app.services.folders.breadcrumbs(id).await.expect("trail");
            assert_eq!(trail.first().map(|f| f.id), Some(root.id));
        }

        // Clear the pair before the next round.
        let top = if results[0].is_ok() { b.id } else { a.id };
        app.services.folders.delete(&ctx, top).await.expect("delete");
    }
}

#[tokio::test]
async fn test_root_for_unknown_user_is_not_found() {
    let app = TestApp::new();
    let ctx = RequestContext::new(UserId::new());

    let err = app
        .services
        .folders
        .get_or_create_root(&ctx)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_create_defaults_to_root() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;

    let work = app.folder(&ctx, "Work", None).await;
    let root = app.root(&ctx).await;

    assert_eq!(work.parent_id, Some(root.id));
    assert!(!work.is_root);
}

#[tokio::test]
async fn test_create_duplicate_sibling_conflicts() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let work = app.folder(&ctx, "Work", None).await;

    let err = app
        .services
        .folders
        .create(
            &ctx,
            CreateFolderRequest {
                name: "Work".to_string(),
                parent_id: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Same name under a different parent is fine, and names are case-sensitive.
    app.folder(&ctx, "Work", Some(work.id)).await;
    app.folder(&ctx, "work", None).await;
}

#[tokio::test]
async fn test_create_checks_parent() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let bobs = app.folder(&bob, "Private", None).await;

    let missing = app
        .services
        .folders
        .create(
            &alice,
            CreateFolderRequest {
                name: "X".to_string(),
                parent_id: Some(FolderId::new()),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(missing.kind, ErrorKind::NotFound);

    let foreign = app
        .services
        .folders
        .create(
            &alice,
            CreateFolderRequest {
                name: "X".to_string(),
                parent_id: Some(bobs.id),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(foreign.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_create_rejects_blank_and_long_names() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;

    let long = "x".repeat(256);
    for name in ["", "   ", long.as_str()] {
        let err = app
            .services
            .folders
            .create(
                &ctx,
                CreateFolderRequest {
                    name: name.to_string(),
                    parent_id: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }
}

#[tokio::test]
async fn test_get_and_list_children() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;
    for name in ["beta", "Alpha", "gamma"] {
        app.folder(&ctx, name, None).await;
    }

    let names: Vec<String> = app
        .services
        .folders
        .list_children(root.id)
        .await
        .expect("children")
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "beta", "gamma"]);

    let err = app.services.folders.get(FolderId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    let err = app
        .services
        .folders
        .list_children(FolderId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_root_children_requires_root() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;

    let err = app
        .services
        .folders
        .list_root_children(&ctx)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    app.folder(&ctx, "Work", None).await;
    let top = app
        .services
        .folders
        .list_root_children(&ctx)
        .await
        .expect("top level");
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "Work");
}

#[tokio::test]
async fn test_root_cannot_be_updated_or_deleted() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;

    let err = app
        .services
        .folders
        .update(&ctx, root.id, rename("renamed", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app.services.folders.delete(&ctx, root.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    assert_eq!(app.root(&ctx).await.name, "root");
}

#[tokio::test]
async fn test_move_into_self_or_descendant_is_forbidden() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let a = app.folder(&ctx, "A", None).await;
    let b = app.folder(&ctx, "B", Some(a.id)).await;
    let c = app.folder(&ctx, "C", Some(b.id)).await;
    let before = app.services.trees.materialize_tree(&ctx).await.expect("tree");

    for target in [a.id, b.id, c.id] {
        let err = app
            .services
            .folders
            .update(&ctx, a.id, rename("A", Some(target)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    let after = app.services.trees.materialize_tree(&ctx).await.expect("tree");
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_rename_and_move() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;
    let a = app.folder(&ctx, "A", None).await;
    let b = app.folder(&ctx, "B", None).await;

    // Keeping the current name is not a conflict with itself.
    let same = app
        .services
        .folders
        .update(&ctx, a.id, rename("A", None))
        .await
        .expect("no-op update");
    assert_eq!(same.parent_id, Some(root.id));

    let err = app
        .services
        .folders
        .update(&ctx, a.id, rename("B", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let moved = app
        .services
        .folders
        .update(&ctx, a.id, rename("A2", Some(b.id)))
        .await
        .expect("move");
    assert_eq!(moved.parent_id, Some(b.id));
    assert_eq!(moved.name, "A2");

    // Omitting the parent moves the folder back under the root.
    let back = app
        .services
        .folders
        .update(&ctx, a.id, rename("A2", None))
        .await
        .expect("move back");
    assert_eq!(back.parent_id, Some(root.id));
}

#[tokio::test]
async fn test_update_checks_ownership() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let alices = app.folder(&alice, "Mine", None).await;
    let bobs = app.folder(&bob, "Theirs", None).await;

    let err = app
        .services
        .folders
        .update(&bob, alices.id, rename("Stolen", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app
        .services
        .folders
        .update(&alice, alices.id, rename("Mine", Some(bobs.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = app
        .services
        .folders
        .update(&alice, FolderId::new(), rename("Nope", None))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .services
        .folders
        .update(&alice, alices.id, rename("Mine", Some(FolderId::new())))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_cascades_to_subtree_and_notes() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;
    let a = app.folder(&ctx, "A", None).await;
    let b = app.folder(&ctx, "B", Some(a.id)).await;
    let keep = app.folder(&ctx, "Keep", None).await;
    app.note(&ctx, a.id, "in a", &[]).await;
    app.note(&ctx, b.id, "in b", &[]).await;
    let kept = app.note(&ctx, keep.id, "kept", &[]).await;

    app.services.folders.delete(&ctx, a.id).await.expect("delete");

    for id in [a.id, b.id] {
        let err = app.services.folders.get(id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
    let remaining = app.services.notes.list_by_user(&ctx).await.expect("notes");
    assert_eq!(remaining.iter().map(|n| n.id).collect::<Vec<_>>(), vec![kept]);
    assert_eq!(
        app.services
            .folders
            .list_children(root.id)
            .await
            .expect("children")
            .len(),
        1
    );

    let err = app.services.folders.delete(&ctx, a.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_other_users_folder_is_forbidden() {
    let app = TestApp::new();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let folder = app.folder(&alice, "Mine", None).await;

    let err = app.services.folders.delete(&bob, folder.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert!(app.services.folders.get(folder.id).await.is_ok());
}

#[tokio::test]
async fn test_work_personal_scenario() {
    let app = TestApp::new();
    let ctx = app.user("u").await;
    app.root(&ctx).await;

    let work = app.folder(&ctx, "Work", None).await;
    let err = app
        .services
        .folders
        .create(
            &ctx,
            CreateFolderRequest {
                name: "Work".to_string(),
                parent_id: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let personal = app.folder(&ctx, "Personal", None).await;
    app.services
        .folders
        .update(&ctx, work.id, rename("Work", Some(personal.id)))
        .await
        .expect("move Work under Personal");

    let err = app
        .services
        .folders
        .update(&ctx, personal.id, rename("Personal", Some(work.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let tree = app.services.trees.materialize_tree(&ctx).await.expect("tree");
    assert_eq!(tree.child_names(), vec!["Personal"]);
    assert!(tree.descend(&["Personal", "Work"]).is_some());
}

#[tokio::test]
async fn test_materialize_tree_shape() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;

    let err = app
        .services
        .trees
        .materialize_tree(&ctx)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let work = app.folder(&ctx, "Work", None).await;
    app.folder(&ctx, "Archive", None).await;
    app.folder(&ctx, "reports", Some(work.id)).await;
    app.folder(&ctx, "Q1", Some(work.id)).await;

    let tree = app.services.trees.materialize_tree(&ctx).await.expect("tree");
    assert_eq!(tree.name, "root");
    assert_eq!(tree.child_names(), vec!["Archive", "Work"]);
    assert_eq!(
        tree.descend(&["Work"]).expect("work").child_names(),
        vec!["Q1", "reports"]
    );
    assert_eq!(tree.total_folders(), 5);

    let sub = app.services.trees.subtree(work.id).await.expect("subtree");
    assert_eq!(sub.child_names(), vec!["Q1", "reports"]);
}

#[tokio::test]
async fn test_every_folder_reaches_root() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let root = app.root(&ctx).await;

    let mut ids = Vec::new();
    let mut parent = None;
    for depth in 0..6 {
        let folder = app.folder(&ctx, &format!("level{depth}"), parent).await;
        parent = Some(folder.id);
        ids.push(folder.id);
    }
    // Shuffle the chain around; rejected moves leave it intact.
    let _ = app
        .services
        .folders
        .update(&ctx, ids[1], rename("level1", Some(ids[4])))
        .await;
    app.services
        .folders
        .update(&ctx, ids[4], rename("level4", Some(ids[0])))
        .await
        .expect("move up");
    app.services
        .folders
        .update(&ctx, ids[2], rename("level2", Some(ids[5])))
        .await
        .expect("move across");

    for id in ids {
        let trail = app.services.folders.breadcrumbs(id).await.expect("trail");
        assert!(trail.len() <= 7);
        assert_eq!(trail.first().map(|f| f.id), Some(root.id));
        assert_eq!(trail.last().map(|f| f.id), Some(id));
        let distinct: HashSet<FolderId> = trail.iter().map(|f| f.id).collect();
        assert_eq!(distinct.len(), trail.len());
    }
}

#[tokio::test]
async fn test_list_contents() {
    let app = TestApp::new();
    let ctx = app.user("alice").await;
    let work = app.folder(&ctx, "Work", None).await;
    app.folder(&ctx, "b", Some(work.id)).await;
    app.folder(&ctx, "a", Some(work.id)).await;
    let note = app.note(&ctx, work.id, "plan", &[]).await;

    let contents = app
        .services
        .folders
        .list_contents(work.id)
        .await
        .expect("contents");
    assert_eq!(
        contents.folders.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
    assert_eq!(contents.notes.len(), 1);
    assert_eq!(contents.notes[0].id, note);
}
