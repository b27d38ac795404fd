//! PostgreSQL repository tests.
//!
//! These need a disposable database. Set `NOTEHUB_TEST_DATABASE_URL` and run
//! with `cargo test -- --ignored`.

use sqlx::postgres::PgPoolOptions;

use std::sync::Arc;

use notehub_core::error::{AppError, ErrorKind};
use notehub_core::result::AppResult;
use notehub_core::types::{FolderId, TagId, UserId};
use notehub_database::migration::run_migrations;
use notehub_database::repositories::FolderRepository;
use notehub_database::{
    DatabasePool, FolderStore, NoteStore, NoteTagStore, PgStores, TagStore, UserDirectory,
};
use notehub_entity::folder::CreateFolder;
use notehub_entity::note::{CreateNote, Note};

async fn stores() -> PgStores {
    let url = std::env::var("NOTEHUB_TEST_DATABASE_URL")
        .expect("NOTEHUB_TEST_DATABASE_URL must be set for ignored tests");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    DatabasePool::from_pool(pool).stores()
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", UserId::new())
}

fn child(owner: UserId, parent: FolderId, name: &str) -> CreateFolder {
    CreateFolder {
        owner_id: owner,
        parent_id: parent,
        name: name.to_string(),
    }
}

async fn note_in(stores: &PgStores, folder: FolderId, title: &str, tags: &[TagId]) -> Note {
    stores
        .notes
        .create(
            CreateNote {
                folder_id: folder,
                title: title.to_string(),
                content: String::new(),
            },
            tags,
        )
        .await
        .expect("note")
}

/// Create `name` under `parent` the way the folder service does: lock the
/// owner's tree, check siblings, insert.
async fn create_locked(
    folders: Arc<FolderRepository>,
    owner: UserId,
    parent: FolderId,
    name: &str,
) -> AppResult<()> {
    let mut tx = folders.begin().await?;
    tx.lock_owner_tree(owner).await?;
    if tx.sibling_exists(owner, parent, name, None).await? {
        return Err(AppError::conflict("Folder already exists"));
    }
    tx.insert(child(owner, parent, name)).await?;
    tx.commit().await
}

/// Move `id` under `parent` the way the folder service does, rejecting
/// moves into the folder's own subtree.
async fn move_locked(
    folders: Arc<FolderRepository>,
    owner: UserId,
    id: FolderId,
    name: &str,
    parent: FolderId,
) -> AppResult<()> {
    let mut tx = folders.begin().await?;
    tx.lock_owner_tree(owner).await?;
    if tx.ancestor_ids(parent).await?.contains(&id) {
        return Err(AppError::forbidden("Cannot move folder into its own subtree"));
    }
    tx.update(id, name, parent).await?;
    tx.commit().await
}

#[tokio::test]
#[ignore]
async fn test_concurrent_ensure_root_yields_one_root() {
    let stores = stores().await;
    let user = stores.users.create(&unique("root")).await.expect("user");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let folders = stores.folders.clone();
        handles.push(tokio::spawn(async move {
            let mut tx = folders.begin().await.expect("begin");
            let root = tx.ensure_root(user.id).await.expect("root");
            tx.commit().await.expect("commit");
            root.id
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.expect("join"));
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_sibling_name_constraint_maps_to_conflict() {
    let stores = stores().await;
    let user = stores.users.create(&unique("sib")).await.expect("user");

    let mut tx = stores.folders.begin().await.expect("begin");
    let root = tx.ensure_root(user.id).await.expect("root");
    tx.insert(child(user.id, root.id, "Work")).await.expect("insert");
    let err = tx
        .insert(child(user.id, root.id, "Work"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
#[ignore]
async fn test_delete_cascades_through_notes_and_links() {
    let stores = stores().await;
    let user = stores.users.create(&unique("cascade")).await.expect("user");
    let tag = stores.tags.create(user.id, "t").await.expect("tag");

    let mut tx = stores.folders.begin().await.expect("begin");
    let root = tx.ensure_root(user.id).await.expect("root");
    let a = tx.insert(child(user.id, root.id, "A")).await.expect("a");
    let b = tx.insert(child(user.id, a.id, "B")).await.expect("b");
    tx.commit().await.expect("commit");

    let note = stores
        .notes
        .create(
            CreateNote {
                folder_id: b.id,
                title: "deep".to_string(),
                content: String::new(),
            },
            &[tag.id],
        )
        .await
        .expect("note");

    let mut tx = stores.folders.begin().await.expect("begin");
    assert!(tx.delete(a.id).await.expect("delete"));
    tx.commit().await.expect("commit");

    assert!(stores.notes.find_by_id(note.id).await.expect("find").is_none());
    assert!(
        stores
            .note_tags
            .tag_ids_for_note(note.id)
            .await
            .expect("links")
            .is_empty()
    );
    assert!(stores.folders.find_subtree(root.id).await.expect("tree").is_empty());
}

#[tokio::test]
#[ignore]
async fn test_tag_set_queries() {
    let stores = stores().await;
    let user = stores.users.create(&unique("filter")).await.expect("user");
    let a = stores.tags.create(user.id, "a").await.expect("a");
    let b = stores.tags.create(user.id, "b").await.expect("b");

    let mut tx = stores.folders.begin().await.expect("begin");
    let root = tx.ensure_root(user.id).await.expect("root");
    tx.commit().await.expect("commit");

    let n1 = note_in(&stores, root.id, "n1", &[a.id, b.id]).await;
    let n2 = note_in(&stores, root.id, "n2", &[a.id]).await;
    let n3 = note_in(&stores, root.id, "n3", &[b.id]).await;

    let all = stores
        .notes
        .list_by_all_tags(user.id, &[a.id, b.id])
        .await
        .expect("all");
    assert_eq!(all.iter().map(|n| n.id).collect::<Vec<_>>(), vec![n1.id]);

    let mut any: Vec<_> = stores
        .notes
        .list_by_any_tag(user.id, &[a.id, b.id])
        .await
        .expect("any")
        .into_iter()
        .map(|n| n.id)
        .collect();
    any.sort();
    let mut expected = vec![n1.id, n2.id, n3.id];
    expected.sort();
    assert_eq!(any, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_concurrent_duplicate_creates_leave_one_sibling() {
    let stores = stores().await;
    let user = stores.users.create(&unique("dup")).await.expect("user");
    let mut tx = stores.folders.begin().await.expect("begin");
    let root = tx.ensure_root(user.id).await.expect("root");
    tx.commit().await.expect("commit");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let folders = stores.folders.clone();
            tokio::spawn(create_locked(folders, user.id, root.id, "Work"))
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.expect("join") {
            Ok(()) => created += 1,
            Err(err) => assert_eq!(err.kind, ErrorKind::Conflict),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(
        stores.folders.find_children(root.id).await.expect("children").len(),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_concurrent_swap_moves_never_form_a_cycle() {
    let stores = stores().await;
    let user = stores.users.create(&unique("swap")).await.expect("user");

    let mut tx = stores.folders.begin().await.expect("begin");
    let root = tx.ensure_root(user.id).await.expect("root");
    let a = tx.insert(child(user.id, root.id, "A")).await.expect("a");
    let b = tx.insert(child(user.id, root.id, "B")).await.expect("b");
    tx.commit().await.expect("commit");

    let a_under_b = tokio::spawn(move_locked(stores.folders.clone(), user.id, a.id, "A", b.id));
    let b_under_a = tokio::spawn(move_locked(stores.folders.clone(), user.id, b.id, "B", a.id));
    let results = [
        a_under_b.await.expect("join"),
        b_under_a.await.expect("join"),
    ];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for id in [a.id, b.id] {
        let chain = stores.folders.find_ancestors(id).await.expect("ancestors");
        assert_eq!(chain.last().map(|f| f.id), Some(root.id));
    }
}

#[tokio::test]
#[ignore]
async fn test_user_delete_cascades_to_owned_rows() {
    let stores = stores().await;
    let user = stores.users.create(&unique("gone")).await.expect("user");
    let tag = stores.tags.create(user.id, "t").await.expect("tag");

    let mut tx = stores.folders.begin().await.expect("begin");
    let root = tx.ensure_root(user.id).await.expect("root");
    let work = tx.insert(child(user.id, root.id, "Work")).await.expect("work");
    tx.commit().await.expect("commit");
    let note = note_in(&stores, work.id, "n", &[tag.id]).await;

    assert!(stores.users.delete(user.id).await.expect("delete"));

    assert!(stores.folders.find_root(user.id).await.expect("root").is_none());
    assert!(stores.folders.find_by_id(work.id).await.expect("work").is_none());
    assert!(stores.notes.find_by_id(note.id).await.expect("note").is_none());
    assert!(stores.tags.find_by_id(tag.id).await.expect("tag").is_none());
    assert!(
        stores
            .note_tags
            .tag_ids_for_note(note.id)
            .await
            .expect("links")
            .is_empty()
    );
    assert!(!stores.users.delete(user.id).await.expect("again"));
}

#[tokio::test]
#[ignore]
async fn test_full_notes_carry_tags() {
    let stores = stores().await;
    let user = stores.users.create(&unique("full")).await.expect("user");
    let b = stores.tags.create(user.id, "b").await.expect("b");
    let a = stores.tags.create(user.id, "a").await.expect("a");

    let mut tx = stores.folders.begin().await.expect("begin");
    let root = tx.ensure_root(user.id).await.expect("root");
    tx.commit().await.expect("commit");

    let tagged = note_in(&stores, root.id, "tagged", &[b.id, a.id]).await;
    let plain = note_in(&stores, root.id, "plain", &[]).await;

    let details = stores
        .notes
        .list_details_by_owner(user.id)
        .await
        .expect("details");
    assert_eq!(details.len(), 2);
    let tagged_detail = details
        .iter()
        .find(|d| d.note.id == tagged.id)
        .expect("tagged note");
    assert_eq!(
        tagged_detail.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
    let plain_detail = details
        .iter()
        .find(|d| d.note.id == plain.id)
        .expect("plain note");
    assert!(plain_detail.tags.is_empty());
}
