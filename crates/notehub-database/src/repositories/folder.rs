//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::types::{FolderId, UserId};
use notehub_entity::folder::{CreateFolder, Folder, ROOT_FOLDER_NAME};

use super::db_error;
use crate::traits::{FolderStore, FolderTx};

const FOLDER_COLUMNS: &str = "id, owner_id, parent_id, name, is_root, created_at, updated_at";

/// Upper bound on ancestor walks, far beyond any real tree depth.
const MAX_WALK_DEPTH: i32 = 10_000;

/// Repository for folder reads and hierarchy transactions.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn begin(&self) -> AppResult<Box<dyn FolderTx>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin folder transaction"))?;
        Ok(Box::new(FolderTransaction { tx: Some(tx) }))
    }

    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(&format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find folder"))
    }

    async fn find_root(&self, owner: UserId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE owner_id = $1 AND is_root"
        ))
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find root folder"))
    }

    async fn find_children(&self, parent: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE parent_id = $1 \
             ORDER BY name COLLATE \"C\" ASC"
        ))
        .bind(parent)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list children"))
    }

    async fn find_subtree(&self, root: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(&format!(
            "WITH RECURSIVE tree AS ( \
                SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id, f.owner_id, f.parent_id, f.name, f.is_root, f.created_at, f.updated_at \
                FROM folders f INNER JOIN tree t ON f.parent_id = t.id \
             ) SELECT {FOLDER_COLUMNS} FROM tree WHERE id <> $1"
        ))
        .bind(root)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list descendants"))
    }

    async fn find_ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(&format!(
            "WITH RECURSIVE chain AS ( \
                SELECT {FOLDER_COLUMNS}, 0 AS hops FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id, f.owner_id, f.parent_id, f.name, f.is_root, f.created_at, f.updated_at, \
                       c.hops + 1 \
                FROM folders f INNER JOIN chain c ON f.id = c.parent_id \
                WHERE c.hops < $2 \
             ) SELECT {FOLDER_COLUMNS} FROM chain ORDER BY hops ASC"
        ))
        .bind(id)
        .bind(MAX_WALK_DEPTH)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to find ancestors"))
    }
}

/// A PostgreSQL transaction over the folder hierarchy.
///
/// Rolled back on drop unless [`FolderTx::commit`] was called.
pub struct FolderTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl FolderTransaction {
    fn conn(&mut self) -> AppResult<&mut PgConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| AppError::internal("Folder transaction already committed"))
    }
}

#[async_trait]
impl FolderTx for FolderTransaction {
    async fn find_by_id(&mut self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(&format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.conn()?)
            .await
            .map_err(db_error("Failed to find folder"))
    }

    async fn lock_owner_tree(&mut self, owner: UserId) -> AppResult<()> {
        // Locking the root row serializes every hierarchy mutation of this
        // owner until the transaction ends.
        sqlx::query("SELECT id FROM folders WHERE owner_id = $1 AND is_root FOR UPDATE")
            .bind(owner)
            .fetch_optional(self.conn()?)
            .await
            .map_err(db_error("Failed to lock folder tree"))?;
        Ok(())
    }

    async fn ensure_root(&mut self, owner: UserId) -> AppResult<Folder> {
        sqlx::query(
            "INSERT INTO folders (id, owner_id, parent_id, name, is_root) \
             VALUES ($1, $2, NULL, $3, TRUE) \
             ON CONFLICT (owner_id) WHERE is_root DO NOTHING",
        )
        .bind(FolderId::new())
        .bind(owner)
        .bind(ROOT_FOLDER_NAME)
        .execute(self.conn()?)
        .await
        .map_err(db_error("Failed to create root folder"))?;

        sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE owner_id = $1 AND is_root"
        ))
        .bind(owner)
        .fetch_one(self.conn()?)
        .await
        .map_err(db_error("Failed to load root folder"))
    }

    async fn sibling_exists(
        &mut self,
        owner: UserId,
        parent: FolderId,
        name: &str,
        excluding: Option<FolderId>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                SELECT 1 FROM folders \
                WHERE owner_id = $1 AND parent_id = $2 AND name = $3 \
                  AND ($4::uuid IS NULL OR id <> $4) \
             )",
        )
        .bind(owner)
        .bind(parent)
        .bind(name)
        .bind(excluding)
        .fetch_one(self.conn()?)
        .await
        .map_err(db_error("Failed to check sibling names"))
    }

    async fn ancestor_ids(&mut self, id: FolderId) -> AppResult<Vec<FolderId>> {
        sqlx::query_scalar::<_, FolderId>(
            "WITH RECURSIVE chain AS ( \
                SELECT id, parent_id, 0 AS hops FROM folders WHERE id = $1 \
                UNION ALL \
                SELECT f.id, f.parent_id, c.hops + 1 \
                FROM folders f INNER JOIN chain c ON f.id = c.parent_id \
                WHERE c.hops < $2 \
             ) SELECT id FROM chain ORDER BY hops ASC",
        )
        .bind(id)
        .bind(MAX_WALK_DEPTH)
        .fetch_all(self.conn()?)
        .await
        .map_err(db_error("Failed to walk ancestors"))
    }

    async fn insert(&mut self, data: CreateFolder) -> AppResult<Folder> {
        let folder = data.into_folder();
        sqlx::query_as::<_, Folder>(&format!(
            "INSERT INTO folders ({FOLDER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, FALSE, $5, $6) RETURNING {FOLDER_COLUMNS}"
        ))
        .bind(folder.id)
        .bind(folder.owner_id)
        .bind(folder.parent_id)
        .bind(&folder.name)
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .fetch_one(self.conn()?)
        .await
        .map_err(db_error("Failed to create folder"))
    }

    async fn update(&mut self, id: FolderId, name: &str, parent: FolderId) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(&format!(
            "UPDATE folders SET name = $2, parent_id = $3, updated_at = NOW() \
             WHERE id = $1 AND NOT is_root RETURNING {FOLDER_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(parent)
        .fetch_optional(self.conn()?)
        .await
        .map_err(db_error("Failed to update folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn delete(&mut self, id: FolderId) -> AppResult<bool> {
        // Descendant folders, their notes and note links go with it through
        // ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM folders WHERE id = $1 AND NOT is_root")
            .bind(id)
            .execute(self.conn()?)
            .await
            .map_err(db_error("Failed to delete folder"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn commit(&mut self) -> AppResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AppError::internal("Folder transaction already committed"))?;
        tx.commit()
            .await
            .map_err(db_error("Failed to commit folder transaction"))
    }
}
