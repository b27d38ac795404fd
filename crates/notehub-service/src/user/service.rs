//! User registration, renaming and removal.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use notehub_core::config::LimitsConfig;
use notehub_core::error::AppError;
use notehub_core::result::AppResult;
use notehub_core::traits::Service;
use notehub_core::types::UserId;
use notehub_database::UserDirectory;
use notehub_entity::user::User;

use crate::validation;

/// Manages the users that own folders, notes and tags.
#[derive(Clone)]
pub struct UserService {
    /// User store.
    users: Arc<dyn UserDirectory>,
    /// Input limits.
    limits: LimitsConfig,
}

impl Service for UserService {}

/// Request to register a user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Unique username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
}

/// Request to change a username.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New username. Keeping the current one is a no-op.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserDirectory>, limits: LimitsConfig) -> Self {
        Self { users, limits }
    }

    /// Registers a user. A taken username is a conflict.
    pub async fn create(&self, req: CreateUserRequest) -> AppResult<User> {
        validation::check(&req)?;
        validation::require_name("Username", &req.username, self.limits.max_name_length)?;

        let user = self.users.create(&req.username).await?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get(&self, user_id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))
    }

    /// Gets a user by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{username}' not found")))
    }

    /// Lists every user ordered by username.
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    /// Changes a username.
    pub async fn update(&self, user_id: UserId, req: UpdateUserRequest) -> AppResult<User> {
        validation::check(&req)?;
        validation::require_name("Username", &req.username, self.limits.max_name_length)?;

        let old = self.get(user_id).await?;
        if old.username == req.username {
            return Ok(old);
        }

        let user = self.users.rename(user_id, &req.username).await?;

        info!(
            user_id = %user_id,
            old_username = %old.username,
            new_username = %user.username,
            "User renamed"
        );
        Ok(user)
    }

    /// Deletes a user together with everything they own.
    pub async fn delete(&self, user_id: UserId) -> AppResult<()> {
        if !self.users.delete(user_id).await? {
            return Err(AppError::not_found(format!("User {user_id} not found")));
        }

        info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}
