//! User management.

pub mod service;

pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
