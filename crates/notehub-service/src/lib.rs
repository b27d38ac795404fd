//! # notehub-service
//!
//! Business logic service layer for NoteHub. The folder services keep each
//! user's hierarchy a single rooted, cycle-free, uniquely-named tree; the
//! tag filter service answers AND/OR queries over the note to tag relation.
//!
//! Services follow constructor injection: every store is provided at
//! construction time as an `Arc<dyn ...>` trait object.

pub mod context;
pub mod folder;
pub mod note;
pub mod registry;
pub mod tag;
pub mod user;
pub mod validation;

pub use context::RequestContext;
pub use folder::{FolderService, TreeService};
pub use note::{NoteService, TagFilterService};
pub use registry::{Services, Stores};
pub use tag::TagService;
pub use user::UserService;
