//! Session domain module.
//!
//! This module contains the session-related domain models and the
//! repository that manages their lifecycle.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `message`: Conversation message types (`Message`, `Source`)
//! - `repository`: Session collection with write-through persistence

mod message;
mod model;
mod repository;

// Re-export public API
pub use message::{Message, Source};
pub use model::{DEFAULT_TITLE, Session, derive_title};
pub use repository::SessionRepository;
