//! Domain layer of the raglec chat client.
//!
//! Owns the conversation sessions, the exchange state machine, the reveal
//! scheduler, and the feedback reporter, with trait seams for storage
//! ([`store::ChatStore`]) and network transport ([`transport::QueryTransport`],
//! [`transport::FeedbackTransport`]). Adapters live in
//! `raglec-infrastructure`; view layers consume the view models in
//! [`view`] and never get reached into.

pub mod config;
pub mod conversation;
pub mod error;
pub mod exchange;
pub mod feedback;
pub mod reveal;
pub mod session;
pub mod store;
pub mod transport;
pub mod view;

// Re-export common error type
pub use error::{RaglecError, Result};
