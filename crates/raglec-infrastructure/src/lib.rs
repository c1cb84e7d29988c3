//! Adapters for the raglec chat client: durable storage backends and the
//! HTTP transport behind the trait seams defined in `raglec-core`.

pub mod http;
pub mod json_store;
pub mod memory_store;

pub use crate::http::HttpApiClient;
pub use crate::json_store::JsonFileStore;
pub use crate::memory_store::MemoryStore;
