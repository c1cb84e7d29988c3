//! Backend wire types and transport seams.
//!
//! The query and feedback endpoints are the only two network surfaces the
//! client consumes. The traits here decouple the exchange controller and
//! feedback reporter from the HTTP implementation; wire field names follow
//! the backend's snake_case JSON.

use crate::error::Result;
use crate::session::{Message, Source};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry of the conversation context sent with a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    /// "user" or "assistant".
    pub role: &'static str,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        match message {
            Message::User { text } => Self {
                role: "user",
                content: text.clone(),
                sources: None,
                query_id: None,
            },
            Message::Assistant {
                text,
                sources,
                answer_id,
            } => Self {
                role: "assistant",
                content: text.clone(),
                sources: if sources.is_empty() {
                    None
                } else {
                    Some(sources.clone())
                },
                query_id: answer_id.clone(),
            },
        }
    }
}

/// Request body for `POST /api/query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub conversation_history: Vec<HistoryEntry>,
}

/// Response body of `POST /api/query`.
///
/// A payload may carry `error` instead of an answer; the controller treats
/// that as a transport failure. Unknown fields (backend metadata) are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub query_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body for `POST /api/feedback`.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackRequest {
    pub query_id: String,
    /// +1 for thumbs up, -1 for thumbs down.
    pub feedback: i8,
}

/// Response body of `POST /api/feedback`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Transport seam for the query endpoint.
///
/// A non-2xx status, a network failure, or an unparsable body all surface
/// as `Transport` errors; backend-reported `error` fields come back inside
/// a successful [`QueryResponse`] and are the caller's to interpret.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse>;
}

/// Transport seam for the feedback endpoint.
#[async_trait]
pub trait FeedbackTransport: Send + Sync {
    async fn send_feedback(&self, request: FeedbackRequest) -> Result<FeedbackResponse>;
}
