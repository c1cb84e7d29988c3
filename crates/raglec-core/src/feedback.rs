//! Per-answer feedback voting.

use crate::config::ClientConfig;
use crate::error::{RaglecError, Result};
use crate::transport::{FeedbackRequest, FeedbackTransport};
use crate::view::{Notice, ViewSink};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thumbs-up or thumbs-down vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    /// Wire value: +1 for up, -1 for down.
    pub fn value(&self) -> i8 {
        match self {
            Vote::Up => 1,
            Vote::Down => -1,
        }
    }
}

/// Sends signed votes for completed answers, independent of the exchange
/// lifecycle.
///
/// The local selection indicator is optimistic and last-write-wins: it is
/// recorded before the network call and never reverted on failure. One
/// attempt per user action, no retry.
pub struct FeedbackReporter {
    transport: Arc<dyn FeedbackTransport>,
    view: Arc<dyn ViewSink>,
    config: ClientConfig,
    selections: RwLock<HashMap<String, Vote>>,
}

impl FeedbackReporter {
    pub fn new(
        transport: Arc<dyn FeedbackTransport>,
        view: Arc<dyn ViewSink>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            view,
            config,
            selections: RwLock::new(HashMap::new()),
        }
    }

    /// Votes on an answer.
    ///
    /// Without a backend-issued answer id the vote fails locally with
    /// `MissingAnswerId` and no network call is made. Transport failures
    /// and backend rejections surface as notices; the selection stands
    /// either way.
    pub async fn vote(&self, answer_id: Option<&str>, vote: Vote) -> Result<()> {
        let Some(answer_id) = answer_id else {
            self.view.notice(Notice::warning(
                "Feedback is unavailable: this answer has no identifier",
                self.config.notice_ttl,
            ));
            return Err(RaglecError::MissingAnswerId);
        };

        self.selections
            .write()
            .await
            .insert(answer_id.to_string(), vote);

        let request = FeedbackRequest {
            query_id: answer_id.to_string(),
            feedback: vote.value(),
        };
        match self.transport.send_feedback(request).await {
            Ok(ack) if ack.success => {
                tracing::debug!(answer_id, value = vote.value(), "feedback recorded");
            }
            Ok(ack) => {
                let reason = ack.error.unwrap_or_else(|| "feedback rejected".to_string());
                tracing::error!(answer_id, %reason, "feedback rejected by backend");
                self.view.notice(Notice::error(
                    format!("Could not record feedback: {}", reason),
                    self.config.notice_ttl,
                ));
            }
            Err(err) => {
                tracing::error!(answer_id, error = %err, "feedback send failed");
                self.view.notice(Notice::error(
                    format!("Could not send feedback: {}", err),
                    self.config.notice_ttl,
                ));
            }
        }
        Ok(())
    }

    /// The currently selected vote for an answer, if any.
    pub async fn selection(&self, answer_id: &str) -> Option<Vote> {
        self.selections.read().await.get(answer_id).copied()
    }
}
