//! Exchange controller.
//!
//! Orchestrates one query/answer cycle: validates input, appends the user
//! message optimistically, calls the query transport, paces the reveal of
//! the answer, and commits the finished assistant message back into the
//! session. The controller also owns session switching so an in-flight
//! reveal is always invalidated before the active session changes.

use crate::config::ClientConfig;
use crate::conversation::Conversation;
use crate::error::Result;
use crate::reveal::{RevealHandle, RevealOutcome, RevealScheduler};
use crate::session::{Message, Session, SessionRepository};
use crate::transport::{HistoryEntry, QueryRequest, QueryTransport};
use crate::view::{Notice, ViewSink, render_message};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Lifecycle of one exchange. Transient; reconstructed fresh per query.
///
/// ```text
/// Idle -> Pending -> Delivering -> Completed -> Idle
///              \--> Failed ------------------> Idle
/// ```
///
/// Every transition out of `Pending` is exhaustive: the controller always
/// returns to `Idle` and never wedges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Pending,
    Delivering,
    Failed,
    Completed,
}

/// What a call to [`ExchangeController::submit`] amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input, or an exchange was already in flight.
    Ignored,
    /// The answer was revealed in full and committed.
    Completed,
    /// The reveal was invalidated mid-run; the full answer was still
    /// committed to its source session.
    Interrupted,
    /// The transport failed or the backend reported an error.
    Failed(String),
}

/// Drives query/answer exchanges over an injected transport.
///
/// Collaborators are shared behind `Arc` so a view layer can hold the same
/// repository and accumulator. Only one exchange may be pending or
/// delivering at a time; submissions in between are ignored.
pub struct ExchangeController {
    repository: Arc<RwLock<SessionRepository>>,
    conversation: Arc<RwLock<Conversation>>,
    transport: Arc<dyn QueryTransport>,
    view: Arc<dyn ViewSink>,
    scheduler: RevealScheduler,
    config: ClientConfig,
    state: Arc<RwLock<ExchangeState>>,
    active_reveal: Arc<Mutex<Option<RevealHandle>>>,
}

impl ExchangeController {
    pub fn new(
        repository: Arc<RwLock<SessionRepository>>,
        conversation: Arc<RwLock<Conversation>>,
        transport: Arc<dyn QueryTransport>,
        view: Arc<dyn ViewSink>,
        config: ClientConfig,
    ) -> Self {
        Self {
            repository,
            conversation,
            transport,
            view,
            scheduler: RevealScheduler::new(),
            config,
            state: Arc::new(RwLock::new(ExchangeState::Idle)),
            active_reveal: Arc::new(Mutex::new(None)),
        }
    }

    /// Replaces the reveal scheduler, letting tests drive pacing with a
    /// virtual clock.
    pub fn with_scheduler(mut self, scheduler: RevealScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Loads the repository from its store and mirrors the active
    /// session's log into the accumulator.
    pub async fn initialize(&self) -> Result<()> {
        let mut repository = self.repository.write().await;
        repository.initialize().await?;
        if let Some(session) = repository.active_session() {
            let messages = session.messages.clone();
            self.conversation.write().await.replace_all(messages);
        }
        Ok(())
    }

    /// Submits a user query.
    ///
    /// Whitespace-only input is a silent no-op. Input while an exchange is
    /// pending or delivering is ignored so answers cannot interleave. The
    /// trimmed text is appended as a user message before the transport is
    /// called and is never rolled back, even on failure.
    pub async fn submit(&self, input: &str) -> Result<SubmitOutcome> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }

        {
            let mut state = self.state.write().await;
            if *state != ExchangeState::Idle {
                tracing::debug!("exchange already in flight, input ignored");
                return Ok(SubmitOutcome::Ignored);
            }
            *state = ExchangeState::Pending;
        }

        match self.run_exchange(text).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                // Persistence failed mid-exchange; release the controller
                // before surfacing it.
                *self.state.write().await = ExchangeState::Idle;
                Err(err)
            }
        }
    }

    async fn run_exchange(&self, text: &str) -> Result<SubmitOutcome> {
        let user = Message::user(text);
        let (session_id, history) = {
            let mut repository = self.repository.write().await;
            let session_id = match repository.active_session_id().map(str::to_string) {
                Some(id) => id,
                None => repository.create_session().await?.id,
            };
            repository.append_message(&session_id, user.clone()).await?;

            let mut conversation = self.conversation.write().await;
            conversation.append(user.clone());
            let history: Vec<HistoryEntry> = conversation
                .recent_window(self.config.history_window)
                .iter()
                .map(HistoryEntry::from)
                .collect();
            (session_id, history)
        };
        self.view
            .message_appended(&session_id, render_message(&user, &self.config));

        let request = QueryRequest {
            query: text.to_string(),
            conversation_history: history,
        };
        let response = match self.transport.query(request).await {
            Ok(response) => response,
            Err(err) => return Ok(self.fail(err.to_string()).await),
        };

        // A 2xx payload can still carry a backend-reported error.
        if let Some(reason) = response.error {
            return Ok(self.fail(reason).await);
        }
        let Some(answer) = response.response else {
            return Ok(self.fail("The backend returned no answer".to_string()).await);
        };

        *self.state.write().await = ExchangeState::Delivering;

        let handle = RevealHandle::new();
        *self.active_reveal.lock().await = Some(handle.clone());

        let view = self.view.clone();
        let reveal_session = session_id.clone();
        let outcome = self
            .scheduler
            .run(&answer, &handle, |prefix| {
                view.reveal_progress(&reveal_session, prefix)
            })
            .await;
        *self.active_reveal.lock().await = None;

        // Single commit site: the full original text goes to the source
        // session whether or not the reveal ran to completion. The
        // accumulator only mirrors it if that session is still active.
        let assistant = Message::assistant(answer, response.sources, response.query_id);
        {
            let mut repository = self.repository.write().await;
            repository
                .append_message(&session_id, assistant.clone())
                .await?;
            if repository.active_session_id() == Some(session_id.as_str()) {
                self.conversation.write().await.append(assistant.clone());
                self.view
                    .message_appended(&session_id, render_message(&assistant, &self.config));
            }
        }

        *self.state.write().await = ExchangeState::Completed;
        self.acknowledge().await;

        Ok(match outcome {
            RevealOutcome::Completed => SubmitOutcome::Completed,
            RevealOutcome::Interrupted => SubmitOutcome::Interrupted,
        })
    }

    async fn fail(&self, reason: String) -> SubmitOutcome {
        tracing::error!(%reason, "exchange failed");
        *self.state.write().await = ExchangeState::Failed;
        self.view
            .notice(Notice::error(reason.clone(), self.config.notice_ttl));
        self.acknowledge().await;
        SubmitOutcome::Failed(reason)
    }

    /// Returns a terminal exchange to `Idle`. The controller calls this
    /// itself once the outcome has been surfaced; it is exposed for views
    /// that dismiss a failure early.
    pub async fn acknowledge(&self) {
        let mut state = self.state.write().await;
        if matches!(*state, ExchangeState::Failed | ExchangeState::Completed) {
            *state = ExchangeState::Idle;
        }
    }

    /// Current exchange state.
    pub async fn state(&self) -> ExchangeState {
        self.state.read().await.clone()
    }

    /// Creates a fresh session and makes it active, invalidating any
    /// in-flight reveal first.
    pub async fn create_session(&self) -> Result<Session> {
        self.cancel_active_reveal().await;
        let mut repository = self.repository.write().await;
        let session = repository.create_session().await?;
        self.conversation.write().await.clear();
        Ok(session)
    }

    /// Switches to an existing session, invalidating any in-flight reveal
    /// and replacing the accumulator with the session's log.
    pub async fn select_session(&self, session_id: &str) -> Result<Session> {
        self.cancel_active_reveal().await;
        let mut repository = self.repository.write().await;
        let session = repository.select_session(session_id).await?;
        self.conversation
            .write()
            .await
            .replace_all(session.messages.clone());
        Ok(session)
    }

    async fn cancel_active_reveal(&self) {
        if let Some(handle) = self.active_reveal.lock().await.as_ref() {
            handle.cancel();
        }
    }
}
