//! Word-by-word reveal pacing.
//!
//! The backend does not stream; an answer arrives complete and the "typing"
//! is cosmetic pacing applied client-side. The scheduler grows a displayed
//! prefix one word at a time with punctuation-aware delays, and is
//! cancellable between words. Pacing never touches the data model: callers
//! always commit the full original text.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const MIN_WORD_DELAY_MS: u64 = 10;
const MAX_WORD_DELAY_MS: u64 = 30;
const PAUSE_PUNCTUATION: [char; 6] = ['.', ',', ';', ':', '?', '!'];

/// Delay to suspend after revealing `word`.
///
/// Proportional to word length, clamped to 10..=30 ms, and tripled when the
/// word ends in terminal punctuation to mimic clause pauses.
pub fn word_delay(word: &str) -> Duration {
    let base = (word.chars().count() as u64 * 5).clamp(MIN_WORD_DELAY_MS, MAX_WORD_DELAY_MS);
    if word.ends_with(PAUSE_PUNCTUATION) {
        Duration::from_millis(base * 3)
    } else {
        Duration::from_millis(base)
    }
}

/// Source of inter-word suspensions.
///
/// The production pacer sleeps on the runtime clock; tests substitute an
/// instant or recording pacer to drive pacing deterministically.
#[async_trait]
pub trait RevealPacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Pacer backed by the runtime clock.
pub struct SleepPacer;

#[async_trait]
impl RevealPacer for SleepPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Cancellation handle for an in-flight reveal.
///
/// Starting a new exchange or navigating away from the session cancels the
/// handle; the running reveal observes it between words and stops updating
/// the view.
#[derive(Clone)]
pub struct RevealHandle {
    token: CancellationToken,
}

impl RevealHandle {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Invalidates the reveal. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for RevealHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// How a reveal run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Every word was surfaced.
    Completed,
    /// The handle was cancelled mid-run; the view holds a prefix but the
    /// caller still commits the full text.
    Interrupted,
}

/// Paces the incremental display of an already-complete answer string.
pub struct RevealScheduler {
    pacer: Arc<dyn RevealPacer>,
}

impl RevealScheduler {
    /// Scheduler on the runtime clock.
    pub fn new() -> Self {
        Self::with_pacer(Arc::new(SleepPacer))
    }

    /// Scheduler with an injected pacer.
    pub fn with_pacer(pacer: Arc<dyn RevealPacer>) -> Self {
        Self { pacer }
    }

    /// Reveals `text` word by word, invoking `on_progress` with the grown
    /// prefix after each word.
    ///
    /// Splitting is on single spaces and prefixes are rejoined with single
    /// spaces, so the final prefix equals `text` exactly, whatever its
    /// whitespace. Cancellation is cooperative: the handle is checked
    /// between words, and a cancelled run makes no further `on_progress`
    /// calls.
    pub async fn run<F>(&self, text: &str, handle: &RevealHandle, mut on_progress: F) -> RevealOutcome
    where
        F: FnMut(&str) + Send,
    {
        let words: Vec<&str> = text.split(' ').collect();
        let mut revealed = String::with_capacity(text.len());

        for (index, word) in words.iter().enumerate() {
            if handle.is_cancelled() {
                return RevealOutcome::Interrupted;
            }

            if index > 0 {
                revealed.push(' ');
            }
            revealed.push_str(word);
            on_progress(&revealed);

            if index + 1 < words.len() {
                tokio::select! {
                    _ = handle.token.cancelled() => return RevealOutcome::Interrupted,
                    _ = self.pacer.pause(word_delay(word)) => {}
                }
            }
        }

        RevealOutcome::Completed
    }
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new()
    }
}
