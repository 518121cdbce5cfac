//! Chat session state machine.
//!
//! A [`ChatSession`] owns the message log of one chat surface. Every mutation
//! of the log is followed by exactly one write of the whole log to the
//! preference store, issued while the session lock is held so writes reach the
//! store in mutation order.
//!
//! ```text
//!            submit                 reply ok
//!   Idle ───────────────▶ AwaitingReply ──────────▶ Idle
//!    ▲                        │    ▲
//!    │ clear                  │    │ retry
//!    │                 reply  ▼    │
//!    └──────────────────── Failed ─┘
//! ```
//!
//! Submissions made while a reply is pending are queued; each queued prompt's
//! user message is appended only once the previous turn has settled, so a log
//! always reads `user, reply, user, reply, ...` in submission order.

use super::codec;
use super::message::ChatMessage;
use super::surface::{ChatSurface, MESSAGES_KEY};
use crate::error::Result;
use crate::generation::TextGenerator;
use crate::preference::PreferenceStore;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Shown to the student when a turn ends in [`SessionStatus::Failed`].
pub const REPLY_FAILED_NOTICE: &str = "Could not generate a reply.";

/// Lifecycle status of a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No generation in flight.
    Idle,
    /// A user message was appended and its reply is being generated.
    AwaitingReply,
    /// Generation for `prompt` failed; the user message stays in the log.
    Failed { prompt: String, error: String },
}

impl SessionStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self, Self::AwaitingReply)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Point-in-time view of a session, published after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub messages: Vec<ChatMessage>,
    pub status: SessionStatus,
    /// Prompts submitted but not yet started.
    pub queued: usize,
}

/// What [`ChatSession::submit`] did with the text it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty text, or the session is closed.
    Ignored,
    /// The user message was appended and generation started.
    Started,
    /// Another turn is in flight; the prompt will start after it settles.
    Queued,
}

struct SessionState {
    messages: Vec<ChatMessage>,
    status: SessionStatus,
    pending: VecDeque<String>,
    /// Bumped by `clear`; replies belonging to an older epoch are dropped.
    epoch: u64,
    turn_token: Option<CancellationToken>,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            messages: self.messages.clone(),
            status: self.status.clone(),
            queued: self.pending.len(),
        }
    }
}

struct SessionInner {
    surface: ChatSurface,
    store: Arc<dyn PreferenceStore>,
    generator: Arc<dyn TextGenerator>,
    state: Mutex<SessionState>,
    updates: watch::Sender<SessionSnapshot>,
    shutdown: CancellationToken,
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl SessionInner {
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, messages: &[ChatMessage]) {
        match codec::encode(messages) {
            Ok(json) => self.store.put(self.surface.namespace(), MESSAGES_KEY, json),
            Err(e) => tracing::error!(
                "[ChatSession] Failed to encode {} history: {}",
                self.surface,
                e
            ),
        }
    }

    fn publish(&self, state: &SessionState) {
        self.updates.send_replace(state.snapshot());
    }

    fn begin_turn(self: &Arc<Self>, state: &mut SessionState, prompt: String) {
        state.messages.push(ChatMessage::user(prompt.clone()));
        self.persist(&state.messages);
        self.spawn_generation(state, prompt);
    }

    fn spawn_generation(self: &Arc<Self>, state: &mut SessionState, prompt: String) {
        let token = self.shutdown.child_token();
        state.turn_token = Some(token.clone());
        state.status = SessionStatus::AwaitingReply;

        let epoch = state.epoch;
        let generator = Arc::clone(&self.generator);
        let session = Arc::downgrade(self);
        let surface = self.surface;

        tracing::debug!("[ChatSession] {} generating reply (epoch {})", surface, epoch);

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("[ChatSession] {} generation cancelled", surface);
                    return;
                }
                result = generator.generate(&prompt) => result,
            };

            if let Some(inner) = session.upgrade() {
                inner.finish_turn(epoch, prompt, result);
            }
        });
    }

    fn finish_turn(self: &Arc<Self>, epoch: u64, prompt: String, result: Result<String>) {
        let mut state = self.lock_state();

        if state.epoch != epoch || self.shutdown.is_cancelled() {
            tracing::debug!("[ChatSession] {} dropping stale reply", self.surface);
            return;
        }
        state.turn_token = None;

        match result {
            Ok(reply) => {
                state.messages.push(ChatMessage::assistant(reply));
                self.persist(&state.messages);

                match state.pending.pop_front() {
                    Some(next) => self.begin_turn(&mut state, next),
                    None => state.status = SessionStatus::Idle,
                }
            }
            Err(e) => {
                tracing::warn!("[ChatSession] {} reply failed: {}", self.surface, e);
                state.status = SessionStatus::Failed {
                    prompt,
                    error: e.to_string(),
                };
            }
        }

        self.publish(&state);
    }
}

/// Controller for one chat surface.
///
/// Cloning yields another handle to the same session. When the last handle is
/// dropped, any in-flight generation is cancelled and its reply discarded.
///
/// `submit` and `retry` spawn the generation onto the current tokio runtime
/// and must be called from within one.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<SessionInner>,
}

impl ChatSession {
    /// Opens the session for `surface`, restoring its persisted history.
    ///
    /// Missing history starts an empty log; unreadable history is discarded
    /// with a warning.
    pub fn load(
        surface: ChatSurface,
        store: Arc<dyn PreferenceStore>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let raw = store.get(surface.namespace(), MESSAGES_KEY);
        let messages = match codec::decode(raw.as_deref()) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(
                    "[ChatSession] Discarding unreadable {} history: {}",
                    surface,
                    e
                );
                Vec::new()
            }
        };

        tracing::info!(
            "[ChatSession] Loaded {} with {} messages",
            surface,
            messages.len()
        );

        let state = SessionState {
            messages,
            status: SessionStatus::Idle,
            pending: VecDeque::new(),
            epoch: 0,
            turn_token: None,
        };
        let (updates, _) = watch::channel(state.snapshot());

        Self {
            inner: Arc::new(SessionInner {
                surface,
                store,
                generator,
                state: Mutex::new(state),
                updates,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn surface(&self) -> ChatSurface {
        self.inner.surface
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.lock_state().messages.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.inner.lock_state().status.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock_state().snapshot()
    }

    /// Subscribes to snapshots published after every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Submits a student message.
    ///
    /// Empty text is ignored. If no reply is pending, the message is appended
    /// and persisted before this returns, and its reply is requested in the
    /// background with the raw text as prompt. Otherwise the text is queued
    /// behind the pending turn.
    ///
    /// Submitting while [`SessionStatus::Failed`] abandons the failed turn.
    pub fn submit(&self, text: &str) -> SubmitOutcome {
        if text.is_empty() || self.inner.shutdown.is_cancelled() {
            return SubmitOutcome::Ignored;
        }

        let mut state = self.inner.lock_state();
        let outcome = if state.status.is_awaiting_reply() {
            state.pending.push_back(text.to_string());
            SubmitOutcome::Queued
        } else if state.status.is_failed() && !state.pending.is_empty() {
            // Prompts queued behind the failed turn go first.
            state.pending.push_back(text.to_string());
            if let Some(next) = state.pending.pop_front() {
                self.inner.begin_turn(&mut state, next);
            }
            SubmitOutcome::Queued
        } else {
            self.inner.begin_turn(&mut state, text.to_string());
            SubmitOutcome::Started
        };

        self.inner.publish(&state);
        outcome
    }

    /// Re-requests the reply for the failed prompt.
    ///
    /// No second user message is appended. Returns `false` when the session
    /// is not in [`SessionStatus::Failed`].
    pub fn retry(&self) -> bool {
        if self.inner.shutdown.is_cancelled() {
            return false;
        }

        let mut state = self.inner.lock_state();
        let prompt = match &state.status {
            SessionStatus::Failed { prompt, .. } => prompt.clone(),
            _ => return false,
        };

        tracing::info!("[ChatSession] {} retrying failed prompt", self.inner.surface);
        self.inner.spawn_generation(&mut state, prompt);
        self.inner.publish(&state);
        true
    }

    /// Empties the log and persists the empty log.
    ///
    /// Any in-flight generation is cancelled and queued prompts are dropped.
    pub fn clear(&self) {
        let mut state = self.inner.lock_state();

        if let Some(token) = state.turn_token.take() {
            token.cancel();
        }
        state.epoch += 1;
        state.messages.clear();
        state.pending.clear();
        state.status = SessionStatus::Idle;

        self.inner.persist(&state.messages);
        self.inner.publish(&state);
    }

    /// Stops the session: in-flight generation is cancelled, queued prompts
    /// are dropped and later submissions are ignored.
    ///
    /// A turn that was awaiting its reply ends as [`SessionStatus::Idle`] with
    /// the user message kept.
    pub fn close(&self) {
        let mut state = self.inner.lock_state();
        self.inner.shutdown.cancel();

        state.turn_token = None;
        state.epoch += 1;
        state.pending.clear();
        if state.status.is_awaiting_reply() {
            state.status = SessionStatus::Idle;
        }

        tracing::debug!("[ChatSession] {} closed", self.inner.surface);
        self.inner.publish(&state);
    }

    /// Waits until no reply is pending and returns the resulting snapshot.
    pub async fn settled(&self) -> SessionSnapshot {
        let mut rx = self.subscribe();
        match rx.wait_for(|s| !s.status.is_awaiting_reply()).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.snapshot(),
        }
    }
}
