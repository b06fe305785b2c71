//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns all client
//! state: the conversation log, the input buffer, the pending-request flag
//! and the usage statistics snapshot.

use crate::chat::config::ChatConfig;
use crate::client::Backend;
use crate::error::Result;
use crate::observability::{SUBMISSIONS_ACCEPTED, SUBMISSIONS_FAILED, SUBMISSIONS_REJECTED};
use crate::render::Renderer;
use crate::types::{
    ApiInfo, HistoryPage, HistoryParams, Message, QueryRequest, QueryResponse, SessionId,
    StatsSnapshot, UsageStats,
};

/// Shown in place of an answer whenever a question could not be answered.
pub const APOLOGY_MESSAGE: &str =
    "Sorry, I encountered an error processing your question. Please try again.";

/// What happened to a submitted question.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The text was blank or another question was pending; nothing was sent.
    Rejected,
    /// The backend answered and the answer was appended.
    Answered,
    /// The request failed and the apology was appended.
    Failed,
}

/// A chat session that manages conversation state and backend calls.
///
/// The conversation log always starts with the welcome message and only
/// ever grows.  At most one question is in flight at a time.
pub struct ChatSession<B: Backend> {
    backend: B,
    session_id: SessionId,
    messages: Vec<Message>,
    input: String,
    pending: bool,
    stats: StatsSnapshot,
    quick_questions: Vec<String>,
}

impl<B: Backend> ChatSession<B> {
    /// Creates a new session: a fresh identifier and a log holding only the
    /// welcome message.  No network calls are made.
    pub fn new(backend: B, config: &ChatConfig) -> Self {
        Self {
            backend,
            session_id: SessionId::generate(),
            messages: vec![Message::bot(config.welcome_message.clone())],
            input: String::new(),
            pending: false,
            stats: StatsSnapshot::default(),
            quick_questions: config.quick_questions.clone(),
        }
    }

    /// Creates a new session and performs the initial statistics fetch.
    ///
    /// A failed fetch leaves the snapshot at its zero defaults.
    pub async fn start(backend: B, config: &ChatConfig) -> Self {
        let mut session = Self::new(backend, config);
        session.refresh_stats().await;
        session
    }

    /// Returns the identifier sent to the backend as `user_id`.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Returns the conversation log in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the most recent message.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns the current statistics snapshot.
    pub fn stats(&self) -> &StatsSnapshot {
        &self.stats
    }

    /// Returns true while a question is in flight.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns the input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Returns the backend this session talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// True until the user has asked a first question.
    pub fn quick_questions_offered(&self) -> bool {
        self.messages.len() <= 1
    }

    /// The suggestions currently on offer; empty once the conversation began.
    pub fn quick_questions(&self) -> &[String] {
        if self.quick_questions_offered() {
            &self.quick_questions
        } else {
            &[]
        }
    }

    /// Copies suggestion `index` (0-based) into the input buffer.
    ///
    /// Nothing is sent.  Returns the selected text, or `None` when the
    /// suggestions are no longer offered or `index` is out of range.
    pub fn select_quick_question(&mut self, index: usize) -> Option<&str> {
        let question = self.quick_questions().get(index)?.clone();
        self.input = question;
        Some(&self.input)
    }

    /// First half of a submission.
    ///
    /// Returns `None` without touching any state when `text` is blank or a
    /// question is already pending.  Otherwise appends `text` as typed,
    /// clears the input buffer, marks the session pending and returns the
    /// request to send.
    pub fn begin_submit(&mut self, text: &str) -> Option<QueryRequest> {
        if text.trim().is_empty() || self.pending {
            SUBMISSIONS_REJECTED.click();
            tracing::debug!(pending = self.pending, "submission rejected");
            return None;
        }
        SUBMISSIONS_ACCEPTED.click();
        self.messages.push(Message::user(text));
        self.input.clear();
        self.pending = true;
        Some(QueryRequest::new(text, &self.session_id))
    }

    /// Second half of a submission: append the answer or the apology.
    ///
    /// Clears the pending flag last, whatever the result.
    pub fn finish_submit(&mut self, result: Result<QueryResponse>) -> SubmitOutcome {
        let outcome = match result {
            Ok(response) => {
                self.messages.push(Message::bot(response.answer));
                SubmitOutcome::Answered
            }
            Err(err) => {
                SUBMISSIONS_FAILED.click();
                tracing::warn!(error = %err, "question failed");
                self.messages.push(Message::bot(APOLOGY_MESSAGE));
                SubmitOutcome::Failed
            }
        };
        self.pending = false;
        outcome
    }

    /// Sends `text` as a question and renders the reply.
    ///
    /// This method:
    /// 1. Appends the user message right away
    /// 2. Shows the typing indicator while the backend works
    /// 3. Appends and renders the answer, or the apology on failure
    /// 4. Refreshes statistics after a successful answer
    pub async fn submit(&mut self, text: &str, renderer: &mut dyn Renderer) -> SubmitOutcome {
        let Some(request) = self.begin_submit(text) else {
            return SubmitOutcome::Rejected;
        };

        renderer.start_typing();
        let result = self.backend.query(&request).await;
        let outcome = self.finish_submit(result);
        renderer.finish_typing();
        if let Some(message) = self.messages.last() {
            renderer.print_message(message);
        }

        if outcome == SubmitOutcome::Answered {
            self.refresh_stats().await;
        }
        outcome
    }

    /// Sends the input buffer as a question.
    pub async fn submit_input(&mut self, renderer: &mut dyn Renderer) -> SubmitOutcome {
        let text = self.input.clone();
        self.submit(&text, renderer).await
    }

    /// Fetches fresh statistics.
    ///
    /// Returns true when the snapshot was updated.  On failure the previous
    /// counters stay and the snapshot is marked stale.
    pub async fn refresh_stats(&mut self) -> bool {
        let result = self.backend.stats().await;
        self.apply_stats(result)
    }

    /// Applies the result of a statistics fetch.  The latest call wins.
    pub fn apply_stats(&mut self, result: Result<UsageStats>) -> bool {
        match result {
            Ok(stats) => {
                self.stats.update(stats);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to refresh statistics");
                self.stats.mark_stale();
                false
            }
        }
    }

    /// Fetches stored history for this session.
    pub async fn history(&self, params: HistoryParams) -> Result<HistoryPage> {
        self.backend
            .history(self.session_id.as_str(), params)
            .await
    }

    /// Fetches the backend banner.
    pub async fn ping(&self) -> Result<ApiInfo> {
        self.backend.ping().await
    }
}
