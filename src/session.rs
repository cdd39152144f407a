//! Session-scoped conversation state
//!
//! One session owns a linear message list (what was said), a research
//! history (what was asked and what the backend summarized), and a stable
//! user id for the backend. The message and history lists only ever grow,
//! and `clear` wipes both together; there is no partial-clear state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::ResearchDepth;
use crate::client::{HistoryContext, ResearchBrief};

/// Cached responses keep this many chars (plus an ellipsis marker)
const CACHED_RESPONSE_CHARS: usize = 300;
/// Responses serialized for the outbound request are capped here
const CONTEXT_RESPONSE_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Present on assistant messages that carry a rendered brief
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief: Option<ResearchBrief>,
}

/// One completed research exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    /// Executive summary, truncated for caching
    pub response: String,
    pub timestamp: DateTime<Utc>,
    pub is_follow_up: bool,
    pub depth: u8,
}

/// Phases of an in-flight brief request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Complete,
    Failed,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

/// Mutable state for one chat session.
///
/// Created on session start, mutated only by the submission and clear
/// paths, dropped on exit.
pub struct SessionState {
    messages: Vec<ChatMessage>,
    history: Vec<HistoryEntry>,
    user_id: String,
    request_state: RequestState,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            history: Vec::new(),
            user_id: Uuid::new_v4().to_string(),
            request_state: RequestState::Idle,
        }
    }

    /// Opaque per-session identifier sent to the backend
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn request_state(&self) -> RequestState {
        self.request_state
    }

    pub fn set_request_state(&mut self, state: RequestState) {
        self.request_state = state;
    }

    pub fn push_user_message(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: Role::User,
            content: content.into(),
            brief: None,
        });
    }

    /// Append an assistant message, optionally carrying a brief
    pub fn push_assistant_message(
        &mut self,
        content: impl Into<String>,
        brief: Option<ResearchBrief>,
    ) {
        self.messages.push(ChatMessage {
            role: Role::Assistant,
            content: content.into(),
            brief,
        });
    }

    /// Record a completed exchange in the research history.
    ///
    /// The cached response is the brief's executive summary truncated to
    /// 300 chars with a trailing "..." marker when it overflows.
    pub fn record_exchange(
        &mut self,
        query: &str,
        brief: &ResearchBrief,
        is_follow_up: bool,
        depth: ResearchDepth,
    ) {
        let summary = brief.executive_summary.as_deref().unwrap_or("");
        self.history.push(HistoryEntry {
            query: query.to_string(),
            response: truncate_with_ellipsis(summary, CACHED_RESPONSE_CHARS),
            timestamp: Utc::now(),
            is_follow_up,
            depth: depth.as_int(),
        });
    }

    /// Shape the history for the outbound request: each response capped
    /// at 500 chars, oldest first.
    pub fn context_for_request(&self) -> Vec<HistoryContext> {
        self.history
            .iter()
            .map(|entry| HistoryContext {
                query: entry.query.clone(),
                response: truncate_chars(&entry.response, CONTEXT_RESPONSE_CHARS),
            })
            .collect()
    }

    /// The `n` most recent history entries, newest first
    pub fn recent_history(&self, n: usize) -> Vec<&HistoryEntry> {
        self.history.iter().rev().take(n).collect()
    }

    /// Wipe messages and history together. Both or neither.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.history.clear();
        self.request_state = RequestState::Idle;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate to `max` chars at a char boundary, no marker
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

/// Truncate to `max` chars, appending "..." when anything was cut
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max).collect();
        truncated.push_str("...");
        truncated
    }
}
