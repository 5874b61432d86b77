//! Chat transcript

use serde::{Deserialize, Serialize};

use crate::api::{ApiResult, HistoryEntry};

/// Assistant text shown when a chat request fails
pub const ERROR_PLACEHOLDER: &str = "Error: could not fetch response";

/// Shown in place of the pending response while a request is outstanding
pub const TYPING_INDICATOR: &str = "AI is typing...";

/// One user message and the assistant's response to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub user_message: String,
    pub ai_response: String,
}

/// Ordered, append-only list of chat messages.
///
/// Entries are never reordered. Only the last entry's response is ever
/// updated, in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    revision: u64,
}

impl Transcript {
    /// Seed a transcript from stored history, oldest first
    pub fn from_history(mut entries: Vec<HistoryEntry>) -> Self {
        entries.sort_by_key(|entry| entry.created_at);
        Self {
            messages: entries
                .into_iter()
                .map(|entry| ChatMessage {
                    user_message: entry.question,
                    ai_response: entry.answer,
                })
                .collect(),
            revision: 0,
        }
    }

    /// Append the user's half of a new exchange
    pub fn push_pending(&mut self, user_message: impl Into<String>) {
        self.messages.push(ChatMessage {
            user_message: user_message.into(),
            ai_response: String::new(),
        });
        self.revision += 1;
    }

    /// Fill in the response of the last entry
    pub fn complete_last(&mut self, response: impl Into<String>) {
        if let Some(last) = self.messages.last_mut() {
            last.ai_response = response.into();
            self.revision += 1;
        }
    }

    /// Replace the last entry's response with [`ERROR_PLACEHOLDER`]
    pub fn fail_last(&mut self) {
        self.complete_last(ERROR_PLACEHOLDER);
    }

    pub fn resolve_last(&mut self, result: &ApiResult<String>) {
        match result {
            Ok(text) => self.complete_last(text.as_str()),
            Err(_) => self.fail_last(),
        }
    }

    /// Text to render for the response at `index`
    pub fn response_text(&self, index: usize, loading: bool) -> &str {
        match self.messages.get(index) {
            Some(message) if !message.ai_response.is_empty() => message.ai_response.as_str(),
            Some(_) if loading && index + 1 == self.messages.len() => TYPING_INDICATOR,
            _ => "",
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of mutations since the transcript was created or seeded
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
