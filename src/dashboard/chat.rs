//! Chat panel

use super::{ModelSelection, Transcript};
use crate::api::{self, ApiResult, Backend};
use crate::session::{CredentialStore, Session};

/// State behind the chat tab.
///
/// A send is split into [`ChatPanel::begin`] and [`ChatPanel::finish`] so a
/// reactive view can release its borrow while the request is in flight.
/// [`ChatPanel::submit`] runs both halves for callers that own the panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatPanel {
    pub input: String,
    pub transcript: Transcript,
    pub selection: ModelSelection,
    loading: bool,
}

impl ChatPanel {
    pub fn new(transcript: Transcript, selection: ModelSelection) -> Self {
        Self {
            transcript,
            selection,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a send: append the user's message and mark the panel busy.
    ///
    /// Returns the message to send, or `None` for blank input.
    pub fn begin(&mut self) -> Option<String> {
        if self.input.trim().is_empty() {
            return None;
        }
        let message = self.input.clone();
        self.transcript.push_pending(message.as_str());
        self.loading = true;
        Some(message)
    }

    /// Record the outcome of the send started by [`ChatPanel::begin`]
    pub fn finish(&mut self, result: &ApiResult<String>) {
        self.transcript.resolve_last(result);
        self.input.clear();
        self.loading = false;
    }

    /// Send the current input. Returns `None` when there was nothing to send.
    pub async fn submit<B: Backend, S: CredentialStore>(
        &mut self,
        session: &Session<B, S>,
    ) -> Option<ApiResult<String>> {
        let message = self.begin()?;
        let result = api::chat::ask(session, &self.selection, &message).await;
        if let Err(e) = &result {
            tracing::error!(
                error = %e,
                provider = self.selection.provider(),
                model = self.selection.model(),
                "Chat request failed"
            );
        }
        self.finish(&result);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ChatReply, ProviderChatResponse};
    use crate::dashboard::ERROR_PLACEHOLDER;
    use crate::session::{AuthPhase, MemoryStore};
    use crate::testing::FakeBackend;

    async fn signed_in() -> Session<FakeBackend, MemoryStore> {
        let session = Session::new(FakeBackend::default(), MemoryStore::default());
        session.backend().push_refresh_ok("tok");
        session.bootstrap().await;
        session
    }

    fn panel(input: &str) -> ChatPanel {
        ChatPanel {
            input: input.to_string(),
            ..ChatPanel::default()
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let session = signed_in().await;
        let mut chat = panel("   \n");

        assert!(chat.submit(&session).await.is_none());
        assert!(chat.transcript.is_empty());
        assert_eq!(chat.input, "   \n");
        assert!(!chat.is_loading());
    }

    #[test]
    fn test_begin_appends_pending_entry() {
        let mut chat = panel("hello");
        assert_eq!(chat.begin(), Some("hello".to_string()));
        assert!(chat.is_loading());
        assert_eq!(chat.transcript.len(), 1);
        assert_eq!(chat.transcript.last().unwrap().ai_response, "");
        assert_eq!(chat.transcript.revision(), 1);
    }

    #[tokio::test]
    async fn test_send_makes_two_mutations() {
        let session = signed_in().await;
        session
            .backend()
            .push_pollinations(Ok(ChatReply { text: "hi!".into() }));
        let mut chat = panel("hello");

        let result = chat.submit(&session).await;
        assert_eq!(result, Some(Ok("hi!".to_string())));
        assert_eq!(chat.transcript.revision(), 2);
        assert_eq!(chat.transcript.len(), 1);
        assert_eq!(chat.transcript.last().unwrap().user_message, "hello");
        assert_eq!(chat.transcript.last().unwrap().ai_response, "hi!");
        assert!(chat.input.is_empty());
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_retry_after_refresh_shows_retried_reply() {
        let session = signed_in().await;
        session.backend().push_chat(Err(ApiError::Unauthorized));
        session.backend().push_refresh_ok("tok2");
        session.backend().push_chat(Ok(ProviderChatResponse {
            content: "second try".into(),
        }));

        let mut chat = panel("hello");
        chat.selection.select_provider("Openai").unwrap();
        chat.submit(&session).await;

        assert_eq!(session.backend().chat_requests().len(), 2);
        assert_eq!(chat.transcript.last().unwrap().ai_response, "second try");
        assert_eq!(chat.transcript.revision(), 2);
        assert_eq!(session.store().load().map(|c| c.as_str().to_string()), Some("tok2".into()));
    }

    #[tokio::test]
    async fn test_failed_refresh_shows_placeholder_and_signs_out() {
        let session = signed_in().await;
        session.backend().push_pollinations(Err(ApiError::Unauthorized));
        session.backend().push_refresh(Err(ApiError::Unauthorized));

        let mut chat = panel("hello");
        let result = chat.submit(&session).await;

        assert_eq!(result, Some(Err(ApiError::SessionExpired)));
        assert_eq!(chat.transcript.last().unwrap().ai_response, ERROR_PLACEHOLDER);
        assert_eq!(session.phase(), AuthPhase::Unauthenticated);
        assert!(session.store().load().is_none());
        assert_eq!(session.backend().pollinations_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_backend_error_keeps_earlier_entries() {
        let session = signed_in().await;
        session
            .backend()
            .push_pollinations(Ok(ChatReply { text: "one".into() }));
        session.backend().push_pollinations(Err(ApiError::Backend {
            status: 500,
            message: "boom".into(),
        }));

        let mut chat = panel("first");
        chat.submit(&session).await;
        chat.input = "second".into();
        chat.submit(&session).await;

        let responses: Vec<_> = chat
            .transcript
            .messages()
            .iter()
            .map(|m| m.ai_response.as_str())
            .collect();
        assert_eq!(responses, vec!["one", ERROR_PLACEHOLDER]);
        assert!(session.is_authenticated());
    }
}
