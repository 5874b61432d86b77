//! Chat calls
//!
//! Two backend shapes exist: the pollinations endpoint takes a bare prompt,
//! the generic endpoint takes provider, model and a system prompt. Both are
//! normalized to [`ChatReply`].

use super::{
    ApiResult, Backend, ChatReply, HistoryEntry, PollinationsChatRequest, ProviderChatRequest,
};
use crate::dashboard::{ModelSelection, Transcript};
use crate::session::{Credential, CredentialStore, Session};

/// Provider routed to the prompt-only endpoint
pub const POLLINATIONS_PROVIDER: &str = "Polynations";

/// System prompt sent with every provider/model request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Send one message to the endpoint matching `provider`
pub async fn send_chat<B: Backend + ?Sized>(
    backend: &B,
    credential: &Credential,
    provider: &str,
    model: &str,
    message: &str,
) -> ApiResult<ChatReply> {
    if provider == POLLINATIONS_PROVIDER {
        let request = PollinationsChatRequest {
            prompt: message.to_string(),
        };
        backend.chat_pollinations(credential, &request).await
    } else {
        let request = ProviderChatRequest {
            provider: provider.to_string(),
            model: model.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: message.to_string(),
        };
        backend.chat(credential, &request).await.map(ChatReply::from)
    }
}

/// Ask the selected model, refreshing and resending once on 401
pub async fn ask<B: Backend, S: CredentialStore>(
    session: &Session<B, S>,
    selection: &ModelSelection,
    message: &str,
) -> ApiResult<String> {
    let backend = session.backend();
    session
        .authorized(|credential| async move {
            send_chat(
                backend,
                &credential,
                selection.provider(),
                selection.model(),
                message,
            )
            .await
        })
        .await
        .map(|reply| reply.text)
}

/// Fetch stored question/answer pairs in backend order
pub async fn fetch_history<B: Backend + ?Sized>(
    backend: &B,
    credential: &Credential,
) -> ApiResult<Vec<HistoryEntry>> {
    backend.chat_history(credential).await
}

/// Load prior exchanges into a transcript, oldest first.
///
/// Failures are ignored and yield an empty transcript.
pub async fn load_history<B: Backend, S: CredentialStore>(session: &Session<B, S>) -> Transcript {
    let Some(credential) = session.credential() else {
        return Transcript::default();
    };

    match fetch_history(session.backend(), &credential).await {
        Ok(entries) => Transcript::from_history(entries),
        Err(e) => {
            tracing::debug!(error = %e, "Chat history unavailable");
            Transcript::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ProviderChatResponse};
    use crate::session::MemoryStore;
    use crate::testing::FakeBackend;
    use chrono::{TimeZone, Utc};

    async fn signed_in() -> Session<FakeBackend, MemoryStore> {
        let session = Session::new(FakeBackend::default(), MemoryStore::default());
        session.backend().push_refresh_ok("tok");
        session.backend().push_user(Err(ApiError::Network("skip".into())));
        session.bootstrap().await;
        session
    }

    #[tokio::test]
    async fn test_pollinations_sends_prompt_only() {
        let backend = FakeBackend::default();
        backend.push_pollinations(Ok(ChatReply { text: "hey".into() }));

        let reply = send_chat(&backend, &Credential::new("t"), "Polynations", "Polynations", "hi")
            .await
            .unwrap();
        assert_eq!(reply.text, "hey");
        assert_eq!(
            backend.pollinations_requests(),
            vec![PollinationsChatRequest { prompt: "hi".into() }]
        );
        assert!(backend.chat_requests().is_empty());
    }

    #[tokio::test]
    async fn test_provider_request_shape() {
        let backend = FakeBackend::default();
        backend.push_chat(Ok(ProviderChatResponse {
            content: "bonjour".into(),
        }));

        let reply = send_chat(&backend, &Credential::new("t"), "Openai", "gpt-4o", "hello")
            .await
            .unwrap();
        assert_eq!(reply.text, "bonjour");

        let requests = backend.chat_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].provider, "Openai");
        assert_eq!(requests[0].model, "gpt-4o");
        assert_eq!(requests[0].system_prompt, SYSTEM_PROMPT);
        assert_eq!(requests[0].user_prompt, "hello");
    }

    #[tokio::test]
    async fn test_ask_retries_with_refreshed_token() {
        let session = signed_in().await;
        session.backend().push_chat(Err(ApiError::Unauthorized));
        session.backend().push_refresh_ok("tok2");
        session.backend().push_chat(Ok(ProviderChatResponse {
            content: "retried".into(),
        }));

        let selection = ModelSelection::new("Groq", None).unwrap();
        let text = ask(&session, &selection, "ping").await.unwrap();

        assert_eq!(text, "retried");
        assert_eq!(session.backend().chat_requests().len(), 2);
        assert_eq!(session.backend().chat_requests()[1].model, "llama-3.3-70b-versatile");
    }

    #[tokio::test]
    async fn test_load_history_sorts_entries() {
        let session = signed_in().await;
        session.backend().push_history(Ok(vec![
            HistoryEntry {
                question: "second".into(),
                answer: "2".into(),
                created_at: Utc.with_ymd_and_hms(2025, 9, 2, 0, 0, 0).unwrap(),
            },
            HistoryEntry {
                question: "first".into(),
                answer: "1".into(),
                created_at: Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap(),
            },
        ]));

        let transcript = load_history(&session).await;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].user_message, "first");
        assert_eq!(transcript.messages()[1].ai_response, "2");
    }

    #[tokio::test]
    async fn test_load_history_failure_is_silent() {
        let session = signed_in().await;
        session.backend().push_history(Err(ApiError::Unauthorized));

        let transcript = load_history(&session).await;
        assert!(transcript.is_empty());
        // no refresh attempt on this read path
        assert_eq!(
            session.backend().calls(),
            vec!["refresh", "current_user", "chat_history"]
        );
        assert!(session.is_authenticated());
    }
}
