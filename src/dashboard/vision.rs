//! Vision panel

use super::catalog::{self, CatalogError, VISION_MODELS};
use crate::api::{self, ApiResult, Backend, VisionRequest};
use crate::session::{CredentialStore, Session};

/// Image URLs generated in this session, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    images: Vec<String>,
}

impl Gallery {
    pub fn push(&mut self, url: impl Into<String>) {
        self.images.push(url.into());
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// State behind the vision tab.
///
/// Unlike chat, a failed generation leaves no trace in the gallery; the error
/// is returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionPanel {
    pub prompt: String,
    pub gallery: Gallery,
    model: &'static str,
    loading: bool,
}

impl Default for VisionPanel {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            gallery: Gallery::default(),
            model: VISION_MODELS[0],
            loading: false,
        }
    }
}

impl VisionPanel {
    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn select_model(&mut self, model: &str) -> Result<(), CatalogError> {
        self.model = catalog::vision_model(model)?;
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a generation. Returns `None` for a blank prompt.
    pub fn begin(&mut self, seed: Option<u32>) -> Option<VisionRequest> {
        if self.prompt.trim().is_empty() {
            return None;
        }
        self.loading = true;
        Some(api::vision::image_request(&self.prompt, self.model, seed))
    }

    /// Record the outcome of the generation started by [`VisionPanel::begin`]
    pub fn finish(&mut self, result: &ApiResult<String>) {
        if let Ok(url) = result {
            self.gallery.push(url.as_str());
        }
        self.prompt.clear();
        self.loading = false;
    }

    /// Generate an image for the current prompt. Returns `None` when there was
    /// nothing to send.
    pub async fn submit<B: Backend, S: CredentialStore>(
        &mut self,
        session: &Session<B, S>,
        seed: Option<u32>,
    ) -> Option<ApiResult<String>> {
        let request = self.begin(seed)?;
        let result = api::vision::generate(session, &request).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, model = self.model, seed = request.seed, "Image generation failed");
        }
        self.finish(&result);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, VisionResponse};
    use crate::session::MemoryStore;
    use crate::testing::FakeBackend;

    fn response(url: &str) -> VisionResponse {
        VisionResponse {
            image_url: url.to_string(),
            prompt: String::new(),
            model: "flux".into(),
            width: 1024,
            height: 1024,
            seed: 0,
        }
    }

    async fn signed_in() -> Session<FakeBackend, MemoryStore> {
        let session = Session::new(FakeBackend::default(), MemoryStore::default());
        session.backend().push_refresh_ok("tok");
        session.bootstrap().await;
        session
    }

    #[test]
    fn test_default_model() {
        let mut panel = VisionPanel::default();
        assert_eq!(panel.model(), "flux");
        panel.select_model("seedream").unwrap();
        assert_eq!(panel.model(), "seedream");
        assert!(panel.select_model("midjourney").is_err());
        assert_eq!(panel.model(), "seedream");
    }

    #[tokio::test]
    async fn test_success_appends_to_gallery() {
        let session = signed_in().await;
        session.backend().push_vision(Ok(response("https://img/1")));

        let mut panel = VisionPanel {
            prompt: "a lighthouse".into(),
            ..VisionPanel::default()
        };
        let result = panel.submit(&session, Some(42)).await;

        assert_eq!(result, Some(Ok("https://img/1".to_string())));
        assert_eq!(panel.gallery.images(), &["https://img/1".to_string()]);
        assert!(panel.prompt.is_empty());
        assert!(!panel.is_loading());

        let sent = session.backend().vision_requests();
        assert_eq!(sent[0].prompt, "a lighthouse");
        assert_eq!(sent[0].seed, 42);
    }

    #[tokio::test]
    async fn test_failure_leaves_gallery_untouched() {
        let session = signed_in().await;
        session.backend().push_vision(Ok(response("https://img/1")));
        session
            .backend()
            .push_vision(Err(ApiError::Network("offline".into())));

        let mut panel = VisionPanel::default();
        panel.prompt = "one".into();
        panel.submit(&session, None).await;
        panel.prompt = "two".into();
        let result = panel.submit(&session, None).await;

        assert_eq!(result, Some(Err(ApiError::Network("offline".into()))));
        assert_eq!(panel.gallery.len(), 1);
        assert!(panel.prompt.is_empty());
        assert!(!panel.is_loading());
    }

    #[tokio::test]
    async fn test_blank_prompt_is_ignored() {
        let session = signed_in().await;
        let mut panel = VisionPanel::default();
        panel.prompt = "  ".into();

        assert!(panel.submit(&session, None).await.is_none());
        assert!(session.backend().vision_requests().is_empty());
    }
}
