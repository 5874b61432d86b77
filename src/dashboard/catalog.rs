//! Provider and model catalog

use thiserror::Error;

/// Chat providers and their models, in display order. The first model of each
/// provider is its default.
pub const PROVIDERS: &[(&str, &[&str])] = &[
    ("Polynations", &["Polynations"]),
    (
        "Openai",
        &[
            "gpt-5",
            "gpt-5-mini",
            "gpt-5-nano",
            "gpt-4.1",
            "gpt-4.1-mini",
            "gpt-4.1-nano",
            "gpt-4o",
            "gpt-4o-mini",
            "gpt-3.5-turbo",
        ],
    ),
    (
        "Anthropic",
        &[
            "claude-opus-4-1-20250805",
            "claude-opus-4-20250514",
            "claude-sonnet-4-20250514",
            "claude-3-5-haiku-20241022",
        ],
    ),
    ("Deepseek", &["deepseek-chat", "deepseek-reasoner"]),
    ("Groq", &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"]),
    (
        "Gemini",
        &[
            "gemini-2.5-pro",
            "gemini-2.5-flash",
            "gemini-2.5-flash-lite",
            "gemini-2.0-flash",
        ],
    ),
];

/// The only image provider
pub const VISION_PROVIDER: &str = "Polynations";

/// Image models accepted by the vision endpoint; the first is the default
pub const VISION_MODELS: &[&str] = &["flux", "kontext", "turbo", "nanobanana", "seedream"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Model {model} is not offered by {provider}")]
    UnknownModel { provider: String, model: String },
}

pub fn provider_names() -> impl Iterator<Item = &'static str> {
    PROVIDERS.iter().map(|(name, _)| *name)
}

pub fn models_for(provider: &str) -> Option<&'static [&'static str]> {
    PROVIDERS
        .iter()
        .find(|(name, _)| *name == provider)
        .map(|(_, models)| *models)
}

/// Look up a vision model by name
pub fn vision_model(model: &str) -> Result<&'static str, CatalogError> {
    VISION_MODELS
        .iter()
        .copied()
        .find(|m| *m == model)
        .ok_or_else(|| CatalogError::UnknownModel {
            provider: VISION_PROVIDER.to_string(),
            model: model.to_string(),
        })
}

/// Current provider/model pair for the chat view.
///
/// The model always belongs to the provider: changing provider resets the
/// model to that provider's first entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSelection {
    provider: &'static str,
    model: &'static str,
}

impl Default for ModelSelection {
    fn default() -> Self {
        let (provider, models) = PROVIDERS[0];
        Self {
            provider,
            model: models[0],
        }
    }
}

impl ModelSelection {
    /// Selection for `provider`, with `model` or the provider's default
    pub fn new(provider: &str, model: Option<&str>) -> Result<Self, CatalogError> {
        let mut selection = Self::default();
        selection.select_provider(provider)?;
        if let Some(model) = model {
            selection.select_model(model)?;
        }
        Ok(selection)
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    /// Models offered by the current provider
    pub fn models(&self) -> &'static [&'static str] {
        models_for(self.provider).unwrap_or(&[])
    }

    pub fn select_provider(&mut self, provider: &str) -> Result<(), CatalogError> {
        let (name, models) = PROVIDERS
            .iter()
            .find(|(name, _)| *name == provider)
            .ok_or_else(|| CatalogError::UnknownProvider(provider.to_string()))?;
        self.provider = *name;
        self.model = models[0];
        Ok(())
    }

    pub fn select_model(&mut self, model: &str) -> Result<(), CatalogError> {
        self.model = self
            .models()
            .iter()
            .copied()
            .find(|m| *m == model)
            .ok_or_else(|| CatalogError::UnknownModel {
                provider: self.provider.to_string(),
                model: model.to_string(),
            })?;
        Ok(())
    }
}
