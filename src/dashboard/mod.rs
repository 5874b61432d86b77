//! Dashboard state
//!
//! View-independent state behind the chat and vision tabs. Both the browser
//! client and the CLI drive these panels; neither holds a borrow of the
//! session across an await.

pub mod catalog;
pub mod chat;
pub mod transcript;
pub mod vision;

pub use catalog::{
    models_for, provider_names, vision_model, CatalogError, ModelSelection, PROVIDERS,
    VISION_MODELS, VISION_PROVIDER,
};
pub use chat::ChatPanel;
pub use transcript::{ChatMessage, Transcript, ERROR_PLACEHOLDER, TYPING_INDICATOR};
pub use vision::{Gallery, VisionPanel};

/// Shown when the transcript is empty
pub const EMPTY_TRANSCRIPT: &str = "Start chatting...";

/// Shown when no image has been generated
pub const EMPTY_GALLERY: &str = "No images generated yet...";

/// Dashboard tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Chat,
    Vision,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Chat => "Chat",
            Tab::Vision => "Vision",
        }
    }
}
