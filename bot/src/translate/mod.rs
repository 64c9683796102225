use async_trait::async_trait;
use thiserror::Error;

use crate::engine::languages::LangCode;

pub mod libre;

/// A translation collaborator failure. Always transient from the engine's
/// point of view: the fan-out drops the affected target and the personal
/// path shows the message to the requesting user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("translator request failed: {0}")]
pub struct TranslateError(pub String);

/// A completed translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    pub text: String,
    /// Source code the backend detected, present when it was asked to
    /// auto-detect (`from == None`).
    pub detected_source: Option<String>,
}

/// Language detection plus text translation.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Best-guess language code for a text, normalized to lowercase. Not
    /// restricted to the supported table; callers compare, they don't store.
    async fn detect(&self, text: &str) -> Result<String, TranslateError>;

    /// Translate `text` into `to`. `from` is an already-detected source
    /// code; `None` lets the backend detect on its own.
    async fn translate(
        &self,
        text: &str,
        from: Option<&str>,
        to: LangCode,
    ) -> Result<Translated, TranslateError>;
}
