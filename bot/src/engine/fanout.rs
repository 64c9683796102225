use std::sync::Arc;

use tracing::{error, info, warn};

use crate::engine::languages::{self, InvalidLanguages, LangCode, UnknownLanguage};
use crate::engine::prefs::{ChannelLanguageConfig, UserLanguagePrefs};
use crate::engine::reply;
use crate::ids::{ChannelId, UserId};
use crate::translate::{TranslateError, Translator};

/// One successful target translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub lang: LangCode,
    pub text: String,
}

/// A target that failed. Kept for logging; never shown in the reply.
#[derive(Debug)]
pub struct FailedTarget {
    pub lang: LangCode,
    pub error: TranslateError,
}

/// Result of one ambient fan-out.
#[derive(Debug)]
pub struct FanOut {
    /// Detected source code; may be outside the supported table.
    pub source: String,
    /// In input target order, never completion order.
    pub translations: Vec<Translation>,
    pub failures: Vec<FailedTarget>,
}

/// Translate one text into every target, detecting the source exactly once.
/// Targets equal to the detected source are skipped. A failing target is
/// dropped from the output without affecting the others; only detection
/// failure aborts the whole fan-out.
pub async fn fan_out(
    translator: &dyn Translator,
    text: &str,
    targets: &[LangCode],
) -> Result<FanOut, TranslateError> {
    let source = translator.detect(text).await?;

    let mut translations = Vec::new();
    let mut failures = Vec::new();
    for &target in targets {
        if target.as_str() == source {
            continue;
        }
        match translator.translate(text, Some(&source), target).await {
            Ok(translated) => translations.push(Translation {
                lang: target,
                text: translated.text,
            }),
            Err(error) => failures.push(FailedTarget {
                lang: target,
                error,
            }),
        }
    }

    Ok(FanOut {
        source,
        translations,
        failures,
    })
}

/// Outcome of a personal translation request. The failure is carried as a
/// value so the host can show it to the requesting user; the ambient path
/// never does that.
#[derive(Debug)]
pub enum PersonalOutcome {
    /// The user never picked a language.
    NoPreference,
    Translated {
        /// Source code reported by the backend's auto-detection, if any.
        source: Option<String>,
        target: LangCode,
        text: String,
    },
    Failed(TranslateError),
}

/// The translation half of the bot: the ambient fan-out path, the personal
/// path, and the language configuration commands. State objects are built by
/// the composition root and injected; panel reconciliation lives in
/// [`sync`](super::sync) and shares nothing with this.
pub struct TranslationEngine {
    translator: Arc<dyn Translator>,
    prefs: Arc<UserLanguagePrefs>,
    channels: Arc<ChannelLanguageConfig>,
}

impl TranslationEngine {
    pub fn new(
        translator: Arc<dyn Translator>,
        prefs: Arc<UserLanguagePrefs>,
        channels: Arc<ChannelLanguageConfig>,
    ) -> Self {
        Self {
            translator,
            prefs,
            channels,
        }
    }

    // ── Ambient path ────────────────────────────────────────────────

    /// Handle a channel message. Returns the reply to post, or None when the
    /// bot must stay silent: unconfigured channel, blank text, detection
    /// failure, or nothing left after skips and failures.
    pub async fn handle_channel_message(
        &self,
        channel_id: ChannelId,
        text: &str,
    ) -> Option<String> {
        let targets = self.channels.get(channel_id)?;
        if text.trim().is_empty() {
            return None;
        }

        let outcome = match fan_out(self.translator.as_ref(), text, &targets).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(%channel_id, error = %e, "auto-translate detection failed");
                return None;
            }
        };

        for failed in &outcome.failures {
            warn!(
                %channel_id,
                lang = %failed.lang,
                error = %failed.error,
                "auto-translate target failed"
            );
        }

        reply::ambient_translation(&outcome)
    }

    // ── Personal path ───────────────────────────────────────────────

    /// Translate text into the requesting user's preferred language. Unlike
    /// the ambient path there is no same-language skip: an explicit request
    /// always gets an answer, identity translations included.
    pub async fn personal_translation(&self, user_id: UserId, text: &str) -> PersonalOutcome {
        let Some(target) = self.prefs.get(user_id) else {
            return PersonalOutcome::NoPreference;
        };

        match self.translator.translate(text, None, target).await {
            Ok(translated) => PersonalOutcome::Translated {
                source: translated.detected_source,
                target,
                text: translated.text,
            },
            Err(e) => {
                warn!(%user_id, error = %e, "personal translation failed");
                PersonalOutcome::Failed(e)
            }
        }
    }

    // ── Language configuration ──────────────────────────────────────

    pub fn set_user_language(
        &self,
        user_id: UserId,
        code: &str,
    ) -> Result<LangCode, UnknownLanguage> {
        let lang = LangCode::parse(code)?;
        self.prefs.set(user_id, lang);
        info!(%user_id, lang = %lang, "user language preference set");
        Ok(lang)
    }

    pub fn user_language(&self, user_id: UserId) -> Option<LangCode> {
        self.prefs.get(user_id)
    }

    /// Replace a channel's auto-translate targets. Every code is validated
    /// before anything is stored; one bad code rejects the whole batch.
    pub fn set_channel_languages(
        &self,
        channel_id: ChannelId,
        codes: &[&str],
    ) -> Result<Vec<LangCode>, InvalidLanguages> {
        let langs = languages::parse_all(codes)?;
        let stored = self.channels.set(channel_id, langs);
        let as_codes: Vec<&str> = stored.iter().map(|l| l.as_str()).collect();
        info!(%channel_id, langs = ?as_codes, "channel auto-translate configured");
        Ok(stored)
    }

    pub fn channel_languages(&self, channel_id: ChannelId) -> Option<Vec<LangCode>> {
        self.channels.get(channel_id)
    }

    pub fn clear_channel_languages(&self, channel_id: ChannelId) -> bool {
        let cleared = self.channels.clear(channel_id);
        if cleared {
            info!(%channel_id, "channel auto-translate disabled");
        }
        cleared
    }
}
