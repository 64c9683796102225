//! User-visible reply text. Every string the bot posts, whether answering a
//! command or translating channel traffic, is built here so the wording lives
//! in one place and the engines stay presentation-free.

use crate::engine::fanout::{FanOut, PersonalOutcome};
use crate::engine::languages::{
    self, InvalidLanguages, LangCode, SUPPORTED_LANGUAGES, UnknownLanguage,
};
use crate::ids::{ChannelId, UserId};

fn channel_mention(channel_id: ChannelId) -> String {
    format!("<#{channel_id}>")
}

fn user_mention(user_id: UserId) -> String {
    format!("<@{user_id}>")
}

/// "en (English), es (Spanish), ..." as shown in rejection notices.
fn supported_summary() -> String {
    SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| format!("{code} ({name})"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn pretty_langs(langs: &[LangCode]) -> String {
    langs
        .iter()
        .map(|lang| format!("{} ({})", lang.as_str(), lang.display_name()))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Translation replies ─────────────────────────────────────────────

/// Reply block for an ambient fan-out, or None when every target was skipped
/// or failed. None means the bot stays silent; callers must not post anything
/// in that case.
pub fn ambient_translation(fanout: &FanOut) -> Option<String> {
    if fanout.translations.is_empty() {
        return None;
    }

    let mut reply = format!(
        "💬 Auto-translation of message from **{} (`{}`)**:",
        languages::display_name_or_code(&fanout.source),
        fanout.source
    );
    for translation in &fanout.translations {
        reply.push('\n');
        reply.push_str(&format!(
            "**{} (`{}`)**: {}",
            translation.lang.display_name(),
            translation.lang.as_str(),
            translation.text
        ));
    }
    Some(reply)
}

/// Reply for a personal translation request, failures included. `text` is the
/// original the user asked about.
pub fn personal_translation(text: &str, outcome: &PersonalOutcome) -> String {
    match outcome {
        PersonalOutcome::NoPreference => {
            "🛈 Please set your language first with `!setlang <code>`.".to_string()
        }
        PersonalOutcome::Translated {
            source,
            target,
            text: translated,
        } => {
            let source = source.as_deref().unwrap_or("auto");
            format!("**Original ({source})**: {text}\n**Translated ({target})**: {translated}")
        }
        PersonalOutcome::Failed(error) => format!("⚠️ Error while translating: `{error}`"),
    }
}

// ── User language commands ──────────────────────────────────────────

/// ✅ Your target language has been set to **Spanish** (`es`).
pub fn language_set(lang: LangCode) -> String {
    format!(
        "✅ Your target language has been set to **{}** (`{}`).",
        lang.display_name(),
        lang.as_str()
    )
}

pub fn unknown_language(err: &UnknownLanguage) -> String {
    format!(
        "❌ Unknown language code `{}`.\nSupported examples: {}",
        err.0,
        supported_summary()
    )
}

/// 🌍 Your current target language is **Japanese** (`ja`).
pub fn current_language(pref: Option<LangCode>) -> String {
    match pref {
        None => "🛈 You have not set a language yet. Use `!setlang <code>`.".to_string(),
        Some(lang) => format!(
            "🌍 Your current target language is **{}** (`{}`).",
            lang.display_name(),
            lang.as_str()
        ),
    }
}

pub fn language_list() -> String {
    let lines: Vec<String> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| format!("`{code}` → {name}"))
        .collect();
    format!(
        "🌐 Example language codes you can use with `!setlang` or channel settings:\n{}",
        lines.join("\n")
    )
}

// ── Channel configuration commands ──────────────────────────────────

/// ✅ Auto-translate enabled in <#42> for languages: en (English), fr (French)
pub fn channel_languages_set(channel_id: ChannelId, langs: &[LangCode]) -> String {
    format!(
        "✅ Auto-translate enabled in {} for languages: {}",
        channel_mention(channel_id),
        pretty_langs(langs)
    )
}

pub fn invalid_languages(err: &InvalidLanguages) -> String {
    let supported = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, _)| *code)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "❌ Invalid language code(s): {}\nSupported examples: {}",
        err.codes.join(", "),
        supported
    )
}

pub fn channel_languages(channel_id: ChannelId, langs: Option<&[LangCode]>) -> String {
    match langs {
        None => format!(
            "🛈 No auto-translate languages set for {}.",
            channel_mention(channel_id)
        ),
        Some(langs) => format!(
            "🌍 {} auto-translates to: {}",
            channel_mention(channel_id),
            pretty_langs(langs)
        ),
    }
}

pub fn channel_languages_cleared(channel_id: ChannelId, existed: bool) -> String {
    if existed {
        format!(
            "✅ Auto-translate disabled for {}.",
            channel_mention(channel_id)
        )
    } else {
        format!(
            "🛈 No auto-translate settings found for {}.",
            channel_mention(channel_id)
        )
    }
}

// ── Tracking and panel commands ─────────────────────────────────────

/// ✅ Added <@10> to the support status tracking list.
pub fn user_tracked(user_id: UserId, added: bool) -> String {
    if added {
        format!(
            "✅ Added {} to the support status tracking list.",
            user_mention(user_id)
        )
    } else {
        format!(
            "ℹ️ {} is already in the tracking list.",
            user_mention(user_id)
        )
    }
}

/// 🗑️ Removed <@10> from the tracking list.
pub fn user_untracked(user_id: UserId, removed: bool) -> String {
    if removed {
        format!("🗑️ Removed {} from the tracking list.", user_mention(user_id))
    } else {
        format!(
            "ℹ️ {} is not currently being tracked.",
            user_mention(user_id)
        )
    }
}

/// Confirmation after a successful panel installation.
pub fn panel_installed(channel_id: ChannelId) -> String {
    format!(
        "✅ Status panel created in {}.\nIt will auto-update every **60 seconds**.",
        channel_mention(channel_id)
    )
}
