use dashmap::DashMap;

use crate::engine::languages::LangCode;
use crate::ids::{ChannelId, UserId};

/// Per-user target language for the personal translation path. Last write
/// wins, no history. Memory-only: preferences reset on restart.
#[derive(Default)]
pub struct UserLanguagePrefs {
    prefs: DashMap<UserId, LangCode>,
}

impl UserLanguagePrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user_id: UserId, lang: LangCode) {
        self.prefs.insert(user_id, lang);
    }

    pub fn get(&self, user_id: UserId) -> Option<LangCode> {
        self.prefs.get(&user_id).map(|l| *l)
    }
}

/// Per-channel target languages for ambient fan-out translation. Each list is
/// an ordered set: duplicates collapse at set time, first occurrence wins,
/// and the stored order is the reply order. Memory-only, like user prefs.
#[derive(Default)]
pub struct ChannelLanguageConfig {
    channels: DashMap<ChannelId, Vec<LangCode>>,
}

impl ChannelLanguageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a channel's target list, returning it as stored.
    pub fn set(&self, channel_id: ChannelId, langs: Vec<LangCode>) -> Vec<LangCode> {
        let mut deduped: Vec<LangCode> = Vec::with_capacity(langs.len());
        for lang in langs {
            if !deduped.contains(&lang) {
                deduped.push(lang);
            }
        }
        self.channels.insert(channel_id, deduped.clone());
        deduped
    }

    pub fn get(&self, channel_id: ChannelId) -> Option<Vec<LangCode>> {
        self.channels.get(&channel_id).map(|l| l.clone())
    }

    /// Remove a channel's configuration. Returns whether one existed.
    pub fn clear(&self, channel_id: ChannelId) -> bool {
        self.channels.remove(&channel_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(code: &str) -> LangCode {
        LangCode::parse(code).unwrap()
    }

    #[test]
    fn test_user_pref_last_write_wins() {
        let prefs = UserLanguagePrefs::new();
        assert_eq!(prefs.get(1), None);

        prefs.set(1, lang("es"));
        prefs.set(1, lang("ja"));
        assert_eq!(prefs.get(1), Some(lang("ja")));
    }

    #[test]
    fn test_channel_set_dedups_keeping_first_occurrence() {
        let config = ChannelLanguageConfig::new();
        let stored = config.set(5, vec![lang("en"), lang("fr"), lang("en"), lang("de")]);
        assert_eq!(stored, vec![lang("en"), lang("fr"), lang("de")]);
        assert_eq!(config.get(5), Some(stored));
    }

    #[test]
    fn test_channel_set_replaces_previous_list() {
        let config = ChannelLanguageConfig::new();
        config.set(5, vec![lang("en"), lang("fr")]);
        config.set(5, vec![lang("ko")]);
        assert_eq!(config.get(5), Some(vec![lang("ko")]));
    }

    #[test]
    fn test_channel_clear() {
        let config = ChannelLanguageConfig::new();
        config.set(5, vec![lang("en")]);

        assert!(config.clear(5));
        assert_eq!(config.get(5), None);
        assert!(!config.clear(5), "clearing twice reports nothing to clear");
    }

    #[test]
    fn test_unconfigured_channel_reads_none() {
        let config = ChannelLanguageConfig::new();
        assert_eq!(config.get(999), None);
    }
}
