use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Top-level bot configuration, loaded from dragoman.toml.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct BotConfig {
    pub database: DatabaseSection,
    pub translator: TranslatorSection,
    pub surface: SurfaceSection,
    pub panel: PanelSection,
}

#[derive(Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite:dragoman.db?mode=rwc".into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct TranslatorSection {
    /// Base URL of a LibreTranslate-compatible instance.
    pub base_url: String,
    /// API key, if the instance requires one.
    pub api_key: Option<String>,
}

impl Default for TranslatorSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            api_key: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct SurfaceSection {
    /// Base URL of the platform's message REST API.
    pub base_url: String,
    pub token: String,
}

impl Default for SurfaceSection {
    fn default() -> Self {
        Self {
            base_url: "https://discord.com/api/v10".into(),
            token: String::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct PanelSection {
    /// Seconds between status panel reconciliation sweeps.
    pub update_seconds: u64,
}

impl Default for PanelSection {
    fn default() -> Self {
        Self { update_seconds: 60 }
    }
}

impl BotConfig {
    /// Load config from a TOML file. Falls back to defaults if the file doesn't exist.
    /// Environment variables override TOML values.
    pub fn load(path: &str) -> Self {
        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path)
                .unwrap_or_else(|e| panic!("failed to read config file {}: {}", path, e));
            toml::from_str(&contents)
                .unwrap_or_else(|e| panic!("failed to parse config file {}: {}", path, e))
        } else {
            info!("No config file found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = std::env::var("TRANSLATOR_URL") {
            self.translator.base_url = v;
        }
        if let Ok(v) = std::env::var("TRANSLATOR_API_KEY") {
            self.translator.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("SURFACE_URL") {
            self.surface.base_url = v;
        }
        if let Ok(v) = std::env::var("SURFACE_TOKEN") {
            self.surface.token = v;
        }
        if let Ok(v) = std::env::var("PANEL_UPDATE_SECONDS")
            && let Ok(secs) = v.parse()
        {
            self.panel.update_seconds = secs;
        }
    }

    /// Reconciliation period for the panel synchronizer.
    pub fn panel_period(&self) -> Duration {
        Duration::from_secs(self.panel.update_seconds)
    }
}
