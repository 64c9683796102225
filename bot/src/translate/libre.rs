use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{TranslateError, Translated, Translator};
use crate::engine::languages::LangCode;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for a LibreTranslate-compatible HTTP API
/// (`POST /detect`, `POST /translate`).
pub struct LibreTranslator {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    q: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct Detection {
    language: String,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
    /// Present when the request used `source = "auto"`.
    #[serde(rename = "detectedLanguage")]
    detected_language: Option<Detection>,
}

/// Map a supported-table code onto the provider's own code. LibreTranslate
/// uses `zh`/`zt` for the Chinese variants.
fn provider_code(code: &str) -> &str {
    match code {
        "zh-cn" => "zh",
        "zh-tw" => "zt",
        other => other,
    }
}

/// Map a provider code back onto table codes where they differ.
fn table_code(code: &str) -> String {
    match code {
        "zh" => "zh-cn".to_string(),
        "zt" => "zh-tw".to_string(),
        other => other.to_lowercase(),
    }
}

/// First (highest-confidence) detection, mapped onto table codes.
fn best_detection(detections: &[Detection]) -> Result<String, TranslateError> {
    detections
        .first()
        .map(|d| table_code(&d.language))
        .ok_or_else(|| TranslateError("detector returned no candidates".into()))
}

impl LibreTranslator {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Translator for LibreTranslator {
    async fn detect(&self, text: &str) -> Result<String, TranslateError> {
        let resp = self
            .http
            .post(format!("{}/detect", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .json(&DetectRequest {
                q: text,
                api_key: self.api_key.as_deref(),
            })
            .send()
            .await
            .map_err(|e| TranslateError(format!("detect request: {e}")))?;

        if !resp.status().is_success() {
            return Err(TranslateError(format!("detect returned {}", resp.status())));
        }

        let detections: Vec<Detection> = resp
            .json()
            .await
            .map_err(|e| TranslateError(format!("detect response: {e}")))?;
        best_detection(&detections)
    }

    async fn translate(
        &self,
        text: &str,
        from: Option<&str>,
        to: LangCode,
    ) -> Result<Translated, TranslateError> {
        let source = from.map(provider_code).unwrap_or("auto");
        let resp = self
            .http
            .post(format!("{}/translate", self.base_url))
            .timeout(REQUEST_TIMEOUT)
            .json(&TranslateRequest {
                q: text,
                source,
                target: provider_code(to.as_str()),
                format: "text",
                api_key: self.api_key.as_deref(),
            })
            .send()
            .await
            .map_err(|e| TranslateError(format!("translate request: {e}")))?;

        if !resp.status().is_success() {
            return Err(TranslateError(format!(
                "translate returned {}",
                resp.status()
            )));
        }

        let body: TranslateResponse = resp
            .json()
            .await
            .map_err(|e| TranslateError(format!("translate response: {e}")))?;

        Ok(Translated {
            text: body.translated_text,
            detected_source: body.detected_language.map(|d| table_code(&d.language)),
        })
    }
}
