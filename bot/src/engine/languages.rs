use std::fmt;

use thiserror::Error;

/// The fixed set of languages the bot translates between, with display names.
/// Codes outside this table are rejected at the edges and never reach stored
/// state.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh-cn", "Chinese (Simplified)"),
    ("zh-tw", "Chinese (Traditional)"),
    ("ar", "Arabic"),
];

/// A code that was rejected because it is not in the supported table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language code `{0}`")]
pub struct UnknownLanguage(pub String);

/// Every offending code from a batch validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid language code(s): {}", codes.join(", "))]
pub struct InvalidLanguages {
    pub codes: Vec<String>,
}

/// A validated language code. Only entries of [`SUPPORTED_LANGUAGES`] are
/// representable, so a `LangCode` held anywhere in the bot is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LangCode {
    code: &'static str,
    name: &'static str,
}

impl LangCode {
    /// Parse a user-supplied code. Case-insensitive, surrounding whitespace
    /// ignored.
    pub fn parse(raw: &str) -> Result<Self, UnknownLanguage> {
        let normalized = raw.trim().to_lowercase();
        SUPPORTED_LANGUAGES
            .iter()
            .find(|(code, _)| *code == normalized)
            .map(|&(code, name)| Self { code, name })
            .ok_or(UnknownLanguage(normalized))
    }

    pub fn as_str(&self) -> &'static str {
        self.code
    }

    /// Human-readable name, e.g. "Spanish" for `es`.
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

/// Validate a batch of codes, reporting every offender rather than just the
/// first so an operator sees all of their typos at once. Order is preserved.
pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Vec<LangCode>, InvalidLanguages> {
    let mut valid = Vec::with_capacity(raw.len());
    let mut invalid = Vec::new();
    for code in raw {
        match LangCode::parse(code.as_ref()) {
            Ok(lang) => valid.push(lang),
            Err(UnknownLanguage(code)) => invalid.push(code),
        }
    }
    if invalid.is_empty() {
        Ok(valid)
    } else {
        Err(InvalidLanguages { codes: invalid })
    }
}

/// Display name for a raw code, falling back to the code itself when it is
/// outside the supported table (detected source languages can be anything).
pub fn display_name_or_code(code: &str) -> &str {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, name)| name)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_codes() {
        let lang = LangCode::parse("es").unwrap();
        assert_eq!(lang.as_str(), "es");
        assert_eq!(lang.display_name(), "Spanish");
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        assert_eq!(LangCode::parse(" EN ").unwrap().as_str(), "en");
        assert_eq!(LangCode::parse("Zh-CN").unwrap().as_str(), "zh-cn");
    }

    #[test]
    fn test_parse_rejects_unknown_codes() {
        assert_eq!(
            LangCode::parse("nl"),
            Err(UnknownLanguage("nl".to_string()))
        );
        assert!(LangCode::parse("").is_err());
        assert!(LangCode::parse("english").is_err());
    }

    #[test]
    fn test_chinese_variants_are_distinct() {
        let simplified = LangCode::parse("zh-cn").unwrap();
        let traditional = LangCode::parse("zh-tw").unwrap();
        assert_ne!(simplified, traditional);
        assert_eq!(simplified.display_name(), "Chinese (Simplified)");
        assert_eq!(traditional.display_name(), "Chinese (Traditional)");
    }

    #[test]
    fn test_parse_all_reports_every_offender() {
        let result = parse_all(&["en", "xx", "fr", "yy"]);
        assert_eq!(
            result,
            Err(InvalidLanguages {
                codes: vec!["xx".to_string(), "yy".to_string()]
            })
        );
    }

    #[test]
    fn test_parse_all_preserves_order() {
        let langs = parse_all(&["ja", "en", "ko"]).unwrap();
        let codes: Vec<&str> = langs.iter().map(|l| l.as_str()).collect();
        assert_eq!(codes, vec!["ja", "en", "ko"]);
    }

    #[test]
    fn test_table_codes_are_unique() {
        for (i, (code, _)) in SUPPORTED_LANGUAGES.iter().enumerate() {
            assert!(
                !SUPPORTED_LANGUAGES[i + 1..].iter().any(|(c, _)| c == code),
                "duplicate code {code} in table"
            );
        }
        assert_eq!(SUPPORTED_LANGUAGES.len(), 12);
    }

    #[test]
    fn test_display_name_fallback_for_foreign_codes() {
        assert_eq!(display_name_or_code("it"), "Italian");
        assert_eq!(display_name_or_code("nl"), "nl");
    }

    #[test]
    fn test_invalid_languages_message_lists_all_codes() {
        let err = InvalidLanguages {
            codes: vec!["xx".to_string(), "yy".to_string()],
        };
        assert_eq!(err.to_string(), "invalid language code(s): xx, yy");
    }
}
