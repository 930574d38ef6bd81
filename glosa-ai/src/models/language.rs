//! Language catalog
//!
//! Fixed set of target languages offered for vocabulary generation.

use serde::Serialize;

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Language identifier, e.g. "ja"
    pub code: &'static str,
    /// Label shown in the language picker: native name plus Chinese gloss
    pub label: &'static str,
    /// English name used inside generation prompts
    pub english_name: &'static str,
}

impl Language {
    const fn new(code: &'static str, label: &'static str, english_name: &'static str) -> Self {
        Self {
            code,
            label,
            english_name,
        }
    }

    /// Native name without the gloss, e.g. "日本語" for "日本語 (日文)"
    pub fn display_name(&self) -> &'static str {
        self.label.split(" (").next().unwrap_or(self.label)
    }
}

pub const LANGUAGES: [Language; 12] = [
    Language::new("en", "English (英文)", "English"),
    Language::new("fr", "Français (法文)", "French"),
    Language::new("de", "Deutsch (德文)", "German"),
    Language::new("ja", "日本語 (日文)", "Japanese"),
    Language::new("ko", "한국어 (韓文)", "Korean"),
    Language::new("es", "Español (西班牙文)", "Spanish"),
    Language::new("it", "Italiano (義大利文)", "Italian"),
    Language::new("pt", "Português (葡萄牙文)", "Portuguese"),
    Language::new("ru", "Русский (俄文)", "Russian"),
    Language::new("ar", "العربية (阿拉伯文)", "Arabic"),
    Language::new("hi", "हिन्दी (印地文)", "Hindi"),
    Language::new("th", "ไทย (泰文)", "Thai"),
];

/// Look up a language by code
pub fn find(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|lang| lang.code == code)
}
