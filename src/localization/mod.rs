//! Localization and translation support
//!
//! Display strings for categories, avatars, password rules and settlement
//! messages, embedded at compile time.

use std::collections::HashMap;
use crate::catalog::{Avatar, ExpenseCategory};
use crate::crypto::PasswordRule;
use crate::error::{Result, SplitError};
use crate::settlement::Settlement;
use crate::utils::format_amount;

/// Supported languages with their codes and names
pub const SUPPORTED_LANGUAGES: &[(&str, &str, &str)] = &[
    ("en", "English", "English"),
    ("zh-TW", "繁體中文", "Traditional Chinese"),
];

const LANG_EN: &str = include_str!("languages/en.json");
const LANG_ZH_TW: &str = include_str!("languages/zh-TW.json");

/// Get the embedded JSON for a language code
fn get_language_json(lang: &str) -> Option<&'static str> {
    match lang {
        "en" => Some(LANG_EN),
        "zh-TW" => Some(LANG_ZH_TW),
        _ => None,
    }
}

/// Check if a language code is supported
pub fn is_language_supported(lang: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|(code, _, _)| *code == lang)
}

/// Translation manager
pub struct Translations {
    /// Current language code
    current_lang: String,
    /// Current language strings
    strings: HashMap<String, String>,
    /// English strings (fallback)
    english: HashMap<String, String>,
}

impl Translations {
    /// Create a new translations instance with English as default
    pub fn new() -> Result<Self> {
        let english = Self::load_language("en")?;
        Ok(Self {
            current_lang: "en".to_string(),
            strings: english.clone(),
            english,
        })
    }

    /// Create a translations instance for a language
    pub fn for_language(lang: &str) -> Result<Self> {
        let mut tr = Self::new()?;
        tr.set_language(lang)?;
        Ok(tr)
    }

    /// Load a language from embedded JSON
    fn load_language(lang: &str) -> Result<HashMap<String, String>> {
        let json = get_language_json(lang)
            .ok_or_else(|| SplitError::LocalizationError(
                format!("Language '{}' not found", lang)
            ))?;

        // Strip UTF-8 BOM if present
        let json = json.strip_prefix('\u{feff}').unwrap_or(json);

        serde_json::from_str(json)
            .map_err(|e| SplitError::LocalizationError(
                format!("Failed to parse language '{}': {}", lang, e)
            ))
    }

    /// Set the current language
    pub fn set_language(&mut self, lang: &str) -> Result<()> {
        if !is_language_supported(lang) {
            return Err(SplitError::LocalizationError(
                format!("Language '{}' is not supported", lang)
            ));
        }

        self.strings = Self::load_language(lang)?;
        self.current_lang = lang.to_string();
        Ok(())
    }

    /// Get a translated string by key
    /// Returns the key itself if not found
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings.get(key)
            .or_else(|| self.english.get(key))
            .map(|s| s.as_str())
            .unwrap_or(key)
    }

    /// Get a translated string with `{name}` placeholders replaced
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.get(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }

    /// Get the current language code
    pub fn get_language(&self) -> &str {
        &self.current_lang
    }

    /// Get the current language name (in its own language)
    pub fn get_language_name(&self) -> &str {
        SUPPORTED_LANGUAGES.iter()
            .find(|(code, _, _)| *code == self.current_lang)
            .map(|(_, local, _)| *local)
            .unwrap_or("Unknown")
    }

    /// Get available languages as (code, local_name, english_name) tuples
    pub fn available_languages() -> &'static [(&'static str, &'static str, &'static str)] {
        SUPPORTED_LANGUAGES
    }

    /// Display name of an expense category
    pub fn category_name(&self, category: ExpenseCategory) -> String {
        self.get(&category.label_key()).to_string()
    }

    /// Display name of an avatar
    pub fn avatar_name(&self, avatar: &Avatar) -> String {
        self.format(&avatar.label_key(), &[("n", &avatar.index.to_string())])
    }

    /// Message for a failed password rule
    pub fn password_rule_message(&self, rule: PasswordRule) -> &str {
        self.get(rule.message_key())
    }

    /// One-line description of a suggested transfer
    pub fn describe_settlement(&self, settlement: &Settlement) -> String {
        let amount = format_amount(settlement.amount, &settlement.currency);
        self.format("settlement_transfer", &[
            ("from", &settlement.from_name),
            ("to", &settlement.to_name),
            ("amount", &amount),
        ])
    }
}
