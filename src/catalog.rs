//! External catalogs: the flag list and the per-background default texts.
//!
//! Both catalogs load from JSON and degrade to built-in data on any
//! failure; loaders never surface an error to the render path.

use std::collections::BTreeMap;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::i18n::Lang;

/// One flag record: region code, emoji glyph and localized display names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlagEntry {
    pub code: String,
    pub emoji: String,
    pub name: String,
    pub name_en: String,
    pub name_zh_hans: String,
    pub name_zh_hant: String,
    pub name_ko: String,
}

impl FlagEntry {
    fn builtin(code: &str, emoji: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            emoji: emoji.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Localized display name: requested language → English → Japanese.
    pub fn display_name(&self, lang: Lang) -> &str {
        let localized = match lang {
            Lang::Ja => &self.name,
            Lang::En => &self.name_en,
            Lang::ZhHans => &self.name_zh_hans,
            Lang::ZhHant => &self.name_zh_hant,
            Lang::Ko => &self.name_ko,
        };
        [localized, &self.name_en, &self.name]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// The fixed set used when the catalog file cannot be loaded.
pub fn builtin_flags() -> Vec<FlagEntry> {
    vec![
        FlagEntry::builtin("CN", "\u{1F1E8}\u{1F1F3}", "中国"),
        FlagEntry::builtin("JP", "\u{1F1EF}\u{1F1F5}", "日本"),
        FlagEntry::builtin("TW", "\u{1F1F9}\u{1F1FC}", "台湾"),
        FlagEntry::builtin("US", "\u{1F1FA}\u{1F1F8}", "アメリカ"),
        FlagEntry::builtin("KR", "\u{1F1F0}\u{1F1F7}", "韓国"),
        FlagEntry::builtin("RU", "\u{1F1F7}\u{1F1FA}", "ロシア"),
        FlagEntry::builtin("GB", "\u{1F1EC}\u{1F1E7}", "イギリス"),
        FlagEntry::builtin("FR", "\u{1F1EB}\u{1F1F7}", "フランス"),
        FlagEntry::builtin("DE", "\u{1F1E9}\u{1F1EA}", "ドイツ"),
    ]
}

/// Parse the flag catalog from JSON.
pub fn parse_flags(json: &str) -> Result<Vec<FlagEntry>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

/// Load the flag catalog, falling back to [`builtin_flags`] on failure.
pub fn load_flags(path: impl AsRef<Path>) -> Vec<FlagEntry> {
    let path = path.as_ref();
    match std::fs::read_to_string(path).map_err(CatalogError::from) {
        Ok(json) => match parse_flags(&json) {
            Ok(flags) if !flags.is_empty() => flags,
            Ok(_) => {
                warn!("flag catalog {} is empty, using built-in set", path.display());
                builtin_flags()
            }
            Err(err) => {
                warn!("flag catalog {}: {err}, using built-in set", path.display());
                builtin_flags()
            }
        },
        Err(err) => {
            warn!("flag catalog {}: {err}, using built-in set", path.display());
            builtin_flags()
        }
    }
}

/// Async variant of [`load_flags`].
#[cfg(feature = "async")]
pub async fn load_flags_async(path: impl AsRef<Path>) -> Vec<FlagEntry> {
    let path = path.as_ref();
    match tokio::fs::read_to_string(path).await {
        Ok(json) => match parse_flags(&json) {
            Ok(flags) if !flags.is_empty() => flags,
            _ => {
                warn!("flag catalog {}: unusable, using built-in set", path.display());
                builtin_flags()
            }
        },
        Err(err) => {
            warn!("flag catalog {}: {err}, using built-in set", path.display());
            builtin_flags()
        }
    }
}

/// One default-text record. The legacy form is a bare string used as body
/// text with no footer; the full form carries both fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultTextEntry {
    Full {
        #[serde(default)]
        text: String,
        #[serde(default)]
        footer: Option<String>,
    },
    Legacy(String),
}

impl DefaultTextEntry {
    pub fn text(&self) -> &str {
        match self {
            DefaultTextEntry::Legacy(text) => text,
            DefaultTextEntry::Full { text, .. } => text,
        }
    }

    pub fn footer(&self) -> Option<&str> {
        match self {
            DefaultTextEntry::Legacy(_) => None,
            DefaultTextEntry::Full { footer, .. } => footer.as_deref(),
        }
    }
}

/// Default texts keyed by background asset name, then by language code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultTexts(pub BTreeMap<String, BTreeMap<String, DefaultTextEntry>>);

impl DefaultTexts {
    /// Parse from JSON; an error leaves callers with `DefaultTexts::default()`.
    pub fn parse(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from disk, degrading to an empty catalog on failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path)
            .map_err(CatalogError::from)
            .and_then(|json| Self::parse(&json))
        {
            Ok(texts) => texts,
            Err(err) => {
                warn!("default texts {}: {err}, using empty catalog", path.display());
                Self::default()
            }
        }
    }

    /// Async variant of [`load`](Self::load).
    #[cfg(feature = "async")]
    pub async fn load_async(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(json) => Self::parse(&json).unwrap_or_else(|err| {
                warn!("default texts {}: {err}, using empty catalog", path.display());
                Self::default()
            }),
            Err(err) => {
                warn!("default texts {}: {err}, using empty catalog", path.display());
                Self::default()
            }
        }
    }

    /// Entry for a background in the given language, falling back to
    /// Japanese when the language is missing.
    pub fn entry(&self, background: &str, lang: Lang) -> Option<&DefaultTextEntry> {
        let per_lang = self.0.get(background)?;
        per_lang
            .get(lang.code())
            .or_else(|| per_lang.get(Lang::Ja.code()))
    }

    pub fn text(&self, background: &str, lang: Lang) -> Option<&str> {
        self.entry(background, lang).map(DefaultTextEntry::text)
    }

    pub fn footer(&self, background: &str, lang: Lang) -> Option<&str> {
        self.entry(background, lang).and_then(DefaultTextEntry::footer)
    }
}
