//! Language resolution, translation bundles and localized date strings.
//!
//! Bundles are flat key→string maps loaded from JSON. A missing key (or a
//! missing bundle entirely) falls back to the Japanese bundle, then to a
//! small built-in Japanese string set, then to the key itself.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use log::warn;
use serde_json::Value;

use crate::error::CatalogError;

/// Supported display languages. Japanese is the fixed fallback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lang {
    #[default]
    Ja,
    En,
    ZhHans,
    ZhHant,
    Ko,
}

impl Lang {
    pub const ALL: [Lang; 5] = [Lang::Ja, Lang::En, Lang::ZhHans, Lang::ZhHant, Lang::Ko];

    /// BCP-47-ish code used in catalog files.
    pub fn code(self) -> &'static str {
        match self {
            Lang::Ja => "ja",
            Lang::En => "en",
            Lang::ZhHans => "zh-Hans",
            Lang::ZhHant => "zh-Hant",
            Lang::Ko => "ko",
        }
    }

    /// Normalize a detected language tag to a supported language.
    ///
    /// `en-US` → En, `zh-TW`/`zh-Hant` → ZhHant, `zh-CN`/`zh-Hans` →
    /// ZhHans, other `zh` tags default to Traditional, `ko*` → Ko,
    /// `ja*` → Ja, anything else falls back to Japanese.
    pub fn from_tag(tag: &str) -> Lang {
        if tag.starts_with("en") {
            Lang::En
        } else if tag.starts_with("zh") {
            if tag.contains("TW") || tag.contains("Hant") {
                Lang::ZhHant
            } else if tag.contains("CN") || tag.contains("Hans") {
                Lang::ZhHans
            } else {
                Lang::ZhHant
            }
        } else if tag.starts_with("ko") {
            Lang::Ko
        } else {
            Lang::Ja
        }
    }
}

/// Built-in Japanese strings used when no bundle supplies a key.
fn builtin_ja(key: &str) -> Option<&'static str> {
    match key {
        "footerForeignAffairs"
        | "footerForeignAffairs2"
        | "footerForeignAffairs3"
        | "footerForeignAffairs4"
        | "footerForeignAffairs5"
        | "footerForeignAffairs6"
        | "footerForeignAffairs7"
        | "footerForeignAffairs8" => Some("中国外交部報道官"),
        "footerDefense" => Some("中国国防部報道官"),
        _ => None,
    }
}

/// Translation bundles for all loaded languages plus the active selection.
#[derive(Clone, Debug, Default)]
pub struct Translations {
    lang: Lang,
    bundles: HashMap<Lang, HashMap<String, String>>,
}

impl Translations {
    pub fn new(lang: Lang) -> Self {
        Self {
            lang,
            bundles: HashMap::new(),
        }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn set_lang(&mut self, lang: Lang) {
        self.lang = lang;
    }

    /// Register a bundle for one language, replacing any previous one.
    pub fn insert_bundle(&mut self, lang: Lang, bundle: HashMap<String, String>) {
        self.bundles.insert(lang, bundle);
    }

    /// Parse a flat JSON object into a bundle. Non-string values are
    /// skipped with a warning rather than failing the whole bundle.
    pub fn parse_bundle(json: &str) -> Result<HashMap<String, String>, CatalogError> {
        let value: Value = serde_json::from_str(json)?;
        let mut bundle = HashMap::new();
        if let Value::Object(map) = value {
            for (key, entry) in map {
                match entry {
                    Value::String(s) => {
                        bundle.insert(key, s);
                    }
                    other => warn!("translation key {key:?} has non-string value {other}"),
                }
            }
        }
        Ok(bundle)
    }

    /// Resolve a key for the active language with the fixed fallback
    /// chain: active bundle → Japanese bundle → built-in Japanese
    /// defaults → the key itself.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(value) = self.bundles.get(&self.lang).and_then(|b| b.get(key)) {
            return value;
        }
        if let Some(value) = self.bundles.get(&Lang::Ja).and_then(|b| b.get(key)) {
            return value;
        }
        builtin_ja(key).unwrap_or(key)
    }
}

/// Format a calendar date in the active language's conventional style.
pub fn format_date(date: NaiveDate, lang: Lang) -> String {
    let (y, m, d) = (date.year(), date.month(), date.day());
    match lang {
        Lang::En => {
            const MONTHS: [&str; 12] = [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ];
            format!("{} {}, {}", MONTHS[(m - 1) as usize], d, y)
        }
        Lang::Ko => format!("{y}년 {m}월 {d}일"),
        Lang::Ja | Lang::ZhHans | Lang::ZhHant => format!("{y}年{m}月{d}日"),
    }
}
