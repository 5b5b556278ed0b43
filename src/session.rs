//! Explicit session context replacing ad-hoc global state.
//!
//! Construction order: configuration first, then locale resolution, then
//! catalogs; the first compose happens only after that. Catalog values are
//! replaced wholesale, never partially mutated.

use chrono::NaiveDate;

use crate::catalog::{builtin_flags, DefaultTexts, FlagEntry};
use crate::config::{BackgroundKind, RenderConfig};
use crate::i18n::{format_date, Lang, Translations};

/// Everything a render request reads: config plus resolved catalogs.
#[derive(Clone, Debug)]
pub struct Session {
    pub config: RenderConfig,
    translations: Translations,
    flags: Vec<FlagEntry>,
    default_texts: DefaultTexts,
}

impl Session {
    /// Create a session with built-in catalogs. The language tag is
    /// normalized to a supported language (Japanese fallback).
    pub fn new(config: RenderConfig, lang_tag: &str) -> Self {
        Self {
            config: config.normalized(),
            translations: Translations::new(Lang::from_tag(lang_tag)),
            flags: builtin_flags(),
            default_texts: DefaultTexts::default(),
        }
    }

    pub fn lang(&self) -> Lang {
        self.translations.lang()
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn flags(&self) -> &[FlagEntry] {
        &self.flags
    }

    /// Replace the translation set wholesale.
    pub fn set_translations(&mut self, translations: Translations) {
        self.translations = translations;
    }

    /// Replace the flag catalog wholesale; an empty catalog keeps the
    /// built-in set.
    pub fn set_flags(&mut self, flags: Vec<FlagEntry>) {
        if !flags.is_empty() {
            self.flags = flags;
        }
    }

    pub fn set_default_texts(&mut self, texts: DefaultTexts) {
        self.default_texts = texts;
    }

    /// Default body text for the current background, if the catalog has
    /// one for the active (or fallback) language.
    pub fn default_text(&self) -> Option<&str> {
        self.default_texts
            .text(self.config.background.asset_name(), self.lang())
    }

    /// Resolve the footer caption for the current background: the
    /// catalog footer when present, otherwise the localized spokesperson
    /// prefix followed by the localized date.
    pub fn footer_text(&self, today: NaiveDate) -> String {
        let background = self.config.background;
        if let Some(footer) = self
            .default_texts
            .footer(background.asset_name(), self.lang())
        {
            return footer.to_string();
        }
        let prefix = self.translations.t(background.footer_prefix_key());
        format!("{prefix} {}", format_date(today, self.lang()))
    }

    /// Switch background and refresh the dependent text fields the way a
    /// background change does in the UI: default body text (when the
    /// catalog has one) and the footer caption.
    pub fn select_background(&mut self, background: BackgroundKind, today: NaiveDate) {
        self.config.background = background;
        if let Some(text) = self.default_text() {
            self.config.text = text.to_string();
        }
        self.config.footer_text = self.footer_text(today);
    }
}
