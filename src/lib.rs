//! Caption-card text pipeline: highlight-markup tokenization, greedy line
//! layout under a width constraint, and binary-search auto-fit sizing.
//!
//! The crate is backend-agnostic: measurement goes through the
//! [`TextMeasurer`] trait so that the same font-metrics source backs both
//! wrapping decisions and the final paint. Composition into draw commands
//! lives in `quotecard-render`; pixels and JPEG export in
//! `quotecard-raster`.

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod fit;
pub mod i18n;
pub mod layout;
pub mod markup;
pub mod session;

pub use catalog::{DefaultTexts, FlagEntry};
pub use config::{BackgroundKind, FontFamily, FontSpec, QuoteMode, RenderConfig, Rgb};
pub use error::CatalogError;
pub use fit::{fit_tokens, FitOptions, FitResult};
pub use i18n::{Lang, Translations};
pub use layout::{layout_tokens, Line, TextMeasurer};
pub use markup::{tokenize, Token};
pub use session::Session;
