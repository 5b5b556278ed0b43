//! Render configuration surface: colors, font selection, background kinds
//! and the per-render knob set supplied by the surrounding session.

use core::fmt;
use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

/// Lower bound for auto-fit font sizes.
pub const MIN_FONT_SIZE_PX: u32 = 24;
/// Upper bound for auto-fit font sizes.
pub const MAX_FONT_SIZE_PX: u32 = 200;

/// Flag glyph size as a ratio of the smaller surface dimension.
pub const FLAG_SIZE_RATIO: f32 = 0.11;
/// Flag row center as a ratio of surface height.
pub const FLAG_Y_RATIO: f32 = 0.10;
/// Gap between the two flag glyphs as a ratio of surface width.
pub const FLAG_SPACING_RATIO: f32 = 0.05;

/// Height reserved for the footer block when footer text is non-empty.
pub const FOOTER_RESERVE_RATIO: f32 = 0.12;
/// Footer baseline distance from the bottom edge.
pub const FOOTER_BOTTOM_MARGIN_RATIO: f32 = 0.06;
/// Footer rule left edge as a ratio of surface width.
pub const FOOTER_RULE_X_RATIO: f32 = 0.15;
/// Footer rule width as a ratio of surface width.
pub const FOOTER_RULE_WIDTH_RATIO: f32 = 0.70;
/// Footer rule thickness in pixels.
pub const FOOTER_RULE_HEIGHT_PX: f32 = 2.0;
/// Footer rule opacity.
pub const FOOTER_RULE_ALPHA: f32 = 0.85;
/// Rule sits this many footer-font-sizes above the footer baseline.
pub const FOOTER_RULE_RISE_FACTOR: f32 = 1.6;

/// Shadow opacity behind the main text block.
pub const MAIN_SHADOW_ALPHA: f32 = 0.85;
/// Shadow opacity behind the footer caption.
pub const FOOTER_SHADOW_ALPHA: f32 = 0.90;

/// Main text weight (bold).
pub const MAIN_TEXT_WEIGHT: u16 = 700;
/// Footer caption weight (medium).
pub const FOOTER_WEIGHT: u16 = 500;

/// 8-bit sRGB color, serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
    /// Default highlight gold used for `[g]` spans.
    pub const HIGHLIGHT_GOLD: Rgb = Rgb::new(0xD8, 0xAE, 0x5C);
    /// Solid fill drawn when a background image is unavailable.
    pub const FALLBACK_FILL: Rgb = Rgb::new(0x7A, 0x10, 0x10);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex literal.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::new(s));
        }
        let parse = |range: core::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError::new(s))
        };
        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Font family selection resolved by the raster backend through a stack of
/// preferred faces with platform fallbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Gothic/sans stack used for main text by default.
    #[default]
    Sans,
    /// Mincho/serif stack; also the fixed footer stack.
    Serif,
    /// Emoji-capable stack used for flag glyphs.
    Emoji,
}

impl FontFamily {
    /// Preferred face names, most specific first. The final generic entry
    /// names the CSS-style family class the backend falls back to.
    pub fn stack(self) -> &'static [&'static str] {
        match self {
            FontFamily::Sans => &["Noto Sans JP", "Hiragino Sans", "Yu Gothic", "sans-serif"],
            FontFamily::Serif => &[
                "Noto Serif JP",
                "Hiragino Mincho ProN",
                "Yu Mincho",
                "serif",
            ],
            FontFamily::Emoji => &[
                "Noto Color Emoji",
                "Twemoji Mozilla",
                "Apple Color Emoji",
                "Segoe UI Emoji",
                "sans-serif",
            ],
        }
    }
}

/// Concrete font request: family stack, weight and pixel size.
///
/// This is the "font spec" half of the measurement contract; the same spec
/// must be passed to [`crate::layout::TextMeasurer`] and to the final draw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: FontFamily,
    pub weight: u16,
    pub size_px: f32,
}

impl FontSpec {
    /// Bold spec at the given size, as used by the auto-fit probe.
    pub fn bold(family: FontFamily, size_px: f32) -> Self {
        Self {
            family,
            weight: MAIN_TEXT_WEIGHT,
            size_px,
        }
    }
}

/// Curly-quote wrapping applied to the raw text before tokenization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteMode {
    #[default]
    None,
    /// Wrap non-blank text in `\u{201C}` / `\u{201D}`.
    Both,
}

/// Background variants. Each maps to a fixed asset name which doubles as
/// the default-texts catalog key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackgroundKind {
    #[default]
    ForeignAffairs1,
    ForeignAffairs2,
    ForeignAffairs3,
    ForeignAffairs4,
    ForeignAffairs5,
    ForeignAffairs6,
    ForeignAffairs7,
    ForeignAffairs8,
    Defense,
    /// The spokesperson variant that enables the flag layer.
    Spokesperson,
}

impl BackgroundKind {
    pub const ALL: [BackgroundKind; 10] = [
        BackgroundKind::ForeignAffairs1,
        BackgroundKind::ForeignAffairs2,
        BackgroundKind::ForeignAffairs3,
        BackgroundKind::ForeignAffairs4,
        BackgroundKind::ForeignAffairs5,
        BackgroundKind::ForeignAffairs6,
        BackgroundKind::ForeignAffairs7,
        BackgroundKind::ForeignAffairs8,
        BackgroundKind::Defense,
        BackgroundKind::Spokesperson,
    ];

    /// Asset file name; also the key into the default-texts catalog.
    pub fn asset_name(self) -> &'static str {
        match self {
            BackgroundKind::ForeignAffairs1 => "background1.1.1.png",
            BackgroundKind::ForeignAffairs2 => "background1.1.2.png",
            BackgroundKind::ForeignAffairs3 => "background1.1.3.png",
            BackgroundKind::ForeignAffairs4 => "background1.2.1.png",
            BackgroundKind::ForeignAffairs5 => "background1.2.2.png",
            BackgroundKind::ForeignAffairs6 => "background1.2.3.png",
            BackgroundKind::ForeignAffairs7 => "background1.3.1.png",
            BackgroundKind::ForeignAffairs8 => "background1.3.2.png",
            BackgroundKind::Defense => "background2.png",
            BackgroundKind::Spokesperson => "background3.png",
        }
    }

    /// Reverse lookup from an asset/catalog name.
    pub fn from_asset_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.asset_name() == name)
    }

    /// Whether the flag layer is drawn over this background.
    pub fn is_spokesperson(self) -> bool {
        matches!(self, BackgroundKind::Spokesperson)
    }

    /// Translation key for the generated footer prefix.
    pub fn footer_prefix_key(self) -> &'static str {
        match self {
            BackgroundKind::ForeignAffairs1 => "footerForeignAffairs",
            BackgroundKind::ForeignAffairs2 => "footerForeignAffairs2",
            BackgroundKind::ForeignAffairs3 => "footerForeignAffairs3",
            BackgroundKind::ForeignAffairs4 => "footerForeignAffairs4",
            BackgroundKind::ForeignAffairs5 => "footerForeignAffairs5",
            BackgroundKind::ForeignAffairs6 => "footerForeignAffairs6",
            BackgroundKind::ForeignAffairs7 => "footerForeignAffairs7",
            BackgroundKind::ForeignAffairs8 => "footerForeignAffairs8",
            BackgroundKind::Defense => "footerDefense",
            // The spokesperson card reuses the foreign-affairs prefix.
            BackgroundKind::Spokesperson => "footerForeignAffairs",
        }
    }
}

/// Per-render configuration, read-only once a render starts. Ratios are
/// fractions of surface width/height resolved to pixels at compose time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub background: BackgroundKind,
    /// Raw body text, possibly carrying `[g]…[/g]` markup.
    pub text: String,
    /// Auto-fit search ceiling.
    pub base_font_size_px: u32,
    pub line_height: f32,
    pub margin_x_ratio: f32,
    pub start_y_ratio: f32,
    pub text_color: Rgb,
    pub highlight_color: Rgb,
    pub shadow_blur_px: u32,
    pub font_family: FontFamily,
    pub quote_mode: QuoteMode,
    pub footer_text: String,
    pub footer_size_px: u32,
    pub flag1: String,
    pub flag2: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: BackgroundKind::default(),
            text: String::new(),
            base_font_size_px: 80,
            line_height: 1.25,
            margin_x_ratio: 0.10,
            start_y_ratio: 0.20,
            text_color: Rgb::WHITE,
            highlight_color: Rgb::HIGHLIGHT_GOLD,
            shadow_blur_px: 12,
            font_family: FontFamily::Sans,
            quote_mode: QuoteMode::None,
            footer_text: String::new(),
            footer_size_px: 32,
            flag1: "\u{1F1E8}\u{1F1F3}".to_string(),
            flag2: "\u{1F1EF}\u{1F1F5}".to_string(),
        }
    }
}

impl RenderConfig {
    /// Clamp knobs into safe layout ranges.
    pub fn normalized(mut self) -> Self {
        self.base_font_size_px = self.base_font_size_px.clamp(MIN_FONT_SIZE_PX, 400);
        self.line_height = self.line_height.clamp(0.8, 3.0);
        self.margin_x_ratio = self.margin_x_ratio.clamp(0.0, 0.45);
        self.start_y_ratio = self.start_y_ratio.clamp(0.0, 0.90);
        self.footer_size_px = self.footer_size_px.clamp(8, 200);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_roundtrips_hex() {
        let gold = Rgb::from_hex("#D8AE5C").unwrap();
        assert_eq!(gold, Rgb::HIGHLIGHT_GOLD);
        assert_eq!(gold.to_string(), "#d8ae5c");
        assert_eq!(Rgb::from_hex("ffffff").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn rgb_rejects_malformed_hex() {
        assert!(Rgb::from_hex("#fff").is_err());
        assert!(Rgb::from_hex("#ggustn").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn background_asset_roundtrip() {
        for kind in BackgroundKind::ALL {
            assert_eq!(BackgroundKind::from_asset_name(kind.asset_name()), Some(kind));
        }
        assert_eq!(BackgroundKind::from_asset_name("nope.png"), None);
        assert!(BackgroundKind::Spokesperson.is_spokesperson());
        assert!(!BackgroundKind::Defense.is_spokesperson());
    }

    #[test]
    fn normalized_clamps_ratios() {
        let cfg = RenderConfig {
            margin_x_ratio: 0.9,
            start_y_ratio: 2.0,
            line_height: 0.1,
            base_font_size_px: 4,
            ..RenderConfig::default()
        }
        .normalized();
        assert_eq!(cfg.margin_x_ratio, 0.45);
        assert_eq!(cfg.start_y_ratio, 0.90);
        assert_eq!(cfg.line_height, 0.8);
        assert_eq!(cfg.base_font_size_px, MIN_FONT_SIZE_PX);
    }
}
