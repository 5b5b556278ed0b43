//! Auto-fit sizing: binary search for the largest font size whose wrapped
//! layout fits a bounded height.

use log::debug;

use crate::config::{FontFamily, FontSpec, MAX_FONT_SIZE_PX, MIN_FONT_SIZE_PX};
use crate::layout::{layout_tokens, Line, TextMeasurer};
use crate::markup::Token;

/// Search parameters for [`fit_tokens`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitOptions {
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Family used for both probing and the final layout.
    pub family: FontFamily,
    /// Smallest size the search may settle on.
    pub min_size_px: u32,
    /// Search ceiling, normally the configured base size.
    pub max_size_px: u32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            line_height: 1.25,
            family: FontFamily::Sans,
            min_size_px: MIN_FONT_SIZE_PX,
            max_size_px: MAX_FONT_SIZE_PX,
        }
    }
}

/// Output of the auto-fit search. `lines` were computed at exactly
/// `font_size_px`, with the bold weight the main text block draws with.
#[derive(Clone, Debug, PartialEq)]
pub struct FitResult {
    pub font_size_px: u32,
    pub lines: Vec<Line>,
}

impl FitResult {
    /// Total block height under the given line-height multiplier.
    pub fn total_height_px(&self, line_height: f32) -> f32 {
        self.lines.len() as f32 * self.font_size_px as f32 * line_height
    }
}

fn layout_at(
    tokens: &[Token],
    max_width: f32,
    size_px: u32,
    opts: &FitOptions,
    measurer: &dyn TextMeasurer,
) -> Vec<Line> {
    let font = FontSpec::bold(opts.family, size_px as f32);
    layout_tokens(tokens, max_width, &font, measurer)
}

/// Find the largest integer font size in `[min_size_px, max_size_px]`
/// whose wrapped layout fits `max_height`, then lay out at that size.
///
/// The search is `O(log(max - min))` layout passes. If even the chosen
/// size overflows (possible from integer rounding), the size is scaled
/// down once by `max_height / total_height`, clamped to `min_size_px`,
/// and laid out one final time. The correction is best-effort, not
/// iterated: text at the clamped minimum may still overflow.
pub fn fit_tokens(
    tokens: &[Token],
    max_width: f32,
    max_height: f32,
    opts: &FitOptions,
    measurer: &dyn TextMeasurer,
) -> FitResult {
    let min = opts.min_size_px.max(1);
    let max = opts.max_size_px.max(min);

    // `hi` is exclusive; `lo` tracks the largest confirmed-feasible size,
    // starting at the floor which is used even when nothing fits.
    let mut lo = min;
    let mut hi = max + 1;
    while hi - lo > 1 {
        let probe = (lo + hi) / 2;
        let lines = layout_at(tokens, max_width, probe, opts, measurer);
        let total = lines.len() as f32 * probe as f32 * opts.line_height;
        if total <= max_height {
            lo = probe;
        } else {
            hi = probe;
        }
    }

    let mut size = lo;
    let mut lines = layout_at(tokens, max_width, size, opts, measurer);
    let total = lines.len() as f32 * size as f32 * opts.line_height;
    if total > max_height {
        let scaled = (size as f32 * (max_height / total)).floor() as u32;
        size = scaled.max(min);
        debug!("auto-fit correction: {lo}px -> {size}px (overflow {total:.1}px)");
        lines = layout_at(tokens, max_width, size, opts, measurer);
    }

    FitResult {
        font_size_px: size,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;
    use crate::markup::tokenize;

    /// Fixed-advance measurer: every character is `0.6 * size_px` wide.
    struct FixedMeasurer;

    impl TextMeasurer for FixedMeasurer {
        fn char_width_px(&self, _ch: char, font: &FontSpec) -> f32 {
            font.size_px * 0.6
        }
    }

    fn tokens(text: &str) -> Vec<Token> {
        tokenize(text, Rgb::WHITE, Rgb::HIGHLIGHT_GOLD)
    }

    #[test]
    fn short_text_in_large_box_reaches_ceiling() {
        let opts = FitOptions {
            max_size_px: 80,
            ..FitOptions::default()
        };
        let result = fit_tokens(&tokens("abc"), 4000.0, 4000.0, &opts, &FixedMeasurer);
        assert_eq!(result.font_size_px, 80);
        assert_eq!(result.lines.len(), 1);
    }

    #[test]
    fn long_text_in_small_box_clamps_to_floor() {
        let text: String = core::iter::repeat('x').take(400).collect();
        let opts = FitOptions::default();
        let result = fit_tokens(&tokens(&text), 100.0, 50.0, &opts, &FixedMeasurer);
        assert_eq!(result.font_size_px, opts.min_size_px);
        // Overflow is permitted at the floor; lines exist and were laid
        // out at the returned size.
        assert!(!result.lines.is_empty());
        assert!(result.total_height_px(opts.line_height) > 50.0);
    }

    #[test]
    fn result_height_fits_when_a_feasible_size_exists() {
        let opts = FitOptions {
            max_size_px: 120,
            ..FitOptions::default()
        };
        let result = fit_tokens(
            &tokens("中国は強く抗議する"),
            400.0,
            300.0,
            &opts,
            &FixedMeasurer,
        );
        assert!(result.font_size_px >= opts.min_size_px);
        assert!(result.font_size_px <= opts.max_size_px);
        assert!(result.total_height_px(opts.line_height) <= 300.0);
    }

    #[test]
    fn returned_size_is_maximal() {
        let opts = FitOptions {
            max_size_px: 100,
            ..FitOptions::default()
        };
        let toks = tokens("wrap me somewhere sensible");
        let result = fit_tokens(&toks, 300.0, 200.0, &opts, &FixedMeasurer);
        if result.font_size_px < opts.max_size_px {
            // One size up must overflow.
            let font = FontSpec::bold(opts.family, (result.font_size_px + 1) as f32);
            let lines = layout_tokens(&toks, 300.0, &font, &FixedMeasurer);
            let total =
                lines.len() as f32 * (result.font_size_px + 1) as f32 * opts.line_height;
            assert!(total > 200.0);
        }
    }

    #[test]
    fn empty_tokens_fit_at_ceiling() {
        let opts = FitOptions::default();
        let result = fit_tokens(&[], 100.0, 100.0, &opts, &FixedMeasurer);
        assert_eq!(result.font_size_px, opts.max_size_px);
        assert!(result.lines.is_empty());
    }

    #[test]
    fn degenerate_bounds_terminate() {
        let opts = FitOptions {
            min_size_px: 24,
            max_size_px: 24,
            ..FitOptions::default()
        };
        let result = fit_tokens(&tokens("abcdef"), 10.0, 5.0, &opts, &FixedMeasurer);
        assert_eq!(result.font_size_px, 24);
    }
}
