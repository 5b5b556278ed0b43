//! Greedy line layout under a pixel width constraint.

use smallvec::SmallVec;

use crate::config::FontSpec;
use crate::markup::Token;

/// Text measurement hook backing wrapping decisions.
///
/// Implementations must use the same font-metrics source the final draw
/// uses, or wrap results will be inconsistent with actual paint.
pub trait TextMeasurer: Send + Sync {
    /// Rendered advance width of one character under the given spec.
    fn char_width_px(&self, ch: char, font: &FontSpec) -> f32;

    /// Advance width of a string; default sums per-character widths.
    fn text_width_px(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().map(|ch| self.char_width_px(ch, font)).sum()
    }
}

/// A horizontally-laid-out run of tokens.
///
/// `width` is the exact sum of the member tokens' measured widths at the
/// font the line was laid out with; it is never adjusted afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub tokens: Vec<Token>,
    pub width: f32,
}

/// Wrap a token sequence into lines not exceeding `max_width`.
///
/// Rules:
/// - tokens accumulate while `current_width + next_width <= max_width`;
/// - a `\n` token force-terminates the current line and is not placed;
/// - a single token wider than `max_width` still occupies its own line
///   (the wrap check only fires on a non-empty accumulator), so layout
///   always makes progress;
/// - a trailing non-empty accumulator is flushed as the last line;
/// - zero tokens produce zero lines.
///
/// Pure function: identical inputs give identical output.
pub fn layout_tokens(
    tokens: &[Token],
    max_width: f32,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current: SmallVec<[Token; 32]> = SmallVec::new();
    let mut current_width = 0.0f32;

    for token in tokens {
        if token.ch == '\n' {
            lines.push(Line {
                tokens: current.to_vec(),
                width: current_width,
            });
            current.clear();
            current_width = 0.0;
            continue;
        }

        let w = measurer.char_width_px(token.ch, font);
        if current_width + w > max_width && !current.is_empty() {
            lines.push(Line {
                tokens: current.to_vec(),
                width: current_width,
            });
            current.clear();
            current.push(*token);
            current_width = w;
        } else {
            current.push(*token);
            current_width += w;
        }
    }

    if !current.is_empty() {
        lines.push(Line {
            tokens: current.to_vec(),
            width: current_width,
        });
    }

    lines
}
