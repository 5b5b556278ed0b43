//! Caption frame represented as backend-agnostic draw commands.

use serde::{Deserialize, Serialize};

use quotecard::config::{BackgroundKind, FontSpec, Rgb};

/// Horizontal anchor of a text command's `x` coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// `x` is the left edge of the run.
    #[default]
    Left,
    /// `x` is the horizontal center of the run.
    Center,
}

/// Vertical interpretation of a text command's `y` coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Baseline {
    /// `y` is the top of the line box.
    #[default]
    Top,
    /// `y` is the alphabetic baseline.
    Alphabetic,
    /// `y` is the vertical middle of the line box.
    Middle,
}

/// Draw the background layer: the selected image scaled to the surface,
/// or a solid fallback fill when the image is unavailable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundCommand {
    pub kind: BackgroundKind,
    pub fallback_fill: Rgb,
}

/// Draw one text run at a fixed position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextCommand {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font: FontSpec,
    pub color: Rgb,
    pub anchor: Anchor,
    pub baseline: Baseline,
    /// Blur radius of the black drop shadow; zero disables it.
    pub shadow_blur_px: u32,
    /// Shadow opacity.
    pub shadow_alpha: f32,
}

/// Draw a filled horizontal rule, alpha-blended, no shadow.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Rgb,
    pub alpha: f32,
}

/// One drawing operation. Order within a layer is drawing order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Background(BackgroundCommand),
    Text(TextCommand),
    Rule(RuleCommand),
}

/// A composed caption card as four back-to-front layers.
///
/// The layer split mirrors the fixed draw order: background, then flags,
/// then the auto-fit main text block, then the footer. Backends execute
/// [`commands`](Self::commands) front to back without reordering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionFrame {
    pub width: u32,
    pub height: u32,
    pub background_commands: Vec<DrawCommand>,
    pub flag_commands: Vec<DrawCommand>,
    pub text_commands: Vec<DrawCommand>,
    pub footer_commands: Vec<DrawCommand>,
}

impl CaptionFrame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// All commands in fixed back-to-front order.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.background_commands
            .iter()
            .chain(self.flag_commands.iter())
            .chain(self.text_commands.iter())
            .chain(self.footer_commands.iter())
    }

    pub fn command_count(&self) -> usize {
        self.background_commands.len()
            + self.flag_commands.len()
            + self.text_commands.len()
            + self.footer_commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotecard::config::FontFamily;

    #[test]
    fn commands_iterate_in_layer_order() {
        let mut frame = CaptionFrame::new(100, 100);
        frame
            .background_commands
            .push(DrawCommand::Background(BackgroundCommand {
                kind: BackgroundKind::Defense,
                fallback_fill: Rgb::FALLBACK_FILL,
            }));
        frame.footer_commands.push(DrawCommand::Rule(RuleCommand {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 2.0,
            color: Rgb::WHITE,
            alpha: 0.85,
        }));
        frame.text_commands.push(DrawCommand::Text(TextCommand {
            x: 0.0,
            y: 0.0,
            text: "a".to_string(),
            font: FontSpec::bold(FontFamily::Sans, 10.0),
            color: Rgb::WHITE,
            anchor: Anchor::Left,
            baseline: Baseline::Top,
            shadow_blur_px: 0,
            shadow_alpha: 0.0,
        }));

        let kinds: Vec<_> = frame
            .commands()
            .map(|cmd| match cmd {
                DrawCommand::Background(_) => "background",
                DrawCommand::Text(_) => "text",
                DrawCommand::Rule(_) => "rule",
            })
            .collect();
        assert_eq!(kinds, vec!["background", "text", "rule"]);
        assert_eq!(frame.command_count(), 3);
    }

    #[test]
    fn frame_roundtrips_through_json() {
        let mut frame = CaptionFrame::new(640, 480);
        frame
            .background_commands
            .push(DrawCommand::Background(BackgroundCommand {
                kind: BackgroundKind::Spokesperson,
                fallback_fill: Rgb::FALLBACK_FILL,
            }));
        let json = serde_json::to_string(&frame).unwrap();
        let back: CaptionFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, frame);
    }
}
