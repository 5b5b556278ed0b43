//! Layered composition of a caption card into draw commands.
//!
//! Layer order is fixed back-to-front: background, flags, main text,
//! footer. Each layer guards on its required inputs and skips itself
//! rather than failing; a partially-configured session yields a partially
//! composed frame.

use log::debug;

use quotecard::config::{
    self, FontFamily, FontSpec, QuoteMode, RenderConfig, Rgb, MIN_FONT_SIZE_PX,
};
use quotecard::fit::{fit_tokens, FitOptions};
use quotecard::layout::TextMeasurer;
use quotecard::markup::tokenize;

use crate::render_ir::{
    Anchor, BackgroundCommand, Baseline, CaptionFrame, DrawCommand, RuleCommand, TextCommand,
};

/// Compose a caption frame for a surface of the given dimensions.
///
/// Pure function of `(config, width, height, measurer)`: identical inputs
/// produce an identical frame, so rendering is idempotent up to the
/// backend's font-loading state.
pub fn compose(
    cfg: &RenderConfig,
    width: u32,
    height: u32,
    measurer: &dyn TextMeasurer,
) -> CaptionFrame {
    let mut frame = CaptionFrame::new(width, height);
    if width == 0 || height == 0 {
        return frame;
    }
    push_background(&mut frame, cfg);
    push_flags(&mut frame, cfg);
    push_main_text(&mut frame, cfg, measurer);
    push_footer(&mut frame, cfg);
    frame
}

fn push_background(frame: &mut CaptionFrame, cfg: &RenderConfig) {
    frame
        .background_commands
        .push(DrawCommand::Background(BackgroundCommand {
            kind: cfg.background,
            fallback_fill: Rgb::FALLBACK_FILL,
        }));
}

fn push_flags(frame: &mut CaptionFrame, cfg: &RenderConfig) {
    if !cfg.background.is_spokesperson() {
        return;
    }
    let w = frame.width as f32;
    let h = frame.height as f32;
    let flag_size = (w * config::FLAG_SIZE_RATIO).min(h * config::FLAG_SIZE_RATIO);
    let flag_y = h * config::FLAG_Y_RATIO;
    let spacing = w * config::FLAG_SPACING_RATIO;
    let total_width = flag_size * 2.0 + spacing;
    let flag_x = (w - total_width) / 2.0;

    let font = FontSpec {
        family: FontFamily::Emoji,
        weight: 400,
        size_px: flag_size,
    };
    let centers = [
        (cfg.flag1.as_str(), flag_x + flag_size / 2.0),
        (cfg.flag2.as_str(), flag_x + flag_size + spacing + flag_size / 2.0),
    ];
    for (glyph, center_x) in centers {
        if glyph.is_empty() {
            continue;
        }
        frame.flag_commands.push(DrawCommand::Text(TextCommand {
            x: center_x,
            y: flag_y,
            text: glyph.to_string(),
            font,
            color: cfg.text_color,
            anchor: Anchor::Center,
            baseline: Baseline::Middle,
            shadow_blur_px: 0,
            shadow_alpha: 0.0,
        }));
    }
}

fn push_main_text(frame: &mut CaptionFrame, cfg: &RenderConfig, measurer: &dyn TextMeasurer) {
    let w = frame.width as f32;
    let h = frame.height as f32;

    let area_x = w * cfg.margin_x_ratio;
    let area_w = w - area_x * 2.0;
    let start_y = h * cfg.start_y_ratio;
    let footer_reserve = if cfg.footer_text.trim().is_empty() {
        0.0
    } else {
        h * config::FOOTER_RESERVE_RATIO
    };
    let available_height = h - start_y - footer_reserve;
    if area_w <= 0.0 || available_height <= 0.0 {
        debug!("main text area degenerate ({area_w}x{available_height}), skipping layer");
        return;
    }

    let mut raw = cfg.text.clone();
    if cfg.quote_mode == QuoteMode::Both && !raw.trim().is_empty() {
        raw = format!("\u{201C}{raw}\u{201D}");
    }
    let tokens = tokenize(&raw, cfg.text_color, cfg.highlight_color);
    if tokens.is_empty() {
        return;
    }

    let opts = FitOptions {
        line_height: cfg.line_height,
        family: cfg.font_family,
        min_size_px: MIN_FONT_SIZE_PX,
        max_size_px: cfg.base_font_size_px.max(MIN_FONT_SIZE_PX),
    };
    let fit = fit_tokens(&tokens, area_w, available_height, &opts, measurer);
    let font = FontSpec::bold(cfg.font_family, fit.font_size_px as f32);
    let line_px = fit.font_size_px as f32 * cfg.line_height;

    let mut y = start_y;
    for line in &fit.lines {
        // Each line is centered across the full surface width.
        let mut x = (w - line.width) / 2.0;
        for token in &line.tokens {
            frame.text_commands.push(DrawCommand::Text(TextCommand {
                x,
                y,
                text: token.ch.to_string(),
                font,
                color: token.color,
                anchor: Anchor::Left,
                baseline: Baseline::Top,
                shadow_blur_px: cfg.shadow_blur_px,
                shadow_alpha: config::MAIN_SHADOW_ALPHA,
            }));
            x += measurer.char_width_px(token.ch, &font);
        }
        y += line_px;
    }
}

fn push_footer(frame: &mut CaptionFrame, cfg: &RenderConfig) {
    let footer = cfg.footer_text.trim();
    if footer.is_empty() {
        return;
    }
    let w = frame.width as f32;
    let h = frame.height as f32;
    let f_size = cfg.footer_size_px as f32;
    let y_footer = h - h * config::FOOTER_BOTTOM_MARGIN_RATIO;

    frame.footer_commands.push(DrawCommand::Rule(RuleCommand {
        x: w * config::FOOTER_RULE_X_RATIO,
        y: y_footer - f_size * config::FOOTER_RULE_RISE_FACTOR,
        width: w * config::FOOTER_RULE_WIDTH_RATIO,
        height: config::FOOTER_RULE_HEIGHT_PX,
        color: cfg.text_color,
        alpha: config::FOOTER_RULE_ALPHA,
    }));
    frame.footer_commands.push(DrawCommand::Text(TextCommand {
        x: w / 2.0,
        y: y_footer,
        text: footer.to_string(),
        font: FontSpec {
            family: FontFamily::Serif,
            weight: config::FOOTER_WEIGHT,
            size_px: f_size,
        },
        color: cfg.text_color,
        anchor: Anchor::Center,
        baseline: Baseline::Alphabetic,
        shadow_blur_px: cfg.shadow_blur_px,
        shadow_alpha: config::FOOTER_SHADOW_ALPHA,
    }));
}
