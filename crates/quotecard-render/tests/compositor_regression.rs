use quotecard::config::{BackgroundKind, FontSpec, QuoteMode, RenderConfig, Rgb};
use quotecard::layout::TextMeasurer;
use quotecard_render::{compose, Anchor, Baseline, CaptionFrame, DrawCommand};

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 800;

/// Half-width ASCII, full-width everything else, scaled by font size.
struct CjkMeasurer;

impl TextMeasurer for CjkMeasurer {
    fn char_width_px(&self, ch: char, font: &FontSpec) -> f32 {
        if ch.is_ascii() {
            font.size_px * 0.5
        } else {
            font.size_px
        }
    }
}

fn base_config() -> RenderConfig {
    RenderConfig {
        background: BackgroundKind::ForeignAffairs1,
        text: "[g]中国[/g]は強く抗議する".to_string(),
        base_font_size_px: 80,
        margin_x_ratio: 0.10,
        start_y_ratio: 0.20,
        footer_text: "中国外交部報道官 2026年8月24日".to_string(),
        ..RenderConfig::default()
    }
}

fn text_commands(frame: &CaptionFrame) -> Vec<&quotecard_render::TextCommand> {
    frame
        .text_commands
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}

#[test]
fn layers_appear_in_fixed_order() {
    let frame = compose(&base_config(), WIDTH, HEIGHT, &CjkMeasurer);
    assert_eq!(frame.background_commands.len(), 1);
    assert!(matches!(
        frame.background_commands[0],
        DrawCommand::Background(_)
    ));
    assert!(frame.flag_commands.is_empty());
    assert!(!frame.text_commands.is_empty());
    // Footer: rule first, caption second.
    assert_eq!(frame.footer_commands.len(), 2);
    assert!(matches!(frame.footer_commands[0], DrawCommand::Rule(_)));
    assert!(matches!(frame.footer_commands[1], DrawCommand::Text(_)));
}

#[test]
fn foreign_affairs_scenario_highlights_and_centers() {
    let frame = compose(&base_config(), WIDTH, HEIGHT, &CjkMeasurer);
    let texts = text_commands(&frame);

    // One command per body character, markup consumed.
    let body: String = texts.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(body, "中国は強く抗議する");

    // `中国` carries the highlight color, the remainder the base color.
    assert_eq!(texts[0].color, Rgb::HIGHLIGHT_GOLD);
    assert_eq!(texts[1].color, Rgb::HIGHLIGHT_GOLD);
    assert!(texts[2..].iter().all(|t| t.color == Rgb::WHITE));

    // Wrapped within the 80%-width area: every command stays inside the
    // margins, and each line is horizontally centered.
    let area_x = WIDTH as f32 * 0.10;
    for t in &texts {
        assert!(t.x >= area_x - 0.5);
        assert!(t.x + t.font.size_px <= WIDTH as f32 - area_x + t.font.size_px);
        assert_eq!(t.anchor, Anchor::Left);
        assert_eq!(t.baseline, Baseline::Top);
    }
    let first_y = texts[0].y;
    assert_eq!(first_y, HEIGHT as f32 * 0.20);

    // The auto-fit block stays above the reserved footer area.
    let footer_top = HEIGHT as f32 - HEIGHT as f32 * 0.12;
    let last = texts.last().unwrap();
    assert!(last.y + last.font.size_px * 1.25 <= footer_top + 1.0);
}

#[test]
fn auto_fit_shrinks_when_text_would_overflow() {
    let mut cfg = base_config();
    let short = compose(&cfg, WIDTH, HEIGHT, &CjkMeasurer);
    let short_size = text_commands(&short)[0].font.size_px;

    cfg.text = "中国は日本の一方的な行動に対して強く抗議するとともに厳正な申し入れを行った。"
        .repeat(4);
    let long = compose(&cfg, WIDTH, HEIGHT, &CjkMeasurer);
    let long_size = text_commands(&long)[0].font.size_px;

    assert!(long_size < short_size);
    assert!(long_size >= 24.0);
}

#[test]
fn spokesperson_scenario_draws_flags_above_unchanged_text() {
    let mut cfg = base_config();
    let without_flags = compose(&cfg, WIDTH, HEIGHT, &CjkMeasurer);

    cfg.background = BackgroundKind::Spokesperson;
    cfg.flag1 = "🇨🇳".to_string();
    cfg.flag2 = "🇯🇵".to_string();
    let frame = compose(&cfg, WIDTH, HEIGHT, &CjkMeasurer);

    assert_eq!(frame.flag_commands.len(), 2);
    let (first, second) = match (&frame.flag_commands[0], &frame.flag_commands[1]) {
        (DrawCommand::Text(a), DrawCommand::Text(b)) => (a, b),
        other => panic!("unexpected flag commands: {other:?}"),
    };
    assert_eq!(first.text, "🇨🇳");
    assert_eq!(second.text, "🇯🇵");
    assert_eq!(first.baseline, Baseline::Middle);
    assert_eq!(first.y, HEIGHT as f32 * 0.10);

    // Both glyph centers straddle the surface midline symmetrically.
    let mid = WIDTH as f32 / 2.0;
    assert!((mid - first.x - (second.x - mid)).abs() < 0.5);
    assert!(first.x < mid && second.x > mid);

    // Flag size follows the smaller dimension.
    let expected_size = (WIDTH as f32 * 0.11).min(HEIGHT as f32 * 0.11);
    assert_eq!(first.font.size_px, expected_size);

    // The main text layer is unaffected by the flag layer.
    assert_eq!(frame.text_commands, without_flags.text_commands);
}

#[test]
fn compose_is_idempotent() {
    let cfg = base_config();
    let first = compose(&cfg, WIDTH, HEIGHT, &CjkMeasurer);
    let second = compose(&cfg, WIDTH, HEIGHT, &CjkMeasurer);
    assert_eq!(first, second);
}

#[test]
fn empty_footer_frees_reserved_height() {
    let mut cfg = base_config();
    cfg.text = "抗議".repeat(40);

    let with_footer = compose(&cfg, WIDTH, HEIGHT, &CjkMeasurer);
    cfg.footer_text.clear();
    let without_footer = compose(&cfg, WIDTH, HEIGHT, &CjkMeasurer);

    assert!(without_footer.footer_commands.is_empty());
    let size_with = text_commands(&with_footer)[0].font.size_px;
    let size_without = text_commands(&without_footer)[0].font.size_px;
    assert!(size_without >= size_with);
}

#[test]
fn quote_mode_wraps_in_curly_quotes() {
    let mut cfg = base_config();
    cfg.text = "抗議する".to_string();
    cfg.quote_mode = QuoteMode::Both;
    let frame = compose(&cfg, WIDTH, HEIGHT, &CjkMeasurer);
    let body: String = text_commands(&frame)
        .iter()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(body, "\u{201C}抗議する\u{201D}");
}

#[test]
fn blank_text_skips_main_layer_only() {
    let mut cfg = base_config();
    cfg.text.clear();
    let frame = compose(&cfg, WIDTH, HEIGHT, &CjkMeasurer);
    assert!(frame.text_commands.is_empty());
    assert_eq!(frame.background_commands.len(), 1);
    assert_eq!(frame.footer_commands.len(), 2);
}

#[test]
fn zero_surface_produces_empty_frame() {
    let frame = compose(&base_config(), 0, 0, &CjkMeasurer);
    assert_eq!(frame.command_count(), 0);
}
