//! cosmic-text raster backend: executes caption frames into RGBA pixels.
//!
//! The same `FontSystem` backs both [`CardMeasurer`] and glyph drawing, so
//! wrap decisions made during composition match the final paint exactly.

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

mod export;

pub use export::{encode_jpeg, write_jpeg, ExportError, EXPORT_FILE_NAME, EXPORT_JPEG_QUALITY, EXPORT_SCALE};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent, Weight,
};
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use log::debug;

use quotecard::config::{BackgroundKind, FontFamily, FontSpec, RenderConfig, Rgb};
use quotecard::layout::TextMeasurer;
use quotecard_render::{
    compose, Anchor, BackgroundCommand, Baseline, CaptionFrame, DrawCommand, RuleCommand,
    TextCommand,
};

/// Surface size used when no background image supplies natural dimensions.
pub const DEFAULT_SURFACE: (u32, u32) = (1280, 720);

/// Shared shaping state: font discovery, shaping and glyph rasterization.
struct FontContext {
    font_system: FontSystem,
    swash_cache: SwashCache,
    /// First stack entry present in the font database, cached per family.
    resolved: HashMap<FontFamily, Option<String>>,
}

impl FontContext {
    fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            resolved: HashMap::new(),
        }
    }

    /// Resolve a family stack to the first installed concrete face name.
    /// `None` means the generic class fallback is used.
    fn resolved_family(&mut self, family: FontFamily) -> Option<String> {
        if let Some(cached) = self.resolved.get(&family) {
            return cached.clone();
        }
        let db = self.font_system.db();
        let found = family
            .stack()
            .iter()
            .filter(|name| !matches!(**name, "serif" | "sans-serif"))
            .find(|name| {
                db.faces()
                    .any(|face| face.families.iter().any(|(n, _)| n == *name))
            })
            .map(|name| name.to_string());
        if found.is_none() {
            debug!("no face from {family:?} stack installed, using generic fallback");
        }
        self.resolved.insert(family, found.clone());
        found
    }

    fn shape(&mut self, text: &str, font: &FontSpec) -> Buffer {
        let resolved = self.resolved_family(font.family);
        let family = match &resolved {
            Some(name) => Family::Name(name),
            None => match font.family {
                FontFamily::Serif => Family::Serif,
                FontFamily::Sans | FontFamily::Emoji => Family::SansSerif,
            },
        };
        let attrs = Attrs::new().family(family).weight(Weight(font.weight));
        let metrics = Metrics::new(font.size_px, font.size_px);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    fn advance_width(&mut self, text: &str, font: &FontSpec) -> f32 {
        let buffer = self.shape(text, font);
        let mut width = 0.0f32;
        for run in buffer.layout_runs() {
            for glyph in run.glyphs {
                width = width.max(glyph.x + glyph.w);
            }
        }
        width
    }
}

fn lock_fonts(fonts: &Mutex<FontContext>) -> MutexGuard<'_, FontContext> {
    match fonts.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// [`TextMeasurer`] over the renderer's font system.
#[derive(Clone)]
pub struct CardMeasurer {
    fonts: Arc<Mutex<FontContext>>,
}

impl TextMeasurer for CardMeasurer {
    fn char_width_px(&self, ch: char, font: &FontSpec) -> f32 {
        let mut buf = [0u8; 4];
        let text = ch.encode_utf8(&mut buf);
        lock_fonts(&self.fonts).advance_width(text, font)
    }

    fn text_width_px(&self, text: &str, font: &FontSpec) -> f32 {
        // Per-character advances, matching how the compositor places
        // tokens one at a time.
        let mut fonts = lock_fonts(&self.fonts);
        text.chars()
            .map(|ch| {
                let mut buf = [0u8; 4];
                fonts.advance_width(ch.encode_utf8(&mut buf), font)
            })
            .sum()
    }
}

/// Executes caption frames into pixels and owns the background images.
pub struct CardRenderer {
    fonts: Arc<Mutex<FontContext>>,
    backgrounds: HashMap<BackgroundKind, RgbaImage>,
}

impl Default for CardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CardRenderer {
    /// Create a renderer over the system font database.
    pub fn new() -> Self {
        Self {
            fonts: Arc::new(Mutex::new(FontContext::new())),
            backgrounds: HashMap::new(),
        }
    }

    /// Register (or replace wholesale) the image for one background kind.
    pub fn set_background(&mut self, kind: BackgroundKind, image: RgbaImage) {
        self.backgrounds.insert(kind, image);
    }

    /// Measurement handle backed by this renderer's font system.
    pub fn measurer(&self) -> CardMeasurer {
        CardMeasurer {
            fonts: Arc::clone(&self.fonts),
        }
    }

    /// Natural surface size for a config: the registered background
    /// image's dimensions, or [`DEFAULT_SURFACE`].
    pub fn surface_size(&self, cfg: &RenderConfig) -> (u32, u32) {
        self.backgrounds
            .get(&cfg.background)
            .map(|img| (img.width(), img.height()))
            .unwrap_or(DEFAULT_SURFACE)
    }

    /// Compose and rasterize in one step at the natural surface size.
    pub fn render_card(&self, cfg: &RenderConfig) -> RgbaImage {
        let (width, height) = self.surface_size(cfg);
        let frame = compose(cfg, width, height, &self.measurer());
        self.rasterize(&frame)
    }

    /// Execute a frame's commands back to front into a fresh surface.
    pub fn rasterize(&self, frame: &CaptionFrame) -> RgbaImage {
        let mut surface =
            RgbaImage::from_pixel(frame.width.max(1), frame.height.max(1), Rgba([0, 0, 0, 255]));
        for command in frame.commands() {
            match command {
                DrawCommand::Background(cmd) => self.draw_background(&mut surface, cmd),
                DrawCommand::Text(cmd) => self.draw_text(&mut surface, cmd),
                DrawCommand::Rule(cmd) => draw_rule(&mut surface, cmd),
            }
        }
        surface
    }

    fn draw_background(&self, surface: &mut RgbaImage, cmd: &BackgroundCommand) {
        match self.backgrounds.get(&cmd.kind) {
            Some(image) => {
                let scaled = if image.dimensions() == surface.dimensions() {
                    image.clone()
                } else {
                    image::imageops::resize(
                        image,
                        surface.width(),
                        surface.height(),
                        FilterType::Triangle,
                    )
                };
                *surface = scaled;
            }
            None => {
                // Silent visual fallback, never an error.
                let fill = Rgba([cmd.fallback_fill.r, cmd.fallback_fill.g, cmd.fallback_fill.b, 255]);
                for px in surface.pixels_mut() {
                    *px = fill;
                }
            }
        }
    }

    fn draw_text(&self, surface: &mut RgbaImage, cmd: &TextCommand) {
        let mut fonts = lock_fonts(&self.fonts);
        let buffer = fonts.shape(&cmd.text, &cmd.font);

        let Some(run_geom) = buffer.layout_runs().next().map(|run| {
            let width = run.glyphs.iter().fold(0.0f32, |w, g| w.max(g.x + g.w));
            (width, run.line_top, run.line_y, run.line_height)
        }) else {
            return;
        };
        let (run_width, line_top, line_y, line_height) = run_geom;

        let offset_x = match cmd.anchor {
            Anchor::Left => cmd.x,
            Anchor::Center => cmd.x - run_width / 2.0,
        };
        let offset_y = match cmd.baseline {
            Baseline::Top => cmd.y,
            Baseline::Alphabetic => cmd.y - line_y,
            Baseline::Middle => cmd.y - (line_top + line_height / 2.0),
        };

        // Collect rasterized glyphs once; the shadow pass and the color
        // pass both walk this list.
        struct PlacedGlyph {
            x: i32,
            y: i32,
            width: usize,
            height: usize,
            data: Vec<u8>,
            color: bool,
        }
        let mut placed = Vec::new();
        for run in buffer.layout_runs() {
            let baseline = run.line_y;
            for glyph in run.glyphs {
                let physical = glyph.physical((offset_x, offset_y), 1.0);
                let FontContext {
                    font_system,
                    swash_cache,
                    ..
                } = &mut *fonts;
                if let Some(image) = swash_cache.get_image(font_system, physical.cache_key) {
                    if image.placement.width == 0 || image.placement.height == 0 {
                        continue;
                    }
                    placed.push(PlacedGlyph {
                        x: physical.x + image.placement.left,
                        y: physical.y + baseline as i32 - image.placement.top,
                        width: image.placement.width as usize,
                        height: image.placement.height as usize,
                        data: image.data.clone(),
                        color: matches!(image.content, SwashContent::Color),
                    });
                }
            }
        }
        drop(fonts);

        if cmd.shadow_blur_px > 0 && cmd.shadow_alpha > 0.0 && !placed.is_empty() {
            let radius = cmd.shadow_blur_px as i32;
            let min_x = placed.iter().map(|g| g.x).min().unwrap_or(0) - radius;
            let min_y = placed.iter().map(|g| g.y).min().unwrap_or(0) - radius;
            let max_x = placed
                .iter()
                .map(|g| g.x + g.width as i32)
                .max()
                .unwrap_or(0)
                + radius;
            let max_y = placed
                .iter()
                .map(|g| g.y + g.height as i32)
                .max()
                .unwrap_or(0)
                + radius;
            let bw = (max_x - min_x).max(1) as usize;
            let bh = (max_y - min_y).max(1) as usize;
            let mut coverage = vec![0.0f32; bw * bh];
            for glyph in &placed {
                for cy in 0..glyph.height {
                    for cx in 0..glyph.width {
                        let alpha = if glyph.color {
                            glyph.data[(cy * glyph.width + cx) * 4 + 3]
                        } else {
                            glyph.data[cy * glyph.width + cx]
                        };
                        if alpha == 0 {
                            continue;
                        }
                        let sx = glyph.x + cx as i32 - min_x;
                        let sy = glyph.y + cy as i32 - min_y;
                        let idx = sy as usize * bw + sx as usize;
                        coverage[idx] = (coverage[idx] + alpha as f32 / 255.0).min(1.0);
                    }
                }
            }
            box_blur(&mut coverage, bw, bh, cmd.shadow_blur_px as usize);
            for sy in 0..bh {
                for sx in 0..bw {
                    let alpha = coverage[sy * bw + sx] * cmd.shadow_alpha;
                    if alpha > 0.0 {
                        blend_pixel(
                            surface,
                            min_x + sx as i32,
                            min_y + sy as i32,
                            Rgb::BLACK,
                            alpha,
                        );
                    }
                }
            }
        }

        for glyph in &placed {
            for cy in 0..glyph.height {
                for cx in 0..glyph.width {
                    let px = glyph.x + cx as i32;
                    let py = glyph.y + cy as i32;
                    if glyph.color {
                        let base = (cy * glyph.width + cx) * 4;
                        let alpha = glyph.data[base + 3] as f32 / 255.0;
                        if alpha > 0.0 {
                            let color = Rgb::new(
                                glyph.data[base],
                                glyph.data[base + 1],
                                glyph.data[base + 2],
                            );
                            blend_pixel(surface, px, py, color, alpha);
                        }
                    } else {
                        let alpha = glyph.data[cy * glyph.width + cx] as f32 / 255.0;
                        if alpha > 0.0 {
                            blend_pixel(surface, px, py, cmd.color, alpha);
                        }
                    }
                }
            }
        }
    }
}

fn draw_rule(surface: &mut RgbaImage, cmd: &RuleCommand) {
    let x0 = cmd.x.round() as i32;
    let y0 = cmd.y.round() as i32;
    let x1 = (cmd.x + cmd.width).round() as i32;
    let y1 = (cmd.y + cmd.height).round() as i32;
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(surface, x, y, cmd.color, cmd.alpha);
        }
    }
}

fn blend_pixel(surface: &mut RgbaImage, x: i32, y: i32, color: Rgb, alpha: f32) {
    if x < 0 || y < 0 || x >= surface.width() as i32 || y >= surface.height() as i32 {
        return;
    }
    let alpha = alpha.clamp(0.0, 1.0);
    let px = surface.get_pixel_mut(x as u32, y as u32);
    for (channel, new) in [color.r, color.g, color.b].into_iter().enumerate() {
        let old = px.0[channel] as f32;
        px.0[channel] = (old + (new as f32 - old) * alpha).round() as u8;
    }
    px.0[3] = 255;
}

/// Separable box blur, one horizontal and one vertical pass.
fn box_blur(buf: &mut [f32], width: usize, height: usize, radius: usize) {
    if radius == 0 || buf.is_empty() {
        return;
    }
    let window = (2 * radius + 1) as f32;
    let mut scratch = vec![0.0f32; buf.len()];

    for y in 0..height {
        let row = &buf[y * width..(y + 1) * width];
        let mut sum: f32 = row.iter().take(radius + 1).sum();
        for x in 0..width {
            scratch[y * width + x] = sum / window;
            if x + radius + 1 < width {
                sum += row[x + radius + 1];
            }
            if x >= radius {
                sum -= row[x - radius];
            }
        }
    }

    for x in 0..width {
        let mut sum: f32 = (0..(radius + 1).min(height)).map(|y| scratch[y * width + x]).sum();
        for y in 0..height {
            buf[y * width + x] = sum / window;
            if y + radius + 1 < height {
                sum += scratch[(y + radius + 1) * width + x];
            }
            if y >= radius {
                sum -= scratch[(y - radius) * width + x];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_background_fills_fallback_color() {
        let renderer = CardRenderer::new();
        let mut frame = CaptionFrame::new(8, 8);
        frame
            .background_commands
            .push(DrawCommand::Background(BackgroundCommand {
                kind: BackgroundKind::Defense,
                fallback_fill: Rgb::FALLBACK_FILL,
            }));
        let surface = renderer.rasterize(&frame);
        assert_eq!(surface.dimensions(), (8, 8));
        assert_eq!(surface.get_pixel(4, 4).0, [0x7A, 0x10, 0x10, 255]);
    }

    #[test]
    fn registered_background_is_scaled_to_surface() {
        let mut renderer = CardRenderer::new();
        let bg = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        renderer.set_background(BackgroundKind::Defense, bg);

        let mut frame = CaptionFrame::new(16, 8);
        frame
            .background_commands
            .push(DrawCommand::Background(BackgroundCommand {
                kind: BackgroundKind::Defense,
                fallback_fill: Rgb::FALLBACK_FILL,
            }));
        let surface = renderer.rasterize(&frame);
        assert_eq!(surface.get_pixel(8, 4).0, [10, 20, 30, 255]);
    }

    #[test]
    fn rule_blends_with_alpha() {
        let renderer = CardRenderer::new();
        let mut frame = CaptionFrame::new(10, 10);
        frame.footer_commands.push(DrawCommand::Rule(RuleCommand {
            x: 0.0,
            y: 4.0,
            width: 10.0,
            height: 2.0,
            color: Rgb::WHITE,
            alpha: 0.85,
        }));
        let surface = renderer.rasterize(&frame);
        // 85% white over black.
        let px = surface.get_pixel(5, 5).0;
        assert_eq!(px[0], 217);
        // Outside the rule stays black.
        assert_eq!(surface.get_pixel(5, 0).0[0], 0);
    }

    #[test]
    fn surface_size_prefers_background_dimensions() {
        let mut renderer = CardRenderer::new();
        let cfg = RenderConfig::default();
        assert_eq!(renderer.surface_size(&cfg), DEFAULT_SURFACE);
        renderer.set_background(cfg.background, RgbaImage::new(640, 360));
        assert_eq!(renderer.surface_size(&cfg), (640, 360));
    }

    #[test]
    fn box_blur_preserves_total_energy_roughly() {
        let mut buf = vec![0.0f32; 9 * 9];
        buf[4 * 9 + 4] = 1.0;
        box_blur(&mut buf, 9, 9, 2);
        let total: f32 = buf.iter().sum();
        assert!((total - 1.0).abs() < 0.05);
        assert!(buf[4 * 9 + 4] > 0.0);
        assert!(buf[4 * 9 + 4] < 1.0);
    }
}
