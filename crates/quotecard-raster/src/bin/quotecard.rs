use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use quotecard::catalog::{load_flags, DefaultTexts};
use quotecard::config::{BackgroundKind, FontFamily, QuoteMode, RenderConfig, Rgb};
use quotecard::session::Session;
use quotecard_raster::{encode_jpeg, CardRenderer, EXPORT_FILE_NAME};

#[derive(Clone, Debug)]
struct Args {
    text: Option<String>,
    background: BackgroundKind,
    out: PathBuf,
    assets_dir: Option<PathBuf>,
    flags_json: Option<PathBuf>,
    default_texts_json: Option<PathBuf>,
    lang: String,
    font_size_px: u32,
    footer: Option<String>,
    footer_size_px: u32,
    font_family: FontFamily,
    quote: bool,
    margin_x_pct: f32,
    start_y_pct: f32,
    shadow_blur_px: u32,
    text_color: Rgb,
    highlight_color: Rgb,
    flag1: Option<String>,
    flag2: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        let defaults = RenderConfig::default();
        Self {
            text: None,
            background: defaults.background,
            out: PathBuf::from(EXPORT_FILE_NAME),
            assets_dir: None,
            flags_json: None,
            default_texts_json: None,
            lang: "ja".to_string(),
            font_size_px: defaults.base_font_size_px,
            footer: None,
            footer_size_px: defaults.footer_size_px,
            font_family: defaults.font_family,
            quote: false,
            margin_x_pct: 10.0,
            start_y_pct: 20.0,
            shadow_blur_px: defaults.shadow_blur_px,
            text_color: defaults.text_color,
            highlight_color: defaults.highlight_color,
            flag1: None,
            flag2: None,
        }
    }
}

fn main() -> ExitCode {
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("{}", help_text());
            ExitCode::FAILURE
        }
    }
}

fn run(argv: Vec<String>) -> Result<(), String> {
    let args = parse_args(argv)?;

    let config = RenderConfig {
        background: args.background,
        base_font_size_px: args.font_size_px,
        footer_size_px: args.footer_size_px,
        font_family: args.font_family,
        quote_mode: if args.quote {
            QuoteMode::Both
        } else {
            QuoteMode::None
        },
        margin_x_ratio: args.margin_x_pct / 100.0,
        start_y_ratio: args.start_y_pct / 100.0,
        shadow_blur_px: args.shadow_blur_px,
        text_color: args.text_color,
        highlight_color: args.highlight_color,
        ..RenderConfig::default()
    };

    // Config first, then locale, then catalogs, then render.
    let mut session = Session::new(config, &args.lang);
    if let Some(path) = &args.flags_json {
        session.set_flags(load_flags(path));
    }
    if let Some(path) = &args.default_texts_json {
        session.set_default_texts(DefaultTexts::load(path));
    }

    let today = chrono::Local::now().date_naive();
    session.select_background(args.background, today);
    if let Some(text) = args.text {
        session.config.text = text;
    }
    if let Some(footer) = args.footer {
        session.config.footer_text = footer;
    }
    if let Some(flag) = args.flag1 {
        session.config.flag1 = flag;
    }
    if let Some(flag) = args.flag2 {
        session.config.flag2 = flag;
    }
    if session.config.text.is_empty() {
        return Err("no text: pass --text or a --default-texts catalog".to_string());
    }

    let mut renderer = CardRenderer::new();
    if let Some(dir) = &args.assets_dir {
        let path = dir.join(args.background.asset_name());
        match image::open(&path) {
            Ok(img) => renderer.set_background(args.background, img.to_rgba8()),
            Err(err) => eprintln!(
                "warning: background {} unavailable ({err}), using solid fill",
                path.display()
            ),
        }
    }

    let surface = renderer.render_card(&session.config);
    let bytes = encode_jpeg(&surface).map_err(|e| e.to_string())?;
    std::fs::write(&args.out, bytes).map_err(|e| e.to_string())?;
    println!(
        "wrote {} ({}x{} surface)",
        args.out.display(),
        surface.width(),
        surface.height()
    );
    Ok(())
}

fn parse_args(argv: Vec<String>) -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = argv.into_iter().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .ok_or_else(|| format!("{name} requires a value"))
        };
        match flag.as_str() {
            "--text" => args.text = Some(value("--text")?),
            "--background" => {
                let name = value("--background")?;
                args.background = BackgroundKind::from_asset_name(&name)
                    .ok_or_else(|| format!("unknown background {name:?}"))?;
            }
            "--out" => args.out = PathBuf::from(value("--out")?),
            "--assets-dir" => args.assets_dir = Some(PathBuf::from(value("--assets-dir")?)),
            "--flags-json" => args.flags_json = Some(PathBuf::from(value("--flags-json")?)),
            "--default-texts" => {
                args.default_texts_json = Some(PathBuf::from(value("--default-texts")?))
            }
            "--lang" => args.lang = value("--lang")?,
            "--font-size" => {
                args.font_size_px = value("--font-size")?
                    .parse()
                    .map_err(|e| format!("--font-size: {e}"))?
            }
            "--footer" => args.footer = Some(value("--footer")?),
            "--footer-size" => {
                args.footer_size_px = value("--footer-size")?
                    .parse()
                    .map_err(|e| format!("--footer-size: {e}"))?
            }
            "--font" => {
                args.font_family = match value("--font")?.as_str() {
                    "sans" => FontFamily::Sans,
                    "serif" => FontFamily::Serif,
                    other => return Err(format!("unknown font family {other:?}")),
                }
            }
            "--quote" => args.quote = true,
            "--margin-x" => {
                args.margin_x_pct = value("--margin-x")?
                    .parse()
                    .map_err(|e| format!("--margin-x: {e}"))?
            }
            "--start-y" => {
                args.start_y_pct = value("--start-y")?
                    .parse()
                    .map_err(|e| format!("--start-y: {e}"))?
            }
            "--shadow-blur" => {
                args.shadow_blur_px = value("--shadow-blur")?
                    .parse()
                    .map_err(|e| format!("--shadow-blur: {e}"))?
            }
            "--text-color" => {
                args.text_color =
                    Rgb::from_hex(&value("--text-color")?).map_err(|e| e.to_string())?
            }
            "--highlight-color" => {
                args.highlight_color =
                    Rgb::from_hex(&value("--highlight-color")?).map_err(|e| e.to_string())?
            }
            "--flag1" => args.flag1 = Some(value("--flag1")?),
            "--flag2" => args.flag2 = Some(value("--flag2")?),
            "--help" | "-h" => return Err("usage".to_string()),
            other => return Err(format!("unknown argument {other:?}")),
        }
    }
    Ok(args)
}

fn help_text() -> String {
    let backgrounds: Vec<&str> = BackgroundKind::ALL
        .iter()
        .map(|kind| kind.asset_name())
        .collect();
    format!(
        "usage: quotecard [options]\n\
         \n\
         --text STRING          body text, [g]...[/g] marks highlights\n\
         --background NAME      one of: {}\n\
         --out PATH             output JPEG path (default {})\n\
         --assets-dir DIR       directory holding background images\n\
         --flags-json PATH      flag catalog JSON\n\
         --default-texts PATH   default-texts catalog JSON\n\
         --lang TAG             display language tag (default ja)\n\
         --font-size PX         auto-fit ceiling (default 80)\n\
         --font sans|serif      main text family (default sans)\n\
         --footer STRING        footer caption (default: generated)\n\
         --footer-size PX       footer size (default 32)\n\
         --quote                wrap text in curly quotes\n\
         --margin-x PCT         horizontal margin percent (default 10)\n\
         --start-y PCT          text start percent (default 20)\n\
         --shadow-blur PX       drop shadow blur radius\n\
         --text-color HEX       base color (default #ffffff)\n\
         --highlight-color HEX  highlight color (default #d8ae5c)\n\
         --flag1 EMOJI          left flag glyph (spokesperson card)\n\
         --flag2 EMOJI          right flag glyph (spokesperson card)",
        backgrounds.join(", "),
        EXPORT_FILE_NAME
    )
}
