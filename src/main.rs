//! pixfont - render text with a bitmap font into HTML
//!
//! Explicit bootstrap for the font engine: reads config and arguments,
//! loads the font, and writes one inline element per glyph.

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use pixfont::config::Config;
use pixfont::constants::{MAX_SCALE, MIN_SCALE};
use pixfont::render::{render_document, render_run, TextRun};
use pixfont::utils::parse_hex_color;
use pixfont::{BitmapFont, FsLoader};

/// Options after merging config and command line
#[derive(Debug)]
struct Options {
    font: PathBuf,
    color: pixfont::Rgba,
    scale: f32,
    document: bool,
    output: Option<PathBuf>,
    text: String,
}

fn print_help() {
    println!(
        "pixfont {} - render text with a bitmap font into HTML

USAGE:
    pixfont [OPTIONS] TEXT...

OPTIONS:
    --font PATH       Font descriptor (.fnt); pages load relative to it
    --color HEX       Text color: RRGGBB, RGB or RRGGBBAA
    --scale N         Glyph scale factor ({} - {})
    --output PATH     Write to file instead of stdout
    --document        Wrap output in a complete HTML document
    --init-config     Write the default config file and exit
    -h, --help        Show this help
    -V, --version     Show version

CONFIG:
    $PIXFONT_CONFIG, ~/.config/pixfont/config.toml, /etc/pixfont/config.toml",
        env!("CARGO_PKG_VERSION"),
        MIN_SCALE,
        MAX_SCALE
    );
}

/// Merge config defaults with command line arguments
fn parse_args(args: &[String], config: &Config) -> Result<Options> {
    let mut font = (!config.font.path.is_empty()).then(|| PathBuf::from(&config.font.path));
    let mut color = config.render.color();
    let mut scale = config.render.scale();
    let mut document = config.render.document;
    let mut output = (!config.render.output.is_empty()).then(|| PathBuf::from(&config.render.output));
    let mut words: Vec<&str> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .map(String::as_str)
                .ok_or_else(|| anyhow!("{} requires a value", name))
        };
        match arg.as_str() {
            "--font" => font = Some(PathBuf::from(value("--font")?)),
            "--color" => {
                let raw = value("--color")?;
                color = parse_hex_color(raw).ok_or_else(|| anyhow!("Invalid color: {}", raw))?;
            }
            "--scale" => {
                let raw = value("--scale")?;
                let v: f32 = raw
                    .parse()
                    .with_context(|| format!("Invalid scale: {}", raw))?;
                if !(MIN_SCALE..=MAX_SCALE).contains(&v) {
                    return Err(anyhow!(
                        "Scale {} out of range ({} - {})",
                        v,
                        MIN_SCALE,
                        MAX_SCALE
                    ));
                }
                scale = v;
            }
            "--output" => output = Some(PathBuf::from(value("--output")?)),
            "--document" => document = true,
            other if other.starts_with("--") => return Err(anyhow!("Unknown option: {}", other)),
            word => words.push(word),
        }
    }

    let font = font.ok_or_else(|| anyhow!("No font given (use --font or [font] path)"))?;
    if words.is_empty() {
        return Err(anyhow!("No text given"));
    }

    Ok(Options {
        font,
        color,
        scale,
        document,
        output,
        text: words.join(" "),
    })
}

async fn run(options: Options) -> Result<()> {
    let mut font = BitmapFont::load(&options.font, Arc::new(FsLoader::new()))
        .await
        .with_context(|| format!("Failed to load font: {}", options.font.display()))?;

    let run = TextRun::new(&options.text, options.color, options.scale);
    let html = if options.document {
        render_document(&mut font, &[run])?
    } else {
        render_run(&mut font, &run)? + "\n"
    };
    debug!("Rendered {} bytes of HTML", html.len());

    match &options.output {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // --version
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("pixfont {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Config file generation mode
    if args.iter().any(|a| a == "--init-config") {
        let path = Config::write_default_config()?;
        println!("Config written: {}", path.display());
        return Ok(());
    }

    let config = Config::load();
    let options = parse_args(&args, &config)?;
    info!(
        "Rendering {} char(s) with {} at {}x in {}",
        options.text.chars().count(),
        options.font.display(),
        options.scale,
        options.color
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    rt.block_on(run(options))
}
