//! `heart-qr`: render a URL as a heart-styled QR code PNG.
//!
//! Settings come from `HEART_QR_*` environment variables (a `.env` file is
//! honored) and are overridden by command-line flags.

mod config;
mod export;
mod input;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use heart_qr::RenderResult;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// URL to encode; `https://` is added when no scheme is given
    url: String,
    #[arg(long, short)]
    /// Target output size in pixels
    size: Option<u32>,
    #[arg(long)]
    /// Foreground color (#RRGGBB)
    color: Option<String>,
    #[arg(long)]
    /// Color of modules inside the heart (#RRGGBB)
    heart_color: Option<String>,
    #[arg(long, short)]
    /// Style preset: plain, patterned, dot-outline, rounded-dot, heart-clip, heart-strong
    preset: Option<String>,
    #[arg(long)]
    /// Background pattern: none, dots, stripes, grid, noise
    pattern: Option<String>,
    #[arg(long)]
    /// Background pattern color (#RRGGBB or #RRGGBBAA)
    pattern_color: Option<String>,
    #[arg(long)]
    /// Module shape: filled-square, rounded-dot, heart-clip
    mask: Option<String>,
    #[arg(long)]
    /// Heart handling: mask, dual-color, off
    heart_mode: Option<String>,
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    /// Keep the timing lines out of the heart mask (`--timing-protected=false` turns it off)
    timing_protected: Option<bool>,
    #[arg(long, short)]
    /// Directory to write the PNG into
    out_directory: Option<String>,
    #[arg(long)]
    /// Print the render summary as JSON
    json: bool,
}

impl Args {
    fn overrides(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value {
                out.push((key, v));
            }
        };
        push("SIZE", self.size.map(|s| s.to_string()));
        push("COLOR", self.color.clone());
        push("HEART_COLOR", self.heart_color.clone());
        push("PRESET", self.preset.clone());
        push("PATTERN", self.pattern.clone());
        push("PATTERN_COLOR", self.pattern_color.clone());
        push("MASK", self.mask.clone());
        push("HEART_MODE", self.heart_mode.clone());
        push("TIMING_PROTECTED", self.timing_protected.map(|b| b.to_string()));
        push("OUTPUT_DIR", self.out_directory.clone());
        out
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    url: &'a str,
    path: String,
    #[serde(flatten)]
    result: RenderResult,
    level: &'static str,
    dropped_ratio: f64,
}

/// Load .env from the working directory or its parents.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::debug!("No .env file found, using system environment variables");
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    load_dotenv();

    let mut config = AppConfig::load()?;
    for (key, value) in args.overrides() {
        config
            .set(key, &value)
            .map_err(|e| anyhow::anyhow!("invalid option: {e}"))?;
    }

    let url = input::validate_url(&args.url).map_err(|e| anyhow::anyhow!(e))?;
    let style = config.style()?;
    tracing::debug!(?style, size = config.size, "Resolved configuration");

    let rendered = heart_qr::render_text(&url, config.size, &style)?;
    let file_name = input::export_file_name(&url);
    let path = export::save_png(&rendered.image, &config.output_dir, &file_name)?;

    let result = rendered.summary;
    if args.json {
        let summary = Summary {
            url: &url,
            path: path.display().to_string(),
            result,
            level: "H",
            dropped_ratio: rendered.erasure.ratio,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "generated: {}px / modules={} / level=H / bg=white -> {}",
            result.final_size,
            result.module_count,
            path.display()
        );
    }
    Ok(())
}
