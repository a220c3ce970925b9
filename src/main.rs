use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use genmark::config::{AppConfig, LogFormat};
use genmark::generator::{GenerateOptions, ImageGenerator, NanoBananaProvider};
use genmark::watermark::{self, Format};
use std::path::PathBuf;
use std::process::ExitCode;

/// Genmark - generate an image from a prompt (or read one from disk) and
/// stamp a text or image watermark on it
#[derive(Parser, Debug)]
#[command(name = "genmark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Prompt sent to the image generator
    #[arg(short, long, conflicts_with = "input", required_unless_present = "input")]
    prompt: Option<String>,

    /// Local PNG or JPEG to watermark instead of generating one
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output path (default: output.<ext> matching the image format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Text watermark
    #[arg(long)]
    text: Option<String>,

    /// Image watermark file (PNG or JPEG)
    #[arg(long)]
    image: Option<PathBuf>,

    /// Anchor: top-left, top-center, top-right, left-center, center,
    /// right-center, bottom-left, bottom-center, bottom-right
    #[arg(long)]
    position: Option<String>,

    /// Distance in pixels from the anchored edges
    #[arg(long, allow_negative_numbers = true)]
    margin: Option<i64>,

    /// Watermark opacity, 0.0 to 1.0
    #[arg(long, allow_negative_numbers = true)]
    opacity: Option<f64>,

    /// Text height in pixels
    #[arg(long, allow_negative_numbers = true)]
    text_size: Option<i64>,

    /// Text color as #RRGGBB
    #[arg(long)]
    text_color: Option<String>,

    /// Image watermark width as a fraction of the base width
    #[arg(long, allow_negative_numbers = true)]
    scale: Option<f64>,

    /// Generator API key
    #[arg(long, env = "NANOBANANA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Generator endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Requested image width
    #[arg(long)]
    width: Option<u32>,

    /// Requested image height
    #[arg(long)]
    height: Option<u32>,

    /// Requested aspect ratio, e.g. 16:9
    #[arg(long)]
    aspect_ratio: Option<String>,

    /// Things the generator should avoid
    #[arg(long)]
    negative_prompt: Option<String>,

    /// Generator model name
    #[arg(long)]
    model: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Layer command-line flags over the file configuration.
    fn apply_overrides(&self, config: &mut AppConfig) {
        // A watermark source on the command line replaces the configured one
        if self.text.is_some() || self.image.is_some() {
            config.watermark.text = self.text.clone();
            config.watermark.image = self.image.clone();
        }

        let wm = &mut config.watermark;
        if let Some(position) = &self.position {
            wm.position = position.clone();
        }
        if let Some(margin) = self.margin {
            wm.margin = margin;
        }
        if let Some(opacity) = self.opacity {
            wm.opacity = opacity;
        }
        if let Some(text_size) = self.text_size {
            wm.text_size = text_size;
        }
        if let Some(text_color) = &self.text_color {
            wm.text_color = text_color.clone();
        }
        if let Some(scale) = self.scale {
            wm.scale = scale;
        }

        let provider = &mut config.provider;
        if let Some(api_key) = &self.api_key {
            provider.api_key = Some(api_key.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            provider.endpoint = endpoint.clone();
        }
        if let Some(width) = self.width {
            provider.width = width;
        }
        if let Some(height) = self.height {
            provider.height = height;
        }
        if let Some(model) = &self.model {
            provider.model = model.clone();
        }

        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }

    fn generate_options(&self, config: &AppConfig) -> GenerateOptions {
        let mut options = GenerateOptions::new()
            .with_size(config.provider.width, config.provider.height)
            .with_model(config.provider.model.clone());
        if let Some(ratio) = &self.aspect_ratio {
            options = options.with_aspect_ratio(ratio.clone());
        }
        if let Some(negative) = &self.negative_prompt {
            options = options.with_negative_prompt(negative.clone());
        }
        options
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => AppConfig::default(),
    };
    args.apply_overrides(&mut config);

    genmark::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow!(e).context("failed to initialize logging"))?;

    let (bytes, format) = match (&args.prompt, &args.input) {
        (Some(prompt), _) => generate(prompt, &args, &config).await?,
        (None, Some(path)) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read input image {}", path.display()))?;
            let format = watermark::sniff_format(&bytes)
                .with_context(|| format!("unsupported input image {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = bytes.len(), "Input image loaded");
            (bytes, format)
        }
        (None, None) => bail!("either --prompt or --input is required"),
    };

    let wm = &config.watermark;
    let output = if wm.is_text_watermark() || wm.is_image_watermark() {
        let stamped = watermark::apply(&bytes, wm).context("failed to apply watermark")?;
        tracing::info!(
            position = %wm.position,
            opacity = wm.opacity,
            text = wm.is_text_watermark(),
            "Watermark applied"
        );
        stamped
    } else {
        tracing::info!("No watermark configured, writing image unchanged");
        bytes
    };

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("output.{}", format.extension())));
    std::fs::write(&path, &output)
        .with_context(|| format!("failed to write output image {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        bytes = output.len(),
        format = %format,
        "Image written"
    );

    Ok(())
}

async fn generate(prompt: &str, args: &Args, config: &AppConfig) -> Result<(Vec<u8>, Format)> {
    let Some(api_key) = config.provider.api_key.as_deref() else {
        bail!("an API key is required: pass --api-key, set NANOBANANA_API_KEY, or set provider.api_key");
    };

    let provider = NanoBananaProvider::new(api_key)?
        .with_endpoint(config.provider.endpoint.clone())
        .with_timeout(config.provider.timeout())?;

    tracing::info!(
        provider = provider.name(),
        endpoint = provider.endpoint(),
        "Generating image"
    );

    let generated = provider
        .generate(prompt, &args.generate_options(config))
        .await
        .context("image generation failed")?;
    let format = generated
        .format()
        .context("generator returned an unsupported image")?;

    Ok((generated.data, format))
}
