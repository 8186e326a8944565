mod batch;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tonearm_core::{
    load_config, load_config_from_env, validate_config, AudioFormat, Config, ConversionOutcome,
    ConversionRequest, Converter, FfmpegDriver, VersionChecker,
};

use batch::{plan_requests, run_batch, BatchResult};

/// Default config file, read when present
const DEFAULT_CONFIG_PATH: &str = "tonearm.toml";

#[derive(Parser)]
#[command(name = "tonearm")]
#[command(version, about = "Check FFmpeg and transcode downloaded audio", long_about = None)]
struct Cli {
    /// FFmpeg executable (name on PATH or a path)
    #[arg(long, global = true)]
    ffmpeg: Option<PathBuf>,

    /// Do not query the FFmpeg version
    #[arg(long, global = true)]
    skip_version_check: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether FFmpeg is recent enough
    Check {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert one file
    Convert {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
        /// mp3, flac, ogg, opus, m4a or wav
        #[arg(short, long)]
        format: Option<AudioFormat>,
    },

    /// Convert many files into a directory
    Batch {
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        out_dir: PathBuf,
        #[arg(short, long)]
        format: Option<AudioFormat>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = load()?;
    if let Some(ffmpeg) = cli.ffmpeg {
        config.converter.ffmpeg_path = ffmpeg;
    }
    if cli.skip_version_check {
        config.converter.skip_version_check = true;
    }

    validate_config(&config).context("Configuration validation failed")?;
    info!("FFmpeg path: {:?}", config.converter.ffmpeg_path);

    match cli.command {
        Commands::Check { json } => check(&config, json).await,
        Commands::Convert {
            input,
            output,
            format,
        } => convert(&config, input, output, format).await,
        Commands::Batch {
            inputs,
            out_dir,
            format,
        } => convert_batch(&config, &inputs, &out_dir, format).await,
    }
}

/// Loads `TONEARM_CONFIG` if set, else `tonearm.toml` if present, else defaults.
fn load() -> Result<Config> {
    let config_path = std::env::var("TONEARM_CONFIG").ok().map(PathBuf::from);

    match config_path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG_PATH);
            load_config(Path::new(DEFAULT_CONFIG_PATH))
                .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH))
        }
        None => load_config_from_env().context("Failed to load config from environment"),
    }
}

async fn check(config: &Config, json: bool) -> Result<()> {
    let result = VersionChecker::from_config(&config.converter)
        .check_async()
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match result.detected_version {
            Some(version) => println!("ffmpeg {:?} ({})", version, result.evidence),
            None => println!("ffmpeg ({})", result.evidence),
        }
    }

    if let Some(warning) = result.warning() {
        bail!(warning);
    }

    Ok(())
}

async fn convert(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    format: Option<AudioFormat>,
) -> Result<()> {
    let driver = FfmpegDriver::new(config.converter.clone());
    driver.validate().await.context("FFmpeg check failed")?;

    let mut request = ConversionRequest::new(input, output);
    request.format = format;

    match driver.convert(request).await? {
        ConversionOutcome::Succeeded => {
            info!("Conversion finished");
            Ok(())
        }
        ConversionOutcome::Failed(failure) => {
            error!("{}", failure);
            bail!("Conversion failed");
        }
    }
}

async fn convert_batch(
    config: &Config,
    inputs: &[PathBuf],
    out_dir: &Path,
    format: Option<AudioFormat>,
) -> Result<()> {
    let driver = FfmpegDriver::new(config.converter.clone());
    driver.validate().await.context("FFmpeg check failed")?;

    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {:?}", out_dir))?;

    let format = format.or(config.converter.default_format);
    let requests = plan_requests(inputs, out_dir, format, None);
    let timeout = match config.batch.timeout_secs {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    info!(
        files = requests.len(),
        max_parallel = config.batch.max_parallel,
        "Starting batch conversion"
    );
    let summary = run_batch(&driver, requests, config.batch.max_parallel, timeout).await;

    for item in summary.failed() {
        match &item.result {
            BatchResult::Failed(message) => {
                error!("{}: {}", item.source.display(), message)
            }
            BatchResult::Rejected(reason) => {
                warn!("{}: rejected: {}", item.source.display(), reason)
            }
            BatchResult::TimedOut => warn!("{}: timed out", item.source.display()),
            BatchResult::Converted => {}
        }
    }

    info!(
        converted = summary.succeeded(),
        total = summary.items.len(),
        "Batch conversion finished"
    );

    if !summary.all_succeeded() {
        bail!(
            "{} of {} conversions failed",
            summary.items.len() - summary.succeeded(),
            summary.items.len()
        );
    }

    Ok(())
}
