use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use pixelcast_core::{
    Device, DeviceConfig, FlushError, Framing, PixelFrame, Rgb, build_device, encode_frame,
};

#[derive(Parser, Debug)]
#[command(name = "pixelcast")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (", env!("PIXELCAST_BUILD_COMMIT"), " ", env!("PIXELCAST_BUILD_DATE"), ")"
))]
#[command(
    about = "Stream per-frame pixel buffers to addressable LED hardware over UDP.",
    long_about = None,
    after_help = "Examples:\n  pixelcast device encode strip.json --fill ff8800 --stdout\n  pixelcast device stream strip.json --fill ff8800 --fps 30 --frames 300"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on configured LED output devices.
    Device {
        #[command(subcommand)]
        command: DeviceCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DeviceCommands {
    /// Encode one frame against a device config and emit the payload as hex.
    #[command(
        after_help = "Examples:\n  pixelcast device encode strip.json --fill ff8800 --stdout\n  pixelcast device encode strip.json --pixels 0a141e,28323c,46505a -o payload.hex"
    )]
    Encode {
        /// Path to a JSON device config
        config: PathBuf,

        /// Fill every pixel with one RRGGBB color
        #[arg(long, value_name = "RRGGBB", conflicts_with = "pixels")]
        fill: Option<String>,

        /// Explicit pixel colors as comma-separated RRGGBB triples
        #[arg(long, value_name = "RRGGBB,RRGGBB,...")]
        pixels: Option<String>,

        /// Output payload path
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        out: Option<PathBuf>,

        /// Write the hex payload to stdout
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
    /// Build the device and flush generated frames at a fixed tick rate.
    Stream {
        /// Path to a JSON device config
        config: PathBuf,

        /// Fill every pixel with one RRGGBB color
        #[arg(long, value_name = "RRGGBB", conflicts_with = "pixels")]
        fill: Option<String>,

        /// Explicit pixel colors as comma-separated RRGGBB triples
        #[arg(long, value_name = "RRGGBB,RRGGBB,...")]
        pixels: Option<String>,

        /// Frames per second
        #[arg(long, default_value_t = 30)]
        fps: u32,

        /// Number of frames to send
        #[arg(long, default_value_t = 1)]
        frames: u64,

        /// Suppress the final summary
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Device { command } => match command {
            DeviceCommands::Encode {
                config,
                fill,
                pixels,
                out,
                stdout,
            } => cmd_device_encode(config, fill, pixels, out, stdout),
            DeviceCommands::Stream {
                config,
                fill,
                pixels,
                fps,
                frames,
                quiet,
            } => cmd_device_stream(config, fill, pixels, fps, frames, quiet),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

fn cmd_device_encode(
    config_path: PathBuf,
    fill: Option<String>,
    pixels: Option<String>,
    out: Option<PathBuf>,
    stdout: bool,
) -> Result<(), CliError> {
    let (_, config) = load_device_config(&config_path)?;
    let frame = build_frame(&config, fill.as_deref(), pixels.as_deref())?;
    require_frame_size(&config, &frame)?;

    let framing = Framing {
        prefix: config.data_prefix.clone(),
        postfix: config.data_postfix.clone(),
        include_indexes: config.include_indexes,
    };
    let payload = hex::encode(encode_frame(&framing, &frame));

    if stdout {
        println!("{}", payload);
        return Ok(());
    }

    let out = out.expect("output path required when not using stdout");
    fs::write(&out, payload)
        .with_context(|| format!("Failed to write payload: {}", out.display()))?;
    Ok(())
}

fn cmd_device_stream(
    config_path: PathBuf,
    fill: Option<String>,
    pixels: Option<String>,
    fps: u32,
    frames: u64,
    quiet: bool,
) -> Result<(), CliError> {
    if fps == 0 {
        return Err(CliError::new(
            "fps must be at least 1",
            Some("pass --fps with a positive tick rate".to_string()),
        ));
    }

    let (value, config) = load_device_config(&config_path)?;
    let frame = build_frame(&config, fill.as_deref(), pixels.as_deref())?;
    require_frame_size(&config, &frame)?;

    let mut device = build_device(&value).map_err(|err| CliError::new(err.to_string(), None))?;

    let tick = Duration::from_secs(1) / fps;
    let mut sent = 0u64;
    let mut dropped = 0u64;

    for _ in 0..frames {
        let started = Instant::now();
        match device.flush(&frame) {
            Ok(()) => sent += 1,
            Err(err @ FlushError::Transport(_)) => {
                // Per-frame failures are dropped, never retried; the next
                // frame supersedes this one.
                dropped += 1;
                warn!("frame dropped: {err}");
            }
            Err(err) => {
                device.close();
                return Err(CliError::new(err.to_string(), None));
            }
        }
        if let Some(rest) = tick.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    device.close();
    if !quiet {
        eprintln!(
            "OK: sent {} frames to {}:{} ({} dropped)",
            sent, config.ip_address, config.port, dropped
        );
    }
    Ok(())
}

fn load_device_config(path: &Path) -> Result<(serde_json::Value, DeviceConfig), CliError> {
    if !path.exists() {
        return Err(CliError::new(
            format!("config file not found: {}", path.display()),
            Some("pass a JSON device config".to_string()),
        ));
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config JSON: {}", path.display()))?;
    let config = DeviceConfig::from_value(&value).map_err(|err| {
        CliError::new(
            format!("invalid device config: {err}"),
            Some("fix the named field in the config file".to_string()),
        )
    })?;
    Ok((value, config))
}

fn build_frame(
    config: &DeviceConfig,
    fill: Option<&str>,
    pixels: Option<&str>,
) -> Result<PixelFrame, CliError> {
    match (fill, pixels) {
        (Some(color), None) => {
            let pixel = parse_color(color)?;
            Ok(PixelFrame::new(vec![pixel; config.pixel_count]))
        }
        (None, Some(list)) => {
            let pixels = list
                .split(',')
                .map(|part| parse_color(part.trim()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(PixelFrame::new(pixels))
        }
        _ => Err(CliError::new(
            "missing frame data",
            Some("pass --fill RRGGBB or --pixels RRGGBB,RRGGBB,...".to_string()),
        )),
    }
}

fn parse_color(text: &str) -> Result<Rgb, CliError> {
    let bytes = hex::decode(text).map_err(|err| {
        CliError::new(
            format!("invalid color '{}': {}", text, err),
            Some("colors are RRGGBB hex triples".to_string()),
        )
    })?;
    if bytes.len() != 3 {
        return Err(CliError::new(
            format!("invalid color '{}': expected 6 hex digits", text),
            Some("colors are RRGGBB hex triples".to_string()),
        ));
    }
    Ok(Rgb::new(bytes[0], bytes[1], bytes[2]))
}

fn require_frame_size(config: &DeviceConfig, frame: &PixelFrame) -> Result<(), CliError> {
    if frame.len() != config.pixel_count {
        return Err(CliError::new(
            format!(
                "frame size mismatch: expected {} pixels, got {}",
                config.pixel_count,
                frame.len()
            ),
            Some("--pixels must list exactly pixel_count colors".to_string()),
        ));
    }
    Ok(())
}
