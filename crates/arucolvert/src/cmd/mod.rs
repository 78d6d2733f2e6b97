use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod listen;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a live link and print decoded poses.
    Listen(ListenArgs),
    /// Decode every frame in a capture file.
    Decode(DecodeArgs),
    /// Write pose frames (raw bytes or hex).
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Device node (already configured, e.g. with stty) or capture file.
    pub path: PathBuf,
    /// Exit after printing N messages.
    #[arg(long)]
    pub count: Option<usize>,
    /// Sleep between polls that found no complete frame (e.g. 1ms).
    #[arg(long, default_value = "1ms")]
    pub poll_interval: String,
    /// Fail if no message arrives for this long (e.g. 5s, 500ms).
    #[arg(long)]
    pub timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file containing raw link bytes.
    pub file: PathBuf,
    /// Print raw frames (any id) instead of decoded messages.
    #[arg(long)]
    pub raw: bool,
    /// Exit with a data error if any frame was discarded.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// X position.
    #[arg(long, allow_hyphen_values = true)]
    pub x: f32,
    /// Y position.
    #[arg(long, allow_hyphen_values = true)]
    pub y: f32,
    /// Heading in radians.
    #[arg(long, allow_hyphen_values = true, default_value = "0")]
    pub theta: f32,
    /// Number of copies of the frame to emit.
    #[arg(long, default_value = "1")]
    pub repeat: usize,
    /// Write to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Emit lowercase hex text instead of raw bytes.
    #[arg(long)]
    pub hex: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
