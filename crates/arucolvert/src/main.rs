mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "arucolvert", version, about = "Pose frame decoder for serial trackers")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listen_subcommand() {
        let cli = Cli::try_parse_from([
            "arucolvert",
            "listen",
            "/dev/ttyACM0",
            "--count",
            "3",
            "--timeout",
            "2s",
        ])
        .expect("listen args should parse");

        assert!(matches!(cli.command, Command::Listen(_)));
    }

    #[test]
    fn encode_accepts_negative_values() {
        let cli = Cli::try_parse_from([
            "arucolvert",
            "encode",
            "--x",
            "-1.5",
            "--y",
            "2",
            "--theta",
            "-0.25",
        ])
        .expect("encode args should parse");

        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.x, -1.5);
                assert_eq!(args.theta, -0.25);
                assert_eq!(args.repeat, 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn encode_requires_coordinates() {
        let err = Cli::try_parse_from(["arucolvert", "encode", "--x", "1"])
            .expect_err("missing --y should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_decode_with_global_format() {
        let cli = Cli::try_parse_from([
            "arucolvert",
            "decode",
            "capture.bin",
            "--raw",
            "--format",
            "pretty",
        ])
        .expect("decode args should parse");

        assert!(matches!(cli.format, Some(OutputFormat::Pretty)));
        assert!(matches!(cli.command, Command::Decode(ref args) if args.raw));
    }
}
