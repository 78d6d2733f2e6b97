use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use arucolvert_frame::{AssemblerStats, Frame, Message, MessageKind};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct MessageOutput {
    seq: u64,
    kind: &'static str,
    msg_id: u8,
    x: f32,
    y: f32,
    theta: f32,
    timestamp: String,
}

#[derive(Serialize)]
struct FrameOutput {
    seq: u64,
    msg_id: u8,
    kind: Option<&'static str>,
    content_size: usize,
    content_hex: String,
}

#[derive(Serialize)]
struct SummaryOutput {
    frames_decoded: u64,
    frames_discarded: u64,
    checksum_failures: u64,
    malformed_lengths: u64,
    unknown_kinds: u64,
    invalid_contents: u64,
    resync_bytes: u64,
}

pub fn print_message(message: &Message, seq: u64, format: OutputFormat) {
    let Message::Pose(pose) = message;
    let kind = message.kind();
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                seq,
                kind: kind.name(),
                msg_id: kind.id(),
                x: pose.x,
                y: pose.y,
                theta: pose.theta,
                timestamp: now_unix_millis(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SEQ", "KIND", "X", "Y", "THETA"])
                .add_row(vec![
                    seq.to_string(),
                    kind.name().to_string(),
                    pose.x.to_string(),
                    pose.y.to_string(),
                    pose.theta.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "#{seq} {} x={} y={} theta={}",
                kind, pose.x, pose.y, pose.theta
            );
        }
    }
}

pub fn print_frame(frame: &Frame, seq: u64, format: OutputFormat) {
    let kind = MessageKind::from_id(frame.msg_id).map(MessageKind::name);
    let content_hex = to_hex(frame.content.as_ref());
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                seq,
                msg_id: frame.msg_id,
                kind,
                content_size: frame.content.len(),
                content_hex,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SEQ", "ID", "KIND", "SIZE", "CONTENT"])
                .add_row(vec![
                    seq.to_string(),
                    frame.msg_id.to_string(),
                    kind.unwrap_or("unknown").to_string(),
                    frame.content.len().to_string(),
                    content_hex,
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "#{seq} id={} ({}) size={} content={}",
                frame.msg_id,
                kind.unwrap_or("unknown"),
                frame.content.len(),
                content_hex
            );
        }
    }
}

pub fn print_summary(stats: &AssemblerStats, format: OutputFormat) {
    let out = SummaryOutput {
        frames_decoded: stats.frames_decoded,
        frames_discarded: stats.frames_discarded(),
        checksum_failures: stats.checksum_failures,
        malformed_lengths: stats.malformed_lengths,
        unknown_kinds: stats.unknown_kinds,
        invalid_contents: stats.invalid_contents,
        resync_bytes: stats.resync_bytes,
    };
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COUNTER", "VALUE"]);
            for (name, value) in [
                ("frames_decoded", out.frames_decoded),
                ("frames_discarded", out.frames_discarded),
                ("checksum_failures", out.checksum_failures),
                ("malformed_lengths", out.malformed_lengths),
                ("unknown_kinds", out.unknown_kinds),
                ("invalid_contents", out.invalid_contents),
                ("resync_bytes", out.resync_bytes),
            ] {
                table.add_row(vec![name.to_string(), value.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "decoded={} discarded={} (checksum={} malformed={} unknown={} invalid={}) resync_bytes={}",
                out.frames_decoded,
                out.frames_discarded,
                out.checksum_failures,
                out.malformed_lengths,
                out.unknown_kinds,
                out.invalid_contents,
                out.resync_bytes
            );
        }
    }
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn now_unix_millis() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
