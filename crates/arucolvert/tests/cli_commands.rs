#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::Command;

use arucolvert::frame::{FrameWriter, Pose};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/arucolvert-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be json"))
        .collect()
}

#[test]
fn encode_then_decode_roundtrip() {
    let dir = unique_temp_dir("roundtrip");
    let capture = dir.join("pose.bin");

    let status = Command::new(env!("CARGO_BIN_EXE_arucolvert"))
        .args(["encode", "--x", "1", "--y", "2", "--theta", "0", "--repeat", "2", "-o"])
        .arg(&capture)
        .status()
        .expect("encode should run");
    assert!(status.success());
    assert_eq!(std::fs::metadata(&capture).unwrap().len(), 36);

    let output = Command::new(env!("CARGO_BIN_EXE_arucolvert"))
        .args(["--log-level", "error", "--format", "json", "decode"])
        .arg(&capture)
        .output()
        .expect("decode should run");
    assert!(output.status.success());

    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["kind"], "pose");
    assert_eq!(lines[0]["x"], 1.0);
    assert_eq!(lines[0]["y"], 2.0);
    assert_eq!(lines[1]["seq"], 2);
    assert_eq!(lines[2]["frames_decoded"], 2);
    assert_eq!(lines[2]["frames_discarded"], 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn encode_hex_to_stdout() {
    let output = Command::new(env!("CARGO_BIN_EXE_arucolvert"))
        .args(["encode", "--x", "1", "--y", "2", "--hex"])
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.starts_with("ffff010e"));
    assert_eq!(text.trim_end().len(), 36);
}

#[test]
fn decode_strict_flags_discarded_frames() {
    let dir = unique_temp_dir("strict");
    let capture = dir.join("mixed.bin");

    let mut writer = FrameWriter::new(Vec::new());
    writer.write_message(&Pose::new(3.0, 4.0, 0.5)).unwrap();
    writer.send(0x7E, &[1, 2, 3]).unwrap();
    let mut wire = writer.into_inner();
    // Corrupt a trailing frame's checksum.
    let mut bad = FrameWriter::new(Vec::new());
    bad.write_message(&Pose::new(5.0, 6.0, 0.0)).unwrap();
    let mut bad = bad.into_inner();
    let last = bad.len() - 1;
    bad[last] ^= 0xFF;
    wire.extend_from_slice(&bad);
    std::fs::write(&capture, &wire).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_arucolvert"))
        .args(["--log-level", "error", "--format", "json", "decode", "--strict"])
        .arg(&capture)
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(60));
    let lines = json_lines(&output.stdout);
    let summary = lines.last().expect("summary line");
    assert_eq!(summary["frames_decoded"], 1);
    assert_eq!(summary["unknown_kinds"], 1);
    assert_eq!(summary["checksum_failures"], 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn decode_raw_lists_unknown_ids() {
    let dir = unique_temp_dir("raw");
    let capture = dir.join("raw.bin");

    let mut writer = FrameWriter::new(Vec::new());
    writer.send(0x42, &[0xDE, 0xAD]).unwrap();
    std::fs::write(&capture, writer.into_inner()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_arucolvert"))
        .args(["--log-level", "error", "--format", "json", "decode", "--raw"])
        .arg(&capture)
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    let lines = json_lines(&output.stdout);
    assert_eq!(lines[0]["msg_id"], 0x42);
    assert_eq!(lines[0]["content_hex"], "dead");
    assert!(lines[0]["kind"].is_null());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn listen_stops_after_count() {
    let dir = unique_temp_dir("listen");
    let capture = dir.join("stream.bin");

    let mut writer = FrameWriter::new(Vec::new());
    for i in 0..5 {
        writer.write_message(&Pose::new(i as f32, 0.0, 0.0)).unwrap();
    }
    std::fs::write(&capture, writer.into_inner()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_arucolvert"))
        .args(["--log-level", "error", "--format", "json", "listen"])
        .arg(&capture)
        .args(["--count", "2"])
        .output()
        .expect("listen should run");

    assert!(output.status.success());
    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["x"], 1.0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn listen_missing_device_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_arucolvert"))
        .args(["listen", "/nonexistent/arucolvert-tty"])
        .output()
        .expect("listen should run");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("open failed"));
}

#[test]
fn version_prints_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_arucolvert"))
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("arucolvert {}", env!("CARGO_PKG_VERSION"))
    );
}
