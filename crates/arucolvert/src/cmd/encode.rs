use std::fs::File;
use std::io::Write;

use arucolvert_frame::{FrameWriter, Pose};

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::to_hex;

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    if args.repeat == 0 {
        return Err(CliError::new(USAGE, "--repeat must be greater than zero"));
    }

    let pose = Pose::new(args.x, args.y, args.theta);
    let wire = encode_poses(&pose, args.repeat)?;

    let bytes = if args.hex {
        let mut text = to_hex(&wire);
        text.push('\n');
        text.into_bytes()
    } else {
        wire
    };

    match &args.output {
        Some(path) => {
            let mut file = File::create(path).map_err(|err| {
                io_error(&format!("failed creating {}", path.display()), err)
            })?;
            file.write_all(&bytes)
                .map_err(|err| io_error("write failed", err))?;
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(&bytes)
                .and_then(|()| out.flush())
                .map_err(|err| io_error("write failed", err))?;
        }
    }

    Ok(SUCCESS)
}

fn encode_poses(pose: &Pose, repeat: usize) -> CliResult<Vec<u8>> {
    let mut writer = FrameWriter::new(Vec::new());
    for _ in 0..repeat {
        writer
            .write_message(pose)
            .map_err(|err| frame_error("encode failed", err))?;
    }
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reference_frame() {
        let wire = encode_poses(&Pose::new(1.0, 2.0, 0.0), 1).unwrap();
        assert_eq!(wire.len(), 18);
        assert_eq!(&wire[..4], &[0xFF, 0xFF, 0x01, 0x0E]);
    }

    #[test]
    fn repeat_concatenates_frames() {
        let wire = encode_poses(&Pose::new(0.0, 0.0, 0.0), 3).unwrap();
        assert_eq!(wire.len(), 54);
        assert_eq!(&wire[18..20], &[0xFF, 0xFF]);
    }
}
