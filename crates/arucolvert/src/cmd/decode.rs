use arucolvert_frame::{AssemblerStats, Frame, FrameAssembler, Message, MessageSet, Poll, State};
use arucolvert_transport::{ByteSource, IoSource};
use tracing::debug;

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, transport_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_frame, print_message, print_summary, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let source = IoSource::open(&args.file).map_err(|err| transport_error("open failed", err))?;

    let stats = if args.raw {
        drain::<_, Frame>(source, |frame, seq| print_frame(&frame, seq, format))?
    } else {
        drain::<_, Message>(source, |msg, seq| print_message(&msg, seq, format))?
    };

    print_summary(&stats, format);

    if args.strict && stats.frames_discarded() > 0 {
        return Err(CliError::new(
            DATA_INVALID,
            format!("{} frame(s) discarded", stats.frames_discarded()),
        ));
    }
    Ok(SUCCESS)
}

/// Poll until the capture is exhausted, handing every message to `on_message`.
fn drain<S, M>(source: S, mut on_message: impl FnMut(M, u64)) -> CliResult<AssemblerStats>
where
    S: ByteSource,
    M: MessageSet,
{
    let mut assembler: FrameAssembler<S, M> = FrameAssembler::with_messages(source);
    let mut seq = 0u64;

    loop {
        match assembler
            .poll()
            .map_err(|err| frame_error("decode failed", err))?
        {
            Poll::Message(msg) => {
                seq += 1;
                on_message(msg, seq);
            }
            Poll::Discarded(discard) => debug!(?discard, "frame discarded"),
            Poll::Pending if assembler.get_ref().is_exhausted() => break,
            Poll::Pending => {}
        }
    }

    if assembler.state() != State::Idle {
        debug!(state = ?assembler.state(), "capture ends inside a frame");
    }
    Ok(*assembler.stats())
}
