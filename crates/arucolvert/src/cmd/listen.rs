use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arucolvert_frame::{FrameAssembler, Message, Poll};
use arucolvert_transport::{ByteSource, IoSource};
use tracing::{debug, info};

use crate::cmd::{parse_duration, ListenArgs};
use crate::exit::{frame_error, transport_error, CliError, CliResult, SUCCESS, TIMEOUT};
use crate::output::{print_message, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let poll_interval = parse_duration(&args.poll_interval)?;
    let timeout = args.timeout.as_deref().map(parse_duration).transpose()?;

    let source = IoSource::open(&args.path).map_err(|err| transport_error("open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    info!(path = %args.path.display(), "listening for frames");

    let limits = ListenLimits {
        count: args.count.map(|count| count as u64),
        poll_interval,
        timeout,
    };
    receive(source, &running, &limits, |msg, seq| {
        print_message(&msg, seq, format)
    })
}

struct ListenLimits {
    count: Option<u64>,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

/// Poll `source` until `running` clears, the count is reached, or the source ends.
fn receive<S: ByteSource>(
    source: S,
    running: &AtomicBool,
    limits: &ListenLimits,
    mut on_message: impl FnMut(Message, u64),
) -> CliResult<i32> {
    let mut assembler = FrameAssembler::new(source);
    let mut printed = 0u64;
    let mut last_message = Instant::now();

    while running.load(Ordering::SeqCst) {
        match assembler
            .poll()
            .map_err(|err| frame_error("receive failed", err))?
        {
            Poll::Message(msg) => {
                printed = printed.saturating_add(1);
                on_message(msg, printed);
                last_message = Instant::now();

                if limits.count.is_some_and(|count| printed >= count) {
                    return Ok(SUCCESS);
                }
            }
            Poll::Discarded(discard) => {
                debug!(?discard, "frame discarded");
                check_timeout(last_message, limits.timeout)?;
            }
            Poll::Pending => {
                if assembler.get_ref().is_exhausted() {
                    debug!("source exhausted");
                    break;
                }
                check_timeout(last_message, limits.timeout)?;
                std::thread::sleep(limits.poll_interval);
            }
        }
    }

    info!(
        decoded = assembler.stats().frames_decoded,
        discarded = assembler.stats().frames_discarded(),
        "listener stopped"
    );
    Ok(SUCCESS)
}

fn check_timeout(last_message: Instant, timeout: Option<Duration>) -> CliResult<()> {
    match timeout {
        Some(timeout) if last_message.elapsed() >= timeout => Err(CliError::new(
            TIMEOUT,
            format!("no message within {timeout:?}"),
        )),
        _ => Ok(()),
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
