use arucolvert_frame::MessageKind;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("arucolvert {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: arucolvert");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("ARUCOLVERT_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    let kinds: Vec<String> = MessageKind::ALL
        .iter()
        .map(|kind| format!("{}={}", kind.id(), kind))
        .collect();
    println!("message_kinds: {}", kinds.join(", "));

    Ok(SUCCESS)
}
