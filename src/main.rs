//! Reel - Local-first screenplay composition

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = screenplay_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
