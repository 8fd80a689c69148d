//! fp - forkpoint command-line entry point

use std::process::ExitCode;

use forkpoint::ui::output;

fn main() -> ExitCode {
    match forkpoint::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
