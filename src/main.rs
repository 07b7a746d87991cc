//! pgs - page store command line

use std::process::ExitCode;

fn main() -> ExitCode {
    match pagestore::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
