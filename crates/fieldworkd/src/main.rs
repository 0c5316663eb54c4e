use std::process::ExitCode;

fn main() -> ExitCode {
    match fieldworkd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("fieldworkd: {error}");
            ExitCode::FAILURE
        }
    }
}
