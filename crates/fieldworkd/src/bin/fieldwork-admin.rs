//! Operator CLI for provisioning technicians and clients and pruning tickets.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    fieldworkd::run_operator(
        std::env::args_os(),
        &mut io::stdin().lock(),
        &mut io::stdout(),
        &mut io::stderr(),
    )
}
