//! Operator CLI behind the `fieldwork-admin` binary.
//!
//! Every subcommand opens the store (migrating it if needed), performs one
//! operation, and prints tab-separated rows or a one-line confirmation.

mod cli;

use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

use crate::store::{Administration, NewClient, StoreError, StorePool};

use self::cli::{Cli, Command};

const OPERATOR_POOL_SIZE: u32 = 1;

#[derive(Debug, Error)]
enum OperatorError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("failed to read the credential from standard input: {0}")]
    Input(#[source] io::Error),
    #[error("no credential given; use --password-stdin or set FIELDWORK_TECHNICIAN_PASSWORD")]
    MissingCredential,
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i32 },
}

/// Parses `args`, runs the selected subcommand, and reports to the writers.
///
/// `stdin` is only read by `add-technician --password-stdin`.
pub fn run<I, T>(
    args: I,
    stdin: &mut dyn BufRead,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = write!(stderr, "{error}");
            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    match execute(&cli, stdin, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "fieldwork-admin: {error}");
            ExitCode::FAILURE
        }
    }
}

fn read_credential(stdin: &mut dyn BufRead) -> Result<String, OperatorError> {
    let mut line = String::new();
    stdin.read_line(&mut line).map_err(OperatorError::Input)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn resolve_credential(
    given: Option<&str>,
    from_stdin: bool,
    stdin: &mut dyn BufRead,
) -> Result<String, OperatorError> {
    let credential = if from_stdin {
        read_credential(stdin)?
    } else {
        given.unwrap_or_default().to_owned()
    };
    if credential.is_empty() {
        return Err(OperatorError::MissingCredential);
    }
    Ok(credential)
}

fn execute(cli: &Cli, stdin: &mut dyn BufRead, out: &mut dyn Write) -> Result<(), OperatorError> {
    let admin = Administration::new(StorePool::open(&cli.database, OPERATOR_POOL_SIZE)?);
    match &cli.command {
        Command::AddTechnician {
            login,
            display_name,
            password,
            password_stdin,
            cost,
        } => {
            let credential = resolve_credential(password.as_deref(), *password_stdin, stdin)?;
            let id = admin.add_technician_with_cost(login, &credential, display_name, *cost)?;
            writeln!(out, "technician {login} registered with id {id}")?;
        }
        Command::AddClient {
            national_id,
            name,
            address,
            phone,
        } => {
            admin.add_client(&NewClient {
                national_id: national_id.clone(),
                name: name.clone(),
                install_address: address.clone(),
                phone: phone.clone(),
            })?;
            writeln!(out, "client {national_id} registered")?;
        }
        Command::ListTechnicians => {
            for technician in admin.technicians()? {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    technician.id, technician.login, technician.display_name
                )?;
            }
        }
        Command::ListClients => {
            for client in admin.clients()? {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    client.national_id, client.name, client.install_address, client.phone
                )?;
            }
        }
        Command::ListTickets => {
            for ticket in admin.tickets()? {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    ticket.id,
                    ticket.technician_id,
                    ticket.ticket_number,
                    ticket.status,
                    ticket.created_at.format("%Y-%m-%dT%H:%M:%S")
                )?;
            }
        }
        Command::HardDeleteTicket { ticket_id } => {
            if !admin.hard_delete_ticket(*ticket_id)? {
                return Err(OperatorError::NotFound {
                    kind: "ticket",
                    id: *ticket_id,
                });
            }
            writeln!(out, "ticket {ticket_id} deleted")?;
        }
        Command::DeleteImage { image_id } => {
            if !admin.delete_image(*image_id)? {
                return Err(OperatorError::NotFound {
                    kind: "image",
                    id: *image_id,
                });
            }
            writeln!(out, "image {image_id} deleted")?;
        }
    }
    Ok(())
}
