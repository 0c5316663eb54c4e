//! Argument definitions for the operator CLI.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Provisioning and maintenance for the fieldwork store.
#[derive(Parser, Debug)]
#[command(name = "fieldwork-admin", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// SQLite database to operate on.
    #[arg(long, value_name = "PATH", default_value_t = fieldwork_config::default_database_path())]
    pub(crate) database: Utf8PathBuf,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Registers a technician who can log in from a device.
    AddTechnician {
        login: String,
        display_name: String,
        /// Plaintext credential; only its bcrypt hash is stored. Arguments
        /// show up in process listings, so prefer the environment variable
        /// or `--password-stdin`.
        #[arg(long, env = "FIELDWORK_TECHNICIAN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Reads the credential from the first line of standard input,
        /// ignoring `--password`.
        #[arg(long)]
        password_stdin: bool,
        /// bcrypt work factor.
        #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
        cost: u32,
    },
    /// Registers a client by national identifier.
    AddClient {
        national_id: String,
        name: String,
        address: String,
        phone: String,
    },
    /// Lists technicians.
    ListTechnicians,
    /// Lists clients.
    ListClients,
    /// Lists every ticket across technicians.
    ListTickets,
    /// Physically removes a ticket with its images, positions and audit trail.
    HardDeleteTicket { ticket_id: i32 },
    /// Removes a single stored image.
    DeleteImage { image_id: i32 },
}
