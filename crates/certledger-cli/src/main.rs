//! certledger CLI - create, read and query certificate records in a ledger file.

use certledger_core::{CreateArgs, Operation};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

use commands::{invoke, keys};

#[derive(Parser)]
#[command(name = "certledger")]
#[command(about = "Certificate record ledger operations CLI")]
struct Cli {
    /// Path to the ledger journal file
    #[arg(long, global = true, env = "CERTLEDGER_LEDGER", default_value = "ledger.clj")]
    ledger: PathBuf,
    /// Fsync the ledger after every write
    #[arg(long, global = true)]
    sync: bool,
    /// Emit logs as JSON (filter with RUST_LOG)
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and index a certificate record
    Create {
        /// Certificate ID (primary key)
        certificate_id: String,
        /// Degree (stored lowercase)
        degree: String,
        /// Numeric student ID (decimal)
        numeric_id: String,
        /// Owner (stored lowercase)
        owner: String,
    },
    /// Print a record exactly as stored
    Read {
        /// Certificate ID
        certificate_id: String,
    },
    /// List records owned by OWNER (case-insensitive)
    QueryOwner {
        /// Owner
        owner: String,
        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },
    /// List records with DEGREE using the degree index
    QueryDegree {
        /// Degree
        degree: String,
        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },
    /// Invoke a verb with raw positional arguments
    Invoke {
        /// Verb: create, readByID, queryByOwner or queryByDegree
        verb: String,
        /// Positional arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List ledger keys, decoding index keys
    Keys {
        /// Output as JSON lines
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let result = match cli.command {
        Commands::Create {
            certificate_id,
            degree,
            numeric_id,
            owner,
        } => invoke::run(
            &cli.ledger,
            cli.sync,
            Operation::Create(CreateArgs::new(certificate_id, degree, numeric_id, owner)),
            false,
        ),
        Commands::Read { certificate_id } => invoke::run(
            &cli.ledger,
            cli.sync,
            Operation::ReadById { certificate_id },
            false,
        ),
        Commands::QueryOwner { owner, pretty } => invoke::run(
            &cli.ledger,
            cli.sync,
            Operation::QueryByOwner { owner },
            pretty,
        ),
        Commands::QueryDegree { degree, pretty } => invoke::run(
            &cli.ledger,
            cli.sync,
            Operation::QueryByDegree { degree },
            pretty,
        ),
        Commands::Invoke { verb, args } => invoke::run_raw(&cli.ledger, cli.sync, &verb, &args),
        Commands::Keys { json } => keys::run(&cli.ledger, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
