//! Command-line driver for the user store.
//!
//! # Responsibility
//! - Run one store operation per invocation for manual smoke checks.
//! - Print records as JSON on stdout and errors on stderr.
//!
//! # Invariants
//! - Exit codes depend only on `StoreErrorKind`.

use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;
use userstore_core::{
    default_log_level, init_logging, LoggingConfig, StoreConfig, StoreError, StoreErrorKind,
    User, UserId, UserStore,
};

#[derive(Debug, Parser)]
#[command(name = "userstore", version, about = "Manage user records in a SQLite database")]
struct Cli {
    /// SQLite database file; an in-memory database is used when omitted.
    #[arg(long, env = "USERSTORE_DB", global = true)]
    db: Option<PathBuf>,

    #[arg(long, env = "USERSTORE_LOG_LEVEL", global = true, default_value = default_log_level())]
    log_level: String,

    /// Absolute directory for rolling log files; logs go to stderr when omitted.
    #[arg(long, env = "USERSTORE_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a user and print it with its assigned id.
    Create { name: String },
    /// Print every user.
    List,
    Get { id: UserId },
    /// Rename an existing user.
    Update { id: UserId, name: String },
    Delete { id: UserId },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: cli.log_level.clone(),
        log_dir: cli.log_dir.clone(),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("userstore: {err}");
        return ExitCode::from(1);
    }

    let config = match &cli.db {
        Some(path) => StoreConfig::file(path),
        None => StoreConfig::in_memory(),
    };

    match run(&config, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(
                "event=cli_command module=cli status=error error_code={} error={}",
                err.kind().as_str(),
                err
            );
            eprintln!("userstore: {err}");
            ExitCode::from(exit_code(err.kind()))
        }
    }
}

fn run(config: &StoreConfig, command: Command) -> Result<(), StoreError> {
    let store = UserStore::open(config)?;

    match command {
        Command::Create { name } => print_json(&store.create_user(&User::new(name))?),
        Command::List => print_json(&store.list_users()?),
        Command::Get { id } => print_json(&store.get_user(id)?),
        Command::Update { id, name } => print_json(&store.update_user(id, &User::with_id(id, name))?),
        Command::Delete { id } => {
            store.delete_user(id)?;
            println!("deleted {id}");
        }
    }

    store.close()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("userstore: failed to encode output: {err}"),
    }
}

fn exit_code(kind: StoreErrorKind) -> u8 {
    match kind {
        StoreErrorKind::InvalidArgument => 2,
        StoreErrorKind::NotFound | StoreErrorKind::UpdateFailed | StoreErrorKind::DeleteFailed => 3,
        StoreErrorKind::Duplicate => 4,
        StoreErrorKind::Connection | StoreErrorKind::Schema | StoreErrorKind::Storage => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::{exit_code, Cli, Command};
    use clap::Parser;
    use userstore_core::StoreErrorKind;

    #[test]
    fn parses_update_with_global_db_flag() {
        let cli = Cli::try_parse_from(["userstore", "update", "3", "carol", "--db", "/tmp/u.db"])
            .expect("arguments should parse");
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/u.db")));
        assert!(matches!(cli.command, Command::Update { id: 3, ref name } if name == "carol"));
    }

    #[test]
    fn rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["userstore", "get", "abc"]).is_err());
    }

    #[test]
    fn exit_codes_group_error_kinds() {
        assert_eq!(exit_code(StoreErrorKind::InvalidArgument), 2);
        assert_eq!(exit_code(StoreErrorKind::DeleteFailed), 3);
        assert_eq!(exit_code(StoreErrorKind::Duplicate), 4);
        assert_eq!(exit_code(StoreErrorKind::Storage), 1);
    }
}
