//! `worker-db`: inspect and maintain a worker's persisted cluster identity.
//!
//! # Usage
//!
//! ```text
//! worker-db [--config <path>] <command>
//!
//! Commands:
//!   cluster-id          print the cluster id, minting one if none is stored
//!   get <key>           print the stored value ("" if absent)
//!   set <key> <value>   store a value
//!   reset               clear the persistence file
//! ```
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Init logger at the level from config / `WORKER_LOG_LEVEL`
//!   3. Open the store at `[worker].persistence_file`
//!   4. Run the command

use std::path::{Path, PathBuf};
use std::process;

use tracing::info;

use worker_db::config::{self, DEFAULT_CONFIG_PATH};
use worker_db::ids::{create_cluster_id, is_valid_cluster_id};
use worker_db::{AppError, BlockWorkerDb, DefaultBlockWorkerDb, logger};

// ── CLI arg parsing ────────────────────────────────────────────────────────

enum Command {
    ClusterId,
    Get { key: String },
    Set { key: String, value: String },
    Reset,
}

struct Args {
    config: Option<String>,
    command: Option<String>,
    rest: Vec<String>,
}

fn parse_args() -> Args {
    let mut config = None;
    let mut command = None;
    let mut rest = Vec::new();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => config = iter.next(),
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--" => {
                rest.extend(iter);
                break;
            }
            _ if command.is_none() => command = Some(arg),
            _ => rest.push(arg),
        }
    }

    Args { config, command, rest }
}

fn print_help() {
    eprintln!("usage: worker-db [--config <path>] <command>");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  cluster-id          print the cluster id, minting one if none is stored");
    eprintln!("  get <key>           print the stored value");
    eprintln!("  set <key> <value>   store a value");
    eprintln!("  reset               clear the persistence file");
    eprintln!();
    eprintln!("flags:");
    eprintln!("  --config, -c <path>   config file (default: {DEFAULT_CONFIG_PATH})");
    eprintln!("  --help,   -h          print this help");
}

fn build_command(cmd: &str, rest: &[String]) -> Result<Command, String> {
    match cmd {
        "cluster-id" => Ok(Command::ClusterId),
        "get" => match rest {
            [key] if !key.is_empty() => Ok(Command::Get { key: key.clone() }),
            _ => Err("usage: worker-db get <key>".into()),
        },
        "set" => match rest {
            [key, value] if !key.is_empty() => Ok(Command::Set {
                key: key.clone(),
                value: value.clone(),
            }),
            _ => Err("usage: worker-db set <key> <value>".into()),
        },
        "reset" => Ok(Command::Reset),
        other => Err(format!("unknown command: {other}\n  run 'worker-db --help' for usage")),
    }
}

// ── main ───────────────────────────────────────────────────────────────────

fn main() {
    let args = parse_args();
    let Some(cmd) = args.command.as_deref() else {
        print_help();
        process::exit(2);
    };
    let command = match build_command(cmd, &args.rest) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            process::exit(2);
        }
    };

    let config_path = PathBuf::from(args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH));
    if let Err(e) = run(&config_path, command) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(config_path: &Path, command: Command) -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let config = config::load(config_path)?;
    logger::directive(&config.log_level)?;
    logger::init(&config.log_level, false)?;

    info!(
        persistence_file = %config.persistence_file.display(),
        log_level = %config.log_level,
        "config loaded"
    );

    let mut db = DefaultBlockWorkerDb::from_config(&config);

    match command {
        Command::ClusterId => {
            let mut cluster_id = db.get_cluster_id();
            if !is_valid_cluster_id(&cluster_id) {
                cluster_id = create_cluster_id();
                db.set_cluster_id(&cluster_id)?;
                info!(%cluster_id, "minted new cluster id");
            }
            println!("{cluster_id}");
        }
        Command::Get { key } => println!("{}", db.get(&key)),
        Command::Set { key, value } => {
            db.set(&key, &value)?;
            info!(%key, "value stored");
        }
        Command::Reset => {
            let existed = db.path().exists();
            db.reset_state()?;
            println!("{}", reset_message(db.path(), existed));
        }
    }

    Ok(())
}

fn reset_message(path: &Path, existed: bool) -> String {
    if existed {
        format!("✓ cleared {}", path.display())
    } else {
        format!("nothing to clear: {} does not exist", path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reset_reports_nothing_to_clear_for_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cluster_id");
        let mut db = DefaultBlockWorkerDb::new(&path);

        let existed = db.path().exists();
        db.reset_state().unwrap();
        let msg = reset_message(db.path(), existed);

        assert!(msg.starts_with("nothing to clear"));
        assert!(!path.exists());
    }

    #[test]
    fn reset_reports_cleared_for_existing_file() {
        let tmp = TempDir::new().unwrap();
        let mut db = DefaultBlockWorkerDb::new(tmp.path().join("cluster_id"));
        db.set_cluster_id("abc").unwrap();

        let existed = db.path().exists();
        db.reset_state().unwrap();
        assert!(reset_message(db.path(), existed).starts_with("✓ cleared"));
    }

    #[test]
    fn build_command_validates_arguments() {
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert!(matches!(build_command("reset", &[]), Ok(Command::Reset)));
        assert!(matches!(build_command("get", &args(&["k"])), Ok(Command::Get { .. })));
        assert!(build_command("get", &[]).is_err());
        assert!(build_command("set", &args(&["k"])).is_err());
        assert!(build_command("frobnicate", &[]).is_err());
    }
}
