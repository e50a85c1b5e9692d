use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use taskboard_authz::authz::{AuthorizationPolicy, PolicyEvaluator};
use taskboard_authz::models::Role;
use taskboard_authz::snapshot::Snapshot;
use taskboard_authz::{Action, PolicyConfig};

/// Exit status for a denied check, kept apart from 1 (error).
const DENIED_EXIT_CODE: i32 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about = "taskboard authorization checker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the policy for the user and resource in a snapshot file
    Check {
        #[arg(long)]
        snapshot: PathBuf,
        /// access | modify
        #[arg(long, default_value = "access")]
        action: Action,
    },
    /// Check whether the snapshot's user may take another assignment
    Assign {
        #[arg(long)]
        snapshot: PathBuf,
        /// Number of pending or in-progress tasks the user already holds
        #[arg(long)]
        active: usize,
    },
    /// List the known roles
    Roles,
}

fn main() -> anyhow::Result<()> {
    // Try to load env from CWD first, then fall back to the crate-local `.env`.
    if dotenv().is_err() {
        let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }
    init_tracing();

    let cli = Cli::parse();
    let config = PolicyConfig::from_env()?;

    match cli.command {
        Commands::Check { snapshot, action } => {
            let snapshot = load(&snapshot)?;
            let verdict = AuthorizationPolicy::new().evaluate(&snapshot.user, &snapshot.resource, action);
            println!("{verdict}");
            if !verdict.is_allowed() {
                std::process::exit(DENIED_EXIT_CODE);
            }
        }
        Commands::Assign { snapshot, active } => {
            let snapshot = load(&snapshot)?;
            match config.assignment_rules().check(&snapshot.user, active) {
                Ok(()) => println!("assignable"),
                Err(err) => {
                    println!("not assignable: {err}");
                    std::process::exit(DENIED_EXIT_CODE);
                }
            }
        }
        Commands::Roles => {
            println!("{:<10} {}", "Role", "Name");
            for role in Role::ALL {
                println!("{:<10} {}", role.as_str(), role.display_name());
            }
        }
    }

    Ok(())
}

fn load(path: &std::path::Path) -> anyhow::Result<Snapshot> {
    Snapshot::from_path(path).with_context(|| format!("failed to load snapshot {}", path.display()))
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
