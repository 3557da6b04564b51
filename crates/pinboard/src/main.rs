//! pinboard CLI entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pinboard::cli::{Cli, Commands, OutputFormat};
use pinboard::output::{json, pretty};
use pinboard::storage::SqliteRepository;
use pinboard::{Config, PinStore};
use pinboard_core::pins::PinError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pinboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let policy = config.policy().context("Invalid pin policy configuration")?;
    let db_path = cli.db.clone().unwrap_or(config.db_path);

    let repository = SqliteRepository::new(&db_path)
        .await
        .with_context(|| format!("Failed to open pin database at {db_path}"))?;
    let store = PinStore::new(Arc::new(repository), policy);

    tracing::debug!(%db_path, ?policy, user_id = %cli.user, "Starting pinboard");

    if let Err(err) = run(&cli, &store).await {
        if let Some(hint) = err.hint() {
            eprintln!("{err}. {hint}.");
        } else {
            eprintln!("{err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: &Cli, store: &PinStore) -> Result<(), PinError> {
    let user_id = cli.user;

    match &cli.command {
        Commands::Pin(args) => {
            let pin = store.pin(user_id, args.entity()).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", json::format_json(&pin)),
                OutputFormat::Pretty => println!("Pinned:\n{}", pretty::format_pin(&pin)),
            }
        }
        Commands::Unpin(args) => {
            let pin = store.unpin(user_id, args.entity()).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", json::format_json(&pin)),
                OutputFormat::Pretty => {
                    if !cli.quiet {
                        println!("Unpinned {}", pin.entity());
                    }
                }
            }
        }
        Commands::Touch(args) => {
            let pin = store.touch(user_id, args.entity()).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", json::format_json(&pin)),
                OutputFormat::Pretty => {
                    if !cli.quiet {
                        println!("{}", pretty::format_pin(&pin));
                    }
                }
            }
        }
        Commands::Reorder { ids } => {
            let pins = store.reorder(user_id, ids).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", json::format_json(&pins)),
                OutputFormat::Pretty => println!("{}", pretty::format_pins(&pins)),
            }
        }
        Commands::List => {
            let views = store.list(user_id).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", json::format_json(&views)),
                OutputFormat::Pretty => println!("{}", pretty::format_views(&views)),
            }
        }
        Commands::Sweep => {
            let evicted = store.sweep(user_id).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", json::format_json(&evicted)),
                OutputFormat::Pretty => {
                    if !(cli.quiet && evicted.is_empty()) {
                        println!("{}", pretty::format_evicted(&evicted));
                    }
                }
            }
        }
    }

    Ok(())
}
