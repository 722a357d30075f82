use anyhow::Result;
use clap::{Parser, Subcommand};
use course_snapshot::config::CatalogConfig;
use course_snapshot::service::{FixtureCatalog, SnapshotProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// Assemble the course catalog into one client-ready snapshot
#[derive(Parser)]
#[command(name = "course-snapshot")]
#[command(about = "Assemble and serve course catalog snapshots", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the snapshot over HTTP
    Serve {
        /// Address to listen on (overrides configuration)
        #[arg(long)]
        bind: Option<String>,

        /// Serve rows from a JSON fixture instead of the database
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Assemble a single snapshot and write it as JSON
    Snapshot {
        /// Read rows from a JSON fixture instead of the database
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON document
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,tower=debug", // -vvv shows everything including dependencies
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 3)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("course-snapshot started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = run(cli).await;

    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = CatalogConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind, fixture } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let provider = build_provider(&config, fixture).await?;
            course_snapshot::server::serve(&config.server.bind, provider).await
        }
        Commands::Snapshot {
            fixture,
            output,
            pretty,
        } => {
            let provider = build_provider(&config, fixture).await?;
            let snapshot = provider.produce_snapshot().await?;

            let json = if pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            };

            match output {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    info!("Wrote snapshot to {}", path.display());
                }
                None => println!("{json}"),
            }
            Ok(())
        }
    }
}

async fn build_provider(
    config: &CatalogConfig,
    fixture: Option<PathBuf>,
) -> Result<Arc<dyn SnapshotProvider>> {
    match fixture {
        Some(path) => Ok(Arc::new(FixtureCatalog::load(&path).await?)),
        None => connect_store(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn connect_store(config: &CatalogConfig) -> Result<Arc<dyn SnapshotProvider>> {
    use course_snapshot::service::PgCatalog;

    let url = config.database_url()?;
    let pool = course_snapshot::source::connect(url, &config.database).await?;
    info!("Serving semester {}", config.semester);
    Ok(Arc::new(PgCatalog::new(pool, config.semester.clone())))
}

#[cfg(not(feature = "postgres"))]
async fn connect_store(_config: &CatalogConfig) -> Result<Arc<dyn SnapshotProvider>> {
    anyhow::bail!("PostgreSQL source not enabled. Enable with --features postgres or pass --fixture")
}
