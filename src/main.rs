use clap::{Parser, Subcommand};
use std::path::PathBuf;
use sugarlog_core::Classifier;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod db;
mod render;

use commands::{ConfigCommand, DataCommand, DiaryCommand, EntryCommand, StreakCommand};
use config::Config;
use db::{init_db, EntryRepository, RewardRepository};

#[derive(Parser)]
#[command(name = "sugarlog")]
#[command(version)]
#[command(about = "A blood sugar and insulin diary", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add, edit, delete or show diary entries
    Entry(EntryCommand),

    /// Show the diary grouped by day
    Diary(DiaryCommand),

    /// Show the clean-day streak and announce new rewards
    Streak(StreakCommand),

    /// Export or import the diary
    Data(DataCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "sugarlog=debug,sugarlog_core=debug"
    } else {
        "sugarlog=warn,sugarlog_core=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config)?;
    tracing::debug!("Using database {}", config.database_path.value.display());

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    };

    if let Commands::Config(cmd) = &command {
        return cmd.run(&config);
    }

    let pool = init_db(config.database_path.value.clone()).await?;
    let entries = EntryRepository::new(pool.clone());
    let classifier = Classifier::with_thresholds(config.thresholds.value);

    match command {
        Commands::Entry(cmd) => cmd.run(&entries, &classifier).await?,
        Commands::Diary(cmd) => cmd.run(&entries, &classifier).await?,
        Commands::Streak(cmd) => {
            let rewards = RewardRepository::new(pool);
            cmd.run(&entries, &rewards, &classifier).await?;
        }
        Commands::Data(cmd) => cmd.run(&entries).await?,
        Commands::Config(_) => {}
    }

    Ok(())
}
