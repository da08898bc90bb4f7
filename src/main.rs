mod config;
mod database;
mod entities;
mod error;
mod http_server;
mod logging;
mod seed;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config, database::Database, http_server::app::HttpServerConfig,
    logging::setup_logging,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "BOOKING_DIRECTORY_CONFIG")]
    config: Option<PathBuf>,

    /// Console log level (default: off)
    #[arg(long, default_value = "off", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "BOOKING_DIRECTORY_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the booking directory over HTTP
    Serve {
        /// The port to run the server on (overrides the config file)
        #[arg(short, long, env = "BOOKING_DIRECTORY_PORT")]
        port: Option<u16>,

        /// The address to bind to (overrides the config file)
        #[arg(short, long, env = "BOOKING_DIRECTORY_BIND")]
        bind: Option<String>,
    },
    /// Fill an empty directory with demo venues, artists and shows
    Seed,
    #[command(subcommand)]
    Locations(LocationCommands),
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum LocationCommands {
    /// Delete locations no venue or artist refers to
    Prune,
    /// Delete one location, refusing while it is still referenced
    Delete {
        /// The location id
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

fn run_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::CreateDefault => {
            log::debug!("Creating default config");
            let path = Config::create_default()?;
            println!("{}", path.display());
        }
        ConfigCommands::Path => match Config::config_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("No default config path found"),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Booking directory starting");

    // Config commands never touch the database.
    let command = match args.command {
        Commands::Config(config_commands) => return run_config_command(config_commands),
        command => command,
    };

    log::debug!("Loading configuration");
    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load booking-directory config")?;

    log::debug!("Opening database at: {}", config.database_path().display());
    let database = Database::open(&config.database_path()).await?;

    match command {
        Commands::Serve { port, bind } => {
            let port = port.unwrap_or(config.server.port);
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            log::info!("Starting HTTP server on {}:{}", bind, port);
            http_server::app::start(HttpServerConfig {
                bind,
                port,
                database,
                request_timeout_secs: config.server.request_timeout_secs,
            })
            .await?;
        }
        Commands::Seed => {
            let summary = seed::seed_demo_data(Arc::new(database)).await?;
            println!(
                "Seeded {} venues, {} artists and {} shows",
                summary.venues, summary.artists, summary.shows
            );
        }
        Commands::Locations(LocationCommands::Prune) => {
            let removed = services::locations::prune_unused(&database.conn).await?;
            println!("Removed {removed} unused locations");
        }
        Commands::Locations(LocationCommands::Delete { id }) => {
            services::locations::delete_if_unused(&database.conn, id).await?;
            println!("Removed location {id}");
        }
        Commands::Config(config_commands) => run_config_command(config_commands)?,
    }

    Ok(())
}
