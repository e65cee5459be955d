mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use terra_ui::{App, Config};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "terra-ui")]
#[command(version, about = "Terra UI kernel - inspect routes, links and navigation", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "terra.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered route
    Routes,

    /// Resolve a hash link or pathname to its page and props
    Resolve {
        /// e.g. '#workspaces/ns/ws' or '/workspaces/ns/ws?tab=data'
        target: String,
    },

    /// Build the hash link for a route
    Link {
        /// Route key, as listed by `routes`
        route: String,

        /// Route parameters as name=value
        params: Vec<String>,
    },

    /// Navigate to a route and show the resulting state
    Navigate {
        /// Route key, as listed by `routes`
        route: String,

        /// Route parameters as name=value
        params: Vec<String>,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    init_tracing(&config);

    let app = App::bootstrap(config)?;

    match cli.command {
        Commands::Routes => commands::routes::execute(&app),
        Commands::Resolve { target } => commands::resolve::execute(&app, &target),
        Commands::Link { route, params } => commands::link::execute(&app, &route, &params)?,
        Commands::Navigate { route, params } => {
            commands::navigate::execute(&app, &route, &params)?
        }
    }

    Ok(())
}
