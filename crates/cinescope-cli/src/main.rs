use cinescope_api::HttpCatalogClient;
use cinescope_config::{Config, LoggingConfig, PathManager};
use cinescope_core::{AppContext, Route};
use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use commands::browse::{self, Credentials};
use commands::{config, shell};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinescope")]
#[command(about = "CineScope - browse trending movies, get suggestions and curate your watchlist")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive browsing shell (default)
    #[command(long_about = "Start an interactive shell. The session is verified first; protected pages redirect to login until you sign in. Type 'help' inside the shell for the available commands.")]
    Shell {
        /// Page to open first
        #[arg(default_value = "/")]
        path: String,
    },
    /// Create an account
    Register {
        /// Account email (prompted when absent)
        #[arg(long, env = "CINESCOPE_EMAIL")]
        email: Option<String>,
    },
    /// Print the trending movies
    Trending {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Print your watchlist
    Watchlist {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Print your personalized suggestions
    Suggestions {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// Show or initialise the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing file without asking
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathManager::default().config_file());
    let loaded = Config::load_or_default(&config_path);

    let logging_config = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    logging::init_logging(cli.verbose, cli.quiet, &logging_config)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let command = cli.command.unwrap_or(Commands::Shell { path: "/".to_string() });

    // Config commands must work even when the file is broken
    if let Commands::Config { cmd } = command {
        return config::run_config(cmd, &config_path, &output).await;
    }

    let config = loaded
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))
        .wrap_err_with(|| format!("Failed to load config from {}", config_path.display()))?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

    let client = HttpCatalogClient::from_config(&config.api).wrap_err("Failed to create catalog client")?;
    tracing::debug!(base_url = client.base_url(), "Using catalog service");
    let app = AppContext::new(Arc::new(client), &config.search);

    match command {
        Commands::Shell { path } => shell::run_shell(&app, &config, &path, &output).await,
        Commands::Register { email } => browse::run_register(&app, email, &output).await,
        Commands::Trending { credentials } => browse::run_page(&app, Route::Trending, credentials, &config, &output).await,
        Commands::Watchlist { credentials } => browse::run_page(&app, Route::Watchlist, credentials, &config, &output).await,
        Commands::Suggestions { credentials } => {
            browse::run_page(&app, Route::Suggestions, credentials, &config, &output).await
        }
        Commands::Config { .. } => Ok(()),
    }
}
