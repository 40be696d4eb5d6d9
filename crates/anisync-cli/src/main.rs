use anisync_config::PathManager;
use clap::{ArgAction, Parser, Subcommand};
use commands::{config, daemon, sync};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "anisync")]
#[command(about = "anisync - Mirror your Hikka watch history into AniList")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sync cycle and exit
    #[command(long_about = "Fetch the latest Hikka watch history, compare every title with its AniList list entry and push the differences.")]
    Sync {
        /// Compute and report changes without writing to AniList
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Run as a daemon with the internal scheduler
    #[command(long_about = "Run a sync cycle at startup and then on the configured cron schedule (hourly by default) until interrupted.")]
    Daemon {
        /// Six-field cron expression (e.g. '0 0 * * * *' for every hour)
        #[arg(long, value_name = "SCHEDULE")]
        schedule: Option<String>,

        /// Skip the sync cycle at startup
        #[arg(long, action = ArgAction::SetTrue)]
        no_startup_sync: bool,

        /// Write logs to the daily-rotated daemon log file instead of stderr
        #[arg(long, action = ArgAction::SetTrue)]
        log_to_file: bool,
    },
    /// View or change configuration and credentials
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (token masked)
    Show {
        /// Show the token in full
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Configure the Hikka account to read from
    Hikka {
        /// Hikka username (prompted if omitted)
        #[arg(long)]
        username: Option<String>,

        /// Hikka API base URL
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Store the AniList access token
    Anilist {
        /// Implicit-grant token (prompted if omitted)
        #[arg(long)]
        token: Option<String>,
    },

    /// Print the config, credentials and log file locations
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    match &cli.command {
        Commands::Daemon { log_to_file: true, .. } => {
            let log_file = PathManager::default().daemon_log_file();
            logging::init_file_logging(cli.verbose, cli.quiet, &log_file)
        }
        _ => logging::init_logging(cli.verbose, cli.quiet),
    }
    .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match cli.command {
        Commands::Sync { dry_run } => sync::run_sync(dry_run, &output).await,
        Commands::Daemon {
            schedule,
            no_startup_sync,
            ..
        } => daemon::run_daemon(schedule, no_startup_sync, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
    };

    if let Err(ref e) = result {
        output.error(e.to_string());
    }
    result
}
