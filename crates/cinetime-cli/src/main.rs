use clap::{ArgAction, Parser, Subcommand};
use cinetime_client::ReportPeriod;
use cinetime_models::{EpisodeStatus, MediaFilter, MediaKind, WatchStatus};
use commands::{auth, browse, chat, config, episodes, profile, report, watchlist, App};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinetime")]
#[command(about = "CineTime - track the movies and shows you watch")]
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

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        /// Account email (prompted when omitted, defaults to the last one used)
        #[arg(long)]
        email: Option<String>,
    },
    /// End the session and forget the stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Create an account; a verification code is sent by email
    Register,
    /// Confirm an account with the emailed one-time code
    VerifyOtp {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },
    /// Request a password reset email
    ForgotPassword {
        #[arg(long)]
        email: Option<String>,
    },
    /// Set a new password using the token from a reset link
    ResetPassword {
        /// Token from the reset link (`.../reset-password/<token>`)
        token: String,
    },
    /// View or change the account profile
    Profile {
        #[command(subcommand)]
        cmd: Option<ProfileCommands>,
    },
    /// Trending movies and shows this week
    Trending {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Only show one kind
        #[arg(long, default_value = "all")]
        kind: MediaFilter,
    },
    /// Popular movies
    Popular {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search the catalog by title
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "all")]
        kind: MediaFilter,
    },
    /// Details of one title
    Details {
        /// movie or tv
        kind: MediaKind,
        /// Catalog (TMDB) id
        id: u64,
    },
    /// Manage the personal watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },
    /// Track episodes of a show
    Episodes {
        #[command(subcommand)]
        cmd: EpisodeCommands,
    },
    /// Talk to the assistant; starts an interactive chat without a message
    Chat {
        message: Option<String>,
        /// Restrict cross-referenced results to one kind
        #[arg(long, default_value = "all")]
        kind: MediaFilter,
    },
    /// Free-text keyword search through the assistant
    AiSearch {
        query: String,
        #[arg(long, default_value = "all")]
        kind: MediaFilter,
    },
    /// Download the watch report as a PDF
    Report {
        /// all, week, month or year
        #[arg(long, default_value = "all")]
        period: ReportPeriod,
    },
    /// Show or change local configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the profile (default)
    Show,
    /// Change first and last name
    Update {
        #[arg(long)]
        firstname: Option<String>,
        #[arg(long)]
        lastname: Option<String>,
    },
    /// Change the password
    Password,
    /// Delete the account permanently
    Delete,
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// List items, optionally filtered by status (default)
    List {
        #[arg(long)]
        status: Option<WatchStatus>,
    },
    /// Add a catalog title
    Add {
        kind: MediaKind,
        id: u64,
    },
    /// Change an item's watch status
    Status {
        /// Watchlist item id
        id: String,
        status: WatchStatus,
    },
    /// Rate an item from 1 to 10
    Rate {
        id: String,
        rating: u8,
    },
    /// Remove an item
    Remove {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y', action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Show watch statistics
    Stats,
    /// Keep the statistics on screen, refreshing periodically
    Watch {
        /// Refresh interval in seconds (defaults to the configured one)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum EpisodeCommands {
    /// List the episodes of one season
    List {
        /// Show catalog (TMDB) id
        tmdb_id: u64,
        #[arg(long, default_value_t = 1)]
        season: u32,
    },
    /// Set the status of one episode
    Mark {
        tmdb_id: u64,
        /// Episode id as shown by `episodes list`
        episode_id: String,
        status: EpisodeStatus,
        #[arg(long, default_value_t = 1)]
        season: u32,
    },
    /// Mark every episode of a season as watched
    MarkSeason {
        tmdb_id: u64,
        #[arg(long, default_value_t = 1)]
        season: u32,
    },
    /// Episode statistics across all shows
    Stats,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration and file locations (default)
    Show,
    /// Set the backend API URL
    SetUrl { url: String },
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let output = output::Output::new(cli.output, cli.quiet);

    // Config commands must work even when the config file is broken
    if let Commands::Config { cmd } = cli.command {
        logging::init_logging(cli.verbose, cli.quiet, None).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
        return config::run_config(cmd.unwrap_or(ConfigCommands::Show), &output);
    }

    let (cfg, paths) = config::load()?;
    let log_file = cfg.logging.file.as_deref().map(|file| paths.resolve_log_file(file));
    logging::init_logging(cli.verbose, cli.quiet, log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let app = App::connect(cfg, paths).await?;

    match cli.command {
        Commands::Login { email } => auth::login(&app, email, &output).await,
        Commands::Logout => auth::logout(&app, &output),
        Commands::Whoami => auth::whoami(&app, &output),
        Commands::Register => auth::register(&app, &output).await,
        Commands::VerifyOtp { email, code } => auth::verify_otp(&app, email, code, &output).await,
        Commands::ForgotPassword { email } => auth::forgot_password(&app, email, &output).await,
        Commands::ResetPassword { token } => auth::reset_password(&app, &token, &output).await,
        Commands::Profile { cmd } => profile::run(&app, cmd.unwrap_or(ProfileCommands::Show), &output).await,
        Commands::Trending { page, kind } => browse::trending(&app, page, kind, &output).await,
        Commands::Popular { page } => browse::popular(&app, page, &output).await,
        Commands::Search { query, page, kind } => browse::search(&app, &query, page, kind, &output).await,
        Commands::Details { kind, id } => browse::details(&app, kind, id, &output).await,
        Commands::Watchlist { cmd } => {
            watchlist::run(&app, cmd.unwrap_or(WatchlistCommands::List { status: None }), &output).await
        }
        Commands::Episodes { cmd } => episodes::run(&app, cmd, &output).await,
        Commands::Chat { message, kind } => chat::chat(&app, message, kind, &output).await,
        Commands::AiSearch { query, kind } => chat::ai_search(&app, &query, kind, &output).await,
        Commands::Report { period } => report::download(&app, period, &output).await,
        Commands::Config { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_watchlist_status() {
        let cli = Cli::try_parse_from(["cinetime", "watchlist", "status", "abc", "completed"]).unwrap();
        match cli.command {
            Commands::Watchlist {
                cmd: Some(WatchlistCommands::Status { id, status }),
            } => {
                assert_eq!(id, "abc");
                assert_eq!(status, WatchStatus::Completed);
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["cinetime", "trending", "--kind", "anime"]).is_err());
        assert!(Cli::try_parse_from(["cinetime", "report", "--period", "month", "-vv"]).is_ok());
    }
}
