use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cli;

use cli::CliHandler;
use eventsports_client::version::CURRENT_VERSION;

#[derive(Parser)]
#[command(
    name = "inscricao",
    about = "Command-line client for the event registration and results platform",
    long_about = "inscricao - event registration and results from the terminal

OVERVIEW:
  Sign in with your platform account, browse events, categories, workouts and
  leaderboards, and review the results of the events you organize.

QUICK START:
  inscricao login                        # Sign in (password is prompted)
  inscricao events --status ABERTO       # Events open for registration
  inscricao event <ID>                   # Event details with categories
  inscricao leaderboard <EVENT> <CAT>    # Category leaderboard
  inscricao results <EVENT> <WORKOUT> <CAT>
                                         # Workout results (organizers only)
  inscricao status                       # Session and token status",
    version = CURRENT_VERSION,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Alternate configuration file
    #[arg(long, global = true, env = "EVENTSPORTS_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login(LoginArgs),

    /// Sign out and clear the stored session
    Logout,

    /// Show session status
    #[command(aliases = &["st"])]
    Status,

    /// List events
    #[command(aliases = &["ls"])]
    Events(EventsArgs),

    /// Show one event with its categories
    Event(EventArgs),

    /// Show a category leaderboard
    #[command(aliases = &["lb"])]
    Leaderboard(LeaderboardArgs),

    /// List the workouts of an event
    Workouts(WorkoutsArgs),

    /// Show workout results of an event you organize
    Results(ResultsArgs),

    /// Configure settings
    #[command(aliases = &["cfg"])]
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: Option<String>,
}

#[derive(Args)]
pub struct EventsArgs {
    /// Only events with this status (ABERTO, RASCUNHO, FECHADO)
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct EventArgs {
    pub id: i64,
}

#[derive(Args)]
pub struct LeaderboardArgs {
    pub event_id: i64,
    pub category_id: i64,

    /// Full ranking instead of the leaderboard summary
    #[arg(long)]
    pub ranking: bool,
}

#[derive(Args)]
pub struct WorkoutsArgs {
    pub event_id: i64,
}

#[derive(Args)]
pub struct ResultsArgs {
    pub event_id: String,
    pub workout_id: i64,
    pub category_id: i64,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    Show,
    SetBaseUrl { url: String },
    SetTimeout { seconds: u64 },
    Reset,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(format!("eventsports_client={},inscricao={}", log_level, log_level));
    subscriber.init();

    let mut handler = match CliHandler::new(cli.config, cli.verbose) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = handler.execute(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
