use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "questline", version, about = "Questline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quest timers and completion
    Quest {
        #[command(subcommand)]
        action: commands::quest::QuestAction,
    },
    /// Todo items and reminders
    Todo {
        #[command(subcommand)]
        action: commands::todo::TodoAction,
    },
    /// Player level and rewards
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Pending notifications
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUESTLINE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Quest { action } => commands::quest::run(action).await,
        Commands::Todo { action } => commands::todo::run(action).await,
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Notify { action } => commands::notify::run(action).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
