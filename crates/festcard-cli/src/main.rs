use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use festcard_infrastructure::ConfigService;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "festcard")]
#[command(about = "festcard - digital business cards for the campus festival", long_about = None)]
struct Cli {
    /// Keep config, secrets and session files under this directory
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Use canned profiles instead of the Gemini API
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign in to an existing account
    Login {
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out (the account is kept)
    Logout,
    /// Show the signed-in user and their card
    Whoami,
    /// List the personas you can present as
    Personas,
    /// Switch persona and fetch a new card; without a name, refresh the current one
    Persona { name: Option<String> },
    /// Simulate an NFC tap with another attendee
    Tap,
    /// Look up a public profile and add it to your connections
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List collected cards, newest first
    Connections {
        /// Print the raw connection list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summary of everyone you met
    Afterparty,
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    let config = ConfigService::new(data_dir)?
        .load()
        .context("Failed to load config.toml")?;
    init_tracing(&config.log_level);

    let session = commands::open_session(data_dir, cli.offline, &config).await?;

    match cli.command {
        Commands::Register { username, password } => {
            commands::account::register(&session, &username, password.as_deref()).await?
        }
        Commands::Login { username, password } => {
            commands::account::login(&session, &username, password.as_deref()).await?
        }
        Commands::Logout => commands::account::logout(&session).await?,
        Commands::Whoami => commands::account::whoami(&session).await?,
        Commands::Personas => commands::persona::list(&session).await?,
        Commands::Persona { name } => commands::persona::select(&session, name.as_deref()).await?,
        Commands::Tap => commands::cards::tap(&session).await?,
        Commands::Search { query } => commands::cards::search(&session, &query.join(" ")).await?,
        Commands::Connections { json } => commands::cards::list(&session, json).await?,
        Commands::Afterparty => commands::cards::afterparty(&session).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["festcard", "tap", "--offline", "--data-dir", "/tmp/fc"])
            .unwrap();
        assert!(cli.offline);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/fc")));
        assert!(matches!(cli.command, Commands::Tap));
    }

    #[test]
    fn test_search_joins_words() {
        let cli = Cli::try_parse_from(["festcard", "search", "DJ", "Nova"]).unwrap();
        match cli.command {
            Commands::Search { query } => assert_eq!(query.join(" "), "DJ Nova"),
            _ => panic!("expected search"),
        }
        assert!(Cli::try_parse_from(["festcard", "search"]).is_err());
    }

    #[test]
    fn test_persona_name_is_optional() {
        let cli = Cli::try_parse_from(["festcard", "persona"]).unwrap();
        assert!(matches!(cli.command, Commands::Persona { name: None }));
    }
}
