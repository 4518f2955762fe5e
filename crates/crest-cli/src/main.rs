use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "crest")]
#[command(about = "Crest - chat client for the company assistant backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and cache the user identity
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account, then sign in
    Register {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Show the authenticated user
    Whoami,
    /// List conversations
    Conversations,
    /// Search the knowledge base
    Search { query: String },
    /// Start an interactive chat session
    Chat {
        /// Email to sign in with when no session is available
        #[arg(long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&email, password).await,
        Commands::Register { email, password } => commands::auth::register(&email, password).await,
        Commands::Whoami => commands::auth::whoami().await,
        Commands::Conversations => commands::chat::list_conversations().await,
        Commands::Search { query } => commands::knowledge::search(&query).await,
        Commands::Chat { email } => commands::chat::run(email).await,
    }
}
