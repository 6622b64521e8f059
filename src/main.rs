// main.rs
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use poem::Server;
use poem::listener::TcpListener;

use poem_blog::auth::{self, AdminAuth};
use poem_blog::config::Config;
use poem_blog::services::Content;
use poem_blog::session::{self, SessionRegistry};
use poem_blog::web::{self, AppState};

#[derive(Parser)]
#[command(name = "poem-blog", about = "Personal blog and project showcase")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the web server (default).
    Serve,
    /// Print the Argon2 hash to use as BLOG_ADMIN_PASSWORD_HASH.
    HashPassword { password: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::HashPassword { password } => {
            println!("{}", auth::hash_password(&password)?);
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let auth = AdminAuth::new(config.admin_password_hash.as_str())
        .context("BLOG_ADMIN_PASSWORD_HASH is not a valid Argon2 hash")?;

    let content = Content::open(&config.data_dir);
    content
        .ensure_initialized()
        .await
        .with_context(|| format!("initializing data directory {}", config.data_dir.display()))?;

    let sessions = Arc::new(SessionRegistry::default());
    let _sweeper = session::start_sweep_task(Arc::clone(&sessions), config.sweep_interval);

    let state = AppState {
        content,
        sessions,
        auth,
    };

    tracing::info!(addr = %config.bind_addr, data_dir = %config.data_dir.display(), "blog listening");
    Server::new(TcpListener::bind(config.bind_addr.clone()))
        .run_with_graceful_shutdown(
            web::build_app(state),
            async {
                let _ = tokio::signal::ctrl_c().await;
            },
            None,
        )
        .await?;
    tracing::info!("shut down");
    Ok(())
}
