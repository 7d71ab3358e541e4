use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wingman::cli::{build_conversation, Commands};
use wingman::connector::adapter::spawn_database_probe;
use wingman::{
    ClientConfig, Container, ContainerConfig, DatabaseProbeConfig, MissingContextPolicy,
    SuggestionClient,
};

#[derive(Parser)]
#[command(name = "wingman")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            offline,
        } => {
            let mut config = ContainerConfig::from_env();
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            config.offline = offline;

            match DatabaseProbeConfig::from_env() {
                Some(probe) => {
                    spawn_database_probe(probe);
                }
                None => info!("DATABASE_HOST not set, skipping database probe"),
            }

            let container = Arc::new(Container::new(&config));
            let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
            wingman::serve(listener, container, shutdown_signal()).await?;
        }

        Commands::Suggest {
            endpoint,
            context,
            messages,
            placeholder,
            timeout,
        } => {
            let policy = if placeholder {
                MissingContextPolicy::Placeholder
            } else {
                MissingContextPolicy::Reject
            };
            let conversation = build_conversation(context.as_deref(), messages)?;
            let chat_context = conversation.draft().resolve(policy)?;

            let mut client_config = ClientConfig::from_env();
            if let Some(endpoint) = endpoint {
                client_config.endpoint = endpoint;
            }
            let client =
                SuggestionClient::new(client_config.with_timeout(Duration::from_secs(timeout)))?;

            let suggestions = client.fetch_suggestions(&chat_context).await;
            if suggestions.is_empty() {
                println!("No suggestions.");
            } else {
                for (i, suggestion) in suggestions.iter().enumerate() {
                    println!("{}. {}", i + 1, suggestion);
                }
            }
            if suggestions.is_diagnostic() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
