pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

use crate::client::DataClient;

#[derive(Parser)]
#[command(name = "drc")]
#[command(about = "docrelay CLI - data client for a running relay or the local sandbox")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Relay base URL; omit to run in local mode")]
    pub server: Option<String>,

    #[arg(long, global = true, help = "Bearer token presented to the relay")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Record operations on the Users collection")]
    Data {
        #[command(subcommand)]
        cmd: commands::data::DataCommands,
    },

    #[command(about = "File uploads")]
    Storage {
        #[command(subcommand)]
        cmd: commands::storage::StorageCommands,
    },

    #[command(about = "Local-mode identity and application contexts")]
    Context {
        #[command(subcommand)]
        cmd: commands::context::ContextCommands,
    },
}

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Build the data client the flags select: `--server` plus `--token` talk
/// to a running relay, their absence selects the offline local sandbox.
fn client_for(server: Option<String>, token: Option<String>) -> anyhow::Result<DataClient> {
    match (server, token) {
        (Some(url), Some(token)) => Ok(DataClient::connect(url, token)),
        (Some(_), None) => anyhow::bail!("--token is required when --server is set"),
        (None, _) => DataClient::local(),
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let server = cli.server.clone();
    let token = cli.token.clone();

    match cli.command {
        Commands::Data { cmd } => {
            let client = client_for(server, token)?;
            commands::data::handle(cmd, &client, output_format).await
        }
        Commands::Storage { cmd } => {
            let client = client_for(server, token)?;
            commands::storage::handle(cmd, &client, output_format).await
        }
        Commands::Context { cmd } => commands::context::handle(cmd, output_format).await,
    }
}
