use clap::Subcommand;
use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::context::ContextStore;

#[derive(Subcommand)]
pub enum ContextCommands {
    #[command(about = "Show the local identity and application contexts")]
    Show,
}

pub async fn handle(cmd: ContextCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ContextCommands::Show => {
            let store = ContextStore::open()?;
            let user = store.user_context()?;
            let app = store.app_context()?;
            output_success(
                &output_format,
                "local contexts",
                Some(json!({
                    "user_context": user,
                    "app_context": app,
                })),
            )
        }
    }
}
