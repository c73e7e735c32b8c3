use clap::Subcommand;

use crate::cli::{utils::output_success, OutputFormat};
use crate::client::DataClient;

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "Fetch a record")]
    Get {
        #[arg(help = "Record id; defaults to the local identity's user id")]
        user_id: Option<String>,
    },

    #[command(about = "Create a record from a JSON argument")]
    Create {
        #[arg(help = "Record id")]
        user_id: String,
        #[arg(help = "Record contents as a JSON object")]
        data: String,
    },

    #[command(about = "Update a record from a JSON argument")]
    Update {
        #[arg(help = "Record id")]
        user_id: String,
        #[arg(help = "Record contents as a JSON object")]
        data: String,
    },

    #[command(about = "Delete a record")]
    Delete {
        #[arg(help = "Record id")]
        user_id: String,
    },
}

fn resolve_user_id(client: &DataClient, user_id: Option<String>) -> anyhow::Result<String> {
    match user_id.or_else(|| client.user_id().map(str::to_string)) {
        Some(id) => Ok(id),
        None => anyhow::bail!("a record id is required in server mode"),
    }
}

pub async fn handle(
    cmd: DataCommands,
    client: &DataClient,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        DataCommands::Get { user_id } => {
            let user_id = resolve_user_id(client, user_id)?;
            let record = client.get_record(&user_id).await?;
            output_success(&output_format, &format!("record {}", user_id), Some(record))
        }
        DataCommands::Create { user_id, data } => {
            let data = serde_json::from_str(&data)?;
            let record = client.create_record(&user_id, data).await?;
            output_success(&output_format, &format!("created {}", user_id), Some(record))
        }
        DataCommands::Update { user_id, data } => {
            let data = serde_json::from_str(&data)?;
            let record = client.update_record(&user_id, data).await?;
            output_success(&output_format, &format!("updated {}", user_id), Some(record))
        }
        DataCommands::Delete { user_id } => {
            client.delete_record(&user_id).await?;
            output_success(&output_format, &format!("deleted {}", user_id), None)
        }
    }
}
