use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::client::DataClient;

#[derive(Subcommand)]
pub enum StorageCommands {
    #[command(about = "Upload files and print their access URLs")]
    Upload {
        #[arg(help = "Files to upload", required = true)]
        files: Vec<PathBuf>,
        #[arg(long, help = "Destination folder (default: uploads)")]
        folder: Option<String>,
    },
}

pub async fn handle(
    cmd: StorageCommands,
    client: &DataClient,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        StorageCommands::Upload { files, folder } => {
            let mut payload = Vec::with_capacity(files.len());
            for path in &files {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| anyhow::anyhow!("not a file name: {}", path.display()))?;
                let bytes = std::fs::read(path)?;
                payload.push((name, bytes));
            }

            let urls = client.upload(payload, folder.as_deref()).await?;
            output_success(
                &output_format,
                &format!("uploaded {} file(s)", urls.len()),
                Some(json!({ "urls": urls })),
            )
        }
    }
}
