use vetsync_core::config::ClientConfig;
use vetsync_core::models::RecordId;

use crate::cli::NotificationCommands;
use crate::commands::common::require_authed_api;
use crate::error::CliError;

pub async fn run_notifications(
    command: NotificationCommands,
    config: &ClientConfig,
) -> Result<(), CliError> {
    let api = require_authed_api(config)?;

    match command {
        NotificationCommands::UnreadCount => {
            let count = api.unread_count().await?;
            println!("{count}");
        }
        NotificationCommands::MarkRead { id } => {
            let id: RecordId = id.parse()?;
            api.mark_read(id).await?;
            println!("Marked notification {id} read");
        }
        NotificationCommands::MarkAllRead => {
            api.mark_all_read().await?;
            println!("Marked all notifications read");
        }
    }

    Ok(())
}
