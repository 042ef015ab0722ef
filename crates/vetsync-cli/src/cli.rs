use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vetsync")]
#[command(about = "Inspect and watch the clinic portal's live content lists")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// REST API base URL (overrides VETSYNC_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Push-channel URL (overrides VETSYNC_PUSH_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub push_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the current list for a content type
    List {
        /// Content type: tips, videos, forum-posts, notifications
        kind: String,
        /// Case-insensitive substring search
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by category ("All" or empty matches everything)
        #[arg(long)]
        category: Option<String>,
        /// Filter by status ("All" or empty matches everything)
        #[arg(long)]
        status: Option<String>,
        /// Maximum number of records to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Follow a content type live, reprinting the list as it changes
    Watch {
        /// Content type: tips, videos, forum-posts, notifications
        kind: String,
        /// Case-insensitive substring search
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
    },
    /// Notification actions for the logged-in user
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },
    /// Manage the stored API token and profile
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Subcommand)]
pub enum NotificationCommands {
    /// Print the unread-notification count
    UnreadCount,
    /// Mark one notification read
    MarkRead {
        /// Notification id
        id: String,
    },
    /// Mark every notification read
    MarkAllRead,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store an API token in the OS keyring and save the profile
    Login {
        /// Bearer token issued by the backend
        #[arg(long, value_name = "TOKEN")]
        token: String,
        /// Backend user id, sent when joining push rooms
        #[arg(long, value_name = "ID")]
        user_id: Option<String>,
        /// Display name shown to other users in change notices
        #[arg(long, value_name = "NAME")]
        name: Option<String>,
        /// Role label, e.g. "admin"
        #[arg(long, value_name = "ROLE")]
        role: Option<String>,
    },
    /// Show whether a token and profile are stored
    Status,
    /// Clear the stored token and profile
    Logout,
}
