pub mod auth_cmd;
pub mod common;
pub mod list;
pub mod notifications;
pub mod watch;
