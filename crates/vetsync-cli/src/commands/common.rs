use std::env;

use vetsync_client::{ActorIdentity, ContentApi};
use vetsync_core::config::ClientConfig;
use vetsync_core::models::LiveRecord;
use vetsync_core::project::{FieldFilter, FilterState};

use crate::error::CliError;
use crate::session::{Profile, TokenStore};

pub const API_URL_ENV: &str = "VETSYNC_API_URL";
pub const PUSH_URL_ENV: &str = "VETSYNC_PUSH_URL";
pub const SETTLE_MS_ENV: &str = "VETSYNC_SETTLE_MS";

/// Resolve the client config from flags first, environment second.
pub fn resolve_config(
    api_url: Option<&str>,
    push_url: Option<&str>,
) -> Result<ClientConfig, CliError> {
    let api_url = api_url
        .map(str::to_string)
        .or_else(|| env::var(API_URL_ENV).ok())
        .ok_or_else(|| {
            CliError::Config(format!(
                "No API base URL. Pass --api-url or set {API_URL_ENV}."
            ))
        })?;

    let mut config = ClientConfig::new(api_url)?;

    if let Some(push_url) = push_url
        .map(str::to_string)
        .or_else(|| env::var(PUSH_URL_ENV).ok())
    {
        config = config.with_push_url(push_url)?;
    }

    if let Ok(raw) = env::var(SETTLE_MS_ENV) {
        config.settle_ms = raw.trim().parse().map_err(|_| {
            CliError::Config(format!("{SETTLE_MS_ENV} must be a positive integer, got '{raw}'"))
        })?;
        config = config.validated()?;
    }

    Ok(config)
}

pub fn build_filters(
    search: Option<&str>,
    category: Option<&str>,
    status: Option<&str>,
) -> FilterState {
    FilterState {
        search: search.unwrap_or_default().trim().to_string(),
        category: FieldFilter::parse(category),
        status: FieldFilter::parse(status),
    }
}

/// API client with the stored token attached when one exists.
pub fn build_api(config: &ClientConfig) -> Result<ContentApi, CliError> {
    let api = ContentApi::new(config)?;
    match TokenStore::default().load()? {
        Some(token) => Ok(api.with_auth_token(token)),
        None => Ok(api),
    }
}

/// API client that refuses to proceed without a stored token.
pub fn require_authed_api(config: &ClientConfig) -> Result<ContentApi, CliError> {
    let token = TokenStore::default().load()?.ok_or(CliError::NotLoggedIn)?;
    Ok(ContentApi::new(config)?.with_auth_token(token))
}

/// Identity sent in room-join messages; anonymous defaults when no one is
/// logged in (the admin room accepts observers, it just cannot name them).
pub fn resolve_identity(profile: &Profile) -> ActorIdentity {
    ActorIdentity::new(
        profile.user_id.clone().unwrap_or_else(|| "0".to_string()),
        profile
            .user_name
            .clone()
            .unwrap_or_else(|| "vetsync-cli".to_string()),
    )
}

pub fn format_record_line<R: LiveRecord>(record: &R, now_ms: i64) -> String {
    let headline = compact_headline(record.headline(), 48);
    let relative_time = format_relative_time(record.updated_at().timestamp_millis(), now_ms);

    let mut extras = Vec::new();
    if let Some(category) = record.category().filter(|value| !value.is_empty()) {
        extras.push(category.to_string());
    }
    if let Some(status) = record.status().filter(|value| !value.is_empty()) {
        extras.push(status.to_string());
    }

    if extras.is_empty() {
        format!("{:>6}  {headline:<48}  {relative_time}", record.id())
    } else {
        format!(
            "{:>6}  {headline:<48}  {relative_time:<10}  {}",
            record.id(),
            extras.join(" / ")
        )
    }
}

pub fn compact_headline(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
