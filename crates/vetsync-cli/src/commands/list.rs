use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use vetsync_client::ContentApi;
use vetsync_core::config::ClientConfig;
use vetsync_core::models::{ContentKind, ForumPost, LiveRecord, Notification, PetTip, Video};
use vetsync_core::project::{project, FilterState};
use vetsync_core::util::unix_timestamp_millis_now;

use crate::cache;
use crate::commands::common::{build_api, build_filters, format_record_line};
use crate::error::CliError;

pub async fn run_list(
    kind_raw: &str,
    search: Option<&str>,
    category: Option<&str>,
    status: Option<&str>,
    limit: Option<usize>,
    as_json: bool,
    config: &ClientConfig,
) -> Result<(), CliError> {
    let kind: ContentKind = kind_raw.parse()?;
    let api = build_api(config)?;
    let filters = build_filters(search, category, status);
    let cache_dir = cache::default_cache_dir();

    match kind {
        ContentKind::Tips => {
            list_kind::<PetTip>(&api, config, &cache_dir, &filters, limit, as_json).await
        }
        ContentKind::Videos => {
            list_kind::<Video>(&api, config, &cache_dir, &filters, limit, as_json).await
        }
        ContentKind::ForumPosts => {
            list_kind::<ForumPost>(&api, config, &cache_dir, &filters, limit, as_json).await
        }
        ContentKind::Notifications => {
            list_kind::<Notification>(&api, config, &cache_dir, &filters, limit, as_json).await
        }
    }
}

async fn list_kind<R>(
    api: &ContentApi,
    config: &ClientConfig,
    cache_dir: &Path,
    filters: &FilterState,
    limit: Option<usize>,
    as_json: bool,
) -> Result<(), CliError>
where
    R: LiveRecord + DeserializeOwned + Serialize,
{
    let records = fetch_or_cached::<R>(api, config, cache_dir).await?;

    let mut visible = project(&records, filters);
    if let Some(limit) = limit {
        visible.truncate(limit);
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
    } else {
        let now_ms = unix_timestamp_millis_now();
        for record in &visible {
            println!("{}", format_record_line(record, now_ms));
        }
    }

    Ok(())
}

/// Fetch the authoritative snapshot; on failure, fall back to a cached
/// snapshot that is still within the config's TTL.
async fn fetch_or_cached<R>(
    api: &ContentApi,
    config: &ClientConfig,
    cache_dir: &Path,
) -> Result<Vec<R>, CliError>
where
    R: LiveRecord + DeserializeOwned + Serialize,
{
    let path = cache::cache_path(cache_dir, R::KIND);
    let now_ms = unix_timestamp_millis_now();

    match api.fetch_snapshot::<R>().await {
        Ok(records) => {
            if let Err(error) = cache::store(&path, &records, now_ms) {
                tracing::warn!(kind = %R::KIND, %error, "failed to write snapshot cache");
            }
            Ok(records)
        }
        Err(error) => {
            tracing::warn!(kind = %R::KIND, %error, "snapshot fetch failed, trying cache");
            match cache::load_fresh::<R>(&path, config.cache_ttl(), now_ms) {
                Ok(Some(records)) => {
                    eprintln!("(offline: showing cached {})", R::KIND);
                    Ok(records)
                }
                _ => Err(error.into()),
            }
        }
    }
}
