//! Snapshot cache: the last fetched list per content kind, with its
//! fetch timestamp. Lets `vetsync list` answer from disk when the
//! backend is unreachable and the cache is still within its TTL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use vetsync_core::models::ContentKind;

use crate::error::CliError;

#[derive(Debug, Serialize, Deserialize)]
struct CachedSnapshot {
    /// Unix milliseconds of the successful fetch.
    fetched_at: i64,
    records: serde_json::Value,
}

pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map_or_else(|| PathBuf::from(".vetsync-cache"), |dir| dir.join("vetsync"))
}

pub fn cache_path(dir: &Path, kind: ContentKind) -> PathBuf {
    dir.join(format!("{kind}.json"))
}

/// Persist a freshly fetched snapshot.
pub fn store<R: Serialize>(path: &Path, records: &[R], now_millis: i64) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let snapshot = CachedSnapshot {
        fetched_at: now_millis,
        records: serde_json::to_value(records)?,
    };
    std::fs::write(path, serde_json::to_string(&snapshot)?)?;
    Ok(())
}

/// Load the cached snapshot when it exists and is within `ttl`.
///
/// Missing files and stale caches both answer `None`; an unreadable cache
/// is an error so corruption does not masquerade as an empty list.
pub fn load_fresh<R: DeserializeOwned>(
    path: &Path,
    ttl: Duration,
    now_millis: i64,
) -> Result<Option<Vec<R>>, CliError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    let snapshot: CachedSnapshot = serde_json::from_str(&raw)?;

    let age_millis = now_millis.saturating_sub(snapshot.fetched_at);
    if age_millis < 0 || age_millis as u128 > ttl.as_millis() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(snapshot.records)?))
}
