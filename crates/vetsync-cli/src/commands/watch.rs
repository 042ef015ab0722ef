//! Live follow mode: keeps a reconciled list on screen until Ctrl-C.

use std::sync::Arc;

use vetsync_client::{transport, LiveList, ListState, PushDecode, Transport, WsTransport};
use vetsync_core::config::ClientConfig;
use vetsync_core::models::{ContentKind, ForumPost, Notification, PetTip, Video};
use vetsync_core::project::{project, FilterState};
use vetsync_core::util::unix_timestamp_millis_now;

use crate::commands::common::{
    build_api, build_filters, format_record_line, resolve_identity,
};
use crate::error::CliError;
use crate::session::Profile;

pub async fn run_watch(
    kind_raw: &str,
    search: Option<&str>,
    category: Option<&str>,
    status: Option<&str>,
    config: &ClientConfig,
) -> Result<(), CliError> {
    let kind: ContentKind = kind_raw.parse()?;
    let filters = build_filters(search, category, status);

    match kind {
        ContentKind::Tips => watch_kind::<PetTip>(config, &filters).await,
        ContentKind::Videos => watch_kind::<Video>(config, &filters).await,
        ContentKind::ForumPosts => watch_kind::<ForumPost>(config, &filters).await,
        ContentKind::Notifications => watch_kind::<Notification>(config, &filters).await,
    }
}

async fn watch_kind<R: PushDecode>(
    config: &ClientConfig,
    filters: &FilterState,
) -> Result<(), CliError> {
    let Some(push_url) = config.push_url.as_deref() else {
        return Err(CliError::Config(format!(
            "Watch needs a push channel. Pass --push-url or set {}.",
            crate::commands::common::PUSH_URL_ENV
        )));
    };

    let transport = shared_transport(push_url)?;
    let api = build_api(config)?;
    let profile = Profile::load()?;
    let identity = resolve_identity(&profile);

    let list = LiveList::<R>::spawn(Arc::new(api), &transport, &identity, config.settle());
    let mut state = list.state();
    let mut notices = list.notices();

    println!("Watching {} (Ctrl-C to stop)", R::KIND);

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                println!();
                break;
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = state.borrow_and_update().clone();
                render_state(&snapshot, filters);
            }
            changed = notices.changed() => {
                if changed.is_err() {
                    break;
                }
                let notice = notices.borrow_and_update().clone();
                if let Some(notice) = notice {
                    println!("* {}", notice.summary);
                }
            }
        }
    }

    Ok(())
}

/// The process-wide push connection; created on first use, then reused.
fn shared_transport(push_url: &str) -> Result<Arc<dyn Transport>, CliError> {
    if let Some(existing) = transport::shared() {
        return Ok(existing);
    }
    let ws: Arc<dyn Transport> = Arc::new(WsTransport::new(push_url)?);
    transport::install(Arc::clone(&ws));
    Ok(transport::shared().unwrap_or(ws))
}

fn render_state<R: PushDecode>(state: &ListState<R>, filters: &FilterState) {
    match state {
        ListState::Loading => println!("Loading..."),
        ListState::Failed(message) => println!("Error: {message}"),
        ListState::Ready(records) => {
            let visible = project(records, filters);
            let now_ms = unix_timestamp_millis_now();
            println!("-- {} ({} shown / {} total)", R::KIND, visible.len(), records.len());
            for record in &visible {
                println!("{}", format_record_line(record, now_ms));
            }
        }
    }
}
