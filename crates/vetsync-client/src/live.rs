//! Live list host: one driver task per mounted view.
//!
//! Owns a reconciliation engine, seeds it from the authoritative snapshot,
//! patches it with decoded push events, and schedules the debounced
//! re-fetch backstop. Push events are treated as low-latency hints; the
//! REST snapshot remains the system of record, which bounds worst-case
//! staleness to roughly the settle window even when a push event is
//! silently dropped.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use vetsync_core::models::LiveRecord;
use vetsync_core::notices::{NoticeSlot, TransientNotice};
use vetsync_core::reconcile::Reconciler;

use crate::api::ContentApi;
use crate::error::ClientResult;
use crate::listener::{subscribe, PushDecode, PushUpdate, Subscription};
use crate::transport::{ActorIdentity, Transport};

/// Host view of the reconciled list.
///
/// `Loading` is shown only for the initial snapshot; incremental updates
/// stay within `Ready`. `Failed` is recoverable via [`LiveList::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState<R> {
    Loading,
    Ready(Vec<R>),
    Failed(String),
}

/// Where authoritative snapshots come from. The seam exists so the driver
/// can be exercised without a live backend.
pub trait SnapshotSource<R>: Send + Sync + 'static {
    fn fetch(&self) -> BoxFuture<'_, ClientResult<Vec<R>>>;
}

impl<R> SnapshotSource<R> for ContentApi
where
    R: LiveRecord + DeserializeOwned,
{
    fn fetch(&self) -> BoxFuture<'_, ClientResult<Vec<R>>> {
        Box::pin(self.fetch_snapshot::<R>())
    }
}

enum Command {
    Refresh,
}

/// Handle to a live, self-reconciling list. Dropping it tears down the
/// driver task and the push subscription; an in-flight snapshot result is
/// discarded rather than applied to a dead view.
#[derive(Debug)]
pub struct LiveList<R: LiveRecord> {
    state: watch::Receiver<ListState<R>>,
    notices: watch::Receiver<Option<TransientNotice>>,
    commands: mpsc::UnboundedSender<Command>,
    _subscription: Subscription,
    driver: JoinHandle<()>,
}

impl<R: PushDecode> LiveList<R> {
    /// Spawn the driver: fetch the initial snapshot, join the content
    /// type's room, and keep reconciling until the handle is dropped.
    pub fn spawn(
        source: Arc<dyn SnapshotSource<R>>,
        transport: &Arc<dyn Transport>,
        identity: &ActorIdentity,
        settle: Duration,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(ListState::Loading);
        let (notice_tx, notice_rx) = watch::channel(None);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        let subscription = subscribe::<R>(transport, identity, update_tx);
        let driver = tokio::spawn(drive(
            source, settle, update_rx, command_rx, state_tx, notice_tx,
        ));

        Self {
            state: state_rx,
            notices: notice_rx,
            commands: command_tx,
            _subscription: subscription,
            driver,
        }
    }
}

impl<R: LiveRecord> LiveList<R> {
    /// Watch the list state; resolves on every visible change.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<ListState<R>> {
        self.state.clone()
    }

    /// Watch the transient notice slot (at most one notice at a time).
    #[must_use]
    pub fn notices(&self) -> watch::Receiver<Option<TransientNotice>> {
        self.notices.clone()
    }

    /// Request an immediate authoritative re-fetch; also the retry path
    /// out of [`ListState::Failed`].
    pub fn refresh(&self) {
        let _ = self.commands.send(Command::Refresh);
    }
}

impl<R: LiveRecord> Drop for LiveList<R> {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

async fn drive<R: LiveRecord>(
    source: Arc<dyn SnapshotSource<R>>,
    settle: Duration,
    mut updates: mpsc::UnboundedReceiver<PushUpdate<R>>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<ListState<R>>,
    notices: watch::Sender<Option<TransientNotice>>,
) {
    let mut engine = Reconciler::new();
    match source.fetch().await {
        Ok(records) => {
            engine.seed(records);
            let _ = state.send(ListState::Ready(engine.records().to_vec()));
        }
        Err(error) => {
            tracing::warn!(kind = %R::KIND, %error, "initial snapshot failed");
            let _ = state.send(ListState::Failed(error.to_string()));
        }
    }

    let mut slot = NoticeSlot::new();
    // Deadlines for the debounced re-fetch and the notice eviction; `None`
    // parks the corresponding select arm.
    let mut settle_at: Option<Instant> = None;
    let mut notice_at: Option<Instant> = None;

    loop {
        tokio::select! {
            update = updates.recv() => match update {
                Some(PushUpdate::Change(event)) => {
                    let now = Instant::now();
                    let notice = TransientNotice::for_event(&event);
                    notice_at = Some(now + notice.window());
                    slot.push(notice, now.into_std());
                    let _ = notices.send(slot.active(now.into_std()).cloned());

                    let outcome = engine.apply(event);
                    tracing::debug!(kind = %R::KIND, ?outcome, "applied push event");
                    let _ = state.send(ListState::Ready(engine.records().to_vec()));
                    settle_at = Some(now + settle);
                }
                Some(PushUpdate::Refresh) => {
                    settle_at = Some(Instant::now() + settle);
                }
                None => break,
            },
            command = commands.recv() => match command {
                Some(Command::Refresh) => {
                    settle_at = None;
                    refetch(source.as_ref(), &mut engine, &state, true).await;
                }
                None => break,
            },
            () = deadline(settle_at) => {
                settle_at = None;
                refetch(source.as_ref(), &mut engine, &state, false).await;
            },
            () = deadline(notice_at) => {
                notice_at = None;
                let _ = notices.send(slot.active(Instant::now().into_std()).cloned());
            },
        }
    }
}

async fn deadline(at: Option<Instant>) {
    match at {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn refetch<R: LiveRecord>(
    source: &dyn SnapshotSource<R>,
    engine: &mut Reconciler<R>,
    state: &watch::Sender<ListState<R>>,
    manual: bool,
) {
    match source.fetch().await {
        Ok(records) => {
            engine.seed(records);
            let _ = state.send(ListState::Ready(engine.records().to_vec()));
        }
        Err(error) => {
            // A failed backstop re-fetch keeps the last reconciled list;
            // only a view that never loaded stays in the failure panel.
            if manual && matches!(*state.borrow(), ListState::Failed(_)) {
                let _ = state.send(ListState::Failed(error.to_string()));
            } else {
                tracing::warn!(kind = %R::KIND, %error, "re-fetch failed, keeping last list");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use vetsync_core::models::PetTip;

    use super::*;
    use crate::error::ClientError;
    use crate::transport::ChannelTransport;

    struct StubSource {
        records: Mutex<Vec<PetTip>>,
        fail: Mutex<bool>,
        fetches: AtomicUsize,
    }

    impl StubSource {
        fn new(records: Vec<PetTip>) -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(records),
                fail: Mutex::new(false),
                fetches: AtomicUsize::new(0),
            })
        }

        fn set_records(&self, records: Vec<PetTip>) {
            *self.records.lock().unwrap() = records;
        }

        fn set_failing(&self, failing: bool) {
            *self.fail.lock().unwrap() = failing;
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl SnapshotSource<PetTip> for StubSource {
        fn fetch(&self) -> BoxFuture<'_, ClientResult<Vec<PetTip>>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let failing = *self.fail.lock().unwrap();
            let records = self.records.lock().unwrap().clone();
            Box::pin(async move {
                if failing {
                    Err(ClientError::Api("backend unavailable (503)".to_string()))
                } else {
                    Ok(records)
                }
            })
        }
    }

    fn identity() -> ActorIdentity {
        ActorIdentity::new("7", "Dr. Reyes")
    }

    fn tip_created_frame(id: i64, title: &str) -> serde_json::Value {
        json!({
            "tip": {"id": id, "title": title, "createdAt": "2025-10-01T00:00:00Z"},
            "adminName": "Dr. Reyes"
        })
    }

    async fn wait_ready(state: &mut watch::Receiver<ListState<PetTip>>) -> Vec<PetTip> {
        loop {
            if let ListState::Ready(records) = &*state.borrow() {
                return records.clone();
            }
            state.changed().await.unwrap();
        }
    }

    /// Poll a condition while the paused clock auto-advances. watch sends
    /// coalesce, so observable conditions beat counting notifications.
    async fn wait_for(mut condition: impl FnMut() -> bool) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("condition not met within the advanced window");
    }

    #[tokio::test(start_paused = true)]
    async fn initial_snapshot_moves_loading_to_ready() {
        let source = StubSource::new(vec![PetTip::new(1, "A")]);
        let transport: Arc<dyn Transport> = Arc::new(ChannelTransport::new());
        let live = LiveList::<PetTip>::spawn(
            Arc::clone(&source) as Arc<dyn SnapshotSource<PetTip>>,
            &transport,
            &identity(),
            Duration::from_secs(1),
        );

        let mut state = live.state();
        assert_eq!(*state.borrow(), ListState::Loading);

        let records = wait_ready(&mut state).await;
        assert_eq!(records.len(), 1);
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn push_event_patches_list_then_backstop_refetches() {
        let source = StubSource::new(vec![PetTip::new(1, "A")]);
        let transport = Arc::new(ChannelTransport::new());
        let shared: Arc<dyn Transport> = Arc::clone(&transport) as Arc<dyn Transport>;
        let live = LiveList::<PetTip>::spawn(
            Arc::clone(&source) as Arc<dyn SnapshotSource<PetTip>>,
            &shared,
            &identity(),
            Duration::from_secs(1),
        );

        let mut state = live.state();
        wait_ready(&mut state).await;

        // The backend committed tip 2 before pushing the announcement.
        source.set_records(vec![PetTip::new(2, "B"), PetTip::new(1, "A")]);
        transport.emit("admin_tip_created", tip_created_frame(2, "B"));

        let patched = live.state();
        wait_for(move || {
            matches!(&*patched.borrow(), ListState::Ready(records)
                if records.iter().map(|tip| tip.id.0).collect::<Vec<_>>() == vec![2, 1])
        })
        .await;

        // The settle window elapses (paused clock auto-advances) and the
        // authoritative snapshot supersedes the patched list.
        wait_for(|| source.fetches() == 2).await;
        let final_state = live.state();
        assert!(matches!(&*final_state.borrow(), ListState::Ready(records) if records.len() == 2));
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_events_coalesce_into_one_refetch() {
        let source = StubSource::new(vec![]);
        let transport = Arc::new(ChannelTransport::new());
        let shared: Arc<dyn Transport> = Arc::clone(&transport) as Arc<dyn Transport>;
        let live = LiveList::<PetTip>::spawn(
            Arc::clone(&source) as Arc<dyn SnapshotSource<PetTip>>,
            &shared,
            &identity(),
            Duration::from_secs(1),
        );

        let mut state = live.state();
        wait_ready(&mut state).await;

        transport.emit("admin_tip_created", tip_created_frame(1, "A"));
        transport.emit("admin_tip_created", tip_created_frame(2, "B"));

        // Both events land inside one settle window, so the backstop runs once.
        wait_for(|| source.fetches() == 2).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_initial_snapshot_recovers_via_refresh() {
        let source = StubSource::new(vec![PetTip::new(1, "A")]);
        source.set_failing(true);
        let transport: Arc<dyn Transport> = Arc::new(ChannelTransport::new());
        let live = LiveList::<PetTip>::spawn(
            Arc::clone(&source) as Arc<dyn SnapshotSource<PetTip>>,
            &transport,
            &identity(),
            Duration::from_secs(1),
        );

        let mut state = live.state();
        state.changed().await.unwrap();
        assert!(matches!(&*state.borrow(), ListState::Failed(message) if message.contains("503")));

        source.set_failing(false);
        live.refresh();
        let records = wait_ready(&mut state).await;
        assert_eq!(records.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn notices_appear_and_expire() {
        let source = StubSource::new(vec![]);
        let transport = Arc::new(ChannelTransport::new());
        let shared: Arc<dyn Transport> = Arc::clone(&transport) as Arc<dyn Transport>;
        let live = LiveList::<PetTip>::spawn(
            Arc::clone(&source) as Arc<dyn SnapshotSource<PetTip>>,
            &shared,
            &identity(),
            Duration::from_secs(1),
        );

        let mut state = live.state();
        wait_ready(&mut state).await;

        let mut notices = live.notices();
        transport.emit("admin_tip_created", tip_created_frame(1, "A"));

        notices.changed().await.unwrap();
        let summary = notices
            .borrow()
            .as_ref()
            .map(|notice| notice.summary.clone());
        assert_eq!(summary, Some("Dr. Reyes created a pet tip".to_string()));

        // The created window (3 s) elapses and the slot empties.
        notices.changed().await.unwrap();
        assert_eq!(*notices.borrow(), None);
    }
}
