//! Poll coordinator: cached snapshot, availability flag, coalesced refresh.

use crate::sources::{SettingsSource, SnapshotSource, SourceError, StatusSource};
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use genwatch_adapter_http::Transport;
use genwatch_core::Snapshot;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Fixed refresh interval for both coordinators.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

type RefreshResult = Result<Arc<Snapshot>, RefreshFailed>;
type InFlight = Shared<BoxFuture<'static, RefreshResult>>;

#[derive(Default)]
struct State {
    data: Option<Arc<Snapshot>>,
    last_update_succeeded: bool,
    last_success_at: Option<DateTime<Utc>>,
    in_flight: Option<InFlight>,
}

struct Inner {
    transport: Arc<dyn Transport>,
    source: Arc<dyn SnapshotSource>,
    state: Mutex<State>,
    generation: watch::Sender<u64>,
}

/// Owns the cached snapshot of one device/source pair.
///
/// Cloning is cheap and every clone shares the same cache, so adapters can
/// each hold one. Adapters only ever see whole snapshots.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

impl Coordinator {
    /// Create a coordinator. No request is made until the first refresh.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, source: impl SnapshotSource + 'static) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                transport,
                source: Arc::new(source),
                state: Mutex::new(State::default()),
                generation,
            }),
        }
    }

    /// Coordinator for the status feed.
    #[must_use]
    pub fn status(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, StatusSource)
    }

    /// Coordinator for the load and exercise settings pages.
    #[must_use]
    pub fn settings(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, SettingsSource)
    }

    /// Coordinator name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.source.name()
    }

    /// Device host.
    #[must_use]
    pub fn host(&self) -> &str {
        self.inner.transport.host()
    }

    /// Last successful snapshot, `None` before the first success.
    #[must_use]
    pub fn data(&self) -> Option<Arc<Snapshot>> {
        self.inner.state.lock().data.clone()
    }

    /// Whether the most recent refresh succeeded.
    #[must_use]
    pub fn last_update_succeeded(&self) -> bool {
        self.inner.state.lock().last_update_succeeded
    }

    /// Time of the most recent successful refresh.
    #[must_use]
    pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
        self.inner.state.lock().last_success_at
    }

    /// Watch refresh completions. The value counts finished refreshes,
    /// successful or not.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.generation.subscribe()
    }

    /// Refresh now, or join the refresh already in flight.
    ///
    /// At most one fetch runs at a time; concurrent callers all receive the
    /// result of that single fetch.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshFailed`] if any required endpoint fails. The cached
    /// snapshot is left untouched in that case.
    pub async fn refresh(&self) -> RefreshResult {
        let in_flight = self
            .inner
            .state
            .lock()
            .in_flight
            .get_or_insert_with(|| self.fetch_once())
            .clone();
        in_flight.await
    }

    /// One shared fetch. It holds the coordinator weakly so a fetch that
    /// nobody awaits any more never keeps the coordinator alive.
    fn fetch_once(&self) -> InFlight {
        let transport = Arc::clone(&self.inner.transport);
        let source = Arc::clone(&self.inner.source);
        let inner = Arc::downgrade(&self.inner);
        async move {
            let result = source.fetch(transport.as_ref()).await;
            Inner::commit(&inner, source.name(), result)
        }
        .boxed()
        .shared()
    }

    /// Refresh and swallow the error. Failures are already logged and
    /// reflected in [`Self::last_update_succeeded`].
    pub async fn request_refresh(&self) {
        let _ = self.refresh().await;
    }

    /// Initial refresh at setup. Failure means the device is not ready.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::NotReady`] if the refresh fails.
    pub async fn first_refresh(&self) -> Result<Arc<Snapshot>, SetupError> {
        self.refresh().await.map_err(|err| SetupError::NotReady {
            coordinator: err.coordinator,
            reason: err.reason,
        })
    }

    /// Refresh every `period` until the returned task is stopped or dropped.
    ///
    /// The first tick is one `period` from now; setup has already done the
    /// first refresh.
    #[must_use]
    pub fn start(&self, period: Duration) -> PollTask {
        let coordinator = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                coordinator.request_refresh().await;
            }
        });

        tracing::debug!(coordinator = self.name(), host = %self.host(), ?period, "Polling started");

        PollTask {
            name: self.name(),
            handle,
        }
    }
}

impl Inner {
    fn commit(
        inner: &Weak<Self>,
        name: &'static str,
        result: Result<Snapshot, SourceError>,
    ) -> RefreshResult {
        let Some(this) = inner.upgrade() else {
            tracing::debug!(coordinator = name, "Coordinator gone, discarding refresh");
            return Err(RefreshFailed {
                coordinator: name,
                reason: "coordinator unloaded".to_string(),
            });
        };

        let outcome = {
            let mut state = this.state.lock();
            state.in_flight = None;
            match result {
                Ok(snapshot) => {
                    if !state.last_update_succeeded && state.data.is_some() {
                        tracing::info!(coordinator = name, host = %this.transport.host(), "Device reachable again");
                    }
                    let snapshot = Arc::new(snapshot);
                    state.data = Some(Arc::clone(&snapshot));
                    state.last_update_succeeded = true;
                    state.last_success_at = Some(Utc::now());
                    tracing::debug!(coordinator = name, fields = snapshot.len(), "Refresh succeeded");
                    Ok(snapshot)
                }
                Err(err) => {
                    state.last_update_succeeded = false;
                    tracing::warn!(coordinator = name, host = %this.transport.host(), error = %err, "Refresh failed");
                    Err(RefreshFailed {
                        coordinator: name,
                        reason: err.to_string(),
                    })
                }
            }
        };

        this.generation.send_modify(|g| *g += 1);
        outcome
    }
}

/// Handle of a running poll loop. Dropping it stops the loop.
pub struct PollTask {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl PollTask {
    /// Stop polling. A refresh in flight is abandoned.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        tracing::debug!(coordinator = self.name, "Polling stopped");
        self.handle.abort();
    }
}

/// A refresh did not produce a snapshot.
///
/// Network failures, error statuses, and undecodable feeds all fold into this.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{coordinator} refresh failed: {reason}")]
pub struct RefreshFailed {
    /// Coordinator name
    pub coordinator: &'static str,
    /// Underlying cause
    pub reason: String,
}

/// Errors that abort setup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// The first refresh failed
    #[error("cannot connect to generator ({coordinator}): {reason}")]
    NotReady {
        /// Coordinator name
        coordinator: &'static str,
        /// Underlying cause
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::future::join_all;
    use genwatch_adapter_http::{EndpointResponse, TransportError};
    use genwatch_core::FieldValue;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Controller stand-in: serves fixed pages after a short delay.
    #[derive(Default)]
    struct FakeDevice {
        pages: Mutex<HashMap<&'static str, (u16, String)>>,
        calls: AtomicUsize,
        offline: AtomicBool,
    }

    impl FakeDevice {
        fn serve(&self, path: &'static str, status: u16, body: &str) {
            self.pages.lock().insert(path, (status, body.to_string()));
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for FakeDevice {
        async fn fetch(
            &self,
            path: &str,
            _query: Option<&str>,
        ) -> Result<EndpointResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            if self.offline.load(Ordering::SeqCst) {
                return Err(TransportError::Request("connection refused".to_string()));
            }
            let (status_code, body) = self
                .pages
                .lock()
                .get(path)
                .cloned()
                .unwrap_or((404, String::new()));
            Ok(EndpointResponse { status_code, body })
        }

        fn host(&self) -> &str {
            "genset.local"
        }
    }

    fn status_feed(state: &str, lcd_status: &str) -> String {
        let mut lines = vec!["0"; 18];
        lines[3] = "125";
        lines[4] = state;
        lines[13] = lcd_status;
        lines.join("\n")
    }

    fn status_device() -> Arc<FakeDevice> {
        let device = Arc::new(FakeDevice::default());
        device.serve("/index_data.html", 200, &status_feed("4", "12"));
        device
    }

    #[tokio::test]
    async fn concurrent_refreshes_share_one_fetch() {
        let device = status_device();
        let coordinator = Coordinator::status(device.clone());

        let results = join_all((0..8).map(|_| coordinator.refresh())).await;

        assert_eq!(device.calls(), 1);
        let first = results[0].clone().unwrap();
        for result in results {
            assert!(Arc::ptr_eq(&first, &result.unwrap()));
        }
        assert_eq!(first.get("status"), Some(&FieldValue::from("Running")));
    }

    #[tokio::test]
    async fn sequential_refreshes_fetch_again() {
        let device = status_device();
        let coordinator = Coordinator::status(device.clone());

        coordinator.refresh().await.unwrap();
        coordinator.refresh().await.unwrap();

        assert_eq!(device.calls(), 2);
    }

    #[tokio::test]
    async fn empty_before_first_success() {
        let coordinator = Coordinator::status(status_device());
        assert!(coordinator.data().is_none());
        assert!(!coordinator.last_update_succeeded());
        assert!(coordinator.last_success_at().is_none());
    }

    #[tokio::test]
    async fn failure_keeps_stale_snapshot() {
        let device = status_device();
        let coordinator = Coordinator::status(device.clone());

        let good = coordinator.refresh().await.unwrap();
        assert!(coordinator.last_update_succeeded());
        let stamp = coordinator.last_success_at();

        device.offline.store(true, Ordering::SeqCst);
        let err = coordinator.refresh().await.unwrap_err();

        assert_eq!(err.coordinator, "status");
        assert!(!coordinator.last_update_succeeded());
        assert!(Arc::ptr_eq(&good, &coordinator.data().unwrap()));
        assert_eq!(coordinator.last_success_at(), stamp);

        device.offline.store(false, Ordering::SeqCst);
        coordinator.refresh().await.unwrap();
        assert!(coordinator.last_update_succeeded());
    }

    #[tokio::test]
    async fn error_status_is_a_failure() {
        let device = Arc::new(FakeDevice::default());
        device.serve("/index_data.html", 401, "");
        let coordinator = Coordinator::status(device);

        let err = coordinator.refresh().await.unwrap_err();
        assert!(err.reason.contains("401"), "{}", err.reason);
    }

    #[tokio::test]
    async fn first_refresh_failure_is_not_ready() {
        let device = Arc::new(FakeDevice::default());
        device.offline.store(true, Ordering::SeqCst);
        let coordinator = Coordinator::status(device);

        let err = coordinator.first_refresh().await.unwrap_err();
        assert!(matches!(err, SetupError::NotReady { coordinator: "status", .. }));
        assert!(coordinator.data().is_none());
    }

    #[tokio::test]
    async fn settings_merges_three_pages() {
        let device = Arc::new(FakeDevice::default());
        device.serve(
            "/loads.html",
            200,
            r#"writeSingleOption( 1, !(0 & 0x01), "Manual" );"#,
        );
        device.serve("/loads_data.html", 200, "0\n1\n0\n");
        device.serve(
            "/exercise.html",
            200,
            r#"var match = 1; writeSingleOption(0,match == 0, "Never"); var match = 3;"#,
        );
        let coordinator = Coordinator::settings(device.clone());

        let snapshot = coordinator.first_refresh().await.unwrap();

        assert_eq!(device.calls(), 3);
        assert_eq!(coordinator.name(), "settings");
        assert_eq!(snapshot.get("load_mode"), Some(&FieldValue::from("Manual")));
        assert_eq!(snapshot.get("load_1"), Some(&FieldValue::from("Disconnected")));
        assert_eq!(snapshot.get("load_2"), Some(&FieldValue::from("Connected")));
        assert_eq!(
            snapshot.get("exercise_frequency"),
            Some(&FieldValue::from("Weekly"))
        );
        assert_eq!(snapshot.get("exercise_minute"), Some(&FieldValue::from("45")));
    }

    #[tokio::test]
    async fn subscribers_see_each_completion() {
        let device = status_device();
        let coordinator = Coordinator::status(device.clone());
        let mut updates = coordinator.subscribe();

        coordinator.refresh().await.unwrap();
        updates.changed().await.unwrap();
        assert_eq!(*updates.borrow_and_update(), 1);

        device.offline.store(true, Ordering::SeqCst);
        let _ = coordinator.refresh().await;
        updates.changed().await.unwrap();
        assert_eq!(*updates.borrow_and_update(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_task_refreshes_on_interval() {
        let device = status_device();
        let coordinator = Coordinator::status(device.clone());

        let task = coordinator.start(POLL_INTERVAL);
        assert_eq!(device.calls(), 0);

        tokio::time::sleep(POLL_INTERVAL * 2 + Duration::from_secs(1)).await;
        assert_eq!(device.calls(), 2);

        task.stop();
        tokio::time::sleep(POLL_INTERVAL * 2).await;
        assert_eq!(device.calls(), 2);
    }

    /// Controller that accepts the connection and never answers.
    #[derive(Default)]
    struct HungDevice {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for HungDevice {
        async fn fetch(
            &self,
            _path: &str,
            _query: Option<&str>,
        ) -> Result<EndpointResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }

        fn host(&self) -> &str {
            "genset.local"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_releases_hung_refresh() {
        let device = Arc::new(HungDevice::default());
        let coordinator = Coordinator::status(device.clone());
        let task = coordinator.start(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(device.calls.load(Ordering::SeqCst), 1);
        assert!(Arc::strong_count(&device) > 1);

        task.stop();
        drop(coordinator);
        for _ in 0..10 {
            if Arc::strong_count(&device) == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(Arc::strong_count(&device), 1);
    }
}
