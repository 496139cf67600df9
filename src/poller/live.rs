//! The live metrics poller
//!
//! One task owns the history buffer and the fetch cadence. Every cycle it
//! fetches, validates per metric, updates history and status, and
//! publishes a [`DashboardSnapshot`] over a watch channel. Network or
//! parse failures blank the displays and drive a bounded reconnection
//! loop; on the configured consecutive-failure budget the poller reports
//! permanent failure and stops.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::source::LiveDataSource;
use super::status::{ConnectionStatus, DashboardSnapshot};
use crate::client::ApiError;
use crate::config::PollerSettings;
use crate::vitals::{time_label, Reading, SampleHistory, ValidatedSample};

/// Poller cadence and budget configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Normal fetch interval
    pub poll_interval: Duration,
    /// Spacing between reconnection attempts
    pub reconnect_delay: Duration,
    /// Consecutive fetch failures tolerated before giving up
    pub max_consecutive_failures: u32,
    /// Chart history length
    pub history_capacity: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(5),
            max_consecutive_failures: 3,
            history_capacity: crate::vitals::DEFAULT_CAPACITY,
        }
    }
}

impl From<&PollerSettings> for PollerConfig {
    fn from(settings: &PollerSettings) -> Self {
        Self {
            poll_interval: Duration::from_secs(settings.poll_interval_secs.max(1)),
            reconnect_delay: Duration::from_secs(settings.reconnect_delay_secs.max(1)),
            max_consecutive_failures: settings.max_consecutive_failures.max(1),
            history_capacity: settings.history_points,
        }
    }
}

/// What the loop should do after one poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Healthy cycle; wait the normal interval
    Continue,
    /// Fetch failed; retry after the reconnect delay
    Retry,
    /// Failure budget exhausted; stop polling
    Stop,
}

/// Live metrics poller
pub struct LivePoller<S> {
    source: S,
    config: PollerConfig,
    history: SampleHistory,
    status: ConnectionStatus,
    heart_rate: Reading,
    spo2: Reading,
    resp_rate: Reading,
    last_updated: Option<String>,
    consecutive_failures: u32,
    tx: watch::Sender<DashboardSnapshot>,
}

impl<S: LiveDataSource> LivePoller<S> {
    /// Create a poller and the receiver its snapshots arrive on.
    pub fn new(source: S, config: PollerConfig) -> (Self, watch::Receiver<DashboardSnapshot>) {
        let (tx, rx) = watch::channel(DashboardSnapshot::default());
        let history = SampleHistory::new(config.history_capacity);
        let poller = Self {
            source,
            config,
            history,
            status: ConnectionStatus::Disconnected,
            heart_rate: Reading::Missing,
            spo2: Reading::Missing,
            resp_rate: Reading::Missing,
            last_updated: None,
            consecutive_failures: 0,
            tx,
        };
        (poller, rx)
    }

    /// Seed the chart with recent history fetched at dashboard entry.
    ///
    /// Out-of-range or non-positive rows are skipped the same way live
    /// samples would be.
    pub fn warm_history(&mut self, labels: &[String], hr: &[i64], spo2: &[i64], resp: &[i64]) {
        for (((label, hr), spo2), resp) in labels.iter().zip(hr).zip(spo2).zip(resp) {
            let sample = ValidatedSample::validate(label, Some(*hr), Some(*spo2), Some(*resp));
            if sample.all_valid() {
                self.history.push(label.clone(), *hr, *spo2, *resp);
            }
        }
        tracing::debug!(points = self.history.len(), "warmed chart history");
        self.publish();
    }

    /// Run one fetch-and-validate cycle.
    pub async fn poll_once(&mut self) -> PollOutcome {
        match self.source.fetch_live().await {
            Ok(payload) => {
                self.apply_sample(payload.validate());
                PollOutcome::Continue
            }
            Err(error) => self.apply_failure(error),
        }
    }

    /// Drive the poll loop until permanent failure or task abort.
    pub async fn run(mut self) {
        loop {
            match self.poll_once().await {
                PollOutcome::Continue => tokio::time::sleep(self.config.poll_interval).await,
                PollOutcome::Retry => tokio::time::sleep(self.config.reconnect_delay).await,
                PollOutcome::Stop => break,
            }
        }
    }

    /// Current state as a snapshot.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            status: self.status,
            heart_rate: self.heart_rate,
            spo2: self.spo2,
            resp_rate: self.resp_rate,
            history: self.history.series(),
            last_updated: self.last_updated.clone(),
            consecutive_failures: self.consecutive_failures,
        }
    }

    fn apply_sample(&mut self, sample: ValidatedSample) {
        self.consecutive_failures = 0;
        self.status = ConnectionStatus::from_sample(&sample);
        self.heart_rate = sample.heart_rate;
        self.spo2 = sample.spo2;
        self.resp_rate = sample.resp_rate;

        if let Some((hr, spo2, resp)) = sample.values() {
            if self.history.push(time_label(), hr, spo2, resp) {
                tracing::debug!(hr, spo2, resp, timestamp = %sample.timestamp, "new sample charted");
            }
            self.last_updated = Some(sample.timestamp);
        } else {
            tracing::debug!(
                valid = sample.valid_count(),
                timestamp = %sample.timestamp,
                "sample not charted"
            );
        }

        self.publish();
    }

    fn apply_failure(&mut self, error: ApiError) -> PollOutcome {
        self.consecutive_failures += 1;
        self.heart_rate = Reading::Missing;
        self.spo2 = Reading::Missing;
        self.resp_rate = Reading::Missing;

        let outcome = if self.consecutive_failures >= self.config.max_consecutive_failures {
            self.status = ConnectionStatus::Failed;
            tracing::error!(
                %error,
                failures = self.consecutive_failures,
                "giving up after repeated fetch failures"
            );
            PollOutcome::Stop
        } else {
            self.status = ConnectionStatus::Disconnected;
            tracing::warn!(
                %error,
                attempt = self.consecutive_failures,
                max = self.config.max_consecutive_failures,
                "live data fetch failed, will retry"
            );
            PollOutcome::Retry
        };

        self.publish();
        outcome
    }

    fn publish(&self) {
        self.tx.send_replace(self.snapshot());
    }
}

/// Handle to a spawned poller task
pub struct PollerHandle {
    /// Snapshot stream for the render layer
    pub updates: watch::Receiver<DashboardSnapshot>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Launch a prepared poller, e.g. one whose history was warmed first.
    pub fn launch<S>(poller: LivePoller<S>, updates: watch::Receiver<DashboardSnapshot>) -> Self
    where
        S: LiveDataSource + 'static,
    {
        let task = tokio::spawn(poller.run());
        Self { updates, task }
    }

    /// Stop polling. Idempotent; also invoked on drop.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a poller onto the runtime and hand back its update stream.
pub fn spawn<S>(source: S, config: PollerConfig) -> PollerHandle
where
    S: LiveDataSource + 'static,
{
    let (poller, updates) = LivePoller::new(source, config);
    PollerHandle::launch(poller, updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LiveDataResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted source: pops queued responses, then keeps failing.
    struct FakeSource {
        responses: Mutex<Vec<Result<LiveDataResponse, ApiError>>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(responses: Vec<Result<LiveDataResponse, ApiError>>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LiveDataSource for FakeSource {
        async fn fetch_live(&self) -> Result<LiveDataResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(ApiError::Unavailable))
        }
    }

    fn payload(hr: i64, spo2: i64, resp: i64) -> Result<LiveDataResponse, ApiError> {
        Ok(serde_json::from_value(json!({
            "timestamp": "12:00:00",
            "heartRate": hr,
            "spo2": spo2,
            "resp": resp,
        }))
        .unwrap())
    }

    fn sentinel_payload() -> Result<LiveDataResponse, ApiError> {
        Ok(serde_json::from_value(json!({
            "timestamp": "",
            "heartRate": "--",
            "spo2": "--",
            "resp": "--",
        }))
        .unwrap())
    }

    fn test_config() -> PollerConfig {
        PollerConfig::default()
    }

    #[tokio::test]
    async fn test_valid_sample_connects_and_charts() {
        let (mut poller, rx) = LivePoller::new(FakeSource::new(vec![payload(75, 98, 16)]), test_config());

        assert_eq!(poller.poll_once().await, PollOutcome::Continue);

        let snapshot = rx.borrow();
        assert_eq!(snapshot.status, ConnectionStatus::Connected);
        assert_eq!(snapshot.heart_rate, Reading::Valid(75));
        assert_eq!(snapshot.spo2, Reading::Valid(98));
        assert_eq!(snapshot.resp_rate, Reading::Valid(16));
        assert_eq!(snapshot.history.len(), 1);
        assert_eq!(snapshot.last_updated.as_deref(), Some("12:00:00"));
    }

    #[tokio::test]
    async fn test_out_of_range_metric_is_partial_and_not_charted() {
        let (mut poller, rx) = LivePoller::new(
            FakeSource::new(vec![payload(75, 98, 16), payload(220, 98, 16)]),
            test_config(),
        );

        poller.poll_once().await;
        poller.poll_once().await;

        let snapshot = rx.borrow();
        assert_eq!(snapshot.status, ConnectionStatus::Partial);
        // The invalid metric shows the placeholder, the others update.
        assert_eq!(snapshot.heart_rate.display(), "--");
        assert_eq!(snapshot.spo2, Reading::Valid(98));
        assert_eq!(snapshot.resp_rate, Reading::Valid(16));
        // Buffer unchanged by the partial sample.
        assert_eq!(snapshot.history.len(), 1);
    }

    #[tokio::test]
    async fn test_sentinel_payload_is_disconnected() {
        let (mut poller, rx) =
            LivePoller::new(FakeSource::new(vec![sentinel_payload()]), test_config());

        assert_eq!(poller.poll_once().await, PollOutcome::Continue);

        let snapshot = rx.borrow();
        assert_eq!(snapshot.status, ConnectionStatus::Disconnected);
        assert_eq!(snapshot.heart_rate.display(), "--");
        assert!(snapshot.history.is_empty());
    }

    #[tokio::test]
    async fn test_three_consecutive_failures_give_up() {
        let source = FakeSource::new(vec![]);
        let (mut poller, rx) = LivePoller::new(source, test_config());

        assert_eq!(poller.poll_once().await, PollOutcome::Retry);
        assert_eq!(rx.borrow().status, ConnectionStatus::Disconnected);

        assert_eq!(poller.poll_once().await, PollOutcome::Retry);
        assert_eq!(poller.poll_once().await, PollOutcome::Stop);

        let snapshot = rx.borrow();
        assert_eq!(snapshot.status, ConnectionStatus::Failed);
        assert_eq!(snapshot.consecutive_failures, 3);
        assert_eq!(snapshot.heart_rate.display(), "--");
    }

    #[tokio::test]
    async fn test_success_resets_failure_count() {
        let (mut poller, rx) = LivePoller::new(
            FakeSource::new(vec![
                Err(ApiError::Unavailable),
                Err(ApiError::Timeout),
                payload(75, 98, 16),
                Err(ApiError::Unavailable),
            ]),
            test_config(),
        );

        assert_eq!(poller.poll_once().await, PollOutcome::Retry);
        assert_eq!(poller.poll_once().await, PollOutcome::Retry);
        assert_eq!(poller.poll_once().await, PollOutcome::Continue);
        assert_eq!(rx.borrow().consecutive_failures, 0);

        // The count restarts: the next failure is 1 of 3, not 3 of 3.
        assert_eq!(poller.poll_once().await, PollOutcome::Retry);
        assert_eq!(rx.borrow().status, ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_run_stops_after_budget_and_fetches_no_more() {
        let config = PollerConfig {
            poll_interval: Duration::from_millis(1),
            reconnect_delay: Duration::from_millis(1),
            ..PollerConfig::default()
        };
        let source = std::sync::Arc::new(FakeSource::new(vec![]));

        struct Shared(std::sync::Arc<FakeSource>);
        #[async_trait]
        impl LiveDataSource for Shared {
            async fn fetch_live(&self) -> Result<LiveDataResponse, ApiError> {
                self.0.fetch_live().await
            }
        }

        let (poller, rx) = LivePoller::new(Shared(source.clone()), config);
        poller.run().await;

        assert_eq!(rx.borrow().status, ConnectionStatus::Failed);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_history_capped_at_capacity() {
        let responses: Vec<_> = (0..40).map(|i| payload(60 + i % 20, 97, 16)).collect();
        let (mut poller, rx) = LivePoller::new(FakeSource::new(responses), test_config());

        for _ in 0..40 {
            poller.poll_once().await;
        }

        let snapshot = rx.borrow();
        assert_eq!(snapshot.history.len(), 30);
        // Oldest entries dropped first.
        assert_eq!(snapshot.history.heart_rate[0], (60 + 10 % 20) as f64);
    }

    #[tokio::test]
    async fn test_warm_history_skips_invalid_rows() {
        let (mut poller, rx) = LivePoller::new(FakeSource::new(vec![]), test_config());

        poller.warm_history(
            &[
                "11:59:40".to_string(),
                "11:59:50".to_string(),
                "12:00:00".to_string(),
            ],
            &[72, 250, 74],
            &[97, 97, 98],
            &[15, 15, 16],
        );

        let snapshot = rx.borrow();
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history.labels[0], "11:59:40");
    }
}
