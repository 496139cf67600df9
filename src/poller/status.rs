//! Connection status projection and dashboard snapshots

use serde::Serialize;

use crate::vitals::{HistorySeries, Reading, ValidatedSample};

/// Connection state derived from the latest poll cycle
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// All three metrics valid on the last fetch
    Connected,
    /// At least one metric valid, at least one invalid
    Partial,
    /// No valid metric, or the last fetch failed
    Disconnected,
    /// Reconnection budget exhausted; polling has stopped
    Failed,
}

impl ConnectionStatus {
    /// Project a validated sample onto the status indicator.
    pub fn from_sample(sample: &ValidatedSample) -> Self {
        match sample.valid_count() {
            3 => ConnectionStatus::Connected,
            0 => ConnectionStatus::Disconnected,
            _ => ConnectionStatus::Partial,
        }
    }

    /// Status line text
    pub fn message(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Live data streaming",
            ConnectionStatus::Partial => "Partial sensor data",
            ConnectionStatus::Disconnected => "Sensor offline",
            ConnectionStatus::Failed => "Connection failed",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Immutable view-model published by the poller after every cycle.
///
/// The render layer only ever sees these; it never reaches into the
/// poller's state.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub status: ConnectionStatus,
    pub heart_rate: Reading,
    pub spo2: Reading,
    pub resp_rate: Reading,
    /// Chart series, equal-length by construction
    pub history: HistorySeries,
    /// Server timestamp of the last fully valid sample
    pub last_updated: Option<String>,
    /// Consecutive failed fetches behind the current status
    pub consecutive_failures: u32,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            heart_rate: Reading::Missing,
            spo2: Reading::Missing,
            resp_rate: Reading::Missing,
            history: HistorySeries::default(),
            last_updated: None,
            consecutive_failures: 0,
        }
    }
}

impl DashboardSnapshot {
    /// Readings in card order, paired with their labels.
    pub fn readings(&self) -> [(crate::vitals::VitalKind, Reading); 3] {
        use crate::vitals::VitalKind;
        [
            (VitalKind::HeartRate, self.heart_rate),
            (VitalKind::Spo2, self.spo2),
            (VitalKind::RespRate, self.resp_rate),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_projection() {
        let all = ValidatedSample::validate("12:00:00", Some(75), Some(98), Some(16));
        assert_eq!(ConnectionStatus::from_sample(&all), ConnectionStatus::Connected);

        let some = ValidatedSample::validate("12:00:00", Some(220), Some(98), Some(16));
        assert_eq!(ConnectionStatus::from_sample(&some), ConnectionStatus::Partial);

        let none = ValidatedSample::validate("12:00:00", None, None, None);
        assert_eq!(
            ConnectionStatus::from_sample(&none),
            ConnectionStatus::Disconnected
        );
    }

    #[test]
    fn test_default_snapshot_is_blank() {
        let snapshot = DashboardSnapshot::default();
        assert_eq!(snapshot.status, ConnectionStatus::Disconnected);
        assert!(snapshot.history.is_empty());
        assert_eq!(snapshot.heart_rate.display(), "--");
    }
}
