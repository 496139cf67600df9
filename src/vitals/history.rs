//! Bounded sample history backing the dashboard chart
//!
//! The chart consumes four parallel series (time labels plus the three
//! vitals). The buffer stores whole points in a single ring, so those
//! series are equal-length by construction rather than by discipline.

use chrono::Local;
use std::collections::VecDeque;

/// How many points the chart keeps before dropping the oldest.
pub const DEFAULT_CAPACITY: usize = 30;

/// One charted point: a display time label plus the three vitals
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub label: String,
    pub heart_rate: i64,
    pub spo2: i64,
    pub resp_rate: i64,
}

/// Bounded FIFO history of fully valid samples
#[derive(Debug, Clone)]
pub struct SampleHistory {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl SampleHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest once the cap is reached.
    ///
    /// Non-positive values never reach the chart: the push is a logged
    /// no-op and returns `false`.
    pub fn push(
        &mut self,
        label: impl Into<String>,
        heart_rate: i64,
        spo2: i64,
        resp_rate: i64,
    ) -> bool {
        if heart_rate <= 0 || spo2 <= 0 || resp_rate <= 0 {
            tracing::warn!(heart_rate, spo2, resp_rate, "chart not updated: non-positive sample");
            return false;
        }

        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(HistoryPoint {
            label: label.into(),
            heart_rate,
            spo2,
            resp_rate,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently appended point
    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    /// Snapshot of the buffer as parallel series for chart rendering
    pub fn series(&self) -> HistorySeries {
        let mut series = HistorySeries::default();
        for point in &self.points {
            series.labels.push(point.label.clone());
            series.heart_rate.push(point.heart_rate as f64);
            series.spo2.push(point.spo2 as f64);
            series.resp_rate.push(point.resp_rate as f64);
        }
        series
    }
}

impl Default for SampleHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Parallel series view handed to the chart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySeries {
    pub labels: Vec<String>,
    pub heart_rate: Vec<f64>,
    pub spo2: Vec<f64>,
    pub resp_rate: Vec<f64>,
}

impl HistorySeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Client-side time label for a freshly appended point (HH:MM:SS, local).
pub fn time_label() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> SampleHistory {
        let mut history = SampleHistory::new(DEFAULT_CAPACITY);
        for i in 0..n {
            history.push(format!("12:00:{i:02}"), 70 + i as i64 % 10, 97, 16);
        }
        history
    }

    #[test]
    fn test_push_and_len() {
        let history = filled(5);
        assert_eq!(history.len(), 5);
        assert_eq!(history.latest().unwrap().label, "12:00:04");
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let history = filled(35);
        assert_eq!(history.len(), DEFAULT_CAPACITY);
        // The first five labels (00..04) were evicted.
        assert_eq!(history.iter().next().unwrap().label, "12:00:05");
        assert_eq!(history.latest().unwrap().label, "12:00:34");
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let mut history = SampleHistory::default();
        assert!(!history.push("12:00:00", 0, 97, 16));
        assert!(!history.push("12:00:01", 75, -1, 16));
        assert!(history.is_empty());
    }

    #[test]
    fn test_series_lengths_match() {
        let history = filled(12);
        let series = history.series();
        assert_eq!(series.len(), 12);
        assert_eq!(series.labels.len(), series.heart_rate.len());
        assert_eq!(series.heart_rate.len(), series.spo2.len());
        assert_eq!(series.spo2.len(), series.resp_rate.len());
    }

    #[test]
    fn test_time_label_shape() {
        let label = time_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
