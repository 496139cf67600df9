//! Vital-sign kinds, ranges, and per-metric validation
//!
//! A payload from the server carries three metrics. Each one is validated
//! independently against its physiological range; a metric that is absent,
//! non-numeric, the `"--"` sentinel, or out of range is invalid on its own
//! without dragging the others down.

use serde::{Deserialize, Serialize};

/// Placeholder shown wherever a metric has no trustworthy value.
pub const PLACEHOLDER: &str = "--";

/// The three vital signs the dashboard tracks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    /// Heart rate in beats per minute
    HeartRate,
    /// Peripheral oxygen saturation in percent
    Spo2,
    /// Respiratory rate in breaths per minute
    RespRate,
}

impl VitalKind {
    /// Get all vital kinds for iteration
    pub fn all() -> &'static [VitalKind] {
        &[VitalKind::HeartRate, VitalKind::Spo2, VitalKind::RespRate]
    }

    /// Whether `value` falls inside the physiological range for this vital.
    ///
    /// Heart rate must be strictly between 30 and 200 bpm, SpO2 above 70
    /// and at most 100 percent, respiration strictly between 5 and 50 per
    /// minute.
    pub fn in_range(self, value: i64) -> bool {
        match self {
            VitalKind::HeartRate => value > 30 && value < 200,
            VitalKind::Spo2 => value > 70 && value <= 100,
            VitalKind::RespRate => value > 5 && value < 50,
        }
    }

    /// Human-readable name for cards and chart legends
    pub fn label(self) -> &'static str {
        match self {
            VitalKind::HeartRate => "Heart Rate",
            VitalKind::Spo2 => "SpO2",
            VitalKind::RespRate => "Respiration",
        }
    }

    /// Unit suffix for display
    pub fn unit(self) -> &'static str {
        match self {
            VitalKind::HeartRate => "bpm",
            VitalKind::Spo2 => "%",
            VitalKind::RespRate => "/min",
        }
    }
}

impl std::fmt::Display for VitalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.unit())
    }
}

/// Validation outcome for a single metric in one payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// In-range value, safe to display and chart
    Valid(i64),
    /// Numeric but outside the physiological range
    OutOfRange(i64),
    /// Absent, null, sentinel, or non-numeric
    Missing,
}

impl Reading {
    /// Validate a raw numeric value (or its absence) for `kind`.
    pub fn from_raw(kind: VitalKind, raw: Option<i64>) -> Self {
        match raw {
            None => Reading::Missing,
            Some(v) if kind.in_range(v) => Reading::Valid(v),
            Some(v) => Reading::OutOfRange(v),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Reading::Valid(_))
    }

    /// The value, only when it passed validation
    pub fn value(&self) -> Option<i64> {
        match self {
            Reading::Valid(v) => Some(*v),
            _ => None,
        }
    }

    /// Card text: the value, or the placeholder for anything invalid
    pub fn display(&self) -> String {
        match self {
            Reading::Valid(v) => v.to_string(),
            _ => PLACEHOLDER.to_string(),
        }
    }
}

impl Default for Reading {
    fn default() -> Self {
        Reading::Missing
    }
}

/// One validated payload: the three readings plus the server timestamp
///
/// Built by [`ValidatedSample::validate`], which applies the per-metric
/// partial-validity policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSample {
    /// Server-side measurement timestamp (display string)
    pub timestamp: String,
    pub heart_rate: Reading,
    pub spo2: Reading,
    pub resp_rate: Reading,
}

impl ValidatedSample {
    /// Validate one raw payload.
    ///
    /// An empty timestamp means the server had nothing fresh to report, so
    /// every reading is treated as missing regardless of the metric
    /// fields.
    pub fn validate(
        timestamp: &str,
        heart_rate: Option<i64>,
        spo2: Option<i64>,
        resp_rate: Option<i64>,
    ) -> Self {
        if timestamp.is_empty() {
            return Self {
                timestamp: String::new(),
                heart_rate: Reading::Missing,
                spo2: Reading::Missing,
                resp_rate: Reading::Missing,
            };
        }

        Self {
            timestamp: timestamp.to_string(),
            heart_rate: Reading::from_raw(VitalKind::HeartRate, heart_rate),
            spo2: Reading::from_raw(VitalKind::Spo2, spo2),
            resp_rate: Reading::from_raw(VitalKind::RespRate, resp_rate),
        }
    }

    /// Readings in display order
    pub fn readings(&self) -> [(VitalKind, Reading); 3] {
        [
            (VitalKind::HeartRate, self.heart_rate),
            (VitalKind::Spo2, self.spo2),
            (VitalKind::RespRate, self.resp_rate),
        ]
    }

    /// Number of metrics that passed validation
    pub fn valid_count(&self) -> usize {
        self.readings().iter().filter(|(_, r)| r.is_valid()).count()
    }

    pub fn all_valid(&self) -> bool {
        self.valid_count() == 3
    }

    /// The three values, only when every metric is valid
    pub fn values(&self) -> Option<(i64, i64, i64)> {
        match (self.heart_rate, self.spo2, self.resp_rate) {
            (Reading::Valid(hr), Reading::Valid(sp), Reading::Valid(rr)) => Some((hr, sp, rr)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heart_rate_range_bounds() {
        assert!(!VitalKind::HeartRate.in_range(30));
        assert!(VitalKind::HeartRate.in_range(31));
        assert!(VitalKind::HeartRate.in_range(199));
        assert!(!VitalKind::HeartRate.in_range(200));
    }

    #[test]
    fn test_spo2_range_bounds() {
        assert!(!VitalKind::Spo2.in_range(70));
        assert!(VitalKind::Spo2.in_range(71));
        assert!(VitalKind::Spo2.in_range(100));
        assert!(!VitalKind::Spo2.in_range(101));
    }

    #[test]
    fn test_resp_range_bounds() {
        assert!(!VitalKind::RespRate.in_range(5));
        assert!(VitalKind::RespRate.in_range(6));
        assert!(VitalKind::RespRate.in_range(49));
        assert!(!VitalKind::RespRate.in_range(50));
    }

    #[test]
    fn test_reading_from_raw() {
        assert_eq!(
            Reading::from_raw(VitalKind::HeartRate, Some(75)),
            Reading::Valid(75)
        );
        assert_eq!(
            Reading::from_raw(VitalKind::HeartRate, Some(250)),
            Reading::OutOfRange(250)
        );
        assert_eq!(Reading::from_raw(VitalKind::HeartRate, None), Reading::Missing);
    }

    #[test]
    fn test_reading_display_uses_placeholder() {
        assert_eq!(Reading::Valid(98).display(), "98");
        assert_eq!(Reading::OutOfRange(250).display(), PLACEHOLDER);
        assert_eq!(Reading::Missing.display(), PLACEHOLDER);
    }

    #[test]
    fn test_fully_valid_sample() {
        let sample = ValidatedSample::validate("12:00:00", Some(75), Some(98), Some(16));
        assert!(sample.all_valid());
        assert_eq!(sample.values(), Some((75, 98, 16)));
    }

    #[test]
    fn test_partial_sample_keeps_valid_metrics() {
        let sample = ValidatedSample::validate("12:00:00", Some(220), Some(98), Some(16));
        assert!(!sample.all_valid());
        assert_eq!(sample.valid_count(), 2);
        assert_eq!(sample.heart_rate, Reading::OutOfRange(220));
        assert_eq!(sample.spo2, Reading::Valid(98));
        assert_eq!(sample.values(), None);
    }

    #[test]
    fn test_empty_timestamp_blanks_everything() {
        let sample = ValidatedSample::validate("", Some(75), Some(98), Some(16));
        assert_eq!(sample.valid_count(), 0);
        assert_eq!(sample.heart_rate, Reading::Missing);
    }
}
