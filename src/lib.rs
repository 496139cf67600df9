//! # VitaScope Client
//!
//! Native client for the VitaScope vitals-monitoring dashboard. Signs in
//! against the dashboard server (login, one-time-code verification,
//! registration) and then keeps a live view of the latest heart rate,
//! SpO2, and respiration readings.
//!
//! ## Modules
//!
//! - [`vitals`]: sample model, physiological validation, bounded history
//! - [`poller`]: the live metrics poller and its dashboard snapshots
//! - [`client`]: typed HTTP client for the dashboard server
//! - [`auth`]: client-side form heuristics (strength meter, code input,
//!   flash messages)
//! - [`ui`]: the terminal screens consuming poller snapshots
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vitascope::client::ApiClient;
//! use vitascope::config::Config;
//! use vitascope::poller::{spawn, PollerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let api = ApiClient::new(&config.server)?;
//!
//!     // Poll the live endpoint and watch the snapshots arrive.
//!     let mut handle = spawn(api, PollerConfig::from(&config.poller));
//!     while handle.updates.changed().await.is_ok() {
//!         let snapshot = handle.updates.borrow().clone();
//!         println!("{}: hr={}", snapshot.status, snapshot.heart_rate.display());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod poller;
pub mod ui;
pub mod vitals;

// Re-export top-level types for convenience
pub use vitals::{
    HistoryPoint, HistorySeries, Reading, SampleHistory, ValidatedSample, VitalKind, PLACEHOLDER,
};

pub use poller::{
    spawn, ConnectionStatus, DashboardSnapshot, LiveDataSource, LivePoller, PollOutcome,
    PollerConfig, PollerHandle,
};

pub use client::{
    ApiClient, ApiError, AuthOutcome, LiveDataResponse, MeasurementHistory, ProfileResponse,
    ResendOtpResponse, WireMetric,
};

pub use auth::{
    confirm_state, password_strength, FlashBoard, FlashLevel, LoginForm, MatchState, OtpInput,
    RegisterForm, ResendCooldown, StrengthLabel, StrengthReport,
};

pub use config::{Config, ConfigError, LoggingConfig, PollerSettings, ServerConfig, UiConfig};
