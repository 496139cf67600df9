//! Live Metrics Poller
//!
//! Maintains a near-real-time view of the latest sensor readings:
//! - [`LivePoller`]: fixed-interval fetch-and-validate with bounded
//!   reconnection
//! - [`LiveDataSource`]: where readings come from (the HTTP API, or a
//!   scripted fake in tests)
//! - [`ConnectionStatus`] / [`DashboardSnapshot`]: the state updates the
//!   render layer consumes

mod live;
mod source;
mod status;

pub use live::{spawn, LivePoller, PollOutcome, PollerConfig, PollerHandle};
pub use source::LiveDataSource;
pub use status::{ConnectionStatus, DashboardSnapshot};
