//! Live data source abstraction

use async_trait::async_trait;

use crate::client::{ApiClient, ApiError, LiveDataResponse};

/// Where live readings come from.
///
/// The dashboard polls the HTTP API; tests plug in a scripted fake so the
/// poller can be exercised without a network.
#[async_trait]
pub trait LiveDataSource: Send + Sync {
    /// Fetch the latest reading from the server.
    async fn fetch_live(&self) -> Result<LiveDataResponse, ApiError>;
}

#[async_trait]
impl LiveDataSource for ApiClient {
    async fn fetch_live(&self) -> Result<LiveDataResponse, ApiError> {
        self.live_data().await
    }
}
