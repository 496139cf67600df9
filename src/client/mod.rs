//! Dashboard Server API Client
//!
//! HTTP client for the VitaScope server: live readings, one-time-code
//! resend, the form endpoints (login, register, verify), profile, and
//! recent measurement history. The login session lives in a cookie, so
//! the client keeps a cookie store for the lifetime of the process.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::vitals::ValidatedSample;

/// VitaScope server API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client against the configured server.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the latest sensor reading.
    pub async fn live_data(&self) -> Result<LiveDataResponse, ApiError> {
        let response = self
            .client
            .get(self.url("/get_live_data"))
            .send()
            .await
            .map_err(classify)?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        response.json().await.map_err(classify)
    }

    /// Ask the server to send a fresh one-time code.
    ///
    /// The server answers with a JSON status envelope on success and
    /// failure alike, so the body is surfaced whenever it parses.
    pub async fn resend_otp(&self) -> Result<ResendOtpResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/resend-otp"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        match response.json::<ResendOtpResponse>().await {
            Ok(body) => Ok(body),
            Err(_) => Err(ApiError::Api {
                status: status.as_u16(),
                message: "unexpected response".to_string(),
            }),
        }
    }

    /// Submit the login form.
    ///
    /// Accepted credentials redirect to the verification page; rejected
    /// ones re-render the login form.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthOutcome, ApiError> {
        let landed = self
            .post_form("/login", &[("username", username), ("password", password)])
            .await?;
        Ok(AuthOutcome::from_paths("/login", &landed))
    }

    /// Submit the registration form.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<AuthOutcome, ApiError> {
        let landed = self
            .post_form(
                "/register",
                &[
                    ("username", username),
                    ("email", email),
                    ("password", password),
                    ("confirm_password", confirm_password),
                ],
            )
            .await?;
        Ok(AuthOutcome::from_paths("/register", &landed))
    }

    /// Submit the one-time code for verification.
    pub async fn verify_otp(&self, code: &str) -> Result<AuthOutcome, ApiError> {
        let landed = self.post_form("/verify-otp", &[("otp_code", code)]).await?;
        Ok(AuthOutcome::from_paths("/verify-otp", &landed))
    }

    /// Fetch the signed-in user's profile.
    pub async fn profile(&self) -> Result<ProfileResponse, ApiError> {
        let response = self
            .client
            .get(self.url("/api/profile"))
            .send()
            .await
            .map_err(classify)?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        response.json().await.map_err(classify)
    }

    /// Fetch recent measurement history to warm the chart at dashboard
    /// entry.
    pub async fn measurements(&self) -> Result<MeasurementHistory, ApiError> {
        let response = self
            .client
            .get(self.url("/api/measurements"))
            .send()
            .await
            .map_err(classify)?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        response.json().await.map_err(classify)
    }

    /// POST a form-encoded body to a server-rendered endpoint and report
    /// the path the redirect chain landed on.
    async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .map_err(classify)?;

        if response.status().is_success() {
            Ok(response.url().path().to_string())
        } else {
            Err(ApiError::from_response(response).await)
        }
    }
}

/// Outcome of a form post against a server-rendered endpoint
///
/// The server re-renders the form on rejection and redirects elsewhere on
/// success, so landing on a different path is the accept signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Accepted,
    Rejected,
}

impl AuthOutcome {
    fn from_paths(posted: &str, landed: &str) -> Self {
        if landed.trim_end_matches('/') == posted.trim_end_matches('/') {
            AuthOutcome::Rejected
        } else {
            AuthOutcome::Accepted
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, AuthOutcome::Accepted)
    }
}

/// Map a transport error onto the client error taxonomy.
fn classify(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_connect() {
        ApiError::Unavailable
    } else {
        ApiError::Request(e)
    }
}

// ============================================
// Response DTOs
// ============================================

/// A metric field on the wire: a number when the sensor reported one, the
/// `"--"` sentinel (or other text) when it did not.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WireMetric {
    Number(f64),
    Text(String),
}

impl WireMetric {
    /// The integer value, if the field actually carries one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            WireMetric::Number(n) => Some(*n as i64),
            WireMetric::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
            }
        }
    }
}

/// Response body of `GET /get_live_data`
#[derive(Debug, Clone, Deserialize)]
pub struct LiveDataResponse {
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "heartRate", default)]
    pub heart_rate: Option<WireMetric>,
    #[serde(default)]
    pub spo2: Option<WireMetric>,
    #[serde(default)]
    pub resp: Option<WireMetric>,
}

impl LiveDataResponse {
    /// Validate the payload into per-metric readings.
    pub fn validate(&self) -> ValidatedSample {
        ValidatedSample::validate(
            &self.timestamp,
            self.heart_rate.as_ref().and_then(WireMetric::as_int),
            self.spo2.as_ref().and_then(WireMetric::as_int),
            self.resp.as_ref().and_then(WireMetric::as_int),
        )
    }
}

/// Response body of `POST /resend-otp`
#[derive(Debug, Clone, Deserialize)]
pub struct ResendOtpResponse {
    pub status: String,
    pub message: String,
}

impl ResendOtpResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Response body of `GET /api/profile`
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub id: i64,
}

/// Response body of `GET /api/measurements`
///
/// The series fields are present only when `status` is `"connected"`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementHistory {
    pub status: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(rename = "heartRate", default)]
    pub heart_rate: Vec<i64>,
    #[serde(default)]
    pub spo2: Vec<i64>,
    #[serde(default)]
    pub resp: Vec<i64>,
}

impl MeasurementHistory {
    pub fn is_connected(&self) -> bool {
        self.status == "connected"
    }
}

// ============================================
// Errors
// ============================================

/// Errors from the dashboard server API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("server unavailable")]
    Unavailable,

    #[error("request timeout")]
    Timeout,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        ApiError::Api {
            status: status.as_u16(),
            message: text.chars().take(200).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vitals::Reading;

    #[test]
    fn test_wire_metric_variants() {
        assert_eq!(WireMetric::Number(75.0).as_int(), Some(75));
        assert_eq!(WireMetric::Text("97".to_string()).as_int(), Some(97));
        assert_eq!(WireMetric::Text("97.4".to_string()).as_int(), Some(97));
        assert_eq!(WireMetric::Text("--".to_string()).as_int(), None);
    }

    #[test]
    fn test_live_data_with_numbers() {
        let payload: LiveDataResponse = serde_json::from_str(
            r#"{"timestamp":"12:00:00","heartRate":75,"spo2":98,"resp":16}"#,
        )
        .unwrap();
        let sample = payload.validate();
        assert!(sample.all_valid());
        assert_eq!(sample.values(), Some((75, 98, 16)));
    }

    #[test]
    fn test_live_data_with_sentinels() {
        let payload: LiveDataResponse = serde_json::from_str(
            r#"{"timestamp":"","heartRate":"--","spo2":"--","resp":"--"}"#,
        )
        .unwrap();
        let sample = payload.validate();
        assert_eq!(sample.valid_count(), 0);
        assert_eq!(sample.heart_rate, Reading::Missing);
    }

    #[test]
    fn test_live_data_with_missing_fields() {
        let payload: LiveDataResponse =
            serde_json::from_str(r#"{"timestamp":"12:00:00","spo2":98}"#).unwrap();
        let sample = payload.validate();
        assert_eq!(sample.heart_rate, Reading::Missing);
        assert_eq!(sample.spo2, Reading::Valid(98));
        assert_eq!(sample.resp_rate, Reading::Missing);
    }

    #[test]
    fn test_resend_status_envelope() {
        let body: ResendOtpResponse =
            serde_json::from_str(r#"{"status":"success","message":"code sent"}"#).unwrap();
        assert!(body.is_success());

        let body: ResendOtpResponse =
            serde_json::from_str(r#"{"status":"error","message":"session expired"}"#).unwrap();
        assert!(!body.is_success());
    }

    #[test]
    fn test_measurement_history_defaults() {
        let body: MeasurementHistory = serde_json::from_str(r#"{"status":"no_data"}"#).unwrap();
        assert!(!body.is_connected());
        assert!(body.labels.is_empty());

        let body: MeasurementHistory = serde_json::from_str(
            r#"{"status":"connected","labels":["a","b"],"heartRate":[70,71],"spo2":[97,98],"resp":[15,16]}"#,
        )
        .unwrap();
        assert!(body.is_connected());
        assert_eq!(body.labels.len(), 2);
    }

    #[test]
    fn test_auth_outcome_from_landing_path() {
        assert_eq!(
            AuthOutcome::from_paths("/login", "/verify-otp"),
            AuthOutcome::Accepted
        );
        assert_eq!(
            AuthOutcome::from_paths("/login", "/login"),
            AuthOutcome::Rejected
        );
        // Trailing slashes from the redirect chain do not flip the signal.
        assert_eq!(
            AuthOutcome::from_paths("/verify-otp", "/verify-otp/"),
            AuthOutcome::Rejected
        );
        assert_eq!(AuthOutcome::from_paths("/verify-otp", "/"), AuthOutcome::Accepted);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ServerConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..ServerConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/get_live_data"), "http://localhost:5000/get_live_data");
    }
}
