/// Network communication for license validation
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::hardware::resolve_hardware_id;
use super::payload::encrypt_payload;
use super::result::{ValidateResponse, ValidationResult};
use crate::error::{ValidationError, ValidationOutcome};

/// Server address used when none is configured
///
/// Can be fixed at build time through `LICENSE_DEFAULT_SERVER_URL`.
pub const DEFAULT_SERVER_URL: &str = match option_env!("LICENSE_DEFAULT_SERVER_URL") {
    Some(url) => url,
    None => "http://localhost:5000",
};

/// Fixed validation route, appended to the server base address
pub const VALIDATE_PATH: &str = "/api/v1/validate";

/// Everything the client needs to talk to the licensing server
#[derive(Debug, Clone)]
pub struct Credentials {
    /// PEM-encoded RSA public key of the product
    pub public_key_pem: String,
    /// Opaque product identifier
    pub api_key: String,
    /// Base address, e.g. `https://licenses.example.com`
    pub server_url: String,
    /// Per-request timeout. `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
}

impl Credentials {
    pub fn new(public_key_pem: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            public_key_pem: public_key_pem.into(),
            api_key: api_key.into(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Full URL of the validation endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), VALIDATE_PATH)
    }
}

/// Validation request payload
#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    #[serde(rename = "apiKey")]
    api_key: &'a str,
    payload: String,
}

/// Hardware id to bind: the caller's, unless absent or empty
fn effective_hardware_id(hardware_id: Option<&str>) -> String {
    match hardware_id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => resolve_hardware_id(),
    }
}

/// Stateless validation client
///
/// Holds only immutable credentials and the HTTP client; every
/// `validate` call is an independent request/response exchange and
/// calls may run concurrently from several threads.
#[derive(Debug, Clone)]
pub struct LicenseClient {
    credentials: Credentials,
    http: reqwest::blocking::Client,
}

impl LicenseClient {
    pub fn new(credentials: Credentials) -> ValidationOutcome<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(credentials.timeout)
            .build()
            .map_err(ValidationError::Transport)?;

        Ok(Self { credentials, http })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Validate `serial_key` for this machine (or for `hardware_id`)
    ///
    /// An empty `hardware_id` is treated like `None`.
    ///
    /// Blocks until the full response body has arrived. A rejected
    /// license is returned as `Ok` with `success == false`; `Err` is
    /// reserved for encryption, transport and parse failures. No retry.
    pub fn validate(
        &self,
        serial_key: &str,
        hardware_id: Option<&str>,
    ) -> ValidationOutcome<ValidationResult> {
        let hardware_id = effective_hardware_id(hardware_id);

        let payload = encrypt_payload(serial_key, &hardware_id, &self.credentials.public_key_pem)?;

        let request = ValidateRequest {
            api_key: &self.credentials.api_key,
            payload,
        };

        let url = self.credentials.endpoint();
        debug!(%url, "POST validation request");

        // `.json()` sets Content-Type and sends a fixed-length body, so
        // Content-Length is always present
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .map_err(ValidationError::Transport)?;

        // License rejections arrive as 4xx with a JSON body, so the status
        // does not short-circuit parsing
        let status = response.status().as_u16();
        let text = response.text().map_err(ValidationError::Transport)?;
        debug!(status, "validation response received");

        let result = parse_response(&text, status)?;
        debug!(code = ?result.code, success = result.success, "validation verdict");
        Ok(result)
    }
}

/// Parse a validation response body into a result
///
/// The body must be a JSON object; its fields are all optional.
pub fn parse_response(body: &str, status: u16) -> ValidationOutcome<ValidationResult> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(ValidationError::ResponseParse)?;
    if !value.is_object() {
        return Err(ValidationError::ResponseParse(serde::de::Error::custom(
            "expected a JSON object",
        )));
    }

    let response: ValidateResponse =
        serde_json::from_value(value).map_err(ValidationError::ResponseParse)?;
    Ok(ValidationResult::from_response(response, status))
}
