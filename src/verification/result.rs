/// Validation response model and verdict classification
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Server value of `ExpirationDate` for a license that never expires
pub const NO_EXPIRATION: i64 = -1;

/// Stored expiry the server also treats as "never expires"; it is echoed
/// back as-is
pub const UNSET_EXPIRATION: i64 = 0;

/// Raw response from `/api/v1/validate`
///
/// Every field is optional on the wire; a missing field stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidateResponse {
    #[serde(rename = "Code", default)]
    pub code: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "HttpCode", default, deserialize_with = "lenient_http_code")]
    pub http_code: Option<u16>,
    #[serde(rename = "SerialKey", default)]
    pub serial_key: Option<String>,
    #[serde(rename = "HardwareID", default)]
    pub hardware_id: Option<String>,
    #[serde(rename = "ExpirationDate", default)]
    pub expiration_date: Option<i64>,
}

/// The server sends `HttpCode` as `"200"` as often as `200`
fn lenient_http_code<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u16),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid HttpCode: {:?}", s))),
    }
}

/// Positive outcomes the server can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessCode {
    /// `OKAY`: device was already registered and the license is valid
    Okay,
    /// `SUCCESS`: device was registered by this call
    Registered,
}

/// Reasons the server rejects a validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// `ERR_API_KEY`
    InvalidApiKey,
    /// `ERR_PUB_PRIV_KEY`: server could not decrypt the payload
    DecryptionFailed,
    /// `ERR_SERIAL_KEY`
    InvalidSerialKey,
    /// `ERR_KEY_EXPIRED`
    Expired,
    /// `ERR_KEY_REVOKED`
    Revoked,
    /// `ERR_KEY_DEVICES_FULL`
    DeviceLimitReached,
    /// Any other code, kept verbatim
    Unrecognized(String),
    /// Response carried no `Code`
    Missing,
}

/// Outcome of a validation exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success(SuccessCode),
    Failure(FailureReason),
}

impl Verdict {
    /// Classify a response code. Only `OKAY` and `SUCCESS` are positive
    /// and the match is case-sensitive.
    pub fn classify(code: Option<&str>) -> Self {
        match code {
            Some("OKAY") => Verdict::Success(SuccessCode::Okay),
            Some("SUCCESS") => Verdict::Success(SuccessCode::Registered),
            Some("ERR_API_KEY") => Verdict::Failure(FailureReason::InvalidApiKey),
            Some("ERR_PUB_PRIV_KEY") => Verdict::Failure(FailureReason::DecryptionFailed),
            Some("ERR_SERIAL_KEY") => Verdict::Failure(FailureReason::InvalidSerialKey),
            Some("ERR_KEY_EXPIRED") => Verdict::Failure(FailureReason::Expired),
            Some("ERR_KEY_REVOKED") => Verdict::Failure(FailureReason::Revoked),
            Some("ERR_KEY_DEVICES_FULL") => Verdict::Failure(FailureReason::DeviceLimitReached),
            Some(other) => Verdict::Failure(FailureReason::Unrecognized(other.to_string())),
            None => Verdict::Failure(FailureReason::Missing),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success(_))
    }
}

/// Interpreted `ExpirationDate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    Never,
    At(DateTime<Utc>),
}

impl Expiration {
    /// `-1` and `0` both mean no expiration. `None` if the timestamp is
    /// outside chrono's range.
    pub fn from_timestamp(secs: i64) -> Option<Self> {
        if secs == NO_EXPIRATION || secs == UNSET_EXPIRATION {
            return Some(Expiration::Never);
        }
        DateTime::from_timestamp(secs, 0).map(Expiration::At)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Expiration::Never => false,
            Expiration::At(at) => now > *at,
        }
    }
}

/// Result of one `validate` call
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub success: bool,
    pub verdict: Verdict,
    pub code: Option<String>,
    pub message: Option<String>,
    pub http_code: Option<u16>,
    pub serial_key: Option<String>,
    pub hardware_id: Option<String>,
    /// Raw seconds; `Some(-1)` and `Some(0)` are permanent licenses,
    /// `None` means the server did not send the field
    pub expiration_date: Option<i64>,
    /// HTTP status of the transport response
    pub status: u16,
}

impl ValidationResult {
    pub fn from_response(response: ValidateResponse, status: u16) -> Self {
        let verdict = Verdict::classify(response.code.as_deref());
        Self {
            success: verdict.is_success(),
            verdict,
            code: response.code,
            message: response.message,
            http_code: response.http_code,
            serial_key: response.serial_key,
            hardware_id: response.hardware_id,
            expiration_date: response.expiration_date,
            status,
        }
    }

    pub fn expiration(&self) -> Option<Expiration> {
        self.expiration_date.and_then(Expiration::from_timestamp)
    }

    pub fn is_permanent(&self) -> bool {
        self.expiration() == Some(Expiration::Never)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_success_codes() {
        assert_eq!(Verdict::classify(Some("OKAY")), Verdict::Success(SuccessCode::Okay));
        assert_eq!(Verdict::classify(Some("SUCCESS")), Verdict::Success(SuccessCode::Registered));
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(
            Verdict::classify(Some("okay")),
            Verdict::Failure(FailureReason::Unrecognized("okay".to_string()))
        );
        assert!(!Verdict::classify(Some("Success")).is_success());
    }

    #[test]
    fn test_classify_server_failures() {
        assert_eq!(Verdict::classify(Some("ERR_KEY_EXPIRED")), Verdict::Failure(FailureReason::Expired));
        assert_eq!(Verdict::classify(Some("ERR_KEY_REVOKED")), Verdict::Failure(FailureReason::Revoked));
        assert_eq!(
            Verdict::classify(Some("ERR_KEY_DEVICES_FULL")),
            Verdict::Failure(FailureReason::DeviceLimitReached)
        );
        assert_eq!(Verdict::classify(None), Verdict::Failure(FailureReason::Missing));
    }

    #[test]
    fn test_response_full() {
        let json = r#"{
            "Code": "OKAY",
            "Message": "ok",
            "HttpCode": 200,
            "SerialKey": "A2UV9-9HZYZ-UWFK8-SS71A",
            "HardwareID": "linux_x64_aa:bb:cc:dd:ee:ff",
            "ExpirationDate": -1
        }"#;
        let response: ValidateResponse = serde_json::from_str(json).unwrap();
        let result = ValidationResult::from_response(response, 200);

        assert!(result.success);
        assert_eq!(result.http_code, Some(200));
        assert_eq!(result.expiration_date, Some(-1));
        assert!(result.is_permanent());
    }

    #[test]
    fn test_http_code_as_string() {
        let json = r#"{"Code": "ERR_SERIAL_KEY", "HttpCode": "401", "SerialKey": null, "HardwareID": null}"#;
        let response: ValidateResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.http_code, Some(401));
        assert_eq!(response.serial_key, None);
    }

    #[test]
    fn test_http_code_garbage_rejected() {
        let json = r#"{"Code": "OKAY", "HttpCode": "two hundred"}"#;
        assert!(serde_json::from_str::<ValidateResponse>(json).is_err());
    }

    #[test]
    fn test_missing_expiration_is_not_permanent() {
        let response: ValidateResponse = serde_json::from_str(r#"{"Code": "OKAY"}"#).unwrap();
        let result = ValidationResult::from_response(response, 200);

        assert!(result.success);
        assert_eq!(result.expiration_date, None);
        assert_eq!(result.expiration(), None);
        assert!(!result.is_permanent());
    }

    #[test]
    fn test_zero_expiration_is_permanent() {
        let json = r#"{"Code": "OKAY", "HttpCode": "200", "ExpirationDate": 0}"#;
        let response: ValidateResponse = serde_json::from_str(json).unwrap();
        let result = ValidationResult::from_response(response, 200);

        assert!(result.success);
        // Raw value is kept
        assert_eq!(result.expiration_date, Some(0));
        assert_eq!(result.expiration(), Some(Expiration::Never));
        assert!(result.is_permanent());
        assert!(!result.expiration().unwrap().is_expired_at(Utc::now()));
    }

    #[test]
    fn test_expiration_timestamp() {
        let expiration = Expiration::from_timestamp(1_999_999_999).unwrap();
        let at = DateTime::from_timestamp(1_999_999_999, 0).unwrap();
        assert_eq!(expiration, Expiration::At(at));

        let before = DateTime::from_timestamp(1_000_000_000, 0).unwrap();
        assert!(!expiration.is_expired_at(before));
        assert!(expiration.is_expired_at(at + chrono::Duration::seconds(1)));
        assert!(!Expiration::Never.is_expired_at(Utc::now()));
    }
}
