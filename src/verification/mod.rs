/// Verification module - Hardware identity, payload encryption and server validation
pub mod hardware;
pub mod network;
pub mod payload;
pub mod result;

pub use hardware::resolve_hardware_id;
pub use network::{Credentials, LicenseClient, DEFAULT_SERVER_URL, VALIDATE_PATH, parse_response};
pub use payload::{build_plaintext, encrypt_payload, max_plaintext_len, parse_public_key};
pub use result::{
    Expiration, FailureReason, NO_EXPIRATION, SuccessCode, UNSET_EXPIRATION, ValidateResponse, ValidationResult, Verdict,
};
