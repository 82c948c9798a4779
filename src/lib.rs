//! License validation client
//!
//! Binds a serial key to this machine's hardware id, encrypts the binding
//! with the product's RSA public key (OAEP, SHA-256) and asks the
//! licensing server whether the license is valid:
//!
//! ```no_run
//! use license_client::{Credentials, LicenseClient};
//!
//! # fn main() -> Result<(), license_client::ValidationError> {
//! let pem = std::fs::read_to_string("product.pem").unwrap_or_default();
//! let client = LicenseClient::new(
//!     Credentials::new(pem, "823c2011-cd0c-41db-a7c9-0906ec42e7aa")
//!         .with_server_url("https://licenses.example.com"),
//! )?;
//!
//! let result = client.validate("A2UV9-9HZYZ-UWFK8-SS71A", None)?;
//! if result.success {
//!     println!("licensed until {:?}", result.expiration());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The library never installs a log subscriber; it only emits `tracing`
//! debug events for hosts that choose to collect them.

pub mod config;
pub mod error;
pub mod utils;
pub mod verification;

pub use error::{ConfigError, EncryptionError, ValidationError};
pub use verification::{
    Credentials, Expiration, FailureReason, LicenseClient, SuccessCode, ValidationResult, Verdict,
    encrypt_payload, resolve_hardware_id,
};
