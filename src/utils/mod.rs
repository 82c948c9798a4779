/// Utilities module - Platform helpers
pub mod platform;

pub use platform::{arch_name, platform_name};
