/// Configuration module - Load, override and persist host configuration
pub mod loader;
pub mod schema;

pub use loader::{default_config_path, load_config, save_config};
pub use schema::Config;
