//! Configuration management: defaults, validation, loading from environment
//! plus command-line overrides.

pub mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::AppConfig;

/// Output sizes offered to users, in pixels.
pub const SIZE_PRESETS: &[u32] = &[300, 400, 600, 800, 1000];

/// Prefix of every environment variable read by the CLI.
pub const ENV_PREFIX: &str = "HEART_QR_";
