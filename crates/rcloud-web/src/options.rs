#![forbid(unsafe_code)]

//! Boot options handed over by the host page.

use rcloud_core::config::LogLevel;
use rcloud_core::{ConfigError, SiteConfig};
use tracing::Level;

/// Resolve the `JSON.stringify`-ed boot options.
///
/// Absent options (`None`, `undefined`, `null`) select the defaults.
pub fn site_config(json: Option<&str>) -> Result<SiteConfig, ConfigError> {
    match json.map(str::trim) {
        None | Some("" | "undefined" | "null") => Ok(SiteConfig::default()),
        Some(raw) => SiteConfig::from_json_str(raw),
    }
}

/// Console subscriber ceiling for the configured level.
#[must_use]
pub fn max_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}
