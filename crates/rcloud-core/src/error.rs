#![forbid(unsafe_code)]

//! Error types shared across the site runtime.
//!
//! Nothing here is fatal: every component recovers locally (treat the user as
//! logged out, skip initialization, ignore the clipboard). These types exist
//! so the frontend can log what it recovered from.

use std::fmt;

/// Errors raised by a [`crate::store::KeyValueStorage`] or [`crate::store::UserStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing storage is not reachable (no window, storage disabled).
    Unavailable(String),
    /// The record could not be encoded to JSON.
    Serialization(String),
    /// The backend rejected a write (quota, security policy).
    Write(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
            Self::Write(msg) => write!(f, "storage write failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Host-supplied configuration could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Options JSON was malformed or carried unknown fields.
    Parse(String),
    /// A parsed value is out of its allowed range.
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid site options: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid site option `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Umbrella error for the frontend boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    Store(StoreError),
    Config(ConfigError),
    /// A required browser object (window, document) is missing.
    MissingHost(&'static str),
    /// A JS exception, stringified at the boundary.
    Js(String),
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "{e}"),
            Self::Config(e) => write!(f, "{e}"),
            Self::MissingHost(what) => write!(f, "host object unavailable: {what}"),
            Self::Js(msg) => write!(f, "js error: {msg}"),
        }
    }
}

impl std::error::Error for SiteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::MissingHost(_) | Self::Js(_) => None,
        }
    }
}

impl From<StoreError> for SiteError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<ConfigError> for SiteError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
