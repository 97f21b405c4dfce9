#![forbid(unsafe_code)]

//! Site configuration supplied by the host at boot.
//!
//! Every field has a default matching the production markup, so an absent or
//! empty options object (`{}`) yields the stock behaviour. Unknown fields are
//! rejected to surface typos in host options early.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::route::Route;

pub const DEFAULT_STORAGE_KEY: &str = "rc_auth_user";
pub const DEFAULT_API_KEY_PREFIX: &str = "rc_";
pub const DEFAULT_MOBILE_QUERY: &str = "(pointer: coarse), (max-width: 768px)";
pub const DEFAULT_REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const DEFAULT_SECTION_SELECTOR: &str = ".hero, .trusted, .section, .cta, .footer";
pub const DEFAULT_FX_LAYER_SELECTOR: &str = ".fx-layer";

/// Relative hrefs for each [`Route`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Routes {
    pub index: String,
    pub login: String,
    pub register: String,
    pub welcome: String,
    pub profile: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            index: Route::Index.default_href().to_owned(),
            login: Route::Login.default_href().to_owned(),
            register: Route::Register.default_href().to_owned(),
            welcome: Route::Welcome.default_href().to_owned(),
            profile: Route::Profile.default_href().to_owned(),
        }
    }
}

impl Routes {
    #[must_use]
    pub fn href(&self, route: Route) -> &str {
        match route {
            Route::Index => &self.index,
            Route::Login => &self.login,
            Route::Register => &self.register,
            Route::Welcome => &self.welcome,
            Route::Profile => &self.profile,
        }
    }
}

/// Timer lifetimes, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Timings {
    /// How long the "Saved" toast stays on screen.
    pub toast_ms: u32,
    /// How long a copy button reads "Copied" before reverting.
    pub copied_label_ms: u32,
    /// Lifetime of one ink burst element.
    pub burst_lifetime_ms: u32,
    /// Delay before the optional second burst.
    pub burst_duplicate_delay_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            toast_ms: 1400,
            copied_label_ms: 1000,
            burst_lifetime_ms: 1600,
            burst_duplicate_delay_ms: 180,
        }
    }
}

/// Most verbose console log level the frontend installs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Complete host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Local storage key holding the JSON user record.
    pub storage_key: String,
    pub routes: Routes,
    pub timings: Timings,
    /// Fixed tag prepended to generated API keys.
    pub api_key_prefix: String,
    /// Media query classifying a viewport as mobile-class.
    pub mobile_query: String,
    pub reduced_motion_query: String,
    /// Sections observed by the ink burst effect.
    pub section_selector: String,
    /// Container receiving ink burst elements.
    pub fx_layer_selector: String,
    pub log_level: LogLevel,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            routes: Routes::default(),
            timings: Timings::default(),
            api_key_prefix: DEFAULT_API_KEY_PREFIX.to_owned(),
            mobile_query: DEFAULT_MOBILE_QUERY.to_owned(),
            reduced_motion_query: DEFAULT_REDUCED_MOTION_QUERY.to_owned(),
            section_selector: DEFAULT_SECTION_SELECTOR.to_owned(),
            fx_layer_selector: DEFAULT_FX_LAYER_SELECTOR.to_owned(),
            log_level: LogLevel::default(),
        }
    }
}

impl SiteConfig {
    /// Parse host options JSON, filling unspecified fields with defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "storageKey",
                reason: "must not be empty",
            });
        }
        if self.timings.burst_lifetime_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timings.burstLifetimeMs",
                reason: "must be positive",
            });
        }
        if self.section_selector.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "sectionSelector",
                reason: "must not be empty",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn href(&self, route: Route) -> &str {
        self.routes.href(route)
    }
}
