#![forbid(unsafe_code)]

//! WASM frontend for the Realtime Cloud site.
//!
//! This crate is host-specific (web/WASM). It binds the `rcloud-core`
//! components to the page:
//! - header actions, auth forms and the welcome greeting,
//! - the profile page (avatar, save, API keys, account deletion),
//! - scroll-driven background hues/parallax and ink bursts,
//! - nav toggle, code tabs, FAQ accordion, footer year and anchor scrolling.
//!
//! The host calls `boot(options)` once the DOM is ready.

pub mod options;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod effects;
#[cfg(target_arch = "wasm32")]
mod forms;
#[cfg(target_arch = "wasm32")]
mod glue;
#[cfg(target_arch = "wasm32")]
mod header;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod profile;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{RealtimeCloudSite, boot};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct RealtimeCloudSite;

#[cfg(not(target_arch = "wasm32"))]
impl RealtimeCloudSite {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }

    pub fn destroy(&mut self) {}
}
