#![forbid(unsafe_code)]

//! `rcloud-core` is the host-driven model behind the Realtime Cloud site.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS/DOM) pushes events,
//!   scroll metrics and time in; nothing here touches ambient browser state.
//! - **Injected storage**: every component that reads or writes the user
//!   record goes through a [`store::UserStore`].
//! - **Typed views**: rendering produces view-models ([`header::HeaderView`],
//!   [`profile::KeyListView`], ...) which the frontend applies to the DOM.
//!
//! The `rcloud-web` crate wraps these building blocks with `wasm-bindgen`.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod glue;
pub mod header;
pub mod ink;
pub mod logging;
pub mod media;
pub mod profile;
pub mod rng;
pub mod route;
pub mod store;
pub mod subscriptions;
pub mod user;
pub mod visual;
pub mod welcome;

pub use config::SiteConfig;
pub use error::{ConfigError, SiteError, StoreError};
pub use media::MediaPreferences;
pub use route::Route;
pub use store::{KeyValueStorage, LocalUserStore, MemoryStorage, UserStore};
pub use user::UserRecord;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
