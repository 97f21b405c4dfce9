#![forbid(unsafe_code)]

use std::rc::Rc;

use gloo::events::EventListener;
use rcloud_core::{LocalUserStore, SiteConfig, SiteError};
use wasm_bindgen::prelude::*;

use crate::effects::{InkBursts, MediaQueries, ScrollVisuals};
use crate::header::Header;
use crate::options::{max_level, site_config};
use crate::storage::BrowserStorage;
use crate::{dom, forms, glue, logging, profile};

/// User store shared by every page component.
pub(crate) type SharedStore = Rc<LocalUserStore<BrowserStorage>>;

/// Handle to the running site. Dropping it (or calling `destroy`) removes
/// every listener and disconnects the section observer.
#[wasm_bindgen]
pub struct RealtimeCloudSite {
    header: Option<Rc<Header>>,
    visuals: Option<ScrollVisuals>,
    ink: Option<InkBursts>,
    listeners: Vec<EventListener>,
}

/// Bind every component present on the page.
///
/// Call once the DOM is ready. `options` is an optional plain object of
/// [`SiteConfig`] overrides (camelCase keys).
#[wasm_bindgen]
pub fn boot(options: Option<JsValue>) -> Result<RealtimeCloudSite, JsValue> {
    let config = resolve_options(options.as_ref()).map_err(to_js)?;
    logging::init(max_level(config.log_level));
    RealtimeCloudSite::start(&config).map_err(to_js)
}

#[wasm_bindgen]
impl RealtimeCloudSite {
    /// Remove every listener and observer.
    pub fn destroy(&mut self) {
        if let Some(visuals) = self.visuals.take() {
            visuals.detach();
        }
        self.ink.take();
        self.listeners.clear();
        self.header.take();
        tracing::info!("site detached");
    }

    /// Re-render the header actions from storage.
    #[wasm_bindgen(js_name = refreshHeader)]
    pub fn refresh_header(&self) {
        if let Some(header) = &self.header {
            header.render();
        }
    }
}

impl RealtimeCloudSite {
    fn start(config: &SiteConfig) -> Result<Self, SiteError> {
        let window = dom::window()?;
        let document = dom::document()?;
        let store: SharedStore = Rc::new(LocalUserStore::new(
            BrowserStorage,
            config.storage_key.clone(),
        ));

        let mut listeners = glue::bind_all(&document);

        let header = Header::mount(&document, Rc::clone(&store), config.routes.clone());
        if let Some(header) = &header {
            header.render();
        }
        listeners.extend(forms::bind_auth_forms(&document, &store, &config.routes));
        listeners.extend(profile::bind_profile(
            &document,
            &store,
            config,
            header.clone(),
        ));

        let media = MediaQueries::new(&window, config);
        let visuals = ScrollVisuals::attach(&window, &document, media.clone());
        let ink = match InkBursts::attach(&window, &document, media, config) {
            Ok(ink) => ink,
            Err(err) => {
                tracing::warn!(%err, "ink bursts unavailable");
                None
            }
        };

        forms::personalize_welcome(&document, &store, &config.routes);

        tracing::info!(
            storage_key = %config.storage_key,
            header = header.is_some(),
            ink = ink.is_some(),
            "site booted"
        );
        Ok(Self {
            header,
            visuals: Some(visuals),
            ink,
            listeners,
        })
    }
}

fn resolve_options(options: Option<&JsValue>) -> Result<SiteConfig, SiteError> {
    let json = match options {
        Some(value) if !value.is_undefined() && !value.is_null() => Some(
            js_sys::JSON::stringify(value)
                .map(String::from)
                .map_err(dom::js_error)?,
        ),
        _ => None,
    };
    Ok(site_config(json.as_deref())?)
}

fn to_js(err: SiteError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
