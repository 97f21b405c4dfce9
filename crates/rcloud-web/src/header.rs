#![forbid(unsafe_code)]

//! Applies [`HeaderView`] to the `.actions` region.

use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use rcloud_core::config::Routes;
use rcloud_core::header::{
    Avatar, HeaderRenderer, HeaderView, LOGOUT_LABEL, SIGN_IN_LABEL, SIGN_UP_LABEL,
};
use rcloud_core::SiteError;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

use crate::dom;
use crate::wasm::SharedStore;

const LOGOUT_ID: &str = "logout-btn";
const AVATAR_STYLE: &str = "width:28px;height:28px;border-radius:999px;border:1px solid var(--border);";
const INITIALS_STYLE: &str =
    "width:28px;height:28px;border-radius:999px;display:grid;place-items:center;font-size:12px;";

/// Header actions region bound to the shared store.
///
/// Logout is handled by one delegated click listener on the region, so
/// re-rendering never has to rewire it.
pub(crate) struct Header {
    document: Document,
    actions: Element,
    renderer: HeaderRenderer<SharedStore>,
    _logout: EventListener,
}

impl Header {
    /// `None` when the page has no `.actions` region.
    pub(crate) fn mount(
        document: &Document,
        store: SharedStore,
        routes: Routes,
    ) -> Option<Rc<Self>> {
        let actions = dom::query(document, ".actions")?;
        let header = Rc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let logout = EventListener::new(&actions, "click", move |event: &Event| {
                if !is_logout_click(event) {
                    return;
                }
                if let Some(header) = weak.upgrade() {
                    header.logout();
                }
            });
            Self {
                document: document.clone(),
                actions: actions.clone(),
                renderer: HeaderRenderer::new(store, routes),
                _logout: logout,
            }
        });
        Some(header)
    }

    /// Rebuild the region from the current stored user.
    pub(crate) fn render(&self) {
        let view = self.renderer.render();
        if let Err(err) = self.apply(&view) {
            tracing::warn!(%err, "header render failed");
        }
    }

    fn logout(&self) {
        match self.renderer.logout() {
            Ok(route) => {
                self.render();
                dom::navigate(self.renderer.routes().href(route));
            }
            Err(err) => tracing::warn!(%err, "logout failed"),
        }
    }

    fn apply(&self, view: &HeaderView) -> Result<(), SiteError> {
        self.actions.set_text_content(None);
        match view {
            HeaderView::SignedOut {
                sign_in_href,
                sign_up_href,
            } => {
                let sign_in = self.link("btn ghost", sign_in_href)?;
                sign_in.set_text_content(Some(SIGN_IN_LABEL));
                let sign_up = self.link("btn primary", sign_up_href)?;
                sign_up.set_text_content(Some(SIGN_UP_LABEL));
                dom::append(&self.actions, &sign_in)?;
                dom::append(&self.actions, &sign_up)?;
            }
            HeaderView::SignedIn {
                profile_href,
                avatar,
                greeting,
            } => {
                let profile = self.link("btn ghost", profile_href)?;
                dom::set_attr(&profile, "style", "gap:8px; align-items:center;")?;
                dom::append(&profile, &self.avatar(avatar)?)?;
                let name = dom::create(&self.document, "span", "")?;
                name.set_text_content(Some(greeting));
                dom::append(&profile, &name)?;

                let logout = dom::create(&self.document, "button", "btn")?;
                logout.set_id(LOGOUT_ID);
                dom::set_attr(&logout, "type", "button")?;
                logout.set_text_content(Some(LOGOUT_LABEL));

                dom::append(&self.actions, &profile)?;
                dom::append(&self.actions, &logout)?;
            }
        }
        Ok(())
    }

    fn link(&self, class: &str, href: &str) -> Result<Element, SiteError> {
        let link = dom::create(&self.document, "a", class)?;
        dom::set_attr(&link, "href", href)?;
        Ok(link)
    }

    fn avatar(&self, avatar: &Avatar) -> Result<Element, SiteError> {
        match avatar {
            Avatar::Image(src) => {
                let img = dom::create(&self.document, "img", "")?;
                dom::set_attr(&img, "src", src)?;
                dom::set_attr(&img, "alt", "avatar")?;
                dom::set_attr(&img, "style", AVATAR_STYLE)?;
                Ok(img)
            }
            Avatar::Initials(initials) => {
                let glyph = dom::create(&self.document, "div", "brand-mark")?;
                dom::set_attr(&glyph, "style", INITIALS_STYLE)?;
                glyph.set_text_content(Some(initials));
                Ok(glyph)
            }
        }
    }
}

fn is_logout_click(event: &Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|el| el.closest(&format!("#{LOGOUT_ID}")).ok().flatten())
        .is_some()
}
