#![forbid(unsafe_code)]

//! Profile page binding: form hydration, avatar upload, save toast, API key
//! list and account deletion.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use rcloud_core::config::Routes;
use rcloud_core::profile::{
    COPY_LABEL, COPIED_LABEL, DELETE_CONFIRM_PROMPT, KeyListView, ProfileEffects, ProfileFields,
    ProfileInit, ProfileSession, REVOKE_LABEL, Toast, init_profile,
};
use rcloud_core::{SiteConfig, SiteError, StoreError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Clipboard, Document, Element, Event, HtmlImageElement, HtmlInputElement};

use crate::dom;
use crate::effects::JsRandom;
use crate::header::Header;
use crate::wasm::SharedStore;

const TOAST_STYLE: [(&str, &str); 8] = [
    ("position", "fixed"),
    ("bottom", "20px"),
    ("right", "20px"),
    ("padding", "10px 14px"),
    ("border-radius", "10px"),
    ("background", "rgba(20,160,120,0.35)"),
    ("border", "1px solid rgba(200,255,220,0.35)"),
    ("color", "#eafff4"),
];

const KEY_INDEX_ATTR: &str = "data-key-index";
const KEY_ACTION_ATTR: &str = "data-key-action";

type Session = Rc<RefCell<ProfileSession<SharedStore>>>;

/// Shared handles the page listeners need.
#[derive(Clone)]
struct ProfilePage {
    document: Document,
    session: Session,
    header: Option<Rc<Header>>,
    routes: Routes,
    keys_list: Option<Element>,
    avatar_preview: Option<HtmlImageElement>,
}

/// Bind the profile view. Returns no listeners when the page has no
/// `#profile-form`, or when it redirected to login.
pub(crate) fn bind_profile(
    document: &Document,
    store: &SharedStore,
    config: &SiteConfig,
    header: Option<Rc<Header>>,
) -> Vec<EventListener> {
    let form = dom::by_id(document, "profile-form");
    let session = match init_profile(store.clone(), form.is_some(), config) {
        ProfileInit::Inert => return Vec::new(),
        ProfileInit::Redirect(route) => {
            dom::navigate(config.href(route));
            return Vec::new();
        }
        ProfileInit::Active(session) => session,
    };
    let Some(form) = form else {
        return Vec::new();
    };

    let fields = session.fields();
    dom::set_field_value(&form, "fullName", &fields.full_name);
    dom::set_field_value(&form, "email", &fields.email);
    dom::set_field_value(&form, "company", &fields.company);

    let avatar_preview = dom::by_id(document, "avatar-preview")
        .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());
    if let (Some(preview), Some(src)) = (&avatar_preview, session.avatar_preview()) {
        preview.set_src(src);
    }

    let page = ProfilePage {
        document: document.clone(),
        session: Rc::new(RefCell::new(session)),
        header,
        routes: config.routes.clone(),
        keys_list: dom::by_id(document, "keys-list"),
        avatar_preview,
    };
    page.render_keys();

    let mut listeners = Vec::new();
    if page.avatar_preview.is_some() {
        if let Some(input) = dom::by_id(document, "avatar") {
            listeners.push(page.bind_avatar_input(&input));
        }
    }
    listeners.push(page.bind_save(&form));
    if let Some(list) = page.keys_list.clone() {
        listeners.push(page.bind_key_actions(&list));
    }
    if let Some(button) = dom::by_id(document, "gen-key") {
        listeners.push(page.bind_generate(&button));
    }
    if let Some(button) = dom::by_id(document, "delete-account") {
        listeners.push(page.bind_delete(&button));
    }
    tracing::info!("profile view active");
    listeners
}

impl ProfilePage {
    fn apply(&self, effects: ProfileEffects) {
        if let (Some(preview), Some(src)) = (&self.avatar_preview, &effects.avatar_preview) {
            preview.set_src(src);
        }
        if effects.rerender_header {
            if let Some(header) = &self.header {
                header.render();
            }
        }
        if effects.rerender_keys {
            self.render_keys();
        }
        if let Some(toast) = effects.toast {
            if let Err(err) = self.show_toast(toast) {
                tracing::warn!(%err, "toast failed");
            }
        }
        if let Some(route) = effects.navigate {
            dom::navigate(self.routes.href(route));
        }
    }

    fn report(&self, result: Result<ProfileEffects, StoreError>, what: &str) {
        match result {
            Ok(effects) => self.apply(effects),
            Err(err) => tracing::warn!(%err, what, "profile update not persisted"),
        }
    }

    fn bind_avatar_input(&self, input: &Element) -> EventListener {
        let page = self.clone();
        let target = input.clone();
        EventListener::new(input, "change", move |_event: &Event| {
            let Some(file) = target
                .dyn_ref::<HtmlInputElement>()
                .and_then(HtmlInputElement::files)
                .and_then(|files| files.get(0))
            else {
                return;
            };
            let file = gloo::file::File::from(file);
            let page = page.clone();
            spawn_local(async move {
                match gloo::file::futures::read_as_data_url(&file).await {
                    Ok(data_url) => {
                        let result = page.session.borrow_mut().set_avatar(data_url);
                        page.report(result, "avatar");
                    }
                    Err(err) => tracing::warn!(error = %err, "avatar read failed"),
                }
            });
        })
    }

    fn bind_save(&self, form: &Element) -> EventListener {
        let page = self.clone();
        let target = form.clone();
        EventListener::new_with_options(
            form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                event.prevent_default();
                let fields = ProfileFields {
                    full_name: dom::field_value(&target, "fullName"),
                    email: dom::field_value(&target, "email"),
                    company: dom::field_value(&target, "company"),
                };
                let result = page.session.borrow_mut().save(fields);
                page.report(result, "save");
            },
        )
    }

    fn bind_generate(&self, button: &Element) -> EventListener {
        let page = self.clone();
        EventListener::new_with_options(
            button,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                event.prevent_default();
                let result = page.session.borrow_mut().generate_key(&mut JsRandom);
                page.report(result, "generate key");
            },
        )
    }

    fn bind_delete(&self, button: &Element) -> EventListener {
        let page = self.clone();
        EventListener::new(button, "click", move |_event: &Event| {
            let confirmed = dom::window()
                .and_then(|w| {
                    w.confirm_with_message(DELETE_CONFIRM_PROMPT)
                        .map_err(dom::js_error)
                })
                .unwrap_or(false);
            let result = page.session.borrow_mut().delete_account(confirmed);
            page.report(result, "delete account");
        })
    }

    /// One delegated listener serves every Copy/Revoke button in the list.
    fn bind_key_actions(&self, list: &Element) -> EventListener {
        let page = self.clone();
        EventListener::new(list, "click", move |event: &Event| {
            let Some(button) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(&format!("[{KEY_ACTION_ATTR}]")).ok().flatten())
            else {
                return;
            };
            let Some(index) = button
                .get_attribute(KEY_INDEX_ATTR)
                .and_then(|raw| raw.parse::<usize>().ok())
            else {
                return;
            };
            match button.get_attribute(KEY_ACTION_ATTR).as_deref() {
                Some("copy") => page.copy_key(index, button),
                Some("revoke") => {
                    let result = page.session.borrow_mut().revoke_key(index);
                    page.report(result, "revoke key");
                }
                _ => {}
            }
        })
    }

    /// Best-effort clipboard write; failures are silent.
    fn copy_key(&self, index: usize, button: Element) {
        let Some(request) = self.session.borrow().copy_key(index) else {
            return;
        };
        let Ok(window) = dom::window() else {
            return;
        };
        let Some(clipboard) = clipboard_of(&window.navigator()) else {
            tracing::debug!("clipboard unavailable");
            return;
        };
        let promise = clipboard.write_text(&request.text);
        spawn_local(async move {
            if JsFuture::from(promise).await.is_err() {
                tracing::debug!("clipboard write rejected");
                return;
            }
            button.set_text_content(Some(COPIED_LABEL));
            let delay = u32::try_from(request.revert_after.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(delay, move || button.set_text_content(Some(COPY_LABEL))).forget();
        });
    }

    fn render_keys(&self) {
        let Some(list) = &self.keys_list else {
            return;
        };
        let view = self.session.borrow().key_list();
        if let Err(err) = self.fill_key_list(list, &view) {
            tracing::warn!(%err, "key list render failed");
        }
    }

    fn fill_key_list(&self, list: &Element, view: &KeyListView) -> Result<(), SiteError> {
        list.set_text_content(None);
        match view {
            KeyListView::Empty { message } => {
                let empty = dom::create(&self.document, "div", "muted")?;
                empty.set_text_content(Some(message));
                dom::append(list, &empty)?;
            }
            KeyListView::Keys(rows) => {
                for row in rows {
                    let item = dom::create(&self.document, "div", "key-item")?;
                    let text = dom::create(&self.document, "div", "key-text")?;
                    text.set_text_content(Some(&row.text));
                    dom::append(&item, &text)?;
                    for (action, label) in [("copy", COPY_LABEL), ("revoke", REVOKE_LABEL)] {
                        let button = dom::create(&self.document, "button", "key-btn")?;
                        dom::set_attr(&button, "type", "button")?;
                        dom::set_attr(&button, KEY_ACTION_ATTR, action)?;
                        dom::set_attr(&button, KEY_INDEX_ATTR, &row.index.to_string())?;
                        button.set_text_content(Some(label));
                        dom::append(&item, &button)?;
                    }
                    dom::append(list, &item)?;
                }
            }
        }
        Ok(())
    }

    fn show_toast(&self, toast: Toast) -> Result<(), SiteError> {
        let body = self
            .document
            .body()
            .ok_or(SiteError::MissingHost("document.body"))?;
        let note = dom::create(&self.document, "div", "")?;
        note.set_text_content(Some(toast.text));
        dom::set_style(
            &note,
            TOAST_STYLE.iter().map(|(name, value)| (*name, (*value).to_owned())),
        )?;
        dom::append(&body, &note)?;
        let delay = u32::try_from(toast.lifetime.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(delay, move || note.remove()).forget();
        Ok(())
    }
}

/// `navigator.clipboard` is absent in insecure contexts and older browsers.
pub(crate) fn clipboard_of(navigator: &JsValue) -> Option<Clipboard> {
    js_sys::Reflect::get(navigator, &JsValue::from_str("clipboard"))
        .ok()?
        .dyn_into::<Clipboard>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn navigator_without_clipboard_yields_none() {
        let navigator = js_sys::Object::new();
        assert!(clipboard_of(&navigator).is_none());
    }

    #[wasm_bindgen_test]
    fn non_clipboard_value_yields_none() {
        let navigator = js_sys::Object::new();
        js_sys::Reflect::set(&navigator, &"clipboard".into(), &JsValue::from_f64(1.0)).unwrap();
        assert!(clipboard_of(&navigator).is_none());
    }
}
