#![forbid(unsafe_code)]

//! Register/login form submission and the welcome greeting.

use gloo::events::{EventListener, EventListenerOptions};
use rcloud_core::auth::{AuthForms, LoginForm, RegisterForm};
use rcloud_core::config::Routes;
use rcloud_core::welcome::{WelcomeView, welcome_view};
use web_sys::{Document, Event};

use crate::dom;
use crate::wasm::SharedStore;

/// Wire whichever auth forms the page has.
pub(crate) fn bind_auth_forms(
    document: &Document,
    store: &SharedStore,
    routes: &Routes,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    if let Some(form) = dom::by_id(document, "register-form") {
        let forms = AuthForms::new(store.clone());
        let routes = routes.clone();
        let target = form.clone();
        listeners.push(EventListener::new_with_options(
            &form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                event.prevent_default();
                let submitted = RegisterForm {
                    full_name: dom::field_value(&target, "fullName"),
                    email: dom::field_value(&target, "email"),
                    password: dom::field_value(&target, "password"),
                    company: dom::field_value(&target, "company"),
                };
                match forms.submit_register(submitted) {
                    Ok(route) => dom::navigate(routes.href(route)),
                    Err(err) => tracing::warn!(%err, "register failed"),
                }
            },
        ));
    }

    if let Some(form) = dom::by_id(document, "login-form") {
        let forms = AuthForms::new(store.clone());
        let routes = routes.clone();
        let target = form.clone();
        listeners.push(EventListener::new_with_options(
            &form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                event.prevent_default();
                let submitted = LoginForm {
                    email: dom::field_value(&target, "email"),
                    password: dom::field_value(&target, "password"),
                };
                match forms.submit_login(submitted) {
                    Ok(route) => dom::navigate(routes.href(route)),
                    Err(err) => tracing::warn!(%err, "login failed"),
                }
            },
        ));
    }

    listeners
}

/// Personalize `#welcome-name`, or leave for registration when logged out.
pub(crate) fn personalize_welcome(document: &Document, store: &SharedStore, routes: &Routes) {
    let Some(name) = dom::by_id(document, "welcome-name") else {
        return;
    };
    match welcome_view(store) {
        WelcomeView::Greet(text) => name.set_text_content(Some(&text)),
        WelcomeView::Redirect(route) => dom::navigate(routes.href(route)),
    }
}
