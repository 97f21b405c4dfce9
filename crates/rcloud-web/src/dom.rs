#![forbid(unsafe_code)]

//! Thin helpers over `web-sys` lookups and element construction.

use rcloud_core::SiteError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

pub(crate) fn window() -> Result<Window, SiteError> {
    web_sys::window().ok_or(SiteError::MissingHost("window"))
}

pub(crate) fn document() -> Result<Document, SiteError> {
    window()?
        .document()
        .ok_or(SiteError::MissingHost("document"))
}

/// Convert a thrown JS value into a [`SiteError`].
pub(crate) fn js_error(value: JsValue) -> SiteError {
    SiteError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

pub(crate) fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

/// All elements matching `selector`, in document order. Invalid selectors
/// match nothing.
pub(crate) fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn by_id(document: &Document, id: &str) -> Option<Element> {
    document.get_element_by_id(id)
}

pub(crate) fn create(document: &Document, tag: &str, class: &str) -> Result<Element, SiteError> {
    let element = document.create_element(tag).map_err(js_error)?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    Ok(element)
}

pub(crate) fn set_attr(element: &Element, name: &str, value: &str) -> Result<(), SiteError> {
    element.set_attribute(name, value).map_err(js_error)
}

pub(crate) fn append(parent: &Element, child: &Element) -> Result<(), SiteError> {
    parent.append_child(child).map(drop).map_err(js_error)
}

pub(crate) fn set_hidden(element: &Element, hidden: bool) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        html.set_hidden(hidden);
    }
}

/// Set inline style properties, stopping at the first rejection.
pub(crate) fn set_style<'a>(
    element: &Element,
    props: impl IntoIterator<Item = (&'a str, String)>,
) -> Result<(), SiteError> {
    let Some(html) = element.dyn_ref::<HtmlElement>() else {
        return Ok(());
    };
    let style = html.style();
    for (name, value) in props {
        style.set_property(name, &value).map_err(js_error)?;
    }
    Ok(())
}

/// Value of the form control named `name`, or empty when absent.
pub(crate) fn field_value(form: &Element, name: &str) -> String {
    form.query_selector(&format!("[name=\"{name}\"]"))
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

pub(crate) fn set_field_value(form: &Element, name: &str, value: &str) {
    if let Some(input) = form
        .query_selector(&format!("[name=\"{name}\"]"))
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value(value);
    }
}

/// Leave the page.
pub(crate) fn navigate(href: &str) {
    let result = window().and_then(|w| w.location().set_href(href).map_err(js_error));
    if let Err(err) = result {
        tracing::warn!(%err, href, "navigation failed");
    }
}
