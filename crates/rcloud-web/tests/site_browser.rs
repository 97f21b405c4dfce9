#![cfg(target_arch = "wasm32")]

use rcloud_web::boot;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlElement, window};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    window().unwrap().document().unwrap()
}

fn mount(tag: &str, class: &str, id: &str) -> Element {
    let doc = document();
    let el = doc.create_element(tag).unwrap();
    if !class.is_empty() {
        el.set_class_name(class);
    }
    if !id.is_empty() {
        el.set_id(id);
    }
    doc.body().unwrap().append_child(&el).unwrap();
    el
}

fn options(storage_key: &str) -> JsValue {
    js_sys::JSON::parse(&format!(r#"{{"storageKey":"{storage_key}"}}"#)).unwrap()
}

#[wasm_bindgen_test]
fn signed_in_header_shows_initials_and_logout() {
    let storage = window().unwrap().local_storage().unwrap().unwrap();
    storage
        .set_item(
            "rc_test_header",
            r#"{"fullName":"Ada Lovelace","email":"ada@example.com"}"#,
        )
        .unwrap();
    let actions = mount("div", "actions", "");

    let mut site = boot(Some(options("rc_test_header"))).unwrap();
    let text = actions.text_content().unwrap_or_default();
    assert!(text.contains("AL"), "header text: {text}");
    assert!(text.contains("Ada"), "header text: {text}");
    assert!(document().get_element_by_id("logout-btn").is_some());

    site.destroy();
    actions.remove();
    storage.remove_item("rc_test_header").unwrap();
}

#[wasm_bindgen_test]
fn signed_out_header_offers_sign_in() {
    let actions = mount("div", "actions", "");
    let mut site = boot(Some(options("rc_test_signed_out"))).unwrap();
    let text = actions.text_content().unwrap_or_default();
    assert!(text.contains("Sign in"), "header text: {text}");
    assert!(text.contains("Start for free"), "header text: {text}");
    site.destroy();
    actions.remove();
}

#[wasm_bindgen_test]
fn footer_year_is_filled() {
    let year = mount("span", "", "year");
    let mut site = boot(None).unwrap();
    let expected = js_sys::Date::new_0().get_full_year().to_string();
    assert_eq!(year.text_content().unwrap_or_default(), expected);
    site.destroy();
    year.remove();
}

#[wasm_bindgen_test]
fn scroll_visuals_set_root_properties() {
    let mut site = boot(None).unwrap();
    let root = document().document_element().unwrap();
    let style = root.get_attribute("style").unwrap_or_default();
    assert!(style.contains("--hA"), "root style: {style}");
    assert!(style.contains("--bg1-off"), "root style: {style}");
    site.destroy();
}

#[wasm_bindgen_test]
fn unknown_option_is_rejected() {
    let bad = js_sys::JSON::parse(r#"{"storageKeyy":"x"}"#).unwrap();
    assert!(boot(Some(bad)).is_err());
}

#[wasm_bindgen_test]
fn nav_toggle_opens_and_link_closes_menu() {
    let nav = mount("nav", "nav", "");
    let toggle = mount("button", "nav-toggle", "");
    let list = document().create_element("ul").unwrap();
    list.set_class_name("nav-list");
    let link = document().create_element("a").unwrap();
    list.append_child(&link).unwrap();
    nav.append_child(&list).unwrap();

    let mut site = boot(None).unwrap();
    toggle.unchecked_ref::<HtmlElement>().click();
    assert!(nav.class_list().contains("open"));
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("true"));

    link.unchecked_ref::<HtmlElement>().click();
    assert!(!nav.class_list().contains("open"));
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("false"));

    site.destroy();
    nav.remove();
    toggle.remove();
}
