#![forbid(unsafe_code)]

//! Nav toggle, code tabs, FAQ accordion, footer year and anchor scrolling.

use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use rcloud_core::glue::{NavMenu, anchor_selector, aria_bool, select_tab, toggle_faq};
use web_sys::{
    Document, Element, Event, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use crate::dom;

pub(crate) fn bind_all(document: &Document) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    listeners.extend(bind_nav(document));
    listeners.extend(bind_tabs(document));
    listeners.extend(bind_faq(document));
    listeners.extend(bind_anchors(document));
    set_footer_year(document);
    listeners
}

fn set_aria(element: &Element, name: &str, value: bool) {
    if let Err(err) = dom::set_attr(element, name, aria_bool(value)) {
        tracing::debug!(%err, name, "aria attribute not set");
    }
}

fn set_class(element: &Element, class: &str, on: bool) {
    if let Err(err) = element
        .class_list()
        .toggle_with_force(class, on)
        .map_err(dom::js_error)
    {
        tracing::debug!(%err, class, "class not toggled");
    }
}

fn bind_nav(document: &Document) -> Vec<EventListener> {
    let (Some(nav), Some(toggle)) = (
        dom::query(document, ".nav"),
        dom::query(document, ".nav-toggle"),
    ) else {
        return Vec::new();
    };
    let mut listeners = Vec::new();
    {
        let nav = nav.clone();
        let button = toggle.clone();
        listeners.push(EventListener::new(&toggle, "click", move |_event: &Event| {
            let mut menu = NavMenu::new(nav.class_list().contains("open"));
            let open = menu.toggle();
            set_class(&nav, "open", open);
            set_aria(&button, "aria-expanded", open);
        }));
    }
    for link in dom::query_all(document, ".nav-list a") {
        let nav = nav.clone();
        let button = toggle.clone();
        listeners.push(EventListener::new(&link, "click", move |_event: &Event| {
            let mut menu = NavMenu::new(nav.class_list().contains("open"));
            menu.close();
            set_class(&nav, "open", menu.is_open());
            set_aria(&button, "aria-expanded", menu.is_open());
        }));
    }
    listeners
}

fn bind_tabs(document: &Document) -> Vec<EventListener> {
    let tabs: Rc<[Element]> = dom::query_all(document, ".tab").into();
    let panels: Rc<[Element]> = dom::query_all(document, ".code-panel").into();
    tabs.iter()
        .enumerate()
        .map(|(clicked, tab)| {
            let tabs = Rc::clone(&tabs);
            let panels = Rc::clone(&panels);
            EventListener::new(tab, "click", move |_event: &Event| {
                let targets: Vec<String> = tabs
                    .iter()
                    .map(|t| t.get_attribute("data-tab").unwrap_or_default())
                    .collect();
                let ids: Vec<String> = panels.iter().map(Element::id).collect();
                let update = select_tab(&targets, clicked, &ids);
                for (tab, active) in tabs.iter().zip(update.tabs_active) {
                    set_class(tab, "active", active);
                    set_aria(tab, "aria-selected", active);
                }
                for (panel, shown) in panels.iter().zip(update.panels_shown) {
                    set_class(panel, "show", shown);
                    dom::set_hidden(panel, !shown);
                }
            })
        })
        .collect()
}

fn bind_faq(document: &Document) -> Vec<EventListener> {
    dom::query_all(document, ".faq-q")
        .into_iter()
        .map(|button| {
            let target = button.clone();
            let document = document.clone();
            EventListener::new(&button, "click", move |_event: &Event| {
                let update = toggle_faq(target.get_attribute("aria-expanded").as_deref());
                set_aria(&target, "aria-expanded", update.expanded);
                let panel = target
                    .get_attribute("aria-controls")
                    .and_then(|id| dom::by_id(&document, &id));
                if let Some(panel) = panel {
                    dom::set_hidden(&panel, update.panel_hidden);
                }
            })
        })
        .collect()
}

fn bind_anchors(document: &Document) -> Vec<EventListener> {
    dom::query_all(document, "a[href^=\"#\"]")
        .into_iter()
        .map(|anchor| {
            let link = anchor.clone();
            let document = document.clone();
            EventListener::new_with_options(
                &anchor,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event: &Event| {
                    let href = link.get_attribute("href").unwrap_or_default();
                    let Some(target) = anchor_selector(&href).and_then(|s| dom::query(&document, s))
                    else {
                        return;
                    };
                    event.prevent_default();
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(ScrollBehavior::Smooth);
                    options.set_block(ScrollLogicalPosition::Start);
                    target.scroll_into_view_with_scroll_into_view_options(&options);
                },
            )
        })
        .collect()
}

fn set_footer_year(document: &Document) {
    if let Some(year) = dom::by_id(document, "year") {
        let now = js_sys::Date::new_0();
        year.set_text_content(Some(&now.get_full_year().to_string()));
    }
}
