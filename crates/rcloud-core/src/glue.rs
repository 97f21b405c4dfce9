#![forbid(unsafe_code)]

//! Small UI state machines: mobile nav, code tabs, FAQ accordion, anchors.
//!
//! Each returns the attribute values to apply; the frontend owns the DOM.

/// `aria-expanded` / `aria-selected` attribute text.
#[must_use]
pub const fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Mobile navigation menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    #[must_use]
    pub const fn new(open: bool) -> Self {
        Self { open }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        self.open
    }

    /// Toggle-button click; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// A nav link was followed.
    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Active flags for tabs and shown flags for panels after a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabUpdate {
    pub tabs_active: Vec<bool>,
    pub panels_shown: Vec<bool>,
}

/// Panel id controlled by a tab's `data-tab` value.
#[must_use]
pub fn panel_id(target: &str) -> String {
    format!("panel-{target}")
}

/// Activate tab `clicked`; panels are matched by id `panel-<data-tab>`.
///
/// Activation is by position, so two tabs sharing a `data-tab` value are
/// still distinguished.
#[must_use]
pub fn select_tab<T: AsRef<str>, P: AsRef<str>>(
    tab_targets: &[T],
    clicked: usize,
    panel_ids: &[P],
) -> TabUpdate {
    let wanted = tab_targets.get(clicked).map(|t| panel_id(t.as_ref()));
    TabUpdate {
        tabs_active: (0..tab_targets.len()).map(|i| i == clicked).collect(),
        panels_shown: panel_ids
            .iter()
            .map(|id| wanted.as_deref() == Some(id.as_ref()))
            .collect(),
    }
}

/// Result of clicking an FAQ question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqUpdate {
    pub expanded: bool,
    pub panel_hidden: bool,
}

/// Flip an FAQ item given its current `aria-expanded` value.
#[must_use]
pub fn toggle_faq(aria_expanded: Option<&str>) -> FaqUpdate {
    let was_expanded = aria_expanded == Some("true");
    FaqUpdate {
        expanded: !was_expanded,
        panel_hidden: was_expanded,
    }
}

/// Selector for an in-page anchor, or `None` when the link should navigate
/// normally.
#[must_use]
pub fn anchor_selector(href: &str) -> Option<&str> {
    (href.len() > 1 && href.starts_with('#')).then_some(href)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nav_toggles_and_closes() {
        let mut nav = NavMenu::default();
        assert!(nav.toggle());
        assert_eq!(aria_bool(nav.is_open()), "true");
        nav.close();
        assert!(!nav.is_open());
        assert!(nav.toggle());
        assert!(!nav.toggle());
    }

    #[test]
    fn select_tab_shows_matching_panel() {
        let tabs = ["web", "ios", "android"];
        let panels = ["panel-web", "panel-ios", "panel-android"];
        assert_eq!(
            select_tab(&tabs, 1, &panels),
            TabUpdate {
                tabs_active: vec![false, true, false],
                panels_shown: vec![false, true, false],
            }
        );
    }

    #[test]
    fn select_tab_without_panel_hides_all() {
        let update = select_tab(&["web", "cli"], 1, &["panel-web"]);
        assert_eq!(update.tabs_active, vec![false, true]);
        assert_eq!(update.panels_shown, vec![false]);
    }

    #[test]
    fn faq_flips_state() {
        assert_eq!(
            toggle_faq(Some("true")),
            FaqUpdate {
                expanded: false,
                panel_hidden: true,
            }
        );
        assert_eq!(
            toggle_faq(None),
            FaqUpdate {
                expanded: true,
                panel_hidden: false,
            }
        );
    }

    #[test]
    fn anchor_selector_rejects_bare_hash() {
        assert_eq!(anchor_selector("#pricing"), Some("#pricing"));
        assert_eq!(anchor_selector("#"), None);
        assert_eq!(anchor_selector("/docs"), None);
    }
}
