#![forbid(unsafe_code)]

//! Explicit event subscriptions.
//!
//! Components declare which host events they need in `attach` and withdraw
//! them in `detach`. The frontend installs one DOM listener per declared
//! subscription; tests inspect the set directly.

use std::collections::BTreeMap;

/// Host events a component can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Scroll,
    Resize,
    OrientationChange,
    /// Section visibility changes (IntersectionObserver).
    Intersection,
}

impl EventKind {
    /// DOM event name for window-level events.
    #[must_use]
    pub const fn dom_name(self) -> Option<&'static str> {
        match self {
            Self::Scroll => Some("scroll"),
            Self::Resize => Some("resize"),
            Self::OrientationChange => Some("orientationchange"),
            Self::Intersection => None,
        }
    }
}

/// Who declared a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subscriber {
    ScrollVisuals,
    InkBursts,
}

/// Listener options requested alongside a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerOptions {
    pub passive: bool,
}

/// Registry of active `(subscriber, event)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscriptions {
    active: BTreeMap<(Subscriber, EventKind), ListenerOptions>,
}

impl Subscriptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, who: Subscriber, kind: EventKind, options: ListenerOptions) {
        self.active.insert((who, kind), options);
    }

    /// Drop every subscription held by `who`.
    pub fn unsubscribe_all(&mut self, who: Subscriber) {
        self.active.retain(|(owner, _), _| *owner != who);
    }

    /// Whether anyone listens for `kind`.
    #[must_use]
    pub fn contains(&self, kind: EventKind) -> bool {
        self.active.keys().any(|(_, k)| *k == kind)
    }

    #[must_use]
    pub fn is_subscribed(&self, who: Subscriber, kind: EventKind) -> bool {
        self.active.contains_key(&(who, kind))
    }

    #[must_use]
    pub fn options(&self, who: Subscriber, kind: EventKind) -> Option<ListenerOptions> {
        self.active.get(&(who, kind)).copied()
    }

    /// Active subscriptions in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Subscriber, EventKind, ListenerOptions)> + '_ {
        self.active.iter().map(|(&(who, kind), &opts)| (who, kind, opts))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSIVE: ListenerOptions = ListenerOptions { passive: true };

    #[test]
    fn unsubscribe_only_touches_owner() {
        let mut subs = Subscriptions::new();
        subs.subscribe(Subscriber::ScrollVisuals, EventKind::Resize, PASSIVE);
        subs.subscribe(Subscriber::InkBursts, EventKind::Intersection, PASSIVE);
        subs.unsubscribe_all(Subscriber::ScrollVisuals);
        assert!(!subs.contains(EventKind::Resize));
        assert!(subs.is_subscribed(Subscriber::InkBursts, EventKind::Intersection));
    }

    #[test]
    fn dom_names() {
        assert_eq!(EventKind::OrientationChange.dom_name(), Some("orientationchange"));
        assert_eq!(EventKind::Intersection.dom_name(), None);
    }
}
