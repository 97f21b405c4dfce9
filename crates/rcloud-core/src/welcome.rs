#![forbid(unsafe_code)]

//! Welcome view personalization.

use crate::route::Route;
use crate::store::UserStore;

/// Outcome of visiting the welcome view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WelcomeView {
    Greet(String),
    /// No stored user; leave for this route.
    Redirect(Route),
}

/// Name to greet, or a redirect to registration when logged out.
#[must_use]
pub fn welcome_view<S: UserStore>(store: &S) -> WelcomeView {
    match store.load() {
        Some(user) => WelcomeView::Greet(user.welcome_name().to_owned()),
        None => WelcomeView::Redirect(Route::Register),
    }
}
