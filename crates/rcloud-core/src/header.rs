#![forbid(unsafe_code)]

//! Header actions region: sign-in links or avatar, greeting and logout.

use crate::config::Routes;
use crate::error::StoreError;
use crate::route::Route;
use crate::store::UserStore;
use crate::user::UserRecord;

pub const SIGN_IN_LABEL: &str = "Sign in";
pub const SIGN_UP_LABEL: &str = "Start for free";
pub const LOGOUT_LABEL: &str = "Log out";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    /// Uploaded image (`data:` URL).
    Image(String),
    /// Initials glyph, at most two letters.
    Initials(String),
}

/// Typed content of the header actions region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderView {
    SignedOut {
        sign_in_href: String,
        sign_up_href: String,
    },
    SignedIn {
        profile_href: String,
        avatar: Avatar,
        greeting: String,
    },
}

impl HeaderView {
    #[must_use]
    pub fn for_user(user: Option<&UserRecord>, routes: &Routes) -> Self {
        match user {
            None => Self::SignedOut {
                sign_in_href: routes.href(Route::Login).to_owned(),
                sign_up_href: routes.href(Route::Register).to_owned(),
            },
            Some(user) => Self::SignedIn {
                profile_href: routes.href(Route::Profile).to_owned(),
                avatar: match user.avatar() {
                    Some(src) => Avatar::Image(src.to_owned()),
                    None => Avatar::Initials(user.initials()),
                },
                greeting: user.greeting().to_owned(),
            },
        }
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }
}

/// Renders the header from the injected store.
#[derive(Debug)]
pub struct HeaderRenderer<S> {
    store: S,
    routes: Routes,
}

impl<S: UserStore> HeaderRenderer<S> {
    #[must_use]
    pub fn new(store: S, routes: Routes) -> Self {
        Self { store, routes }
    }

    #[must_use]
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Current view. Pure with respect to the store: no writes.
    #[must_use]
    pub fn render(&self) -> HeaderView {
        HeaderView::for_user(self.store.load().as_ref(), &self.routes)
    }

    /// Clear the record. The caller re-renders and navigates to the
    /// returned route.
    pub fn logout(&self) -> Result<Route, StoreError> {
        self.store.clear()?;
        crate::info!("user logged out");
        Ok(Route::Index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LocalUserStore, MemoryStorage};
    use pretty_assertions::assert_eq;

    fn renderer() -> HeaderRenderer<LocalUserStore<MemoryStorage>> {
        HeaderRenderer::new(
            LocalUserStore::new(MemoryStorage::new(), "rc_auth_user"),
            Routes::default(),
        )
    }

    #[test]
    fn signed_out_shows_links() {
        assert_eq!(
            renderer().render(),
            HeaderView::SignedOut {
                sign_in_href: "./login.html".into(),
                sign_up_href: "./register.html".into(),
            }
        );
    }

    #[test]
    fn signed_in_prefers_avatar_image() {
        let header = renderer();
        header
            .store
            .save(&UserRecord {
                full_name: Some("Ada Lovelace".into()),
                avatar_data_url: Some("data:image/png;base64,AAAA".into()),
                ..UserRecord::default()
            })
            .unwrap();
        assert_eq!(
            header.render(),
            HeaderView::SignedIn {
                profile_href: "./profile.html".into(),
                avatar: Avatar::Image("data:image/png;base64,AAAA".into()),
                greeting: "Ada".into(),
            }
        );
    }

    #[test]
    fn render_is_idempotent() {
        let header = renderer();
        header
            .store
            .save(&UserRecord {
                email: Some("grace@example.com".into()),
                ..UserRecord::default()
            })
            .unwrap();
        let first = header.render();
        let second = header.render();
        assert_eq!(first, second);
        assert!(first.is_signed_in());
    }

    #[test]
    fn logout_clears_and_routes_home() {
        let header = renderer();
        header.store.save(&UserRecord::default()).unwrap();
        assert_eq!(header.logout().unwrap(), Route::Index);
        assert!(!header.render().is_signed_in());
    }
}
