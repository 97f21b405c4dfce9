#![forbid(unsafe_code)]

//! Page routes the site navigates between.

/// A navigable view of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Index,
    Login,
    Register,
    Welcome,
    Profile,
}

impl Route {
    /// Default relative href for this route.
    #[must_use]
    pub const fn default_href(self) -> &'static str {
        match self {
            Self::Index => "./index.html",
            Self::Login => "./login.html",
            Self::Register => "./register.html",
            Self::Welcome => "./welcome.html",
            Self::Profile => "./profile.html",
        }
    }
}
