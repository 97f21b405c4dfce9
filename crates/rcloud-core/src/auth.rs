#![forbid(unsafe_code)]

//! Demo register/login handling.
//!
//! This is deliberately non-authenticating: there is no backend, passwords
//! are read and dropped, and any email is accepted. Do not reuse it as real
//! authentication.

use crate::error::StoreError;
use crate::route::Route;
use crate::store::UserStore;
use crate::user::UserRecord;

/// Raw register form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    /// Accepted for form parity only; never stored or checked.
    pub password: String,
    pub company: String,
}

/// Raw login form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    /// Accepted for form parity only; never stored or checked.
    pub password: String,
}

impl RegisterForm {
    /// Record built from trimmed fields; the password is discarded.
    #[must_use]
    pub fn into_record(self) -> UserRecord {
        UserRecord {
            full_name: Some(self.full_name.trim().to_owned()),
            email: Some(self.email.trim().to_owned()),
            company: Some(self.company.trim().to_owned()),
            ..UserRecord::default()
        }
    }
}

impl LoginForm {
    /// Minimal record named after the email's local part.
    #[must_use]
    pub fn into_record(self) -> UserRecord {
        let email = self.email.trim().to_owned();
        let full_name = display_name_from_email(&email).to_owned();
        UserRecord {
            full_name: Some(full_name),
            email: Some(email),
            ..UserRecord::default()
        }
    }
}

/// Substring before the first `@`, or the whole input when there is none.
#[must_use]
pub fn display_name_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Register/login submission handler over the injected store.
#[derive(Debug)]
pub struct AuthForms<S> {
    store: S,
}

impl<S: UserStore> AuthForms<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Overwrite any prior record and continue to the welcome view.
    pub fn submit_register(&self, form: RegisterForm) -> Result<Route, StoreError> {
        let record = form.into_record();
        self.store.save(&record)?;
        crate::info!("demo account registered");
        Ok(Route::Welcome)
    }

    /// Overwrite any prior record and continue to the profile view.
    pub fn submit_login(&self, form: LoginForm) -> Result<Route, StoreError> {
        let record = form.into_record();
        self.store.save(&record)?;
        crate::info!("demo login");
        Ok(Route::Profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LocalUserStore, MemoryStorage};
    use pretty_assertions::assert_eq;

    fn forms() -> AuthForms<LocalUserStore<MemoryStorage>> {
        AuthForms::new(LocalUserStore::new(MemoryStorage::new(), "rc_auth_user"))
    }

    #[test]
    fn register_trims_and_drops_password() {
        let auth = forms();
        let route = auth
            .submit_register(RegisterForm {
                full_name: "  Ada Lovelace ".into(),
                email: "ada@example.com\n".into(),
                password: "hunter2".into(),
                company: " Engines ".into(),
            })
            .unwrap();
        assert_eq!(route, Route::Welcome);
        let raw = auth.store.storage().raw("rc_auth_user").unwrap();
        assert_eq!(
            raw,
            r#"{"fullName":"Ada Lovelace","email":"ada@example.com","company":"Engines"}"#
        );
        assert!(!raw.contains("hunter2"));
    }

    #[test]
    fn login_names_user_after_local_part() {
        let auth = forms();
        assert_eq!(
            auth.submit_login(LoginForm {
                email: " grace@example.com ".into(),
                password: String::new(),
            })
            .unwrap(),
            Route::Profile
        );
        let user = auth.store.load().unwrap();
        assert_eq!(user.full_name.as_deref(), Some("grace"));
        assert_eq!(user.email.as_deref(), Some("grace@example.com"));
        assert_eq!(user.company, None);
    }

    #[test]
    fn display_name_edge_cases() {
        assert_eq!(display_name_from_email("no-at-sign"), "no-at-sign");
        assert_eq!(display_name_from_email("@example.com"), "");
        assert_eq!(display_name_from_email("a@b@c"), "a");
    }
}
