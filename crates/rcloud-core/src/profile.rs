#![forbid(unsafe_code)]

//! Profile page controller.
//!
//! Three guards decide what happens on page load:
//!
//! 1. No profile form in the view: the controller is inert.
//! 2. Form present but no stored user: redirect to login (terminal).
//! 3. Otherwise: hydrate the form and enable avatar upload, profile save,
//!    key management and account deletion.
//!
//! The active session keeps an in-memory copy of the record and writes it
//! back wholesale after every mutation. A second tab holding its own copy
//! can overwrite these writes; there is no cross-tab invalidation.

use core::time::Duration;

use crate::config::{SiteConfig, Timings};
use crate::error::StoreError;
use crate::rng::{RandomSource, base36_fragment};
use crate::route::Route;
use crate::store::UserStore;
use crate::user::UserRecord;

pub const SAVED_TOAST_TEXT: &str = "Saved";
pub const EMPTY_KEYS_TEXT: &str = "No keys yet.";
pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied";
pub const REVOKE_LABEL: &str = "Revoke";
pub const DELETE_CONFIRM_PROMPT: &str = "Delete your account? This will remove local data.";

/// Editable profile form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFields {
    pub full_name: String,
    pub email: String,
    pub company: String,
}

/// Transient confirmation toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toast {
    pub text: &'static str,
    pub lifetime: Duration,
}

/// What the frontend must refresh after a session operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEffects {
    pub rerender_header: bool,
    pub rerender_keys: bool,
    /// New `src` for the avatar preview.
    pub avatar_preview: Option<String>,
    pub toast: Option<Toast>,
    pub navigate: Option<Route>,
}

/// One row of the key list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRow {
    /// Position used by copy/revoke.
    pub index: usize,
    pub text: String,
}

/// Typed content of `#keys-list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyListView {
    Empty { message: &'static str },
    Keys(Vec<KeyRow>),
}

/// Clipboard write to perform, best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    pub text: String,
    /// How long the button reads "Copied" after a successful write.
    pub revert_after: Duration,
}

/// Cosmetic API key: `prefix` followed by two base-36 fragments.
///
/// No uniqueness check is made; collisions are possible but unlikely.
pub fn generate_api_key<R: RandomSource>(prefix: &str, rng: &mut R) -> String {
    let first = base36_fragment(rng.next_f64());
    let second = base36_fragment(rng.next_f64());
    format!("{prefix}{first}{second}")
}

/// Page-load outcome of the controller.
#[derive(Debug)]
pub enum ProfileInit<S> {
    /// Not the profile view.
    Inert,
    /// Logged out; navigate away and stop.
    Redirect(Route),
    Active(ProfileSession<S>),
}

/// Run the three guards.
pub fn init_profile<S: UserStore>(store: S, has_form: bool, config: &SiteConfig) -> ProfileInit<S> {
    if !has_form {
        return ProfileInit::Inert;
    }
    let Some(user) = store.load() else {
        crate::info!("profile view without a stored user, redirecting to login");
        return ProfileInit::Redirect(Route::Login);
    };
    ProfileInit::Active(ProfileSession {
        store,
        user,
        key_prefix: config.api_key_prefix.clone(),
        timings: config.timings,
    })
}

/// Active profile page state.
#[derive(Debug)]
pub struct ProfileSession<S> {
    store: S,
    user: UserRecord,
    key_prefix: String,
    timings: Timings,
}

impl<S: UserStore> ProfileSession<S> {
    #[must_use]
    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    /// Form hydration values; missing fields become empty strings.
    #[must_use]
    pub fn fields(&self) -> ProfileFields {
        ProfileFields {
            full_name: self.user.full_name.clone().unwrap_or_default(),
            email: self.user.email.clone().unwrap_or_default(),
            company: self.user.company.clone().unwrap_or_default(),
        }
    }

    /// Initial avatar preview source, if any.
    #[must_use]
    pub fn avatar_preview(&self) -> Option<&str> {
        self.user.avatar()
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.user.keys
    }

    #[must_use]
    pub fn key_list(&self) -> KeyListView {
        if self.user.keys.is_empty() {
            return KeyListView::Empty {
                message: EMPTY_KEYS_TEXT,
            };
        }
        KeyListView::Keys(
            self.user
                .keys
                .iter()
                .enumerate()
                .map(|(index, text)| KeyRow {
                    index,
                    text: text.clone(),
                })
                .collect(),
        )
    }

    /// A selected image finished reading as a data URL.
    pub fn set_avatar(&mut self, data_url: String) -> Result<ProfileEffects, StoreError> {
        self.user.avatar_data_url = Some(data_url.clone());
        self.store.save(&self.user)?;
        Ok(ProfileEffects {
            rerender_header: true,
            avatar_preview: Some(data_url),
            ..ProfileEffects::default()
        })
    }

    /// Overwrite name/email/company with trimmed form values.
    pub fn save(&mut self, fields: ProfileFields) -> Result<ProfileEffects, StoreError> {
        self.user.full_name = Some(fields.full_name.trim().to_owned());
        self.user.email = Some(fields.email.trim().to_owned());
        self.user.company = Some(fields.company.trim().to_owned());
        self.store.save(&self.user)?;
        Ok(ProfileEffects {
            rerender_header: true,
            toast: Some(Toast {
                text: SAVED_TOAST_TEXT,
                lifetime: Duration::from_millis(u64::from(self.timings.toast_ms)),
            }),
            ..ProfileEffects::default()
        })
    }

    /// Append a fresh key and persist.
    pub fn generate_key<R: RandomSource>(
        &mut self,
        rng: &mut R,
    ) -> Result<ProfileEffects, StoreError> {
        let key = generate_api_key(&self.key_prefix, rng);
        self.user.keys.push(key);
        self.store.save(&self.user)?;
        crate::debug!(count = self.user.keys.len(), "api key generated");
        Ok(ProfileEffects {
            rerender_keys: true,
            ..ProfileEffects::default()
        })
    }

    /// Text to put on the clipboard for the key at `index`.
    #[must_use]
    pub fn copy_key(&self, index: usize) -> Option<CopyRequest> {
        self.user.keys.get(index).map(|text| CopyRequest {
            text: text.clone(),
            revert_after: Duration::from_millis(u64::from(self.timings.copied_label_ms)),
        })
    }

    /// Remove the key at `index`. Out-of-range positions change nothing.
    pub fn revoke_key(&mut self, index: usize) -> Result<ProfileEffects, StoreError> {
        if index >= self.user.keys.len() {
            return Ok(ProfileEffects::default());
        }
        self.user.keys.remove(index);
        self.store.save(&self.user)?;
        Ok(ProfileEffects {
            rerender_keys: true,
            ..ProfileEffects::default()
        })
    }

    /// Clear the store and leave for registration, if confirmed.
    pub fn delete_account(&mut self, confirmed: bool) -> Result<ProfileEffects, StoreError> {
        if !confirmed {
            return Ok(ProfileEffects::default());
        }
        self.store.clear()?;
        crate::info!("demo account deleted");
        Ok(ProfileEffects {
            navigate: Some(Route::Register),
            ..ProfileEffects::default()
        })
    }
}
