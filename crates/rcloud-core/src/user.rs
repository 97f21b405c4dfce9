#![forbid(unsafe_code)]

//! The single persisted user record.

use serde::{Deserialize, Deserializer, Serialize};

/// Fallback glyph source when the record has neither name nor email.
const INITIALS_FALLBACK: &str = "U";
/// Header greeting when the record has no name.
const GREETING_FALLBACK: &str = "Profile";
/// Welcome-page name when the record has neither name nor email.
const WELCOME_FALLBACK: &str = "there";

/// Demo profile held in browser-local storage.
///
/// There is exactly one of these per browser profile. Field names follow the
/// stored JSON shape (`fullName`, `avatarDataUrl`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// `data:` URL of the uploaded avatar image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_data_url: Option<String>,
    /// Cosmetic API keys in insertion order. Duplicates are allowed.
    #[serde(
        default,
        deserialize_with = "keys_or_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub keys: Vec<String>,
}

/// Anything other than a list of strings reads as "no keys".
fn keys_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl UserRecord {
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        non_empty(&self.full_name)
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        non_empty(&self.email)
    }

    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        non_empty(&self.avatar_data_url)
    }

    /// Two-letter glyph from the first letters of up to two words.
    ///
    /// Source is the name, else the email, else `"U"`. Words are split on
    /// single spaces; empty words contribute nothing.
    #[must_use]
    pub fn initials(&self) -> String {
        let source = self
            .full_name()
            .or_else(|| self.email())
            .unwrap_or(INITIALS_FALLBACK);
        source
            .split(' ')
            .filter_map(|word| word.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }

    /// First word of the name, or `"Profile"`.
    #[must_use]
    pub fn greeting(&self) -> &str {
        match self.full_name() {
            Some(name) => name.split(' ').next().unwrap_or(name),
            None => GREETING_FALLBACK,
        }
    }

    /// Name shown on the welcome view.
    #[must_use]
    pub fn welcome_name(&self) -> &str {
        self.full_name()
            .or_else(|| self.email())
            .unwrap_or(WELCOME_FALLBACK)
    }
}
