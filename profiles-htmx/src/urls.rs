//! Named profile routes
//!
//! | name | path |
//! |---|---|
//! | `profiles_create_profile` | `{prefix}/create/` |
//! | `profiles_edit_profile` | `{prefix}/edit/` |
//! | `profiles_profile_detail` | `{prefix}/{username}/` |
//!
//! Templates resolve them by name with `url("profiles_edit_profile")` or
//! `url("profiles_profile_detail", username)`.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Route name of the create view
pub const CREATE_PROFILE: &str = "profiles_create_profile";
/// Route name of the edit view
pub const EDIT_PROFILE: &str = "profiles_edit_profile";
/// Route name of the detail view
pub const PROFILE_DETAIL: &str = "profiles_profile_detail";

/// Characters escaped inside a single path segment, HTML-significant ones included
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// URL builder for the profile routes under a prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUrls {
    prefix: String,
}

impl ProfileUrls {
    /// Routes mounted under `prefix` (e.g. `/profiles`)
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let trimmed = prefix.trim().trim_end_matches('/');
        let prefix = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        Self { prefix }
    }

    /// Path of the create view
    #[must_use]
    pub fn create(&self) -> String {
        format!("{}/create/", self.prefix)
    }

    /// Path of the edit view
    #[must_use]
    pub fn edit(&self) -> String {
        format!("{}/edit/", self.prefix)
    }

    /// Path of the detail view for `username`, percent-encoded
    #[must_use]
    pub fn detail(&self, username: &str) -> String {
        format!("{}/{}/", self.prefix, utf8_percent_encode(username, PATH_SEGMENT))
    }

    /// Router pattern of the detail view
    #[must_use]
    pub fn detail_pattern(&self) -> String {
        format!("{}/{{username}}/", self.prefix)
    }

    /// Resolve a route by name
    ///
    /// The detail route needs `username`; other routes ignore it.
    #[must_use]
    pub fn reverse(&self, name: &str, username: Option<&str>) -> Option<String> {
        match name {
            CREATE_PROFILE => Some(self.create()),
            EDIT_PROFILE => Some(self.edit()),
            PROFILE_DETAIL => username.map(|u| self.detail(u)),
            _ => None,
        }
    }
}

impl Default for ProfileUrls {
    fn default() -> Self {
        Self::new("/profiles")
    }
}
