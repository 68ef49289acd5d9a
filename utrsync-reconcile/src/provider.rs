//! Provider tag lookup: one bearer token and one approval remark per tag,
//! resolved once per run.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ReconcileError;

#[derive(Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub token: Option<String>,
    pub remark: String,
}

impl fmt::Debug for ProviderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderProfile")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("remark", &self.remark)
            .finish()
    }
}

/// A resolved, non-empty credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub tag: String,
    pub token: String,
    pub remark: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tag", &self.tag)
            .field("token", &"<redacted>")
            .field("remark", &self.remark)
            .finish()
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct ProviderTable {
    profiles: BTreeMap<String, ProviderProfile>,
}

impl ProviderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: &str, profile: ProviderProfile) {
        self.profiles.insert(normalize_tag(tag), profile);
    }

    pub fn with(mut self, tag: &str, profile: ProviderProfile) -> Self {
        self.insert(tag, profile);
        self
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn get(&self, tag: &str) -> Option<&ProviderProfile> {
        self.profiles.get(&normalize_tag(tag))
    }

    pub fn resolve(&self, tag: &str) -> Result<Credentials, ReconcileError> {
        let key = normalize_tag(tag);
        let profile = self.profiles.get(&key).ok_or_else(|| ReconcileError::UnknownProvider {
            tag: tag.to_string(),
            known: self.tags().collect::<Vec<_>>().join(", "),
        })?;

        let token = profile
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ReconcileError::MissingCredential { tag: key.clone() })?;

        Ok(Credentials {
            tag: key,
            token: token.to_string(),
            remark: profile.remark.clone(),
        })
    }
}
