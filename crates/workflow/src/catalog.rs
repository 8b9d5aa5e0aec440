use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared::{
    domain::{ClassName, GroupId},
    protocol::Choice,
};
use thiserror::Error;

/// Marker prepended to a class key to form a button token.
pub const CLASS_TOKEN_PREFIX: &str = "class_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// Token-safe identifier (`[A-Za-z0-9_-]+`).
    pub key: String,
    pub name: ClassName,
    /// Button text; may carry decoration the name does not.
    pub label: String,
    /// Group the class's submissions belong to. Not forwarded to yet.
    pub destination_group: GroupId,
}

impl ClassEntry {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        destination_group: GroupId,
    ) -> Self {
        Self {
            key: key.into(),
            name: ClassName::new(name),
            label: label.into(),
            destination_group,
        }
    }

    pub fn token(&self) -> String {
        format!("{CLASS_TOKEN_PREFIX}{}", self.key)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("class catalog is empty")]
    Empty,
    #[error("class key '{0}' must be non-empty and contain only ASCII letters, digits, '-' or '_'")]
    InvalidKey(String),
    #[error("duplicate class key '{0}'")]
    DuplicateKey(String),
    #[error("duplicate class name '{0}'")]
    DuplicateName(String),
}

/// The fixed set of classes a student can pick from, in presentation order.
#[derive(Debug, Clone)]
pub struct ClassCatalog {
    entries: Vec<ClassEntry>,
}

impl ClassCatalog {
    pub fn new(entries: Vec<ClassEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        for entry in &entries {
            if !is_valid_key(&entry.key) {
                return Err(CatalogError::InvalidKey(entry.key.clone()));
            }
            if !keys.insert(entry.key.as_str()) {
                return Err(CatalogError::DuplicateKey(entry.key.clone()));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(CatalogError::DuplicateName(entry.name.0.clone()));
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }

    pub fn choices(&self) -> Vec<Choice> {
        self.entries
            .iter()
            .map(|entry| Choice {
                label: entry.label.clone(),
                token: entry.token(),
            })
            .collect()
    }

    /// Resolves a button token back to its class. Tokens without the class
    /// marker or with an unknown key resolve to `None`.
    pub fn decode_token(&self, token: &str) -> Option<&ClassEntry> {
        let key = token.strip_prefix(CLASS_TOKEN_PREFIX)?;
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn token_for(&self, name: &ClassName) -> Option<String> {
        self.entry_named(name).map(ClassEntry::token)
    }

    pub fn destination_for(&self, name: &ClassName) -> Option<GroupId> {
        self.entry_named(name).map(|entry| entry.destination_group)
    }

    fn entry_named(&self, name: &ClassName) -> Option<&ClassEntry> {
        self.entries.iter().find(|entry| &entry.name == name)
    }
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self {
            entries: default_entries(),
        }
    }
}

pub fn default_entries() -> Vec<ClassEntry> {
    vec![
        ClassEntry::new(
            "prosthodontics",
            "Prosthodontics",
            "🦷 Prosthodontics",
            GroupId(-1001234567890),
        ),
        ClassEntry::new(
            "orthodontics",
            "Orthodontics",
            "🔵 Orthodontics",
            GroupId(-1001234567891),
        ),
        ClassEntry::new(
            "restorative_aesthetic",
            "Restorative & Aesthetic",
            "💎 Restorative & Aesthetic",
            GroupId(-1001234567892),
        ),
        ClassEntry::new(
            "basic_sciences",
            "Basic Sciences",
            "🔬 Basic Sciences",
            GroupId(-1001234567893),
        ),
    ]
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
