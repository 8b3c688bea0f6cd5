//! Registry table: built-in registries overlaid with the user's `.nrmrc`.

use crate::error::Error;
use crate::nrmrc::{parse_nrmrc, NrmrcSection};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Registry definitions bundled with the binary.
const BUILTIN_REGISTRIES: &str = include_str!("../registries.json");

/// A named registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Registry name as used by `nrm use`.
    pub name: String,
    /// Registry URL.
    pub registry: Option<String>,
    /// Homepage URL.
    pub home: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    registry: Option<String>,
    #[serde(default)]
    home: Option<String>,
}

/// Registries keyed by name, in definition order.
#[derive(Debug, Clone, Default)]
pub struct RegistryTable {
    entries: IndexMap<String, RegistryEntry>,
}

impl RegistryTable {
    /// The bundled registry table.
    ///
    /// # Errors
    /// Returns an error if the bundled JSON is malformed.
    pub fn builtin() -> Result<Self, Error> {
        Self::from_json_str(BUILTIN_REGISTRIES).map_err(Error::BuiltinRegistries)
    }

    /// Parse a table from a `{ name: { registry, home } }` JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let raw: IndexMap<String, RawEntry> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(name, entry)| {
                let entry = RegistryEntry {
                    name: name.clone(),
                    registry: entry.registry,
                    home: entry.home,
                };
                (name, entry)
            })
            .collect();
        Ok(Self { entries })
    }

    /// Built-in table merged with the `.nrmrc` at `nrmrc` (if it exists).
    ///
    /// # Errors
    /// Returns an error if the bundled table is malformed or the `.nrmrc`
    /// exists but cannot be read.
    pub fn load(nrmrc: Option<&Path>) -> Result<Self, Error> {
        let table = Self::builtin()?;

        let Some(path) = nrmrc.filter(|p| p.is_file()) else {
            return Ok(table);
        };

        let content = std::fs::read_to_string(path)?;
        Ok(table.with_user_overrides(parse_nrmrc(&content)))
    }

    /// Overlay user-defined registries on this table.
    ///
    /// Unknown names are appended. For names already present, the existing
    /// (built-in) fields win; user values only fill fields that are missing.
    #[must_use]
    pub fn with_user_overrides(mut self, user: IndexMap<String, NrmrcSection>) -> Self {
        for (name, section) in user {
            match self.entries.get_mut(&name) {
                Some(existing) => {
                    if existing.registry.is_none() {
                        existing.registry = section.registry;
                    }
                    if existing.home.is_none() {
                        existing.home = section.home;
                    }
                }
                None => {
                    let entry = RegistryEntry {
                        name: name.clone(),
                        registry: section.registry,
                        home: section.home,
                    };
                    self.entries.insert(name, entry);
                }
            }
        }
        self
    }

    /// Look up a registry by name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// Whether a registry with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Name of the first registry whose URL equals `url` exactly.
    #[must_use]
    pub fn name_for_url(&self, url: &str) -> Option<&str> {
        self.entries
            .values()
            .find(|entry| entry.registry.as_deref() == Some(url))
            .map(|entry| entry.name.as_str())
    }

    /// Iterate entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
