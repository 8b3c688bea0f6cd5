//! Project configuration (`multireg.config.json`).
//!
//! The file maps group identifiers to package lists:
//!
//! ```json
//! {
//!   "registries": {
//!     "company": ["@corp/ui", "@corp/api"],
//!     "company -D": ["@corp/eslint-config"],
//!     "taobao": ["lodash"]
//!   },
//!   "default_registry": "npm",
//!   "auto_install": true
//! }
//! ```
//!
//! A trailing ` -D` or ` --save-dev` on an identifier marks the group as
//! devDependencies. The marker is translated into [`RegistryGroup::dev`] here,
//! once, so nothing downstream looks at identifier suffixes.

use crate::error::Error;
use crate::paths;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Identifier suffixes that mark a devDependencies group.
const DEV_MARKERS: [&str; 2] = ["-D", "--save-dev"];

/// One registry group, normalized from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryGroup {
    /// Key as written in the config file (e.g. `company -D`).
    pub identifier: String,
    /// Registry name with any dev marker stripped (e.g. `company`).
    pub registry: String,
    /// Whether the packages install as devDependencies.
    pub dev: bool,
    /// Package names, in declaration order.
    pub packages: Vec<String>,
}

impl RegistryGroup {
    /// Build a group from a raw identifier, splitting off the dev marker.
    #[must_use]
    pub fn from_identifier(identifier: impl Into<String>, packages: Vec<String>) -> Self {
        let identifier = identifier.into();
        let (registry, dev) = split_dev_marker(&identifier);
        Self {
            registry: registry.to_string(),
            dev,
            packages,
            identifier,
        }
    }
}

/// Normalized project configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Groups in declaration order.
    pub groups: Vec<RegistryGroup>,
    /// Registry used for the remaining manifest dependencies.
    pub default_registry: Option<String>,
    /// Whether to install manifest dependencies not covered by any group.
    pub auto_install: bool,
}

#[derive(Debug, Deserialize)]
struct RawProjectConfig {
    #[serde(default)]
    registries: IndexMap<String, PackageList>,
    #[serde(default)]
    default_registry: Option<String>,
    #[serde(default)]
    auto_install: bool,
}

/// A group value may be a single package name or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PackageList {
    One(String),
    Many(Vec<String>),
}

impl From<PackageList> for Vec<String> {
    fn from(list: PackageList) -> Self {
        match list {
            PackageList::One(name) => vec![name],
            PackageList::Many(names) => names,
        }
    }
}

impl ProjectConfig {
    /// Parse and normalize a config document.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        let raw: RawProjectConfig = serde_json::from_str(content)?;

        let groups = raw
            .registries
            .into_iter()
            .map(|(identifier, packages)| RegistryGroup::from_identifier(identifier, packages.into()))
            .collect();

        Ok(Self {
            groups,
            default_registry: raw.default_registry.filter(|name| !name.trim().is_empty()),
            auto_install: raw.auto_install,
        })
    }
}

/// Load `multireg.config.json` from the project root.
///
/// # Errors
/// Returns `ConfigMissing` if the file does not exist, `ConfigRead` or
/// `ConfigParse` if it cannot be read or is not a valid config document.
pub fn load_project_config(root: &Path) -> Result<ProjectConfig, Error> {
    let path = paths::config_path(root);
    if !path.is_file() {
        return Err(Error::ConfigMissing { path });
    }

    let content = fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;

    ProjectConfig::from_json_str(&content).map_err(|source| Error::ConfigParse { path, source })
}

/// Split a group identifier into its registry name and dev flag.
///
/// The marker must be preceded by a whitespace character, which is dropped
/// along with it.
#[must_use]
pub fn split_dev_marker(identifier: &str) -> (&str, bool) {
    for marker in DEV_MARKERS {
        if let Some(rest) = identifier.strip_suffix(marker) {
            let mut chars = rest.chars();
            if chars.next_back().is_some_and(char::is_whitespace) {
                return (chars.as_str(), true);
            }
        }
    }
    (identifier, false)
}
