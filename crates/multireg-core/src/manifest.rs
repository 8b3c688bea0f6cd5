//! Project manifest (`package.json`) dependency extraction.

use crate::error::Error;
use crate::paths;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Declared dependencies of the project, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// `dependencies`: name → version specifier.
    pub dependencies: IndexMap<String, String>,
    /// `devDependencies`: name → version specifier.
    pub dev_dependencies: IndexMap<String, String>,
}

impl Manifest {
    /// Parse a manifest from `package.json` content.
    ///
    /// Other sections are ignored.
    pub fn from_json_str(content: &str) -> Result<Self, String> {
        let pkg_json: Value =
            serde_json::from_str(content).map_err(|e| format!("Invalid JSON: {e}"))?;

        let root = pkg_json
            .as_object()
            .ok_or_else(|| "package.json must be a JSON object".to_string())?;

        Ok(Self {
            dependencies: extract_section(root, "dependencies")?,
            dev_dependencies: extract_section(root, "devDependencies")?,
        })
    }

    /// Every declared package name, production and dev.
    #[must_use]
    pub fn declared_names(&self) -> HashSet<&str> {
        self.dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .map(String::as_str)
            .collect()
    }

    /// Copy of this manifest with the given names removed from both sections.
    #[must_use]
    pub fn without(&self, names: &HashSet<&str>) -> Self {
        let keep = |map: &IndexMap<String, String>| -> IndexMap<String, String> {
            map.iter()
                .filter(|(name, _)| !names.contains(name.as_str()))
                .map(|(name, spec)| (name.clone(), spec.clone()))
                .collect()
        };

        Self {
            dependencies: keep(&self.dependencies),
            dev_dependencies: keep(&self.dev_dependencies),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }
}

/// Load the project's `package.json`.
///
/// A missing manifest is an empty one: there is nothing declared to reconcile.
///
/// # Errors
/// Returns `ManifestInvalid` if the file cannot be read, is not JSON, or has
/// malformed dependency sections.
pub fn load_manifest(root: &Path) -> Result<Manifest, Error> {
    let path = paths::manifest_path(root);
    if !path.exists() {
        return Ok(Manifest::default());
    }

    let content = fs::read_to_string(&path).map_err(|e| Error::ManifestInvalid {
        path: path.clone(),
        message: format!("Failed to read: {e}"),
    })?;

    Manifest::from_json_str(&content).map_err(|message| Error::ManifestInvalid { path, message })
}

/// Extract one dependency section, which must be an object of strings.
fn extract_section(
    root: &serde_json::Map<String, Value>,
    section: &str,
) -> Result<IndexMap<String, String>, String> {
    let Some(section_value) = root.get(section) else {
        return Ok(IndexMap::new());
    };

    let Some(section_obj) = section_value.as_object() else {
        return Err(format!(
            "'{section}' must be an object, got {}",
            json_type_name(section_value)
        ));
    };

    section_obj
        .iter()
        .map(|(name, range_value)| match range_value.as_str() {
            Some(range) => Ok((name.clone(), range.to_string())),
            None => Err(format!(
                "Invalid range for '{name}' in '{section}': expected string, got {}",
                json_type_name(range_value)
            )),
        })
        .collect()
}

/// Get a human-readable type name for a JSON value.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_both_sections_in_order() {
        let manifest = Manifest::from_json_str(
            r#"{
                "name": "app",
                "dependencies": { "b": "^2.0.0", "a": "1.0.0" },
                "devDependencies": { "c": "~3.1.0" }
            }"#,
        )
        .unwrap();

        let deps: Vec<&str> = manifest.dependencies.keys().map(String::as_str).collect();
        assert_eq!(deps, ["b", "a"]);
        assert_eq!(manifest.dev_dependencies["c"], "~3.1.0");
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let manifest = Manifest::from_json_str(r#"{ "name": "app" }"#).unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_invalid_section_type() {
        let err = Manifest::from_json_str(r#"{ "devDependencies": ["a"] }"#).unwrap_err();
        assert!(err.contains("'devDependencies' must be an object, got array"));
    }

    #[test]
    fn test_invalid_range_type() {
        let err = Manifest::from_json_str(r#"{ "dependencies": { "a": 1 } }"#).unwrap_err();
        assert!(err.contains("'a'"));
        assert!(err.contains("number"));
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(Manifest::from_json_str("[]").is_err());
    }

    #[test]
    fn test_declared_names_union() {
        let manifest = Manifest::from_json_str(
            r#"{ "dependencies": { "a": "1", "b": "1" }, "devDependencies": { "c": "1" } }"#,
        )
        .unwrap();
        let names = manifest.declared_names();
        assert_eq!(names, HashSet::from(["a", "b", "c"]));
    }

    #[test]
    fn test_without_removes_from_both_sections() {
        let manifest = Manifest::from_json_str(
            r#"{ "dependencies": { "a": "1", "b": "2" }, "devDependencies": { "c": "3", "a": "1" } }"#,
        )
        .unwrap();

        let rest = manifest.without(&HashSet::from(["a"]));
        assert_eq!(rest.dependencies.keys().collect::<Vec<_>>(), ["b"]);
        assert_eq!(rest.dev_dependencies.keys().collect::<Vec<_>>(), ["c"]);
        // original untouched
        assert!(manifest.dependencies.contains_key("a"));
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempdir().unwrap();
        let manifest = load_manifest(dir.path()).unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        fs::write(paths::manifest_path(dir.path()), "{").unwrap();
        let err = load_manifest(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ManifestInvalid { .. }));
    }
}
