//! `.nrmrc` parser for user-defined registries.
//!
//! The file is INI-style, one section per registry:
//!
//! ```ini
//! [company]
//! registry=https://npm.company.internal/
//! home=https://npm.company.internal/
//! ```

use indexmap::IndexMap;

/// Fields of one `.nrmrc` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NrmrcSection {
    /// Registry URL (`registry=`).
    pub registry: Option<String>,
    /// Homepage URL (`home=`).
    pub home: Option<String>,
}

/// Parse `.nrmrc` content into sections keyed by registry name.
///
/// Ignores comments (`#`, `;`), blank lines, keys outside any section and
/// keys other than `registry` and `home`. Values may be quoted. A section
/// appearing twice is merged, later keys overwriting earlier ones.
#[must_use]
pub fn parse_nrmrc(content: &str) -> IndexMap<String, NrmrcSection> {
    let mut sections: IndexMap<String, NrmrcSection> = IndexMap::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }

        let Some(section) = current.as_ref().and_then(|name| sections.get_mut(name)) else {
            continue;
        };

        if let Some((key, value)) = line.split_once('=') {
            let value = unquote(value.trim());
            match key.trim() {
                "registry" => section.registry = Some(value.to_string()),
                "home" => section.home = Some(value.to_string()),
                _ => {}
            }
        }
    }

    sections
}

/// Strip one pair of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_section() {
        let content = "[company]\nregistry=https://npm.company.internal/\n";
        let sections = parse_nrmrc(content);
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections["company"].registry.as_deref(),
            Some("https://npm.company.internal/")
        );
        assert_eq!(sections["company"].home, None);
    }

    #[test]
    fn test_parse_multiple_sections_in_order() {
        let content = "\
# private mirrors
[zeta]
registry = https://zeta.example.com/
home = https://zeta.example.com

; another
[alpha]
registry=\"https://alpha.example.com/\"
";
        let sections = parse_nrmrc(content);
        let names: Vec<&str> = sections.keys().map(String::as_str).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(
            sections["zeta"].home.as_deref(),
            Some("https://zeta.example.com")
        );
        assert_eq!(
            sections["alpha"].registry.as_deref(),
            Some("https://alpha.example.com/")
        );
    }

    #[test]
    fn test_keys_outside_section_ignored() {
        let content = "registry=https://stray.example.com/\n[ok]\nregistry=https://ok.example.com/\n";
        let sections = parse_nrmrc(content);
        assert_eq!(sections.len(), 1);
        assert!(sections.contains_key("ok"));
    }

    #[test]
    fn test_section_without_registry() {
        let sections = parse_nrmrc("[npm]\nhome=https://mine.example.com\n");
        assert_eq!(sections["npm"].registry, None);
        assert_eq!(
            sections["npm"].home.as_deref(),
            Some("https://mine.example.com")
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let sections = parse_nrmrc("[x]\nregistry=https://x/\nauth=secret\n");
        assert_eq!(sections["x"].registry.as_deref(), Some("https://x/"));
    }

    #[test]
    fn test_empty_content() {
        assert!(parse_nrmrc("").is_empty());
    }
}
