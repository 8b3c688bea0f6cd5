//! Resolution of the currently active registry.

use crate::error::Error;
use crate::exec::{Programs, Runner};
use crate::registry::RegistryTable;

/// The registry the package manager is configured with right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRegistry {
    /// URL reported by the package manager.
    pub url: String,
    /// Matching registry name, if the URL is in the table.
    pub name: Option<String>,
}

/// Ask the package manager for its registry URL and name it via `table`.
///
/// An URL that matches no entry is not an error; `name` is then `None`.
///
/// # Errors
/// Returns `CurrentRegistry` if the package manager cannot report its
/// configuration.
pub fn current_registry_name(
    runner: &mut dyn Runner,
    programs: &Programs,
    table: &RegistryTable,
) -> Result<ActiveRegistry, Error> {
    let command = programs.current_registry_command();
    let output = runner
        .capture(&command)
        .map_err(|e| Error::CurrentRegistry(e.to_string()))?;

    let url = output.trim().to_string();
    let name = table.name_for_url(&url).map(ToString::to_string);

    Ok(ActiveRegistry { url, name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::tests::FakeRunner;

    #[test]
    fn test_known_registry() {
        let table = RegistryTable::builtin().unwrap();
        let mut runner = FakeRunner {
            output: "https://registry.npmjs.org/\n".to_string(),
            ..Default::default()
        };

        let active = current_registry_name(&mut runner, &Programs::default(), &table).unwrap();

        assert_eq!(active.url, "https://registry.npmjs.org/");
        assert_eq!(active.name.as_deref(), Some("npm"));
        assert_eq!(runner.calls.len(), 1);
        assert!(runner.calls[0].ends_with("config get registry"));
    }

    #[test]
    fn test_unknown_registry_is_not_an_error() {
        let table = RegistryTable::builtin().unwrap();
        let mut runner = FakeRunner {
            output: "https://nowhere.example.com/".to_string(),
            ..Default::default()
        };

        let active = current_registry_name(&mut runner, &Programs::default(), &table).unwrap();

        assert_eq!(active.name, None);
    }

    #[test]
    fn test_query_failure_is_fatal() {
        let table = RegistryTable::builtin().unwrap();
        let programs = Programs::default();
        let mut runner = FakeRunner {
            failing: vec![programs.current_registry_command().to_string()],
            ..Default::default()
        };

        let err = current_registry_name(&mut runner, &programs, &table).unwrap_err();

        assert!(matches!(err, Error::CurrentRegistry(_)));
    }
}
