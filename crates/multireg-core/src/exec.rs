//! Sequential plan execution.
//!
//! The active registry is machine-wide state, so operations run one at a
//! time through a [`Runner`], and the first failure stops the plan. There is
//! no rollback: whatever the completed prefix changed stays changed.

use crate::error::Error;
use crate::plan::{Operation, Package, Plan};
use crate::registry::RegistryTable;
use std::fmt;

/// Environment variable to override the package manager executable.
pub const NPM_ENV: &str = "MULTIREG_NPM";

/// Environment variable to override the registry switcher executable.
pub const NRM_ENV: &str = "MULTIREG_NRM";

#[cfg(windows)]
const DEFAULT_NPM: &str = "npm.cmd";
#[cfg(not(windows))]
const DEFAULT_NPM: &str = "npm";

#[cfg(windows)]
const DEFAULT_NRM: &str = "nrm.cmd";
#[cfg(not(windows))]
const DEFAULT_NRM: &str = "nrm";

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Handle on the external tools that own the active registry.
///
/// Implementations block until the process exits.
pub trait Runner {
    /// Run `command` with the terminal attached. `Ok(true)` means exit code 0.
    ///
    /// # Errors
    /// Returns `CommandSpawn` if the process cannot be started.
    fn run(&mut self, command: &CommandLine) -> Result<bool, Error>;

    /// Run `command` and return its standard output.
    ///
    /// # Errors
    /// Returns `CommandSpawn` if the process cannot be started and
    /// `CommandFailed` if it exits non-zero.
    fn capture(&mut self, command: &CommandLine) -> Result<String, Error>;
}

/// Executable names for the package manager and the registry switcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Programs {
    pub npm: String,
    pub nrm: String,
}

impl Default for Programs {
    fn default() -> Self {
        Self {
            npm: DEFAULT_NPM.to_string(),
            nrm: DEFAULT_NRM.to_string(),
        }
    }
}

impl Programs {
    /// Defaults, overridden by `MULTIREG_NPM` / `MULTIREG_NRM` when set.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            npm: std::env::var(NPM_ENV).unwrap_or(defaults.npm),
            nrm: std::env::var(NRM_ENV).unwrap_or(defaults.nrm),
        }
    }

    /// `nrm use <registry>`
    #[must_use]
    pub fn switch_command(&self, registry: &str) -> CommandLine {
        CommandLine::new(&self.nrm, ["use", registry])
    }

    /// `npm install (--save|--save-dev) --save-exact --loglevel error <packages...>`
    #[must_use]
    pub fn install_command(&self, dev: bool, packages: &[Package]) -> CommandLine {
        let save = if dev { "--save-dev" } else { "--save" };
        let mut args = vec![
            "install".to_string(),
            save.to_string(),
            "--save-exact".to_string(),
            "--loglevel".to_string(),
            "error".to_string(),
        ];
        args.extend(packages.iter().map(ToString::to_string));
        CommandLine::new(&self.npm, args)
    }

    /// `npm config get registry`
    #[must_use]
    pub fn current_registry_command(&self) -> CommandLine {
        CommandLine::new(&self.npm, ["config", "get", "registry"])
    }

    /// The command line an operation runs.
    #[must_use]
    pub fn command_for(&self, operation: &Operation) -> CommandLine {
        match operation {
            Operation::SwitchRegistry { registry } => self.switch_command(registry),
            Operation::Install { dev, packages } => self.install_command(*dev, packages),
        }
    }
}

/// The operation a plan stopped at.
#[derive(Debug)]
pub struct ExecFailure {
    /// Zero-based index of the failing operation.
    pub index: usize,
    /// Why it failed.
    pub error: Error,
}

impl fmt::Display for ExecFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation {} failed: {}", self.index + 1, self.error)
    }
}

impl std::error::Error for ExecFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Run every operation of `plan` in order.
///
/// A switch to a registry missing from `table` fails with `UnknownRegistry`
/// before anything is spawned. A non-zero exit fails with `CommandFailed`
/// carrying the exact command line. Nothing after the failing operation runs.
///
/// Returns the number of operations run.
///
/// # Errors
/// Returns the first failing operation's index and error.
pub fn execute(
    plan: &Plan,
    table: &RegistryTable,
    programs: &Programs,
    runner: &mut dyn Runner,
) -> Result<usize, ExecFailure> {
    for (index, operation) in plan.iter().enumerate() {
        run_operation(operation, table, programs, runner)
            .map_err(|error| ExecFailure { index, error })?;
    }
    Ok(plan.len())
}

fn run_operation(
    operation: &Operation,
    table: &RegistryTable,
    programs: &Programs,
    runner: &mut dyn Runner,
) -> Result<(), Error> {
    if let Operation::SwitchRegistry { registry } = operation {
        if !table.contains(registry) {
            return Err(Error::UnknownRegistry {
                name: registry.clone(),
            });
        }
    }

    let command = programs.command_for(operation);
    if runner.run(&command)? {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            command: command.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::plan::build_plan;
    use crate::project::RegistryGroup;

    /// Records every command; fails the ones whose rendered line matches.
    #[derive(Default)]
    pub(crate) struct FakeRunner {
        pub calls: Vec<String>,
        pub failing: Vec<String>,
        pub output: String,
    }

    impl Runner for FakeRunner {
        fn run(&mut self, command: &CommandLine) -> Result<bool, Error> {
            let line = command.to_string();
            let ok = !self.failing.contains(&line);
            self.calls.push(line);
            Ok(ok)
        }

        fn capture(&mut self, command: &CommandLine) -> Result<String, Error> {
            if self.run(command)? {
                Ok(self.output.clone())
            } else {
                Err(Error::CommandFailed {
                    command: command.to_string(),
                })
            }
        }
    }

    fn table(names: &[&str]) -> RegistryTable {
        let body: Vec<String> = names
            .iter()
            .map(|n| format!(r#""{n}": {{ "registry": "https://{n}.example.com/" }}"#))
            .collect();
        RegistryTable::from_json_str(&format!("{{ {} }}", body.join(","))).unwrap()
    }

    fn programs() -> Programs {
        Programs {
            npm: "npm".to_string(),
            nrm: "nrm".to_string(),
        }
    }

    #[test]
    fn test_command_lines() {
        let p = programs();
        assert_eq!(p.switch_command("corp").to_string(), "nrm use corp");
        assert_eq!(
            p.install_command(true, &[Package::named("a"), Package::pinned("b", "1.2.3")])
                .to_string(),
            "npm install --save-dev --save-exact --loglevel error a b@1.2.3"
        );
        assert_eq!(
            p.install_command(false, &[Package::named("a")]).to_string(),
            "npm install --save --save-exact --loglevel error a"
        );
        assert_eq!(
            p.current_registry_command().to_string(),
            "npm config get registry"
        );
    }

    #[test]
    fn test_execute_all_in_order() {
        let groups = [
            RegistryGroup::from_identifier("registryA", vec!["foo".to_string()]),
            RegistryGroup::from_identifier("registryB -D", vec!["bar".to_string()]),
        ];
        let plan = build_plan(&groups);
        let mut runner = FakeRunner::default();

        let ran = execute(&plan, &table(&["registryA", "registryB"]), &programs(), &mut runner)
            .unwrap();

        assert_eq!(ran, 4);
        assert_eq!(
            runner.calls,
            [
                "nrm use registryA",
                "npm install --save --save-exact --loglevel error foo",
                "nrm use registryB",
                "npm install --save-dev --save-exact --loglevel error bar",
            ]
        );
    }

    #[test]
    fn test_execute_stops_at_first_failure() {
        let plan = Plan::from(vec![
            Operation::switch("a"),
            Operation::install(false, ["x"]),
            Operation::switch("b"),
        ]);
        let mut runner = FakeRunner {
            failing: vec!["npm install --save --save-exact --loglevel error x".to_string()],
            ..Default::default()
        };

        let failure = execute(&plan, &table(&["a", "b"]), &programs(), &mut runner).unwrap_err();

        assert_eq!(failure.index, 1);
        assert_eq!(runner.calls.len(), 2);
        assert!(!runner.calls.contains(&"nrm use b".to_string()));
        match failure.error {
            Error::CommandFailed { command } => {
                assert_eq!(command, "npm install --save --save-exact --loglevel error x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_registry_fails_without_spawning() {
        let plan = Plan::from(vec![
            Operation::switch("known"),
            Operation::install(false, ["x"]),
            Operation::switch("missing"),
            Operation::install(false, ["y"]),
        ]);
        let mut runner = FakeRunner::default();

        let failure = execute(&plan, &table(&["known"]), &programs(), &mut runner).unwrap_err();

        assert_eq!(failure.index, 2);
        assert_eq!(runner.calls.len(), 2);
        assert!(matches!(
            failure.error,
            Error::UnknownRegistry { ref name } if name == "missing"
        ));
    }

    #[test]
    fn test_empty_plan_succeeds() {
        let mut runner = FakeRunner::default();
        let ran = execute(&Plan::default(), &table(&[]), &programs(), &mut runner).unwrap();
        assert_eq!(ran, 0);
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn test_failure_display() {
        let failure = ExecFailure {
            index: 0,
            error: Error::CommandFailed {
                command: "nrm use a".to_string(),
            },
        };
        assert_eq!(failure.to_string(), "operation 1 failed: Command failed: nrm use a");
    }
}
