//! `multireg install` command implementation.
//!
//! Order of checks: project config, switcher presence (warning only),
//! duplicate packages, registry table, active registry, manifest. Only then
//! is the plan built and run.

use crate::runner::SystemRunner;
use miette::Result;
use multireg_core::{
    build_plan, current_registry_name, execute, find_duplicate_packages, load_manifest,
    load_project_config, paths, reconcile, Config, Error, Plan, Programs, RegistryTable, Runner,
    VERSION,
};
use std::io::IsTerminal;
use tracing::{error, info, info_span, warn};

/// Exit code for configuration problems (missing/invalid config, duplicates).
const EXIT_CONFIG: i32 = 2;

/// Exit code for failures while running the plan.
const EXIT_FAILURE: i32 = 1;

const RED: &str = "31";
const GREEN: &str = "32";
const YELLOW: &str = "33";

/// What a successful install run did.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    /// The plan ran to completion.
    Installed { operations: usize },
    /// Dry run: the plan was only printed.
    Planned { operations: usize },
}

pub fn run(config: &Config) -> Result<()> {
    let span = info_span!("install", version = VERSION, cwd = %config.cwd.display());
    let _guard = span.enter();

    let programs = Programs::from_env();
    let mut runner = SystemRunner::new(&config.cwd);

    match install(config, &programs, &mut runner) {
        Ok(Outcome::Installed { operations }) => {
            info!(operations, "install finished");
            println!("{}", paint(GREEN, "All the packages have been installed."));
            Ok(())
        }
        Ok(Outcome::Planned { operations }) => {
            info!(operations, "dry run finished");
            Ok(())
        }
        Err(e) => {
            report(&e);
            let code = if e.is_config_error() {
                EXIT_CONFIG
            } else {
                EXIT_FAILURE
            };
            std::process::exit(code);
        }
    }
}

fn install(
    config: &Config,
    programs: &Programs,
    runner: &mut dyn Runner,
) -> std::result::Result<Outcome, Error> {
    let project = load_project_config(&config.cwd)?;

    if which::which(&programs.nrm).is_err() {
        eprintln!(
            "{}",
            paint(
                YELLOW,
                &format!("warning: please make sure {} has been installed", programs.nrm)
            )
        );
    }

    let duplicates = find_duplicate_packages(&project.groups);
    if !duplicates.is_empty() {
        return Err(Error::DuplicatePackages { names: duplicates });
    }

    let table = RegistryTable::load(paths::nrmrc_path().as_deref())?;

    let active = current_registry_name(runner, programs, &table)?;
    match &active.name {
        Some(name) => info!(registry = %name, url = %active.url, "current registry"),
        None => warn!(url = %active.url, "current registry is not registered in nrm"),
    }

    let manifest = load_manifest(&config.cwd)?;
    let plan = reconcile(
        build_plan(&project.groups),
        &manifest,
        project.auto_install,
        project.default_registry.as_deref(),
    );

    if config.dry_run {
        print_plan(&plan, programs);
        return Ok(Outcome::Planned {
            operations: plan.len(),
        });
    }

    let operations = execute(&plan, &table, programs, runner).map_err(|failure| {
        error!(
            step = failure.index + 1,
            total = plan.len(),
            "install stopped"
        );
        failure.error
    })?;

    Ok(Outcome::Installed { operations })
}

fn print_plan(plan: &Plan, programs: &Programs) {
    for operation in plan {
        println!("{}", programs.command_for(operation));
    }
}

/// Print a fatal error as a single colored line, plus a hint where one exists.
fn report(e: &Error) {
    eprintln!("{}", paint(RED, &format!("error: {e}")));

    let hint = match e {
        Error::ConfigMissing { .. } => {
            Some("create it with a \"registries\" map of registry name to package list")
        }
        Error::UnknownRegistry { .. } => Some("add it with `nrm add <name> <url>`"),
        Error::CommandSpawn { .. } => Some("ensure npm and nrm are in your PATH"),
        _ => None,
    };
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
}

fn paint(color: &str, text: &str) -> String {
    if std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
        format!("\x1b[{color}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}
