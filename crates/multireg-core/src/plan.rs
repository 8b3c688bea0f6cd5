//! Install plan construction.
//!
//! A [`Plan`] is the ordered list of registry switches and installs for one
//! run. [`build_plan`] produces one switch/install pair per configured group;
//! [`reconcile`] appends a fallback pass for manifest dependencies no group
//! covers.

use crate::manifest::Manifest;
use crate::project::RegistryGroup;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// Registry used for the fallback pass when the config names none.
pub const DEFAULT_REGISTRY_NAME: &str = "npm";

/// A package to install, optionally pinned to the manifest's specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: Option<String>,
}

impl Package {
    /// A package installed by name only.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// A package installed at a declared version specifier.
    #[must_use]
    pub fn pinned(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{version}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Make `registry` the active registry.
    SwitchRegistry { registry: String },
    /// Install `packages` exactly, as devDependencies when `dev` is set.
    Install { dev: bool, packages: Vec<Package> },
}

impl Operation {
    #[must_use]
    pub fn switch(registry: impl Into<String>) -> Self {
        Self::SwitchRegistry {
            registry: registry.into(),
        }
    }

    /// Install unpinned packages by name.
    #[must_use]
    pub fn install<I, S>(dev: bool, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Install {
            dev,
            packages: names.into_iter().map(Package::named).collect(),
        }
    }

    /// Names of the packages this operation installs (empty for switches).
    #[must_use]
    pub fn package_names(&self) -> Vec<&str> {
        match self {
            Self::SwitchRegistry { .. } => Vec::new(),
            Self::Install { packages, .. } => packages.iter().map(|p| p.name.as_str()).collect(),
        }
    }
}

/// Ordered operations for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    operations: Vec<Operation>,
}

impl Plan {
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Every package name installed by this plan.
    #[must_use]
    pub fn covered_names(&self) -> HashSet<&str> {
        self.operations
            .iter()
            .flat_map(Operation::package_names)
            .collect()
    }
}

impl From<Vec<Operation>> for Plan {
    fn from(operations: Vec<Operation>) -> Self {
        Self { operations }
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Build the switch/install pairs for each group, in declaration order.
///
/// Registry names are not checked here; an unknown registry fails when its
/// switch runs.
#[must_use]
pub fn build_plan(groups: &[RegistryGroup]) -> Plan {
    let operations = groups
        .iter()
        .flat_map(|group| {
            [
                Operation::switch(&group.registry),
                Operation::install(group.dev, &group.packages),
            ]
        })
        .collect();

    Plan { operations }
}

/// Extend `plan` with a fallback pass for manifest dependencies it does not cover.
///
/// Does nothing unless `auto_install` is set and the manifest's declared
/// names differ from the plan's package names. Otherwise appends a switch to
/// `default_registry` (or [`DEFAULT_REGISTRY_NAME`]) followed by an install of
/// the remaining devDependencies and one of the remaining dependencies, each
/// pinned to its manifest specifier and skipped when empty.
#[must_use]
pub fn reconcile(
    plan: Plan,
    manifest: &Manifest,
    auto_install: bool,
    default_registry: Option<&str>,
) -> Plan {
    if !auto_install {
        return plan;
    }

    let covered = plan.covered_names();
    if manifest.declared_names() == covered {
        return plan;
    }

    let remaining = manifest.without(&covered);
    let registry = default_registry.unwrap_or(DEFAULT_REGISTRY_NAME);

    let mut extra = vec![Operation::switch(registry)];
    if !remaining.dev_dependencies.is_empty() {
        extra.push(pinned_install(true, &remaining.dev_dependencies));
    }
    if !remaining.dependencies.is_empty() {
        extra.push(pinned_install(false, &remaining.dependencies));
    }

    let mut operations = plan.operations;
    operations.extend(extra);
    Plan { operations }
}

fn pinned_install(dev: bool, deps: &IndexMap<String, String>) -> Operation {
    Operation::Install {
        dev,
        packages: deps
            .iter()
            .map(|(name, version)| Package::pinned(name, version))
            .collect(),
    }
}
