#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Core engine for multireg.
//!
//! Everything here is synchronous and free of logging; the CLI crate owns
//! tracing setup and the concrete process runner.

pub mod config;
pub mod conflicts;
pub mod current;
pub mod error;
pub mod exec;
pub mod manifest;
pub mod nrmrc;
pub mod paths;
pub mod plan;
pub mod project;
pub mod registry;
pub mod version;

pub use config::Config;
pub use conflicts::find_duplicate_packages;
pub use current::{current_registry_name, ActiveRegistry};
pub use error::Error;
pub use exec::{execute, CommandLine, ExecFailure, Programs, Runner};
pub use manifest::{load_manifest, Manifest};
pub use plan::{build_plan, reconcile, Operation, Package, Plan, DEFAULT_REGISTRY_NAME};
pub use project::{load_project_config, ProjectConfig, RegistryGroup};
pub use registry::{RegistryEntry, RegistryTable};
pub use version::VERSION;
