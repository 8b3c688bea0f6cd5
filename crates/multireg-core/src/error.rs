use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, one per [`Error`] variant.
pub mod codes {
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const CONFIG_MISSING: &str = "CONFIG_MISSING";
    pub const CONFIG_READ_FAILED: &str = "CONFIG_READ_FAILED";
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
    pub const MANIFEST_INVALID: &str = "MANIFEST_INVALID";
    pub const DUPLICATE_PACKAGES: &str = "DUPLICATE_PACKAGES";
    pub const UNKNOWN_REGISTRY: &str = "UNKNOWN_REGISTRY";
    pub const COMMAND_FAILED: &str = "COMMAND_FAILED";
    pub const COMMAND_SPAWN_FAILED: &str = "COMMAND_SPAWN_FAILED";
    pub const CURRENT_REGISTRY_FAILED: &str = "CURRENT_REGISTRY_FAILED";
    pub const BUILTIN_REGISTRIES_INVALID: &str = "BUILTIN_REGISTRIES_INVALID";
}

/// Core error type for multireg operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{} is needed", .path.display())]
    ConfigMissing { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid manifest at {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    #[error("Cannot install \"{}\" from more than one registry", .names.join(","))]
    DuplicatePackages { names: Vec<String> },

    #[error("Registry \"{name}\" is not registered in nrm")]
    UnknownRegistry { name: String },

    #[error("Command failed: {command}")]
    CommandFailed { command: String },

    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read the current registry: {0}")]
    CurrentRegistry(String),

    #[error("Bundled registry table is invalid: {0}")]
    BuiltinRegistries(#[source] serde_json::Error),
}

impl Error {
    /// Stable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => codes::IO_ERROR,
            Self::ConfigMissing { .. } => codes::CONFIG_MISSING,
            Self::ConfigRead { .. } => codes::CONFIG_READ_FAILED,
            Self::ConfigParse { .. } => codes::CONFIG_INVALID,
            Self::ManifestInvalid { .. } => codes::MANIFEST_INVALID,
            Self::DuplicatePackages { .. } => codes::DUPLICATE_PACKAGES,
            Self::UnknownRegistry { .. } => codes::UNKNOWN_REGISTRY,
            Self::CommandFailed { .. } => codes::COMMAND_FAILED,
            Self::CommandSpawn { .. } => codes::COMMAND_SPAWN_FAILED,
            Self::CurrentRegistry(_) => codes::CURRENT_REGISTRY_FAILED,
            Self::BuiltinRegistries(_) => codes::BUILTIN_REGISTRIES_INVALID,
        }
    }

    /// Whether this error comes from project setup rather than from running the plan.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing { .. }
                | Self::ConfigRead { .. }
                | Self::ConfigParse { .. }
                | Self::ManifestInvalid { .. }
                | Self::DuplicatePackages { .. }
        )
    }
}
