use std::path::{Path, PathBuf};

/// Project configuration file name.
pub const CONFIG_FILE: &str = "multireg.config.json";

/// Project manifest file name.
pub const MANIFEST_FILE: &str = "package.json";

/// User registry definitions file, relative to the home directory.
pub const NRMRC_FILE: &str = ".nrmrc";

/// Environment variable to override the `.nrmrc` location (for testing).
pub const NRMRC_ENV: &str = "MULTIREG_NRMRC";

/// Path of the project configuration file under `root`.
#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Path of the project manifest under `root`.
#[must_use]
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE)
}

/// Get the path of the user's `.nrmrc`.
///
/// Respects `MULTIREG_NRMRC`. Returns `None` when no home directory can be found.
#[must_use]
pub fn nrmrc_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(NRMRC_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs_next::home_dir().map(|home| home.join(NRMRC_FILE))
}
