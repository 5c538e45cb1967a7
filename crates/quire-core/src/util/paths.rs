//! Path helpers.

use std::path::PathBuf;

/// Expand a leading `~` and any `$VAR` references in a path.
///
/// Unknown variables are left as written.
pub fn expand_tilde(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(path).into_owned());
    PathBuf::from(expanded)
}

/// Per-user data directory for a project: `~/.<project>`.
pub fn home_data_dir(project_name: &str) -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(format!(".{project_name}")))
}
