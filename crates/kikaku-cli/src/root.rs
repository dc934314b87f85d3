use std::path::{Path, PathBuf};

/// Resolve the data root directory.
///
/// Priority:
/// 1. `--data` flag / `KIKAKU_DATA` env var (passed in as `explicit`)
/// 2. `~/.kikaku`
/// 3. `./.kikaku` when no home directory can be determined
pub fn resolve_data_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    match home::home_dir() {
        Some(home) => home.join(".kikaku"),
        None => PathBuf::from(".kikaku"),
    }
}
