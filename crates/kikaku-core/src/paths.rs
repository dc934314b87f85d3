use crate::error::{KikakuError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const PROJECTS_DIR: &str = "projects";
pub const USERS_DIR: &str = "users";

pub const PROJECT_FILE: &str = "project.yaml";
pub const CONFIG_FILE: &str = "config.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn project_dir(root: &Path, id: &str) -> PathBuf {
    root.join(PROJECTS_DIR).join(id)
}

pub fn project_doc(root: &Path, id: &str) -> PathBuf {
    project_dir(root, id).join(PROJECT_FILE)
}

pub fn user_doc(root: &Path, uid: &str) -> PathBuf {
    root.join(USERS_DIR).join(format!("{uid}.yaml"))
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

/// Project ids are UUIDs minted by [`crate::project::Project::create`].
pub fn validate_project_id(id: &str) -> Result<()> {
    uuid::Uuid::parse_str(id).map_err(|_| KikakuError::InvalidProjectId(id.to_string()))?;
    Ok(())
}

static UID_RE: OnceLock<Regex> = OnceLock::new();

fn uid_re() -> &'static Regex {
    UID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap())
}

/// User ids come from the identity provider and become file names, so they
/// must be non-empty, bounded, and free of path separators.
pub fn validate_user_id(uid: &str) -> Result<()> {
    if uid.is_empty() || uid.len() > 128 || !uid_re().is_match(uid) {
        return Err(KikakuError::InvalidUserId(uid.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
