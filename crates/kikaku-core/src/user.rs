use crate::error::{KikakuError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// UserRecord
// ---------------------------------------------------------------------------

/// Directory entry for one authenticated user. The identity provider owns
/// credentials; this record only carries what sharing needs to display and
/// search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UserRecord {
    pub fn new(
        uid: impl Into<String>,
        email: impl Into<String>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name,
        }
    }

    /// Write (or overwrite) the directory entry. Upsert semantics: the
    /// provider is the source of truth, a repeat sign-in just refreshes it.
    pub fn save(&self, root: &Path) -> Result<()> {
        paths::validate_user_id(&self.uid)?;
        let doc = paths::user_doc(root, &self.uid);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&doc, data.as_bytes())
    }

    pub fn load(root: &Path, uid: &str) -> Result<Self> {
        paths::validate_user_id(uid)?;
        let doc = paths::user_doc(root, uid);
        if !doc.exists() {
            return Err(KikakuError::UserNotFound(uid.to_string()));
        }
        let data = std::fs::read_to_string(&doc)?;
        let user: UserRecord = serde_yaml::from_str(&data)?;
        Ok(user)
    }
}

/// Email-prefix search over the user directory, ordered by email, capped at
/// ten results.
pub fn search_users(root: &Path, term: &str) -> Result<Vec<UserRecord>> {
    const MAX_RESULTS: usize = 10;

    let users_dir = root.join(paths::USERS_DIR);
    if !users_dir.exists() || term.is_empty() {
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    for entry in std::fs::read_dir(&users_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let data = std::fs::read_to_string(entry.path())?;
        let user: UserRecord = serde_yaml::from_str(&data)?;
        if user.email.starts_with(term) {
            matches.push(user);
        }
    }
    matches.sort_by(|a, b| a.email.cmp(&b.email));
    matches.truncate(MAX_RESULTS);
    Ok(matches)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn user_save_load() {
        let dir = TempDir::new().unwrap();
        let user = UserRecord::new("u1", "hana@example.com", Some("はな".to_string()));
        user.save(dir.path()).unwrap();

        let loaded = UserRecord::load(dir.path(), "u1").unwrap();
        assert_eq!(loaded, user);
    }

    #[test]
    fn save_is_upsert() {
        let dir = TempDir::new().unwrap();
        UserRecord::new("u1", "old@example.com", None)
            .save(dir.path())
            .unwrap();
        UserRecord::new("u1", "new@example.com", None)
            .save(dir.path())
            .unwrap();
        assert_eq!(
            UserRecord::load(dir.path(), "u1").unwrap().email,
            "new@example.com"
        );
    }

    #[test]
    fn load_missing_user_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            UserRecord::load(dir.path(), "nobody"),
            Err(KikakuError::UserNotFound(_))
        ));
    }

    #[test]
    fn search_matches_email_prefix_sorted() {
        let dir = TempDir::new().unwrap();
        for (uid, email) in [
            ("u1", "hana@example.com"),
            ("u2", "haru@example.com"),
            ("u3", "kenji@example.com"),
        ] {
            UserRecord::new(uid, email, None).save(dir.path()).unwrap();
        }

        let results = search_users(dir.path(), "ha").unwrap();
        let emails: Vec<&str> = results.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["hana@example.com", "haru@example.com"]);
    }

    #[test]
    fn search_empty_term_returns_nothing() {
        let dir = TempDir::new().unwrap();
        UserRecord::new("u1", "hana@example.com", None)
            .save(dir.path())
            .unwrap();
        assert!(search_users(dir.path(), "").unwrap().is_empty());
    }

    #[test]
    fn search_caps_results_at_ten() {
        let dir = TempDir::new().unwrap();
        for i in 0..15 {
            UserRecord::new(format!("u{i}"), format!("user{i:02}@example.com"), None)
                .save(dir.path())
                .unwrap();
        }
        assert_eq!(search_users(dir.path(), "user").unwrap().len(), 10);
    }
}
