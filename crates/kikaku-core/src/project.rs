use crate::error::{KikakuError, Result};
use crate::paths;
use crate::state::{ProjectState, StateDelta};
use crate::status::ProjectStatus;
use crate::types::Step;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// Owning record for one plan: identity, membership, soft-delete marker, and
/// the accumulated wizard state and progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub shared_with: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: ProjectState,
    #[serde(default)]
    pub status: ProjectStatus,
}

impl Project {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
            shared_with: BTreeSet::new(),
            deleted_at: None,
            state: ProjectState::default(),
            status: ProjectStatus {
                current_step: Step::Genre,
                completed_steps: BTreeSet::new(),
                last_updated: now,
            },
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, user_id: &str, name: impl Into<String>) -> Result<Self> {
        paths::validate_user_id(user_id)?;
        let name = name.into();
        if name.trim().is_empty() {
            return Err(KikakuError::EmptyProjectName);
        }

        let project = Self::new(user_id, name);
        let dir = paths::project_dir(root, &project.id);
        if dir.exists() {
            return Err(KikakuError::ProjectExists(project.id));
        }
        project.save(root)?;
        Ok(project)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        paths::validate_project_id(id)?;
        let doc = paths::project_doc(root, id);
        if !doc.exists() {
            return Err(KikakuError::ProjectNotFound(id.to_string()));
        }
        let data = std::fs::read_to_string(&doc)?;
        let project: Project = serde_yaml::from_str(&data)?;
        Ok(project)
    }

    /// Whole-document overwrite. Last write wins: concurrent collaborators
    /// are not merged field-by-field, the later save replaces the earlier.
    pub fn save(&self, root: &Path) -> Result<()> {
        let doc = paths::project_doc(root, &self.id);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&doc, data.as_bytes())
    }

    /// Projects visible to `uid`: owned or shared with them, soft-deleted
    /// ones excluded, sorted by creation time. Directories without a project
    /// document are skipped.
    pub fn list_for_user(root: &Path, uid: &str) -> Result<Vec<Self>> {
        let projects_dir = root.join(paths::PROJECTS_DIR);
        if !projects_dir.exists() {
            return Ok(Vec::new());
        }

        let mut projects = Vec::new();
        for entry in std::fs::read_dir(&projects_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().into_owned();
            match Self::load(root, &id) {
                Ok(p) => {
                    if p.deleted_at.is_none() && p.is_member(uid) {
                        projects.push(p);
                    }
                }
                Err(KikakuError::ProjectNotFound(_)) | Err(KikakuError::InvalidProjectId(_)) => {}
                Err(e) => return Err(e),
            }
        }
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }

    // ---------------------------------------------------------------------------
    // Access control
    // ---------------------------------------------------------------------------

    pub fn is_member(&self, uid: &str) -> bool {
        self.user_id == uid || self.shared_with.contains(uid)
    }

    pub fn ensure_member(&self, uid: &str) -> Result<()> {
        if !self.is_member(uid) {
            return Err(KikakuError::AccessDenied {
                user: uid.to_string(),
                project: self.id.clone(),
            });
        }
        Ok(())
    }

    pub fn ensure_owner(&self, uid: &str) -> Result<()> {
        if self.user_id != uid {
            return Err(KikakuError::AccessDenied {
                user: uid.to_string(),
                project: self.id.clone(),
            });
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Membership mutations
    // ---------------------------------------------------------------------------

    pub fn share(&mut self, uid: &str) -> Result<()> {
        paths::validate_user_id(uid)?;
        if uid == self.user_id {
            return Err(KikakuError::ShareWithOwner);
        }
        if !self.shared_with.insert(uid.to_string()) {
            return Err(KikakuError::AlreadyShared(uid.to_string()));
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Idempotent removal: unsharing a user who was never shared is a no-op.
    pub fn unshare(&mut self, uid: &str) {
        self.shared_with.remove(uid);
        self.updated_at = Utc::now();
    }

    // ---------------------------------------------------------------------------
    // Lifecycle mutations
    // ---------------------------------------------------------------------------

    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(KikakuError::EmptyProjectName);
        }
        self.name = name;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Soft delete: the record stays on disk, listings stop returning it.
    pub fn soft_delete(&mut self) {
        self.deleted_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    // ---------------------------------------------------------------------------
    // State / progress mutations
    // ---------------------------------------------------------------------------

    pub fn set_state(&mut self, state: ProjectState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    pub fn apply_delta(&mut self, delta: StateDelta) {
        self.state.apply(delta);
        self.updated_at = Utc::now();
    }

    pub fn mark_step_reached(&mut self, step: Step) {
        self.status.mark_reached(step);
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
