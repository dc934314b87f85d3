use thiserror::Error;

#[derive(Debug, Error)]
pub enum KikakuError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("invalid project id: {0}")]
    InvalidProjectId(String),

    #[error("invalid user id '{0}': must be a safe path segment")]
    InvalidUserId(String),

    #[error("unknown step: {0}")]
    UnknownStep(String),

    #[error("project name must not be empty")]
    EmptyProjectName,

    #[error("cannot share a project with its owner")]
    ShareWithOwner,

    #[error("project already shared with user: {0}")]
    AlreadyShared(String),

    #[error("user {user} has no access to project {project}")]
    AccessDenied { user: String, project: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KikakuError>;
