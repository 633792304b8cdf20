//! Error types for workflow operations.

use sitecontrol_models::{EntryStatus, Role, WorkStatus};
use sitecontrol_persistence::PersistenceError;
use thiserror::Error;

use crate::session::Action;

/// Reasons a workflow action was not applied.
///
/// Every variant except [`Persistence`](WorkflowError::Persistence) means the
/// action was ignored and the store is unchanged.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Journal text is empty or whitespace.
    #[error("entry text is empty")]
    EmptyText,

    /// A required identifier was not supplied.
    #[error("missing {0} id")]
    MissingIdentifier(&'static str),

    /// Project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// Work item does not exist.
    #[error("work item not found: {0}")]
    WorkItemNotFound(String),

    /// Work item exists but belongs to another project.
    #[error("work item {work_item} does not belong to project {project}")]
    WorkItemNotInProject { work_item: String, project: String },

    /// Work item is still in progress; only finished work is inspected.
    #[error("work item {work_item} is {status}, not completed")]
    WorkItemNotCompleted { work_item: String, status: WorkStatus },

    /// Journal entry does not exist.
    #[error("journal entry not found: {0}")]
    EntryNotFound(String),

    /// Journal entry was already accepted or rejected.
    #[error("journal entry {entry} already {status}")]
    AlreadyReviewed { entry: String, status: EntryStatus },

    /// Another inspection is in progress.
    #[error("inspection already in progress: {0}")]
    InspectionInProgress(String),

    /// Action needs an active inspection and there is none.
    #[error("no active inspection")]
    NoActiveInspection,

    /// Checklist position does not exist.
    #[error("checklist item {index} out of range (checklist has {len} items)")]
    ChecklistIndexOutOfRange { index: usize, len: usize },

    /// Role may not perform the action.
    #[error("{role} may not {action}")]
    NotPermitted { role: Role, action: Action },

    /// Persistence error.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl WorkflowError {
    /// Returns true if the error means "action ignored, nothing changed".
    pub fn is_ignored_action(&self) -> bool {
        !matches!(self, WorkflowError::Persistence(_))
    }
}

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;
