//! Builder patterns for types with many optional fields.

use crate::date::DayDate;
use crate::ids::{ProjectId, WorkItemId};
use crate::work::{WorkItem, WorkStatus};

/// Builder for creating WorkItem instances with a fluent API.
#[derive(Debug, Clone)]
pub struct WorkItemBuilder {
    id: WorkItemId,
    project_id: ProjectId,
    title: String,
    deadline: DayDate,
    status: Option<WorkStatus>,
    progress: u8,
    assignee: Option<String>,
}

impl WorkItemBuilder {
    /// Creates a new WorkItemBuilder with required fields.
    pub fn new(
        id: impl Into<WorkItemId>,
        project_id: impl Into<ProjectId>,
        title: impl Into<String>,
        deadline: DayDate,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            title: title.into(),
            deadline,
            status: None,
            progress: 0,
            assignee: None,
        }
    }

    /// Sets the status (defaults to in-progress).
    pub fn status(mut self, status: WorkStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the progress, clamped to 100.
    pub fn progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    /// Sets the assignee.
    pub fn assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Builds the WorkItem.
    pub fn build(self) -> WorkItem {
        WorkItem {
            id: self.id,
            project_id: self.project_id,
            title: self.title,
            deadline: self.deadline,
            status: self.status.unwrap_or_default(),
            progress: self.progress,
            assignee: self.assignee,
        }
    }
}
