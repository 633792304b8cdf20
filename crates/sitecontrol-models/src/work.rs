//! Work items: discrete tasks on a project with their own deadline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date::DayDate;
use crate::error::ModelError;
use crate::ids::{ProjectId, WorkItemId};

/// Status of a work item.
///
/// `Overdue` is never stored by a transition. It exists so that a derived
/// status can be displayed and so older data carrying the literal still
/// deserializes; see [`WorkItem::effective_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WorkStatus {
    /// Work is underway.
    #[default]
    InProgress,
    /// Contractor reports the work finished; awaiting acceptance.
    Completed,
    /// Supervisor has accepted the work.
    Accepted,
    /// Deadline passed without acceptance.
    Overdue,
}

impl WorkStatus {
    /// Badge label shown to site staff.
    pub fn label(&self) -> &'static str {
        match self {
            WorkStatus::InProgress => "В процессе",
            WorkStatus::Completed => "Завершено",
            WorkStatus::Accepted => "Принято",
            WorkStatus::Overdue => "Просрочено",
        }
    }

    /// Returns true for completed or accepted work.
    pub fn is_done(&self) -> bool {
        matches!(self, WorkStatus::Completed | WorkStatus::Accepted)
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkStatus::InProgress => "in-progress",
            WorkStatus::Completed => "completed",
            WorkStatus::Accepted => "accepted",
            WorkStatus::Overdue => "overdue",
        };
        f.write_str(s)
    }
}

impl FromStr for WorkStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in-progress" | "in_progress" => Ok(WorkStatus::InProgress),
            "completed" => Ok(WorkStatus::Completed),
            "accepted" => Ok(WorkStatus::Accepted),
            "overdue" => Ok(WorkStatus::Overdue),
            other => Err(ModelError::UnknownVariant {
                kind: "work status",
                value: other.to_string(),
            }),
        }
    }
}

/// A discrete task belonging to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique identifier for the work item.
    pub id: WorkItemId,

    /// ID of the project this work item belongs to.
    pub project_id: ProjectId,

    /// Short title, e.g. "Монтаж вентиляции".
    pub title: String,

    /// Due date.
    pub deadline: DayDate,

    /// Stored status.
    pub status: WorkStatus,

    /// Progress, 0..=100.
    pub progress: u8,

    /// Crew or person responsible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl WorkItem {
    /// Creates an in-progress work item with zero progress.
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
            status: WorkStatus::InProgress,
            progress: 0,
            assignee: None,
        }
    }

    /// Returns a builder for a work item.
    pub fn builder(
        id: impl Into<WorkItemId>,
        project_id: impl Into<ProjectId>,
        title: impl Into<String>,
        deadline: DayDate,
    ) -> crate::builders::WorkItemBuilder {
        crate::builders::WorkItemBuilder::new(id, project_id, title, deadline)
    }

    /// Returns true if the deadline is strictly before `today` and the work
    /// has not been accepted.
    pub fn is_overdue(&self, today: DayDate) -> bool {
        self.deadline.is_before(today) && self.status != WorkStatus::Accepted
    }

    /// Status to display: `Overdue` when [`is_overdue`](Self::is_overdue)
    /// holds, otherwise the stored status.
    pub fn effective_status(&self, today: DayDate) -> WorkStatus {
        if self.is_overdue(today) {
            WorkStatus::Overdue
        } else {
            self.status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> DayDate {
        DayDate::parse(s).unwrap()
    }

    #[test]
    fn test_work_item_creation() {
        let item = WorkItem::new("w1", "p1", "Монтаж вентиляции", date("25.09.2024"));

        assert_eq!(item.id.as_str(), "w1");
        assert_eq!(item.project_id.as_str(), "p1");
        assert_eq!(item.status, WorkStatus::InProgress);
        assert_eq!(item.progress, 0);
        assert!(item.assignee.is_none());
    }

    #[test]
    fn test_is_overdue_past_deadline_in_progress() {
        let item = WorkItem::new("w1", "p1", "Task", date("01.01.2020"));
        assert!(item.is_overdue(date("02.01.2020")));
        assert!(item.is_overdue(date("19.10.2026")));
    }

    #[test]
    fn test_is_overdue_false_when_accepted() {
        let mut item = WorkItem::new("w1", "p1", "Task", date("01.01.2020"));
        item.status = WorkStatus::Accepted;
        assert!(!item.is_overdue(date("19.10.2026")));
    }

    #[test]
    fn test_is_overdue_completed_still_counts() {
        let mut item = WorkItem::new("w1", "p1", "Task", date("01.01.2020"));
        item.status = WorkStatus::Completed;
        assert!(item.is_overdue(date("02.01.2020")));
    }

    #[test]
    fn test_is_overdue_not_on_deadline_day() {
        let item = WorkItem::new("w1", "p1", "Task", date("01.01.2020"));
        assert!(!item.is_overdue(date("01.01.2020")));
    }

    #[test]
    fn test_effective_status() {
        let item = WorkItem::new("w1", "p1", "Task", date("01.01.2020"));
        assert_eq!(item.effective_status(date("01.01.2020")), WorkStatus::InProgress);
        assert_eq!(item.effective_status(date("05.01.2020")), WorkStatus::Overdue);
        // Derived only: the stored status is untouched.
        assert_eq!(item.status, WorkStatus::InProgress);
    }

    #[test]
    fn test_work_status_serialization() {
        let json = serde_json::to_string(&WorkStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");

        let parsed: WorkStatus = serde_json::from_str("\"overdue\"").unwrap();
        assert_eq!(parsed, WorkStatus::Overdue);
    }

    #[test]
    fn test_work_status_is_done() {
        assert!(WorkStatus::Completed.is_done());
        assert!(WorkStatus::Accepted.is_done());
        assert!(!WorkStatus::InProgress.is_done());
        assert!(!WorkStatus::Overdue.is_done());
    }

    #[test]
    fn test_assignee_skipped_when_none() {
        let item = WorkItem::new("w1", "p1", "Task", date("01.01.2020"));
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("assignee"));
    }
}
