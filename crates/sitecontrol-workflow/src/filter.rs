//! Journal entry filtering for queries.

use sitecontrol_models::{EntryStatus, JournalEntry, ProjectId, WorkItemId};

/// Filter criteria for querying journal entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by project ID.
    pub project_id: Option<ProjectId>,
    /// Filter by work item ID.
    pub work_item_id: Option<WorkItemId>,
    /// Filter by review status.
    pub status: Option<EntryStatus>,
    /// Filter by contractor name (exact match).
    pub contractor: Option<String>,
}

impl EntryFilter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project ID filter.
    pub fn with_project_id(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Sets the work item ID filter.
    pub fn with_work_item_id(mut self, work_item_id: WorkItemId) -> Self {
        self.work_item_id = Some(work_item_id);
        self
    }

    /// Sets the status filter.
    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the contractor filter.
    pub fn with_contractor(mut self, contractor: impl Into<String>) -> Self {
        self.contractor = Some(contractor.into());
        self
    }

    /// Returns true if the entry matches this filter.
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some(ref project_id) = self.project_id {
            if entry.project_id != *project_id {
                return false;
            }
        }

        if let Some(ref work_item_id) = self.work_item_id {
            if entry.work_item_id != *work_item_id {
                return false;
            }
        }

        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }

        if let Some(ref contractor) = self.contractor {
            if entry.contractor != *contractor {
                return false;
            }
        }

        true
    }
}
