//! SiteStore - in-memory entity store and its workflow transitions.
//!
//! All mutation goes through `&mut self` methods. A transition either applies
//! completely or returns an error and leaves the store untouched; callers that
//! want the "silently ignore invalid actions" behaviour just drop the error.

use sitecontrol_models::{
    DayDate, Defect, DefectId, EntryId, EntryStatus, Inspection, InspectionId, JournalEntry,
    Project, ProjectId, ReviewDecision, WorkItem, WorkItemId,
};
use sitecontrol_persistence::{Snapshot, SnapshotStore};
use tracing::{debug, info};

use crate::error::{Result, WorkflowError};

/// Comment attached when an entry is rejected without one.
pub const REJECT_PLACEHOLDER_COMMENT: &str = "Требуется доработка";

/// Logs an ignored action and hands the error back.
fn rejected(action: &'static str, err: WorkflowError) -> WorkflowError {
    debug!(action, reason = %err, "Action ignored");
    err
}

/// Owner of every collection: projects, work items, the journal (newest
/// first), completed inspections and the single active inspection slot.
///
/// Nothing is ever removed from the collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteStore {
    projects: Vec<Project>,
    work_items: Vec<WorkItem>,
    journal: Vec<JournalEntry>,
    inspections: Vec<Inspection>,
    active_inspection: Option<Inspection>,
}

impl SiteStore {
    /// Creates an empty store. See [`SiteStore::seeded`] for the mock data set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project.
    pub fn add_project(&mut self, project: Project) {
        self.projects.push(project);
    }

    /// Adds a work item.
    pub fn add_work_item(&mut self, item: WorkItem) {
        self.work_items.push(item);
    }

    /// Appends an existing journal entry at the end (oldest position).
    pub fn add_journal_entry(&mut self, entry: JournalEntry) {
        self.journal.push(entry);
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn work_items(&self) -> &[WorkItem] {
        &self.work_items
    }

    /// Journal entries, newest first.
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Completed inspections in completion order.
    pub fn inspections(&self) -> &[Inspection] {
        &self.inspections
    }

    /// The inspection currently being worked through.
    pub fn active_inspection(&self) -> Option<&Inspection> {
        self.active_inspection.as_ref()
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == *id)
    }

    pub fn work_item(&self, id: &WorkItemId) -> Option<&WorkItem> {
        self.work_items.iter().find(|w| w.id == *id)
    }

    pub fn entry(&self, id: &EntryId) -> Option<&JournalEntry> {
        self.journal.iter().find(|e| e.id == *id)
    }

    pub fn inspection(&self, id: &InspectionId) -> Option<&Inspection> {
        self.inspections.iter().find(|i| i.id == *id)
    }

    /// Checks that both IDs are present and resolve, and that the work item
    /// belongs to the project.
    fn resolve_target(&self, project_id: &ProjectId, work_item_id: &WorkItemId) -> Result<&WorkItem> {
        if project_id.is_blank() {
            return Err(WorkflowError::MissingIdentifier("project"));
        }
        if work_item_id.is_blank() {
            return Err(WorkflowError::MissingIdentifier("work item"));
        }
        if self.project(project_id).is_none() {
            return Err(WorkflowError::ProjectNotFound(project_id.to_string()));
        }

        let item = self
            .work_item(work_item_id)
            .ok_or_else(|| WorkflowError::WorkItemNotFound(work_item_id.to_string()))?;

        if item.project_id != *project_id {
            return Err(WorkflowError::WorkItemNotInProject {
                work_item: work_item_id.to_string(),
                project: project_id.to_string(),
            });
        }

        Ok(item)
    }

    fn active_mut(&mut self, action: &'static str) -> Result<&mut Inspection> {
        self.active_inspection
            .as_mut()
            .ok_or_else(|| rejected(action, WorkflowError::NoActiveInspection))
    }

    /// Contractor submits a report of work performed.
    ///
    /// The trimmed text becomes a new pending entry at the front of the
    /// journal. Ignored when the text is blank or the IDs are missing or
    /// don't resolve.
    pub fn submit_entry(
        &mut self,
        text: &str,
        project_id: &ProjectId,
        work_item_id: &WorkItemId,
        contractor: &str,
        today: DayDate,
    ) -> Result<EntryId> {
        let text = text.trim();
        if text.is_empty() {
            return Err(rejected("submit_entry", WorkflowError::EmptyText));
        }
        self.resolve_target(project_id, work_item_id)
            .map_err(|e| rejected("submit_entry", e))?;

        let entry = JournalEntry::new(
            project_id.clone(),
            work_item_id.clone(),
            contractor,
            text,
            today,
        );
        let entry_id = entry.id.clone();
        self.journal.insert(0, entry);

        debug!(
            entry_id = %entry_id,
            project_id = %project_id,
            work_item_id = %work_item_id,
            contractor,
            "Journal entry submitted"
        );
        Ok(entry_id)
    }

    /// Supervisor accepts or rejects a pending entry.
    ///
    /// A blank comment counts as no comment. Rejecting without a comment
    /// attaches [`REJECT_PLACEHOLDER_COMMENT`]; accepting without one leaves
    /// the comment unset. Ignored for unknown or already reviewed entries.
    pub fn review_entry(
        &mut self,
        entry_id: &EntryId,
        decision: ReviewDecision,
        comment: Option<String>,
    ) -> Result<EntryStatus> {
        let entry = self
            .journal
            .iter_mut()
            .find(|e| e.id == *entry_id)
            .ok_or_else(|| {
                rejected("review_entry", WorkflowError::EntryNotFound(entry_id.to_string()))
            })?;

        if !entry.is_pending() {
            return Err(rejected(
                "review_entry",
                WorkflowError::AlreadyReviewed {
                    entry: entry_id.to_string(),
                    status: entry.status,
                },
            ));
        }

        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let comment = match decision {
            ReviewDecision::Reject => {
                comment.or_else(|| Some(REJECT_PLACEHOLDER_COMMENT.to_string()))
            }
            ReviewDecision::Accept => comment,
        };

        entry.apply_review(decision, comment);

        debug!(
            entry_id = %entry_id,
            decision = %decision,
            commented = entry.comment.is_some(),
            "Journal entry reviewed"
        );
        Ok(entry.status)
    }

    /// Supervisor starts an inspection of a work item.
    ///
    /// Only completed or accepted work can be inspected. Ignored when the IDs
    /// don't resolve, the work is still in progress, or another inspection
    /// is active.
    pub fn start_inspection(
        &mut self,
        project_id: &ProjectId,
        work_item_id: &WorkItemId,
        inspector: &str,
        today: DayDate,
    ) -> Result<InspectionId> {
        if let Some(active) = &self.active_inspection {
            return Err(rejected(
                "start_inspection",
                WorkflowError::InspectionInProgress(active.id.to_string()),
            ));
        }

        let item = self
            .resolve_target(project_id, work_item_id)
            .map_err(|e| rejected("start_inspection", e))?;
        if !item.status.is_done() {
            return Err(rejected(
                "start_inspection",
                WorkflowError::WorkItemNotCompleted {
                    work_item: work_item_id.to_string(),
                    status: item.status,
                },
            ));
        }
        let title = format!("Проверка: {}", item.title);

        let inspection = Inspection::from_template(
            project_id.clone(),
            work_item_id.clone(),
            title,
            inspector,
            today,
        );
        let inspection_id = inspection.id.clone();
        self.active_inspection = Some(inspection);

        debug!(
            inspection_id = %inspection_id,
            work_item_id = %work_item_id,
            inspector,
            "Inspection started"
        );
        Ok(inspection_id)
    }

    /// Flips the completed flag of the checklist item at `index` on the
    /// active inspection. Returns the new flag.
    pub fn toggle_checklist_item(&mut self, index: usize) -> Result<bool> {
        let inspection = self.active_mut("toggle_checklist_item")?;
        let len = inspection.checklist.len();
        let completed = inspection.toggle_item(index).ok_or_else(|| {
            rejected(
                "toggle_checklist_item",
                WorkflowError::ChecklistIndexOutOfRange { index, len },
            )
        })?;

        debug!(index, completed, "Checklist item toggled");
        Ok(completed)
    }

    /// Sets notes on a checklist item of the active inspection; blank notes
    /// clear them.
    pub fn set_checklist_notes(&mut self, index: usize, notes: &str) -> Result<()> {
        let inspection = self.active_mut("set_checklist_notes")?;
        let len = inspection.checklist.len();
        if !inspection.set_notes(index, notes) {
            return Err(rejected(
                "set_checklist_notes",
                WorkflowError::ChecklistIndexOutOfRange { index, len },
            ));
        }

        debug!(index, "Checklist notes updated");
        Ok(())
    }

    /// Appends a placeholder defect (medium, open) to the active inspection.
    pub fn add_defect(&mut self) -> Result<DefectId> {
        let inspection = self.active_mut("add_defect")?;
        let defect = Defect::placeholder();
        let defect_id = defect.id.clone();
        inspection.add_defect(defect);

        debug!(defect_id = %defect_id, defects = inspection.defects.len(), "Defect recorded");
        Ok(defect_id)
    }

    /// Finalizes the active inspection: status forced to completed, moved to
    /// the inspection list, active slot cleared.
    pub fn complete_inspection(&mut self) -> Result<InspectionId> {
        let mut inspection = self
            .active_inspection
            .take()
            .ok_or_else(|| rejected("complete_inspection", WorkflowError::NoActiveInspection))?;

        inspection.complete();
        let inspection_id = inspection.id.clone();

        debug!(
            inspection_id = %inspection_id,
            checked = inspection.checked_count(),
            defects = inspection.defects.len(),
            "Inspection completed"
        );
        self.inspections.push(inspection);
        Ok(inspection_id)
    }

    /// Captures the whole store.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.projects.clone(),
            self.work_items.clone(),
            self.journal.clone(),
            self.inspections.clone(),
            self.active_inspection.clone(),
        )
    }

    /// Rebuilds a store from a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            projects: snapshot.projects,
            work_items: snapshot.work_items,
            journal: snapshot.journal,
            inspections: snapshot.inspections,
            active_inspection: snapshot.active_inspection,
        }
    }

    /// Loads from `snapshots`, or falls back to the seed data if no snapshot
    /// has been written yet.
    pub fn load_or_seed(snapshots: &SnapshotStore) -> Result<Self> {
        match snapshots.load()? {
            Some(snapshot) => Ok(Self::from_snapshot(snapshot)),
            None => {
                info!(path = %snapshots.path().display(), "No snapshot, using seed data");
                Ok(Self::seeded())
            }
        }
    }

    /// Writes the store to `snapshots`.
    pub fn save_to(&self, snapshots: &SnapshotStore) -> Result<()> {
        snapshots.save(&self.to_snapshot())?;
        Ok(())
    }
}
