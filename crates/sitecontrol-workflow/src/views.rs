//! Derived views over the store.
//!
//! Everything here is recomputed from the collections on each call; nothing
//! is cached and nothing is written back. "Overdue" in particular only ever
//! exists as a view.

use serde::Serialize;
use sitecontrol_models::{
    DayDate, EntryStatus, Inspection, JournalEntry, ProjectId, WorkItem, WorkStatus,
};

use crate::filter::EntryFilter;
use crate::store::SiteStore;

/// Work items of a project, in store order.
pub fn work_items_for_project<'a>(store: &'a SiteStore, project_id: &ProjectId) -> Vec<&'a WorkItem> {
    store
        .work_items()
        .iter()
        .filter(|item| item.project_id == *project_id)
        .collect()
}

/// Deadline strictly before `today` and not accepted.
pub fn is_overdue(item: &WorkItem, today: DayDate) -> bool {
    item.is_overdue(today)
}

/// Every overdue work item, in store order.
pub fn overdue_work_items(store: &SiteStore, today: DayDate) -> Vec<&WorkItem> {
    store
        .work_items()
        .iter()
        .filter(|item| is_overdue(item, today))
        .collect()
}

/// Journal entries matching `filter`, newest first.
pub fn entries_matching<'a>(store: &'a SiteStore, filter: &EntryFilter) -> Vec<&'a JournalEntry> {
    store
        .journal()
        .iter()
        .filter(|entry| filter.matches(entry))
        .collect()
}

/// Completed inspections plus the active one, if any.
fn all_inspections(store: &SiteStore) -> impl Iterator<Item = &Inspection> {
    store.inspections().iter().chain(store.active_inspection())
}

/// Headline counters for the supervisor dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Dashboard {
    pub active_projects: usize,
    /// Work items completed or accepted.
    pub completed_work_items: usize,
    /// Open defects across completed and active inspections.
    pub open_defects: usize,
    pub pending_entries: usize,
    pub overdue_work_items: usize,
}

impl Dashboard {
    /// Computes the counters from the current store contents.
    pub fn compute(store: &SiteStore, today: DayDate) -> Self {
        Self {
            active_projects: store.projects().iter().filter(|p| p.is_active()).count(),
            completed_work_items: store
                .work_items()
                .iter()
                .filter(|w| w.status.is_done())
                .count(),
            open_defects: all_inspections(store)
                .map(Inspection::open_defect_count)
                .sum(),
            pending_entries: store
                .journal()
                .iter()
                .filter(|e| e.status == EntryStatus::Pending)
                .count(),
            overdue_work_items: overdue_work_items(store, today).len(),
        }
    }
}

/// A work item paired with the status to display for it today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItemView<'a> {
    #[serde(flatten)]
    pub item: &'a WorkItem,
    pub effective_status: WorkStatus,
}

/// Work items (optionally of one project) with their effective status.
pub fn work_item_views<'a>(
    store: &'a SiteStore,
    project_id: Option<&ProjectId>,
    today: DayDate,
) -> Vec<WorkItemView<'a>> {
    let items: Vec<&WorkItem> = match project_id {
        Some(id) => work_items_for_project(store, id),
        None => store.work_items().iter().collect(),
    };

    items
        .into_iter()
        .map(|item| WorkItemView {
            item,
            effective_status: item.effective_status(today),
        })
        .collect()
}
