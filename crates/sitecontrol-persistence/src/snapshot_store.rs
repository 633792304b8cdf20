//! Snapshot store: the whole site state as one JSON document.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitecontrol_models::{
    Inspection, InspectionStatus, JournalEntry, Project, WorkItem, CHECKLIST_TEMPLATE,
};
use tracing::{debug, info};

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of every collection in the site store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version, checked on load.
    pub version: u32,

    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,

    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub work_items: Vec<WorkItem>,

    /// Newest first.
    #[serde(default)]
    pub journal: Vec<JournalEntry>,

    /// Completed inspections.
    #[serde(default)]
    pub inspections: Vec<Inspection>,

    /// Inspection in progress, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_inspection: Option<Inspection>,
}

impl Snapshot {
    /// Creates a snapshot of the given collections stamped with the current time.
    pub fn new(
        projects: Vec<Project>,
        work_items: Vec<WorkItem>,
        journal: Vec<JournalEntry>,
        inspections: Vec<Inspection>,
        active_inspection: Option<Inspection>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            projects,
            work_items,
            journal,
            inspections,
            active_inspection,
        }
    }

    /// Checks the invariants the store relies on: progress within 0..=100,
    /// a full checklist on every inspection, and an active inspection that
    /// is actually in progress.
    pub fn validate(&self) -> Result<()> {
        if let Some(p) = self.projects.iter().find(|p| p.progress > 100) {
            return Err(invalid(format!(
                "project {} progress {} exceeds 100",
                p.id, p.progress
            )));
        }
        if let Some(w) = self.work_items.iter().find(|w| w.progress > 100) {
            return Err(invalid(format!(
                "work item {} progress {} exceeds 100",
                w.id, w.progress
            )));
        }

        let checklist_len = CHECKLIST_TEMPLATE.len();
        if let Some(i) = self
            .inspections
            .iter()
            .chain(self.active_inspection.iter())
            .find(|i| i.checklist.len() != checklist_len)
        {
            return Err(invalid(format!(
                "inspection {} has {} checklist items (expected {})",
                i.id,
                i.checklist.len(),
                checklist_len
            )));
        }

        if let Some(active) = &self.active_inspection {
            if active.status != InspectionStatus::InProgress {
                return Err(invalid(format!(
                    "active inspection {} is {}",
                    active.id, active.status
                )));
            }
        }
        Ok(())
    }
}

fn invalid(reason: String) -> PersistenceError {
    PersistenceError::InvalidData(reason)
}

/// Reads and writes a [`Snapshot`] at a fixed path.
///
/// Writes are atomic (temp file + rename). A missing file is not an error
/// for [`load`](Self::load): callers fall back to seed data.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a store for the given snapshot file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a snapshot file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Saves a snapshot.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        atomic_write_json(&self.path, snapshot)?;
        info!(
            path = %self.path.display(),
            journal = snapshot.journal.len(),
            inspections = snapshot.inspections.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    /// Loads the snapshot, or `None` if the file doesn't exist.
    pub fn load(&self) -> Result<Option<Snapshot>> {
        let Some(snapshot) = read_json_optional::<Snapshot>(&self.path)? else {
            debug!(path = %self.path.display(), "No snapshot file");
            return Ok(None);
        };

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::InvalidData(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        snapshot.validate()?;

        info!(
            path = %self.path.display(),
            saved_at = %snapshot.saved_at,
            "Snapshot loaded"
        );
        Ok(Some(snapshot))
    }

    /// Loads the snapshot, failing if the file doesn't exist.
    pub fn load_required(&self) -> Result<Snapshot> {
        self.load()?
            .ok_or_else(|| PersistenceError::NotFound(self.path.clone()))
    }
}
