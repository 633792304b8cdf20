//! The store an invocation works on, plus where (if anywhere) it is saved.

use std::path::Path;

use sitecontrol_models::DayDate;
use sitecontrol_persistence::SnapshotStore;
use sitecontrol_workflow::{Action, Session, SiteStore, WorkflowError};
use tracing::{debug, info, warn};

use crate::config::Config;

/// Result of an attempted mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The transition applied (and was saved, if a snapshot is configured).
    Applied(T),
    /// The store refused the action and is unchanged.
    Ignored(String),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// In-memory site store with optional snapshot backing.
#[derive(Debug)]
pub struct SiteContext {
    store: SiteStore,
    snapshots: Option<SnapshotStore>,
    today: DayDate,
}

impl SiteContext {
    /// Loads the configured snapshot, or starts from the seed data.
    pub fn open(config: &Config) -> sitecontrol_workflow::Result<Self> {
        let snapshots = config.snapshot.as_ref().map(SnapshotStore::new);
        let store = match &snapshots {
            Some(snapshots) => SiteStore::load_or_seed(snapshots)?,
            None => SiteStore::seeded(),
        };

        Ok(Self {
            store,
            snapshots,
            today: config.today,
        })
    }

    /// Seed data, nothing persisted.
    pub fn in_memory(today: DayDate) -> Self {
        Self {
            store: SiteStore::seeded(),
            snapshots: None,
            today,
        }
    }

    pub fn store(&self) -> &SiteStore {
        &self.store
    }

    pub fn today(&self) -> DayDate {
        self.today
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshots.as_ref().map(SnapshotStore::path)
    }

    /// Runs a transition on behalf of `session`.
    ///
    /// The role check happens first. Refused actions come back as
    /// [`Outcome::Ignored`]; only a failed snapshot write is an error, and
    /// then the in-memory store is rolled back to match the file.
    pub fn apply<T>(
        &mut self,
        session: &Session,
        action: Action,
        transition: impl FnOnce(&mut SiteStore) -> sitecontrol_workflow::Result<T>,
    ) -> sitecontrol_workflow::Result<Outcome<T>> {
        let backup = self.store.clone();
        let result = session
            .authorize(action)
            .and_then(|()| transition(&mut self.store));

        match result {
            Ok(value) => match self.save() {
                Ok(_) => Ok(Outcome::Applied(value)),
                Err(err) => {
                    warn!(%action, error = %err, "Save failed, change discarded");
                    self.store = backup;
                    Err(err)
                }
            },
            Err(err) if err.is_ignored_action() => {
                debug!(%action, role = %session.role, reason = %err, "Action not applied");
                Ok(Outcome::Ignored(err.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Writes the snapshot if one is configured. Returns whether it wrote.
    pub fn save(&self) -> sitecontrol_workflow::Result<bool> {
        match &self.snapshots {
            Some(snapshots) => {
                self.store.save_to(snapshots)?;
                Ok(true)
            }
            None => {
                debug!("No snapshot configured, keeping changes in memory");
                Ok(false)
            }
        }
    }

    /// Writes the store to `path` regardless of the configured snapshot.
    pub fn export(&self, path: &Path) -> Result<(), WorkflowError> {
        self.store.save_to(&SnapshotStore::new(path))?;
        info!(path = %path.display(), "Store exported");
        Ok(())
    }
}
