//! Persistence layer for SiteControl.
//!
//! The site store lives in memory. This crate lets an operator opt into
//! keeping it between runs: the whole store is written as one JSON snapshot
//! using atomic file operations (write to temp file, then rename).
//!
//! # Example
//!
//! ```no_run
//! use sitecontrol_persistence::{Snapshot, SnapshotStore};
//!
//! let store = SnapshotStore::new("/home/user/.sitecontrol/snapshot.json");
//! store.save(&Snapshot::new(vec![], vec![], vec![], vec![], None)).unwrap();
//!
//! let loaded = store.load().unwrap();
//! assert!(loaded.is_some());
//! ```

pub mod atomic;
pub mod error;
pub mod snapshot_store;

pub use error::{PersistenceError, Result};
pub use snapshot_store::{Snapshot, SnapshotStore, SNAPSHOT_VERSION};
