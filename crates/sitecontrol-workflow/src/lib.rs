//! Entity store, workflow transitions and derived views for SiteControl.
//!
//! This crate provides the `SiteStore` that owns all site data and the
//! transitions that move it forward:
//! - contractors submit journal entries, supervisors accept or reject them
//! - supervisors run inspections: start, tick the checklist, record defects,
//!   complete
//! - derived views (work items by project, overdue detection, dashboard
//!   counters) computed on demand
//!
//! Invalid actions leave the store unchanged and come back as a
//! [`WorkflowError`] describing why.
//!
//! # Example
//!
//! ```
//! use sitecontrol_models::{DayDate, ReviewDecision};
//! use sitecontrol_workflow::{Dashboard, SiteStore};
//!
//! let mut store = SiteStore::seeded();
//! let today = DayDate::parse("20.08.2024").unwrap();
//!
//! let entry = store
//!     .submit_entry("Смонтирован воздуховод", &"p1".into(), &"w1".into(), "Иван Петров", today)
//!     .unwrap();
//! store.review_entry(&entry, ReviewDecision::Accept, None).unwrap();
//!
//! store
//!     .start_inspection(&"p1".into(), &"w3".into(), "Технический заказчик", today)
//!     .unwrap();
//! store.toggle_checklist_item(0).unwrap();
//! store.add_defect().unwrap();
//! store.complete_inspection().unwrap();
//!
//! assert_eq!(Dashboard::compute(&store, today).open_defects, 1);
//! ```

pub mod error;
pub mod filter;
mod seed;
pub mod session;
pub mod store;
pub mod views;

pub use error::{Result, WorkflowError};
pub use filter::EntryFilter;
pub use session::{Action, Session};
pub use store::{SiteStore, REJECT_PLACEHOLDER_COMMENT};
pub use views::{
    entries_matching, is_overdue, overdue_work_items, work_item_views, work_items_for_project,
    Dashboard, WorkItemView,
};
