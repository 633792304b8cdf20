//! Core data models for SiteControl.
//!
//! This crate provides the entity types of the construction quality-control
//! workflow: projects, work items, journal entries and inspections, plus the
//! typed IDs and day-first dates they are keyed and stamped with.
//!
//! Entities reference each other by ID only.

pub mod builders;
pub mod date;
pub mod error;
pub mod ids;
pub mod inspection;
pub mod journal;
pub mod project;
pub mod role;
pub mod work;

// Re-export main types
pub use builders::WorkItemBuilder;
pub use date::DayDate;
pub use error::{ModelError, Result};
pub use ids::{ChecklistItemId, DefectId, EntryId, InspectionId, ProjectId, WorkItemId};
pub use inspection::{
    ChecklistItem, Defect, DefectStatus, Inspection, InspectionStatus, Severity,
    CHECKLIST_TEMPLATE, DEFECT_PLACEHOLDER_DESCRIPTION, DEFECT_PLACEHOLDER_TITLE,
};
pub use journal::{EntryStatus, JournalEntry, ReviewDecision};
pub use project::{Project, ProjectStatus};
pub use role::Role;
pub use work::{WorkItem, WorkStatus};
