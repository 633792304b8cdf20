//! Journal entries: contractor reports awaiting supervisor review.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date::DayDate;
use crate::error::ModelError;
use crate::ids::{EntryId, ProjectId, WorkItemId};

/// Review status of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EntryStatus {
    /// Submitted, awaiting review.
    #[default]
    Pending,
    /// Accepted by the supervisor.
    Accepted,
    /// Rejected by the supervisor.
    Rejected,
}

impl EntryStatus {
    /// Badge label shown to site staff.
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "На проверке",
            EntryStatus::Accepted => "Принято",
            EntryStatus::Rejected => "Отклонено",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Accepted => "accepted",
            EntryStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

impl FromStr for EntryStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(EntryStatus::Pending),
            "accepted" => Ok(EntryStatus::Accepted),
            "rejected" => Ok(EntryStatus::Rejected),
            other => Err(ModelError::UnknownVariant {
                kind: "entry status",
                value: other.to_string(),
            }),
        }
    }
}

/// A supervisor's verdict on a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewDecision {
    /// Accept the reported work.
    Accept,
    /// Send the work back.
    Reject,
}

impl ReviewDecision {
    /// Status an entry ends up in after this decision.
    pub fn resulting_status(&self) -> EntryStatus {
        match self {
            ReviewDecision::Accept => EntryStatus::Accepted,
            ReviewDecision::Reject => EntryStatus::Rejected,
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewDecision::Accept => f.write_str("accept"),
            ReviewDecision::Reject => f.write_str("reject"),
        }
    }
}

impl FromStr for ReviewDecision {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept" | "accepted" => Ok(ReviewDecision::Accept),
            "reject" | "rejected" => Ok(ReviewDecision::Reject),
            other => Err(ModelError::UnknownVariant {
                kind: "review decision",
                value: other.to_string(),
            }),
        }
    }
}

/// A contractor's report of work performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for the entry.
    pub id: EntryId,

    /// Project the work was done on.
    pub project_id: ProjectId,

    /// Work item the report refers to.
    pub work_item_id: WorkItemId,

    /// Name of the reporting contractor.
    pub contractor: String,

    /// Date the report was submitted.
    pub submitted_on: DayDate,

    /// Free-text description of the work.
    pub description: String,

    /// Review status.
    pub status: EntryStatus,

    /// Reviewer's comment, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl JournalEntry {
    /// Creates a pending entry with a fresh ID.
    pub fn new(
        project_id: impl Into<ProjectId>,
        work_item_id: impl Into<WorkItemId>,
        contractor: impl Into<String>,
        description: impl Into<String>,
        submitted_on: DayDate,
    ) -> Self {
        Self {
            id: EntryId::new(),
            project_id: project_id.into(),
            work_item_id: work_item_id.into(),
            contractor: contractor.into(),
            submitted_on,
            description: description.into(),
            status: EntryStatus::Pending,
            comment: None,
        }
    }

    /// Replaces the generated ID (seed data).
    pub fn with_id(mut self, id: impl Into<EntryId>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns true if the entry still awaits review.
    pub fn is_pending(&self) -> bool {
        self.status == EntryStatus::Pending
    }

    /// Records a review. The comment is only overwritten when one is given.
    ///
    /// Returns false and leaves the entry untouched if it was already
    /// reviewed.
    pub fn apply_review(&mut self, decision: ReviewDecision, comment: Option<String>) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.status = decision.resulting_status();
        if comment.is_some() {
            self.comment = comment;
        }
        true
    }

    /// Contractor initials, e.g. "ИП" for "Иван Петров".
    pub fn contractor_initials(&self) -> String {
        self.contractor
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> JournalEntry {
        JournalEntry::new(
            "p1",
            "w1",
            "Иван Петров",
            "Уложено 50 м кабеля",
            DayDate::parse("15.08.2024").unwrap(),
        )
    }

    #[test]
    fn test_entry_creation() {
        let entry = entry();

        assert!(entry.id.as_str().starts_with("entry-"));
        assert_eq!(entry.status, EntryStatus::Pending);
        assert!(entry.is_pending());
        assert!(entry.comment.is_none());
    }

    #[test]
    fn test_apply_review_accept_without_comment() {
        let mut entry = entry();
        assert!(entry.apply_review(ReviewDecision::Accept, None));

        assert_eq!(entry.status, EntryStatus::Accepted);
        assert!(entry.comment.is_none());
        assert!(!entry.is_pending());
    }

    #[test]
    fn test_apply_review_reject_with_comment() {
        let mut entry = entry();
        assert!(entry.apply_review(ReviewDecision::Reject, Some("Переделать".to_string())));

        assert_eq!(entry.status, EntryStatus::Rejected);
        assert_eq!(entry.comment.as_deref(), Some("Переделать"));
    }

    #[test]
    fn test_apply_review_keeps_earlier_decision() {
        let mut entry = entry();
        entry.apply_review(ReviewDecision::Accept, Some("Принято".to_string()));

        assert!(!entry.apply_review(ReviewDecision::Reject, Some("Переделать".to_string())));
        assert_eq!(entry.status, EntryStatus::Accepted);
        assert_eq!(entry.comment.as_deref(), Some("Принято"));
    }

    #[test]
    fn test_decision_from_str() {
        assert_eq!("accept".parse::<ReviewDecision>().unwrap(), ReviewDecision::Accept);
        assert_eq!("REJECT".parse::<ReviewDecision>().unwrap(), ReviewDecision::Reject);
        assert!("maybe".parse::<ReviewDecision>().is_err());
    }

    #[test]
    fn test_contractor_initials() {
        assert_eq!(entry().contractor_initials(), "ИП");

        let mut single = entry();
        single.contractor = "бригада".to_string();
        assert_eq!(single.contractor_initials(), "Б");
    }

    #[test]
    fn test_entry_status_serialization() {
        let json = serde_json::to_string(&EntryStatus::Rejected).unwrap();
        assert_eq!(json, "\"rejected\"");
    }
}
