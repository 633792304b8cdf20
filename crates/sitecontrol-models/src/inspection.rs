//! Inspections: checklist walk-throughs that may record defects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date::DayDate;
use crate::error::ModelError;
use crate::ids::{ChecklistItemId, DefectId, InspectionId, ProjectId, WorkItemId};

/// Checklist every new inspection starts with, in order.
pub const CHECKLIST_TEMPLATE: [&str; 4] = [
    "Проверить акты скрытых работ",
    "Сделать фото системы",
    "Проверить соответствие проекту",
    "Проверить крепление воздуховодов",
];

/// Title given to defects recorded through the quick "add defect" action.
pub const DEFECT_PLACEHOLDER_TITLE: &str = "Новое замечание";

/// Description given to defects recorded through the quick "add defect" action.
pub const DEFECT_PLACEHOLDER_DESCRIPTION: &str = "Описание замечания";

/// How serious a defect is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

impl FromStr for Severity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(ModelError::UnknownVariant {
                kind: "severity",
                value: other.to_string(),
            }),
        }
    }
}

/// Resolution status of a defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DefectStatus {
    /// Found, not yet fixed.
    #[default]
    Open,
    /// Contractor reports it fixed.
    Fixed,
    /// Supervisor confirmed the fix.
    Verified,
}

impl fmt::Display for DefectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DefectStatus::Open => "open",
            DefectStatus::Fixed => "fixed",
            DefectStatus::Verified => "verified",
        };
        f.write_str(s)
    }
}

/// Overall status of an inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InspectionStatus {
    /// Planned, not started.
    #[default]
    Pending,
    /// Supervisor is working through the checklist.
    InProgress,
    /// Finalized.
    Completed,
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InspectionStatus::Pending => "pending",
            InspectionStatus::InProgress => "in-progress",
            InspectionStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// One line of an inspection checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub title: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ChecklistItem {
    /// Creates an unchecked item.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ChecklistItemId::new(),
            title: title.into(),
            completed: false,
            notes: None,
        }
    }
}

/// A quality issue recorded during an inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defect {
    pub id: DefectId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: DefectStatus,
}

impl Defect {
    /// Creates an open defect.
    pub fn new(title: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: DefectId::new(),
            title: title.into(),
            description: description.into(),
            severity,
            status: DefectStatus::Open,
        }
    }

    /// The fixed-template defect added by the quick action.
    pub fn placeholder() -> Self {
        Self::new(
            DEFECT_PLACEHOLDER_TITLE,
            DEFECT_PLACEHOLDER_DESCRIPTION,
            Severity::Medium,
        )
    }

    /// Returns true while the defect is unresolved.
    pub fn is_open(&self) -> bool {
        self.status == DefectStatus::Open
    }
}

/// A supervisor-initiated quality check of a work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    pub id: InspectionId,
    pub project_id: ProjectId,
    pub work_item_id: WorkItemId,
    pub title: String,
    pub checklist: Vec<ChecklistItem>,
    #[serde(default)]
    pub defects: Vec<Defect>,
    pub status: InspectionStatus,
    pub inspector: String,
    pub date: DayDate,
}

impl Inspection {
    /// Starts an in-progress inspection with the standard checklist and no
    /// defects.
    pub fn from_template(
        project_id: impl Into<ProjectId>,
        work_item_id: impl Into<WorkItemId>,
        title: impl Into<String>,
        inspector: impl Into<String>,
        date: DayDate,
    ) -> Self {
        Self {
            id: InspectionId::new(),
            project_id: project_id.into(),
            work_item_id: work_item_id.into(),
            title: title.into(),
            checklist: CHECKLIST_TEMPLATE.iter().map(|t| ChecklistItem::new(*t)).collect(),
            defects: Vec::new(),
            status: InspectionStatus::InProgress,
            inspector: inspector.into(),
            date,
        }
    }

    /// Flips the completed flag at `index`. Returns the new flag, or `None`
    /// if the index is out of range.
    pub fn toggle_item(&mut self, index: usize) -> Option<bool> {
        let item = self.checklist.get_mut(index)?;
        item.completed = !item.completed;
        Some(item.completed)
    }

    /// Sets or clears (empty text) the notes at `index`. Returns false if the
    /// index is out of range.
    pub fn set_notes(&mut self, index: usize, notes: &str) -> bool {
        match self.checklist.get_mut(index) {
            Some(item) => {
                let notes = notes.trim();
                item.notes = (!notes.is_empty()).then(|| notes.to_string());
                true
            }
            None => false,
        }
    }

    /// Appends a defect.
    pub fn add_defect(&mut self, defect: Defect) {
        self.defects.push(defect);
    }

    /// Forces the status to completed.
    pub fn complete(&mut self) {
        self.status = InspectionStatus::Completed;
    }

    /// Number of checked items.
    pub fn checked_count(&self) -> usize {
        self.checklist.iter().filter(|item| item.completed).count()
    }

    /// Number of unresolved defects.
    pub fn open_defect_count(&self) -> usize {
        self.defects.iter().filter(|d| d.is_open()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspection() -> Inspection {
        Inspection::from_template(
            "p1",
            "w3",
            "Проверка: Монтаж окон",
            "Технический заказчик",
            DayDate::parse("20.08.2024").unwrap(),
        )
    }

    #[test]
    fn test_from_template() {
        let insp = inspection();

        assert!(insp.id.as_str().starts_with("insp-"));
        assert_eq!(insp.checklist.len(), CHECKLIST_TEMPLATE.len());
        assert_eq!(insp.checklist[0].title, CHECKLIST_TEMPLATE[0]);
        assert!(insp.checklist.iter().all(|item| !item.completed));
        assert!(insp.defects.is_empty());
        assert_eq!(insp.status, InspectionStatus::InProgress);
    }

    #[test]
    fn test_toggle_item() {
        let mut insp = inspection();

        assert_eq!(insp.toggle_item(1), Some(true));
        assert_eq!(insp.checked_count(), 1);
        assert_eq!(insp.toggle_item(1), Some(false));
        assert_eq!(insp.checked_count(), 0);
    }

    #[test]
    fn test_toggle_item_out_of_range() {
        let mut insp = inspection();
        assert_eq!(insp.toggle_item(4), None);
        assert_eq!(insp.checklist.len(), 4);
    }

    #[test]
    fn test_set_notes() {
        let mut insp = inspection();

        assert!(insp.set_notes(0, " акт №5 подписан "));
        assert_eq!(insp.checklist[0].notes.as_deref(), Some("акт №5 подписан"));

        assert!(insp.set_notes(0, ""));
        assert!(insp.checklist[0].notes.is_none());

        assert!(!insp.set_notes(9, "nope"));
    }

    #[test]
    fn test_placeholder_defect() {
        let defect = Defect::placeholder();

        assert_eq!(defect.title, DEFECT_PLACEHOLDER_TITLE);
        assert_eq!(defect.severity, Severity::Medium);
        assert_eq!(defect.status, DefectStatus::Open);
    }

    #[test]
    fn test_open_defect_count() {
        let mut insp = inspection();
        insp.add_defect(Defect::placeholder());
        let mut fixed = Defect::new("Щель", "Щель у рамы", Severity::High);
        fixed.status = DefectStatus::Fixed;
        insp.add_defect(fixed);

        assert_eq!(insp.defects.len(), 2);
        assert_eq!(insp.open_defect_count(), 1);
    }

    #[test]
    fn test_severity_ordering_and_parse() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
    }

    #[test]
    fn test_inspection_status_serialization() {
        let json = serde_json::to_string(&InspectionStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }
}
