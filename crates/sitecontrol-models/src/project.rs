//! Construction projects (sites).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::date::DayDate;
use crate::error::ModelError;
use crate::ids::ProjectId;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// Construction is underway.
    #[default]
    Active,
    /// Construction is finished.
    Completed,
    /// Construction is paused.
    OnHold,
}

impl ProjectStatus {
    /// Badge label shown to site staff.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "В работе",
            ProjectStatus::Completed => "Завершен",
            ProjectStatus::OnHold => "Приостановлен",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
        };
        f.write_str(s)
    }
}

impl FromStr for ProjectStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            "on-hold" | "on_hold" => Ok(ProjectStatus::OnHold),
            other => Err(ModelError::UnknownVariant {
                kind: "project status",
                value: other.to_string(),
            }),
        }
    }
}

/// A construction site under quality control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier for the project.
    pub id: ProjectId,

    /// Object name, e.g. "Школа №12".
    pub name: String,

    /// City or address.
    pub location: String,

    /// Planned start date.
    pub start_date: DayDate,

    /// Planned end date.
    pub end_date: DayDate,

    /// Overall progress, 0..=100.
    pub progress: u8,

    /// Current status.
    pub status: ProjectStatus,
}

impl Project {
    /// Creates an active project with zero progress.
    pub fn new(
        id: impl Into<ProjectId>,
        name: impl Into<String>,
        location: impl Into<String>,
        start_date: DayDate,
        end_date: DayDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            start_date,
            end_date,
            progress: 0,
            status: ProjectStatus::Active,
        }
    }

    /// Sets progress, clamped to 100.
    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress.min(100);
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns true if the project is active.
    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school() -> Project {
        Project::new(
            "p1",
            "Школа №12",
            "г. Сургут",
            DayDate::parse("01.08.2024").unwrap(),
            DayDate::parse("15.11.2024").unwrap(),
        )
    }

    #[test]
    fn test_project_creation() {
        let project = school();

        assert_eq!(project.id.as_str(), "p1");
        assert_eq!(project.progress, 0);
        assert_eq!(project.status, ProjectStatus::Active);
        assert!(project.is_active());
    }

    #[test]
    fn test_progress_is_clamped() {
        let project = school().with_progress(250);
        assert_eq!(project.progress, 100);
    }

    #[test]
    fn test_project_status_serialization() {
        let json = serde_json::to_string(&ProjectStatus::OnHold).unwrap();
        assert_eq!(json, "\"on-hold\"");

        let parsed: ProjectStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, ProjectStatus::Completed);
    }

    #[test]
    fn test_project_status_from_str() {
        assert_eq!("on_hold".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        assert!("archived".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_project_serialization_roundtrip() {
        let project = school()
            .with_progress(67)
            .with_status(ProjectStatus::Completed);

        let json = serde_json::to_string(&project).unwrap();
        assert!(json.contains("\"start_date\":\"01.08.2024\""));

        let deserialized: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(project, deserialized);
    }
}
