//! Acting user and what their role permits.

use std::fmt;

use sitecontrol_models::Role;

use crate::error::{Result, WorkflowError};

/// User-triggered actions that mutate the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SubmitEntry,
    ReviewEntry,
    StartInspection,
    EditChecklist,
    AddDefect,
    CompleteInspection,
}

impl Action {
    /// Role allowed to perform this action.
    pub fn required_role(&self) -> Role {
        match self {
            Action::SubmitEntry => Role::Contractor,
            Action::ReviewEntry
            | Action::StartInspection
            | Action::EditChecklist
            | Action::AddDefect
            | Action::CompleteInspection => Role::Supervisor,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::SubmitEntry => "submit journal entries",
            Action::ReviewEntry => "review journal entries",
            Action::StartInspection => "start inspections",
            Action::EditChecklist => "edit checklists",
            Action::AddDefect => "record defects",
            Action::CompleteInspection => "complete inspections",
        };
        f.write_str(s)
    }
}

/// The person using the application and the role they picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub role: Role,
    pub name: String,
}

impl Session {
    /// Creates a session with an explicit display name.
    pub fn new(role: Role, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
        }
    }

    /// Creates a session using the role's default display name.
    pub fn for_role(role: Role) -> Self {
        Self::new(role, role.default_actor_name())
    }

    /// Returns true if this session's role may perform `action`.
    pub fn permits(&self, action: Action) -> bool {
        action.required_role() == self.role
    }

    /// Fails with [`WorkflowError::NotPermitted`] unless permitted.
    pub fn authorize(&self, action: Action) -> Result<()> {
        if self.permits(action) {
            Ok(())
        } else {
            Err(WorkflowError::NotPermitted {
                role: self.role,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contractor_permissions() {
        let session = Session::for_role(Role::Contractor);

        assert_eq!(session.name, "Иван Петров");
        assert!(session.permits(Action::SubmitEntry));
        assert!(!session.permits(Action::ReviewEntry));
        assert!(!session.permits(Action::AddDefect));
    }

    #[test]
    fn test_supervisor_permissions() {
        let session = Session::for_role(Role::Supervisor);

        assert!(!session.permits(Action::SubmitEntry));
        assert!(session.permits(Action::ReviewEntry));
        assert!(session.permits(Action::StartInspection));
        assert!(session.permits(Action::CompleteInspection));
    }

    #[test]
    fn test_authorize_error_message() {
        let session = Session::new(Role::Contractor, "Андрей Смирнов");
        let err = session.authorize(Action::StartInspection).unwrap_err();

        assert_eq!(err.to_string(), "contractor may not start inspections");
        assert!(err.is_ignored_action());
    }
}
