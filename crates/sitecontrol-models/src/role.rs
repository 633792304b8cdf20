//! Actor roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Who is acting on the site data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Performs the work and reports it in the journal.
    Contractor,
    /// Technical customer: reviews journal entries and runs inspections.
    Supervisor,
}

impl Role {
    /// Default display name for an actor of this role.
    pub fn default_actor_name(&self) -> &'static str {
        match self {
            Role::Contractor => "Иван Петров",
            Role::Supervisor => "Технический заказчик",
        }
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Contractor => "contractor",
            Role::Supervisor => "supervisor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contractor" | "подрядчик" => Ok(Role::Contractor),
            "supervisor" | "техзаказчик" => Ok(Role::Supervisor),
            other => Err(ModelError::UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}
