use std::fmt;

use serde::{Deserialize, Serialize};

/// Everything a user can ask the system to do. Gated operations consult
/// `Role::is_allowed` before executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Edit,
    Delete,
    Upload,
    Download,
    Convert,
    UserManagement,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::View => "view",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Upload => "upload",
            Action::Download => "download",
            Action::Convert => "convert",
            Action::UserManagement => "user_management",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full control, including user management.
    Admin,
    /// Manages swimmers and times, but cannot delete swimmers or users.
    Coach,
    /// Read-only access.
    Assistant,
}

impl Role {
    pub fn is_allowed(&self, action: Action) -> bool {
        match self {
            Role::Admin => true,
            Role::Coach => matches!(
                action,
                Action::View | Action::Edit | Action::Upload | Action::Download | Action::Convert
            ),
            Role::Assistant => matches!(action, Action::View),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Coach => write!(f, "coach"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "coach" => Ok(Role::Coach),
            "assistant" => Ok(Role::Assistant),
            other => Err(format!("unknown role {other:?}")),
        }
    }
}
