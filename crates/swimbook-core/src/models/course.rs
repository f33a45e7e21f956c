use std::fmt;

use serde::{Deserialize, Serialize};

/// Pool course a time was recorded in. Exactly two exist: short course
/// (25m pool) and long course (50m pool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "25m")]
    Short,
    #[serde(rename = "50m")]
    Long,
}

impl Course {
    /// Label written back to the sheets.
    pub fn label(&self) -> &'static str {
        match self {
            Course::Short => "25m",
            Course::Long => "50m",
        }
    }

    /// Recognize a stored course label. The sheets are free-form here
    /// ("25m", "25 m", "piscina 25"), so any label containing `25` or `50`
    /// counts; anything else is an unknown course and is excluded from
    /// conversion.
    pub fn from_label(label: &str) -> Option<Course> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        if label.contains("25") {
            Some(Course::Short)
        } else if label.contains("50") {
            Some(Course::Long)
        } else {
            None
        }
    }

    pub fn other(&self) -> Course {
        match self {
            Course::Short => Course::Long,
            Course::Long => Course::Short,
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
