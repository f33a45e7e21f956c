use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::M => write!(f, "M"),
            Sex::F => write!(f, "F"),
        }
    }
}

/// One recorded time cell: the time text as stored on the sheet, the course
/// label it was recorded in, and optionally the meet date. Time and course
/// stay as text because the sheets are free-form; parsing happens on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub time: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl TimeEntry {
    /// A time is "present" if the cell is non-empty. Absent is not the same
    /// as invalid: downstream logic treats the two differently.
    pub fn is_present(&self) -> bool {
        !self.time.trim().is_empty()
    }
}

/// A roster entry: one swimmer and their recorded times, keyed by event.
/// Map iteration order is the declared event order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swimmer {
    pub name: String,
    pub sex: Sex,
    #[serde(rename = "birthYear")]
    pub birth_year: i32,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub entries: BTreeMap<Event, TimeEntry>,
}

impl Swimmer {
    pub fn new(name: impl Into<String>, sex: Sex, birth_year: i32) -> Self {
        Self {
            name: name.into(),
            sex,
            birth_year,
            available: true,
            entries: BTreeMap::new(),
        }
    }

    /// Age during the given season year.
    pub fn age(&self, season_year: i32) -> i32 {
        season_year - self.birth_year
    }

    pub fn entry(&self, event: Event) -> Option<&TimeEntry> {
        self.entries.get(&event)
    }

    /// Number of events with a recorded (non-empty) time.
    pub fn times_recorded(&self) -> usize {
        self.entries.values().filter(|e| e.is_present()).count()
    }

    pub fn display_name(&self) -> String {
        format!("{} ({}, {})", self.name, self.sex, self.birth_year)
    }
}
