//! The roster dataset: one sheet of swimmers per season.
//!
//! A roster is a value. Callers that need an untouched original keep their
//! copy; bulk conversion always works on an independent clone. Column
//! discovery is a collaborator concern, so a roster simply carries the list
//! of event columns its sheet declares (a season sheet may record only a
//! subset of the full program).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Course, Event, Swimmer, TimeEntry};
use crate::times::{self, ParseError};

/// The dataset is structurally broken. Fatal for a bulk run: no partial
/// output is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("duplicate event column {0}")]
    DuplicateColumn(Event),
    #[error("swimmer {swimmer:?} has a time for {event}, but the sheet has no such column")]
    UndeclaredColumn { swimmer: String, event: Event },
}

/// A single-record edit failed. Never aborts anything beyond the one edit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error(transparent)]
    InvalidTime(#[from] ParseError),
    #[error("no swimmer at index {0}")]
    NoSuchSwimmer(usize),
    #[error("sheet has no column for {0}")]
    NoSuchColumn(Event),
}

fn default_events() -> Vec<Event> {
    Event::ALL.to_vec()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    /// Season label, e.g. `"2025-2026"`. One sheet per season.
    pub season: String,
    /// Event columns present on this sheet, in declared order.
    #[serde(default = "default_events")]
    pub events: Vec<Event>,
    #[serde(default)]
    pub swimmers: Vec<Swimmer>,
}

impl Roster {
    /// A roster carrying the full event program.
    pub fn new(season: impl Into<String>) -> Self {
        Self::with_events(season, default_events())
    }

    pub fn with_events(season: impl Into<String>, events: Vec<Event>) -> Self {
        Self {
            season: season.into(),
            events,
            swimmers: Vec::new(),
        }
    }

    pub fn add_swimmer(&mut self, swimmer: Swimmer) {
        self.swimmers.push(swimmer);
    }

    pub fn remove_swimmer(&mut self, index: usize) -> Option<Swimmer> {
        if index < self.swimmers.len() {
            Some(self.swimmers.remove(index))
        } else {
            None
        }
    }

    pub fn swimmer(&self, index: usize) -> Option<&Swimmer> {
        self.swimmers.get(index)
    }

    pub fn entry(&self, index: usize, event: Event) -> Option<&TimeEntry> {
        self.swimmers.get(index)?.entries.get(&event)
    }

    /// Record a time for a swimmer. The text is validated and normalized
    /// before storage; empty text clears the cell instead.
    pub fn set_time(
        &mut self,
        index: usize,
        event: Event,
        time: &str,
        course: Course,
        date: Option<NaiveDate>,
    ) -> Result<(), EditError> {
        if !self.events.contains(&event) {
            return Err(EditError::NoSuchColumn(event));
        }
        let swimmer = self
            .swimmers
            .get_mut(index)
            .ok_or(EditError::NoSuchSwimmer(index))?;
        match times::parse(time)? {
            Some(_) => {
                swimmer.entries.insert(
                    event,
                    TimeEntry {
                        time: times::normalize(time),
                        course: course.label().to_string(),
                        date,
                    },
                );
            }
            None => {
                swimmer.entries.remove(&event);
            }
        }
        Ok(())
    }

    pub fn clear_time(&mut self, index: usize, event: Event) -> Result<(), EditError> {
        let swimmer = self
            .swimmers
            .get_mut(index)
            .ok_or(EditError::NoSuchSwimmer(index))?;
        swimmer.entries.remove(&event);
        Ok(())
    }

    /// Total present times across the whole sheet.
    pub fn total_times(&self) -> usize {
        self.swimmers.iter().map(Swimmer::times_recorded).sum()
    }

    /// Verify the sheet shape: no duplicate columns, and no recorded time
    /// referencing a column the sheet does not declare.
    pub fn check_integrity(&self) -> Result<(), StructuralError> {
        let mut seen = BTreeSet::new();
        for &event in &self.events {
            if !seen.insert(event) {
                return Err(StructuralError::DuplicateColumn(event));
            }
        }
        for swimmer in &self.swimmers {
            for &event in swimmer.entries.keys() {
                if !seen.contains(&event) {
                    return Err(StructuralError::UndeclaredColumn {
                        swimmer: swimmer.name.clone(),
                        event,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Distance, Sex, Style};

    fn event(style: Style, distance: Distance) -> Event {
        Event::new(style, distance).expect("valid event")
    }

    fn roster_with_one_swimmer() -> Roster {
        let mut roster = Roster::new("2025-2026");
        roster.add_swimmer(Swimmer::new("Ana", Sex::F, 2008));
        roster
    }

    #[test]
    fn set_time_normalizes_before_storage() {
        let mut roster = roster_with_one_swimmer();
        let ev = event(Style::Freestyle, Distance::M100);
        roster.set_time(0, ev, "83,45", Course::Short, None).unwrap();
        let entry = roster.entry(0, ev).unwrap();
        assert_eq!(entry.time, "01:23.45");
        assert_eq!(entry.course, "25m");
    }

    #[test]
    fn set_time_rejects_malformed_text() {
        let mut roster = roster_with_one_swimmer();
        let ev = event(Style::Freestyle, Distance::M100);
        let err = roster.set_time(0, ev, "fast", Course::Short, None).unwrap_err();
        assert!(matches!(err, EditError::InvalidTime(_)));
        assert!(roster.entry(0, ev).is_none());
    }

    #[test]
    fn empty_time_clears_the_cell() {
        let mut roster = roster_with_one_swimmer();
        let ev = event(Style::Freestyle, Distance::M100);
        roster.set_time(0, ev, "01:23.45", Course::Short, None).unwrap();
        roster.set_time(0, ev, "  ", Course::Short, None).unwrap();
        assert!(roster.entry(0, ev).is_none());
    }

    #[test]
    fn set_time_requires_a_declared_column() {
        let ev100 = event(Style::Freestyle, Distance::M100);
        let ev50 = event(Style::Backstroke, Distance::M50);
        let mut roster = Roster::with_events("2025-2026", vec![ev100]);
        roster.add_swimmer(Swimmer::new("Ana", Sex::F, 2008));
        let err = roster.set_time(0, ev50, "30.00", Course::Short, None).unwrap_err();
        assert_eq!(err, EditError::NoSuchColumn(ev50));
    }

    #[test]
    fn integrity_catches_undeclared_columns() {
        let ev100 = event(Style::Freestyle, Distance::M100);
        let ev50 = event(Style::Backstroke, Distance::M50);
        let mut roster = Roster::with_events("2025-2026", vec![ev100]);
        let mut swimmer = Swimmer::new("Ana", Sex::F, 2008);
        swimmer.entries.insert(
            ev50,
            TimeEntry { time: "30.00".into(), course: "25m".into(), date: None },
        );
        roster.add_swimmer(swimmer);
        assert!(matches!(
            roster.check_integrity(),
            Err(StructuralError::UndeclaredColumn { .. })
        ));
    }

    #[test]
    fn integrity_catches_duplicate_columns() {
        let ev = event(Style::Freestyle, Distance::M100);
        let roster = Roster::with_events("2025-2026", vec![ev, ev]);
        assert_eq!(
            roster.check_integrity(),
            Err(StructuralError::DuplicateColumn(ev))
        );
    }
}
