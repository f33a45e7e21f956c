//! Explicit application state, threaded through calls.
//!
//! A session holds who is working, the loaded roster, and the result of the
//! last bulk conversion. Gated operations consult the role's permissions
//! first; the roster itself stays a plain value, so callers that need the
//! untouched original simply keep their copy.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::auth::{Action, Role};
use crate::bulk::{self, Classification, Conversion, ConversionResultSet, ConversionRun};
use crate::models::{Course, Event, Sex, Swimmer};
use crate::roster::{EditError, Roster, StructuralError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("role {role} is not allowed to {action}")]
    Forbidden { role: Role, action: Action },
    #[error("no roster loaded")]
    NoRoster,
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
    pub role: Role,
    roster: Option<Roster>,
    converted: Option<Roster>,
    last_conversion: Option<ConversionResultSet>,
}

impl Session {
    pub fn new(user: impl Into<String>, role: Role) -> Self {
        Self {
            user: user.into(),
            role,
            roster: None,
            converted: None,
            last_conversion: None,
        }
    }

    fn require(&self, action: Action) -> Result<(), SessionError> {
        if self.role.is_allowed(action) {
            Ok(())
        } else {
            Err(SessionError::Forbidden { role: self.role, action })
        }
    }

    fn roster_ref(&self) -> Result<&Roster, SessionError> {
        self.roster.as_ref().ok_or(SessionError::NoRoster)
    }

    fn roster_mut(&mut self) -> Result<&mut Roster, SessionError> {
        self.roster.as_mut().ok_or(SessionError::NoRoster)
    }

    /// Load a season sheet. Replaces any previously loaded roster and
    /// drops stale conversion output.
    pub fn load_roster(&mut self, roster: Roster) {
        info!(season = %roster.season, swimmers = roster.swimmers.len(), "roster loaded");
        self.roster = Some(roster);
        self.converted = None;
        self.last_conversion = None;
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    /// The converted copy produced by the last run, if any.
    pub fn converted_roster(&self) -> Option<&Roster> {
        self.converted.as_ref()
    }

    pub fn last_conversion(&self) -> Option<&ConversionResultSet> {
        self.last_conversion.as_ref()
    }

    pub fn add_swimmer(&mut self, swimmer: Swimmer) -> Result<(), SessionError> {
        self.require(Action::Edit)?;
        self.roster_mut()?.add_swimmer(swimmer);
        Ok(())
    }

    pub fn edit_swimmer(
        &mut self,
        index: usize,
        name: &str,
        sex: Sex,
        birth_year: i32,
        available: bool,
    ) -> Result<(), SessionError> {
        self.require(Action::Edit)?;
        let roster = self.roster_mut()?;
        let swimmer = roster
            .swimmers
            .get_mut(index)
            .ok_or(EditError::NoSuchSwimmer(index))?;
        swimmer.name = name.to_string();
        swimmer.sex = sex;
        swimmer.birth_year = birth_year;
        swimmer.available = available;
        Ok(())
    }

    pub fn remove_swimmer(&mut self, index: usize) -> Result<Swimmer, SessionError> {
        self.require(Action::Delete)?;
        let roster = self.roster_mut()?;
        roster
            .remove_swimmer(index)
            .ok_or_else(|| EditError::NoSuchSwimmer(index).into())
    }

    /// Record a time; the text is validated before it reaches the sheet.
    pub fn record_time(
        &mut self,
        index: usize,
        event: Event,
        time: &str,
        course: Course,
        date: Option<NaiveDate>,
    ) -> Result<(), SessionError> {
        self.require(Action::Edit)?;
        self.roster_mut()?.set_time(index, event, time, course, date)?;
        Ok(())
    }

    pub fn clear_time(&mut self, index: usize, event: Event) -> Result<(), SessionError> {
        self.require(Action::Edit)?;
        self.roster_mut()?.clear_time(index, event)?;
        Ok(())
    }

    pub fn classify(&self, target: Course) -> Result<Classification, SessionError> {
        Ok(bulk::classify(self.roster_ref()?, target))
    }

    pub fn preview(&self, target: Course, limit: usize) -> Result<Vec<Conversion>, SessionError> {
        Ok(bulk::preview(self.roster_ref()?, target, limit).collect())
    }

    /// Run the bulk conversion. The loaded roster is left untouched; the
    /// converted copy and result set replace whatever the previous run
    /// produced.
    pub fn convert_all(&mut self, target: Course) -> Result<&ConversionResultSet, SessionError> {
        self.convert_all_with_progress(target, |_, _| {})
    }

    pub fn convert_all_with_progress(
        &mut self,
        target: Course,
        on_progress: impl FnMut(usize, usize),
    ) -> Result<&ConversionResultSet, SessionError> {
        self.require(Action::Convert)?;
        let roster = self.roster_ref()?;
        let ConversionRun { result, roster: converted } =
            bulk::run_with_progress(roster, target, on_progress)?;
        self.converted = Some(converted);
        Ok(self.last_conversion.insert(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Distance, Style, TimeEntry};

    fn event(style: Style, distance: Distance) -> Event {
        Event::new(style, distance).expect("valid event")
    }

    fn loaded_session(role: Role) -> Session {
        let mut roster = Roster::new("2025-2026");
        let mut ana = Swimmer::new("Ana", Sex::F, 2008);
        ana.entries.insert(
            event(Style::Freestyle, Distance::M100),
            TimeEntry { time: "01:05.20".into(), course: "25m".into(), date: None },
        );
        roster.add_swimmer(ana);
        let mut session = Session::new("test", role);
        session.load_roster(roster);
        session
    }

    #[test]
    fn assistant_cannot_convert() {
        let mut session = loaded_session(Role::Assistant);
        assert!(matches!(
            session.convert_all(Course::Long),
            Err(SessionError::Forbidden { action: Action::Convert, .. })
        ));
    }

    #[test]
    fn coach_cannot_delete() {
        let mut session = loaded_session(Role::Coach);
        assert!(matches!(
            session.remove_swimmer(0),
            Err(SessionError::Forbidden { action: Action::Delete, .. })
        ));
    }

    #[test]
    fn convert_needs_a_roster() {
        let mut session = Session::new("test", Role::Admin);
        assert!(matches!(session.convert_all(Course::Long), Err(SessionError::NoRoster)));
    }

    #[test]
    fn convert_keeps_the_original_and_stores_the_copy() {
        let ev = event(Style::Freestyle, Distance::M100);
        let mut session = loaded_session(Role::Coach);
        let count = session.convert_all(Course::Long).unwrap().converted_count();
        assert_eq!(count, 1);

        let original = session.roster().unwrap().entry(0, ev).unwrap();
        assert_eq!(original.time, "01:05.20");
        let converted = session.converted_roster().unwrap().entry(0, ev).unwrap();
        assert_eq!(converted.time, "01:06.80");
    }

    #[test]
    fn a_new_run_supersedes_the_last_result() {
        let mut session = loaded_session(Role::Admin);
        session.convert_all(Course::Long).unwrap();
        let first = session.last_conversion().unwrap().clone();
        // Converting the other way finds nothing: the loaded roster is
        // still in short course and matches the short target.
        session.convert_all(Course::Short).unwrap();
        let second = session.last_conversion().unwrap();
        assert_eq!(second.converted_count(), 0);
        assert_ne!(first.target, second.target);
    }

    #[test]
    fn record_time_is_gated_and_validated() {
        let ev = event(Style::Backstroke, Distance::M50);
        let mut session = loaded_session(Role::Assistant);
        assert!(matches!(
            session.record_time(0, ev, "35.00", Course::Short, None),
            Err(SessionError::Forbidden { .. })
        ));

        let mut session = loaded_session(Role::Coach);
        session.record_time(0, ev, "35,00", Course::Short, None).unwrap();
        assert_eq!(session.roster().unwrap().entry(0, ev).unwrap().time, "00:35.00");
        assert!(session.record_time(0, ev, "not a time", Course::Short, None).is_err());
    }
}
