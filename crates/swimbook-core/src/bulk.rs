//! Bulk conversion runner: classify, preview and convert an entire roster
//! towards one target course.
//!
//! The runner never mutates its input. A run clones the roster, writes the
//! converted times and course labels into the clone, and returns the clone
//! together with an immutable result set. Per-record problems (unknown
//! course labels, unparsable time text) are skip reasons aggregated into
//! the classification; only sheet-shape problems abort a run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::convert;
use crate::models::{Course, Event, TimeEntry};
use crate::roster::{Roster, StructuralError};
use crate::times::{self, TimeValue};

/// Preview cap used by the editing surfaces.
pub const PREVIEW_LIMIT: usize = 10;

/// How one stored time relates to the target course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Empty cell: no time present.
    Absent,
    /// Present and already recorded in the target course.
    AlreadyCorrect,
    /// Present, but the course label is unrecognized. Conservatively
    /// excluded: data whose source course is unknown is never converted.
    UnknownCourse,
    /// Present with a known differing course, but the time text does not
    /// parse. Skipped, never fatal.
    Unparsable,
    /// Present, parseable, and recorded in the other course.
    Convertible { time: TimeValue, course: Course },
}

/// Single source of truth for classify, preview and run.
pub fn entry_status(entry: Option<&TimeEntry>, target: Course) -> EntryStatus {
    let Some(entry) = entry else {
        return EntryStatus::Absent;
    };
    if !entry.is_present() {
        return EntryStatus::Absent;
    }
    let Some(course) = Course::from_label(&entry.course) else {
        return EntryStatus::UnknownCourse;
    };
    if course == target {
        return EntryStatus::AlreadyCorrect;
    }
    match times::parse(&entry.time) {
        Ok(Some(time)) => EntryStatus::Convertible { time, course },
        _ => EntryStatus::Unparsable,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub total_present: usize,
    pub convertible: usize,
    pub already_correct: usize,
    pub unknown_course: usize,
    pub unparsable: usize,
}

/// Count how every stored time relates to the target course.
pub fn classify(roster: &Roster, target: Course) -> Classification {
    let mut counts = Classification::default();
    for &event in &roster.events {
        for swimmer in &roster.swimmers {
            match entry_status(swimmer.entry(event), target) {
                EntryStatus::Absent => continue,
                EntryStatus::AlreadyCorrect => counts.already_correct += 1,
                EntryStatus::UnknownCourse => counts.unknown_course += 1,
                EntryStatus::Unparsable => counts.unparsable += 1,
                EntryStatus::Convertible { .. } => counts.convertible += 1,
            }
            counts.total_present += 1;
        }
    }
    counts
}

/// One converted time: what it was, where it was swum, what it becomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub swimmer: String,
    pub event: Event,
    pub original: TimeValue,
    #[serde(rename = "originalCourse")]
    pub original_course: Course,
    pub converted: TimeValue,
}

/// Immutable snapshot of one bulk-conversion run. A new run supersedes the
/// previous result set; they are never merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResultSet {
    pub target: Course,
    pub conversions: Vec<Conversion>,
    pub timestamp: DateTime<Utc>,
}

impl ConversionResultSet {
    pub fn converted_count(&self) -> usize {
        self.conversions.len()
    }
}

/// Output of a run: the result set plus the converted copy of the roster.
#[derive(Debug, Clone)]
pub struct ConversionRun {
    pub result: ConversionResultSet,
    pub roster: Roster,
}

fn conversion_for(swimmer: &str, event: Event, time: TimeValue, course: Course, target: Course) -> Conversion {
    Conversion {
        swimmer: swimmer.to_string(),
        event,
        original: time,
        original_course: course,
        converted: convert::convert(time, course, target, event.style(), event.distance()),
    }
}

/// Lazily walk the convertible times, capped at `limit`, without touching
/// the roster. Events in declared order, swimmers in sheet order. Call
/// again to restart.
pub fn preview(
    roster: &Roster,
    target: Course,
    limit: usize,
) -> impl Iterator<Item = Conversion> + '_ {
    roster
        .events
        .iter()
        .flat_map(move |&event| {
            roster.swimmers.iter().filter_map(move |swimmer| {
                match entry_status(swimmer.entry(event), target) {
                    EntryStatus::Convertible { time, course } => {
                        Some(conversion_for(&swimmer.name, event, time, course, target))
                    }
                    _ => None,
                }
            })
        })
        .take(limit)
}

/// Convert every convertible time into a copy of the roster.
pub fn run(roster: &Roster, target: Course) -> Result<ConversionRun, StructuralError> {
    run_with_progress(roster, target, |_, _| {})
}

/// As [`run`], reporting a monotonically increasing `(done, total)` count
/// after each conversion. Observability only; correctness does not depend
/// on the callback.
pub fn run_with_progress(
    roster: &Roster,
    target: Course,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<ConversionRun, StructuralError> {
    roster.check_integrity()?;
    let total = classify(roster, target).convertible;
    let mut converted = roster.clone();
    let mut conversions = Vec::with_capacity(total);

    for &event in &roster.events {
        for (index, swimmer) in roster.swimmers.iter().enumerate() {
            let EntryStatus::Convertible { time, course } =
                entry_status(swimmer.entry(event), target)
            else {
                continue;
            };
            let conversion = conversion_for(&swimmer.name, event, time, course, target);
            if let Some(entry) = converted.swimmers[index].entries.get_mut(&event) {
                entry.time = times::format(conversion.converted);
                entry.course = target.label().to_string();
            }
            debug!(
                swimmer = %conversion.swimmer,
                event = %conversion.event,
                original = %conversion.original,
                converted = %conversion.converted,
                "converted time"
            );
            conversions.push(conversion);
            on_progress(conversions.len(), total);
        }
    }

    info!(
        season = %roster.season,
        count = conversions.len(),
        target = %target,
        "bulk conversion complete"
    );
    Ok(ConversionRun {
        result: ConversionResultSet {
            target,
            conversions,
            timestamp: Utc::now(),
        },
        roster: converted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Distance, Sex, Style, Swimmer};

    fn event(style: Style, distance: Distance) -> Event {
        Event::new(style, distance).expect("valid event")
    }

    fn entry(time: &str, course: &str) -> TimeEntry {
        TimeEntry { time: time.into(), course: course.into(), date: None }
    }

    /// Three present times: one already long course, one with an unknown
    /// course label, one convertible.
    fn mixed_roster() -> Roster {
        let ev = event(Style::Freestyle, Distance::M100);
        let mut roster = Roster::new("2025-2026");

        let mut ana = Swimmer::new("Ana", Sex::F, 2008);
        ana.entries.insert(ev, entry("01:05.20", "25m"));
        roster.add_swimmer(ana);

        let mut bea = Swimmer::new("Bea", Sex::F, 2009);
        bea.entries.insert(ev, entry("01:07.00", "50m"));
        roster.add_swimmer(bea);

        let mut carla = Swimmer::new("Carla", Sex::F, 2007);
        carla.entries.insert(ev, entry("01:02.10", "open water"));
        roster.add_swimmer(carla);

        roster
    }

    #[test]
    fn classify_separates_skip_reasons() {
        let counts = classify(&mixed_roster(), Course::Long);
        assert_eq!(counts.total_present, 3);
        assert_eq!(counts.convertible, 1);
        assert_eq!(counts.already_correct, 1);
        assert_eq!(counts.unknown_course, 1);
        assert_eq!(counts.unparsable, 0);
    }

    #[test]
    fn unparsable_text_is_a_skip_reason() {
        let ev = event(Style::Freestyle, Distance::M100);
        let mut roster = mixed_roster();
        roster.swimmers[0].entries.insert(ev, entry("n/a", "25m"));
        let counts = classify(&roster, Course::Long);
        assert_eq!(counts.convertible, 0);
        assert_eq!(counts.unparsable, 1);
        assert_eq!(counts.total_present, 3);
    }

    #[test]
    fn preview_is_capped_and_restartable() {
        let ev = event(Style::Freestyle, Distance::M100);
        let mut roster = Roster::new("2025-2026");
        for i in 0..15 {
            let mut s = Swimmer::new(format!("Swimmer {i}"), Sex::M, 2008);
            s.entries.insert(ev, entry("01:00.00", "25m"));
            roster.add_swimmer(s);
        }
        assert_eq!(preview(&roster, Course::Long, PREVIEW_LIMIT).count(), 10);
        // Restartable: a fresh call walks from the start again
        let first: Vec<_> = preview(&roster, Course::Long, 3).collect();
        let again: Vec<_> = preview(&roster, Course::Long, 3).collect();
        assert_eq!(first, again);
        assert_eq!(first[0].swimmer, "Swimmer 0");
    }

    #[test]
    fn preview_lookahead_tells_a_full_page_from_a_truncated_one() {
        let ev = event(Style::Freestyle, Distance::M100);
        let mut roster = Roster::new("2025-2026");
        for i in 0..3 {
            let mut s = Swimmer::new(format!("Swimmer {i}"), Sex::M, 2008);
            s.entries.insert(ev, entry("01:00.00", "25m"));
            roster.add_swimmer(s);
        }
        // Exactly 3 convertible rows: asking for one extra yields no extra,
        // so a caller can tell a full page from a truncated one.
        assert_eq!(preview(&roster, Course::Long, 4).count(), 3);
        assert_eq!(preview(&roster, Course::Long, 3).count(), 3);
        assert_eq!(preview(&roster, Course::Long, 2).count(), 2);
    }

    #[test]
    fn preview_walks_events_in_declared_order() {
        let free100 = event(Style::Freestyle, Distance::M100);
        let back50 = event(Style::Backstroke, Distance::M50);
        let mut roster = Roster::new("2025-2026");
        let mut s = Swimmer::new("Ana", Sex::F, 2008);
        s.entries.insert(back50, entry("35.00", "25m"));
        s.entries.insert(free100, entry("01:05.20", "25m"));
        roster.add_swimmer(s);

        let rows: Vec<_> = preview(&roster, Course::Long, PREVIEW_LIMIT).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event, free100);
        assert_eq!(rows[1].event, back50);
    }

    #[test]
    fn run_converts_into_a_copy() {
        let ev = event(Style::Freestyle, Distance::M100);
        let roster = mixed_roster();
        let run = run(&roster, Course::Long).unwrap();

        assert_eq!(run.result.converted_count(), 1);
        assert_eq!(run.result.target, Course::Long);

        // Converted copy: Ana's 01:05.20 (25m) + 160 hundredths
        let converted = run.roster.entry(0, ev).unwrap();
        assert_eq!(converted.time, "01:06.80");
        assert_eq!(converted.course, "50m");

        // Already-correct and unknown-course cells are untouched
        assert_eq!(run.roster.entry(1, ev).unwrap().time, "01:07.00");
        assert_eq!(run.roster.entry(2, ev).unwrap().course, "open water");

        // Input roster is never mutated
        assert_eq!(roster.entry(0, ev).unwrap().time, "01:05.20");
        assert_eq!(roster.entry(0, ev).unwrap().course, "25m");
    }

    #[test]
    fn run_on_an_empty_roster_is_valid() {
        let roster = Roster::new("2025-2026");
        let run = run(&roster, Course::Short).unwrap();
        assert_eq!(run.result.converted_count(), 0);
        assert_eq!(run.roster, roster);
    }

    #[test]
    fn run_reports_monotonic_progress() {
        let ev = event(Style::Freestyle, Distance::M100);
        let mut roster = Roster::new("2025-2026");
        for i in 0..4 {
            let mut s = Swimmer::new(format!("Swimmer {i}"), Sex::M, 2008);
            s.entries.insert(ev, entry("01:00.00", "25m"));
            roster.add_swimmer(s);
        }
        let mut seen = Vec::new();
        run_with_progress(&roster, Course::Long, |done, total| seen.push((done, total))).unwrap();
        assert_eq!(seen, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    }

    #[test]
    fn structural_problems_abort_the_run() {
        let declared = event(Style::Freestyle, Distance::M100);
        let undeclared = event(Style::Backstroke, Distance::M50);
        let mut roster = Roster::with_events("2025-2026", vec![declared]);
        let mut s = Swimmer::new("Ana", Sex::F, 2008);
        s.entries.insert(undeclared, entry("35.00", "25m"));
        roster.add_swimmer(s);
        assert!(run(&roster, Course::Long).is_err());
    }
}
