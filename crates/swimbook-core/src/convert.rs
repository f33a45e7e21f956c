//! Pool conversion engine.
//!
//! Converts times between short course (25m) and long course (50m) with the
//! club's empirical offset table: a per-style base increment scaled by a
//! per-distance multiplier, with fixed total overrides for 800m and 1500m.
//! The table is process-wide constant configuration and the enum keys make
//! every lookup exhaustive at compile time.

use tracing::warn;

use crate::models::{Course, Distance, Style};
use crate::times::TimeValue;

/// Base increment per stroke style, in hundredths of a second.
pub const fn base_increment(style: Style) -> i64 {
    match style {
        Style::Freestyle => 80,
        Style::Backstroke => 60,
        Style::Breaststroke => 100,
        Style::Butterfly => 70,
        Style::Medley => 80,
    }
}

/// Distance multiplier applied to the style's base increment.
pub const fn distance_multiplier(distance: Distance) -> i64 {
    match distance {
        Distance::M50 => 1,
        Distance::M100 => 2,
        Distance::M200 => 4,
        Distance::M400 => 8,
        Distance::M800 => 16,
        Distance::M1500 => 30,
        Distance::M3000 => 60,
    }
}

/// Fixed total offsets that override the multiplier rule.
const fn special_offset(distance: Distance) -> Option<i64> {
    match distance {
        Distance::M800 => Some(1280),
        Distance::M1500 => Some(2400),
        _ => None,
    }
}

/// Total course offset for an event, in hundredths of a second.
pub fn offset(style: Style, distance: Distance) -> i64 {
    match special_offset(distance) {
        Some(total) => total,
        None => base_increment(style) * distance_multiplier(distance),
    }
}

/// Convert a time between pool courses. Pure: same inputs, same output.
///
/// Equal courses are an exact no-op. Short-to-long adds the offset,
/// long-to-short subtracts it with no floor: a very short recorded time can
/// convert to a near-zero or negative value, which is an accepted
/// approximation of the empirical model, not an error. Callers should treat
/// such results as a data-quality signal.
pub fn convert(
    time: TimeValue,
    from: Course,
    to: Course,
    style: Style,
    distance: Distance,
) -> TimeValue {
    if from == to {
        return time;
    }
    let offset = offset(style, distance);
    let converted = match (from, to) {
        (Course::Short, Course::Long) => TimeValue::from_hundredths(time.hundredths() + offset),
        (Course::Long, Course::Short) => TimeValue::from_hundredths(time.hundredths() - offset),
        // Two courses exist, so this arm is unreachable after the equality
        // check; keep the original value rather than panic.
        _ => time,
    };
    if converted.hundredths() <= 0 {
        warn!(
            original = time.hundredths(),
            converted = converted.hundredths(),
            %style,
            %distance,
            "conversion produced a non-positive time"
        );
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Event;
    use crate::times;

    #[test]
    fn offset_scales_base_by_multiplier() {
        // Freestyle base 80, 100m multiplier 2
        assert_eq!(offset(Style::Freestyle, Distance::M100), 160);
        assert_eq!(offset(Style::Breaststroke, Distance::M200), 400);
        assert_eq!(offset(Style::Backstroke, Distance::M50), 60);
    }

    #[test]
    fn special_distances_override_the_multiplier() {
        // Same total for every style at 800m and 1500m
        for style in Style::ALL {
            assert_eq!(offset(style, Distance::M800), 1280);
            assert_eq!(offset(style, Distance::M1500), 2400);
        }
    }

    #[test]
    fn equal_courses_are_identity() {
        let t = TimeValue::from_hundredths(8345);
        assert_eq!(convert(t, Course::Short, Course::Short, Style::Medley, Distance::M200), t);
        assert_eq!(convert(t, Course::Long, Course::Long, Style::Freestyle, Distance::M50), t);
    }

    #[test]
    fn short_to_long_adds_the_offset() {
        let t = times::parse("01:00.00").unwrap().unwrap();
        let converted = convert(t, Course::Short, Course::Long, Style::Freestyle, Distance::M100);
        assert_eq!(times::format(converted), "01:01.60");
    }

    #[test]
    fn special_override_applies_regardless_of_style() {
        let t = times::parse("09:00.00").unwrap().unwrap();
        for style in [Style::Freestyle, Style::Breaststroke] {
            let converted = convert(t, Course::Short, Course::Long, style, Distance::M800);
            assert_eq!(times::format(converted), "09:12.80");
        }
    }

    #[test]
    fn round_trips_across_the_course_boundary() {
        let t = TimeValue::from_hundredths(12_000);
        for event in Event::ALL {
            let there = convert(t, Course::Short, Course::Long, event.style(), event.distance());
            let back = convert(there, Course::Long, Course::Short, event.style(), event.distance());
            assert_eq!(back, t, "event={event}");
        }
    }

    #[test]
    fn long_to_short_has_no_floor() {
        let t = TimeValue::from_hundredths(50);
        let converted = convert(t, Course::Long, Course::Short, Style::Freestyle, Distance::M50);
        assert_eq!(converted.hundredths(), -30);
    }
}
