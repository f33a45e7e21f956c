use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Stroke styles recognized by the club sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Style {
    Freestyle,
    Backstroke,
    Breaststroke,
    Butterfly,
    Medley,
}

impl Style {
    pub const ALL: [Style; 5] = [
        Style::Freestyle,
        Style::Backstroke,
        Style::Breaststroke,
        Style::Butterfly,
        Style::Medley,
    ];

    pub fn from_name(name: &str) -> Option<Style> {
        Style::ALL
            .into_iter()
            .find(|s| name.eq_ignore_ascii_case(s.name()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Style::Freestyle => "Freestyle",
            Style::Backstroke => "Backstroke",
            Style::Breaststroke => "Breaststroke",
            Style::Butterfly => "Butterfly",
            Style::Medley => "Medley",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Race distances that appear on the sheets. Closed set; anything else is
/// not a column the club records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Distance {
    M50,
    M100,
    M200,
    M400,
    M800,
    M1500,
    M3000,
}

impl Distance {
    pub fn meters(&self) -> u32 {
        match self {
            Distance::M50 => 50,
            Distance::M100 => 100,
            Distance::M200 => 200,
            Distance::M400 => 400,
            Distance::M800 => 800,
            Distance::M1500 => 1500,
            Distance::M3000 => 3000,
        }
    }

    pub fn from_meters(meters: u32) -> Option<Distance> {
        match meters {
            50 => Some(Distance::M50),
            100 => Some(Distance::M100),
            200 => Some(Distance::M200),
            400 => Some(Distance::M400),
            800 => Some(Distance::M800),
            1500 => Some(Distance::M1500),
            3000 => Some(Distance::M3000),
            _ => None,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.meters())
    }
}

/// A swim event: stroke style plus distance. Events are static
/// configuration; the full program a sheet can carry is `Event::ALL`.
///
/// Derived ordering (style-major, then distance) matches the declared
/// column order of the sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Event {
    style: Style,
    distance: Distance,
}

impl Event {
    /// Every event the club records, in sheet column order.
    pub const ALL: [Event; 18] = [
        Event { style: Style::Freestyle, distance: Distance::M50 },
        Event { style: Style::Freestyle, distance: Distance::M100 },
        Event { style: Style::Freestyle, distance: Distance::M200 },
        Event { style: Style::Freestyle, distance: Distance::M400 },
        Event { style: Style::Freestyle, distance: Distance::M800 },
        Event { style: Style::Freestyle, distance: Distance::M1500 },
        Event { style: Style::Freestyle, distance: Distance::M3000 },
        Event { style: Style::Backstroke, distance: Distance::M50 },
        Event { style: Style::Backstroke, distance: Distance::M100 },
        Event { style: Style::Backstroke, distance: Distance::M200 },
        Event { style: Style::Breaststroke, distance: Distance::M50 },
        Event { style: Style::Breaststroke, distance: Distance::M100 },
        Event { style: Style::Breaststroke, distance: Distance::M200 },
        Event { style: Style::Butterfly, distance: Distance::M50 },
        Event { style: Style::Butterfly, distance: Distance::M100 },
        Event { style: Style::Butterfly, distance: Distance::M200 },
        Event { style: Style::Medley, distance: Distance::M100 },
        Event { style: Style::Medley, distance: Distance::M200 },
    ];

    /// Build an event, rejecting combinations the program does not swim
    /// (medley only exists over 100m and 200m).
    pub fn new(style: Style, distance: Distance) -> Option<Event> {
        match (style, distance) {
            (Style::Medley, Distance::M100 | Distance::M200) => Some(Event { style, distance }),
            (Style::Medley, _) => None,
            _ => Some(Event { style, distance }),
        }
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Column label as it appears on the sheets, e.g. `"100m Freestyle"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.distance, self.style)
    }

    /// Parse a sheet column label back into an event. Unknown labels are
    /// `None`; they never reach the conversion engine.
    pub fn from_label(label: &str) -> Option<Event> {
        let mut parts = label.split_whitespace();
        let distance = parts.next()?;
        let style = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        let meters: u32 = distance.strip_suffix('m').unwrap_or(distance).parse().ok()?;
        Event::new(Style::from_name(style)?, Distance::from_meters(meters)?)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.distance, self.style)
    }
}

// Events serialize as their column label so rosters read like the sheets
// they came from (and so they can key JSON maps).
impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelVisitor;

        impl de::Visitor<'_> for LabelVisitor {
            type Value = Event;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "an event label like \"100m Freestyle\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Event, E> {
                Event::from_label(v)
                    .ok_or_else(|| E::custom(format!("unknown event label {v:?}")))
            }
        }

        deserializer.deserialize_str(LabelVisitor)
    }
}
