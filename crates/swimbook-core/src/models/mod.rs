//! Data models for the club roster.
//!
//! This module contains the static event program and the roster entry
//! types:
//!
//! - `Style`, `Distance`, `Event`: the fixed event program
//! - `Course`: short course (25m) vs long course (50m)
//! - `Swimmer`, `TimeEntry`, `Sex`: roster entries and their recorded times

pub mod course;
pub mod event;
pub mod swimmer;

pub use course::Course;
pub use event::{Distance, Event, Style};
pub use swimmer::{Sex, Swimmer, TimeEntry};
