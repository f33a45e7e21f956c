//! swimbook-core - swim club roster models, time codec, and pool course
//! conversion.
//!
//! The crate is organized around three layers:
//!
//! - [`times`]: parse/format/validate/normalize swim time text, with all
//!   arithmetic in hundredths of a second
//! - [`convert`]: the offset-table conversion between short course (25m)
//!   and long course (50m)
//! - [`bulk`]: classify, preview and convert an entire roster without
//!   mutating the original
//!
//! [`models`] holds the static event program and roster entries, [`auth`]
//! the permission gate and user store, and [`session`] the explicit
//! application state that threads them together.

pub mod auth;
pub mod bulk;
pub mod convert;
pub mod models;
pub mod roster;
pub mod session;
pub mod times;

pub use auth::{Action, Role, UserStore};
pub use bulk::{Classification, Conversion, ConversionResultSet, ConversionRun};
pub use models::{Course, Distance, Event, Sex, Style, Swimmer, TimeEntry};
pub use roster::{EditError, Roster, StructuralError};
pub use session::{Session, SessionError};
pub use times::{ParseError, TimeValue};
