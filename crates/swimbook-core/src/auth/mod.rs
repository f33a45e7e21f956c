//! Roles, permissions and the user store.
//!
//! This module provides:
//! - `Role`, `Action`: the permission gate consulted before gated operations
//! - `UserStore`: named users with Argon2-hashed passwords
//!
//! Authentication mechanics (login flows, tokens, persistence of the user
//! store) are collaborator concerns and stay outside the core.

pub mod permissions;
pub mod users;

pub use permissions::{Action, Role};
pub use users::{AuthError, User, UserStore, PRIMARY_ADMIN};
