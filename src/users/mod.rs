//! User registry module.
//!
//! This module handles:
//! - User record types and their public projection
//! - The lock-guarded in-memory registry and its uniqueness rules

pub mod registry;
pub mod types;

pub use registry::{parse_id, UserRegistry};
pub use types::{DeletedUser, NewUser, PublicUser, UserPatch, UserRecord, DEFAULT_ROLE};
