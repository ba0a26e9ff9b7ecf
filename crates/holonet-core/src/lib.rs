//! holonet-core: Shared types and error handling for the Holonet service.
//!
//! This crate provides the foundational types used across all Holonet crates:
//! - The `Character` entity and its partial-update form
//! - The fixed set of Character attribute names
//! - Untyped attribute values passed through to the graph verbatim
//! - The process-level error type

pub mod error;
pub mod types;

pub use error::HolonetError;
pub use types::{AttrValue, Character, CharacterField, CharacterPatch};
