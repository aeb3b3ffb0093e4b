//! Structured observation extraction from recognized report text.
//!
//! Pure and synchronous: the catalog and patterns are read-only statics,
//! and every input yields a well-formed observation.

pub mod catalog;
pub mod classify;
pub mod dates;
pub mod entities;
pub mod matcher;
pub mod orchestrator;

pub use catalog::*;
pub use classify::*;
pub use dates::*;
pub use entities::*;
pub use matcher::*;
pub use orchestrator::*;
