//! Domain layer for the chaos assault engine
//!
//! Contains the core vocabulary: call-site identity, watcher exclusions,
//! assault kinds, severity levels and per-call decisions. This layer has no
//! async, no I/O and no external collaborators; it defines the ubiquitous
//! language the rest of the workspace speaks.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
