//! posthub/crates/domains/src/lib.rs
//!
//! The central domain logic and interface definitions for PostHub.
//! Nothing in here performs I/O; adapters implement the ports.

pub mod errors;
pub mod lookup;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;
