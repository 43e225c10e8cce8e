//! # storage-adapters
//!
//! Persistence adapters implementing the `domains` ports.

pub mod memory;

pub use memory::{MemoryDataContext, MemoryEntitySet};
