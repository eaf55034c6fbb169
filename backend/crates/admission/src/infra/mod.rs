//! Infrastructure Layer
//!
//! Store implementations and background maintenance.

pub mod memory;
pub mod sweeper;
