//! Application Layer - Use Cases
//!
//! Orchestrates the domain rules against a store.

pub mod check_and_admit;
pub mod config;
