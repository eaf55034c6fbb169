//! Domain Layer - Admission rules
//!
//! This layer contains:
//! - The per-client window entry (`RateLimitEntry`)
//! - Value objects (client key, window policy, quota snapshot, decision)
//! - The store trait (interface)

pub mod entities;
pub mod repository;
pub mod value_objects;
