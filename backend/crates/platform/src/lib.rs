//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Client address resolution (peer address or `X-Forwarded-For`)
//! - Wall clock abstraction, with a manual clock for tests

pub mod client;
pub mod clock;
