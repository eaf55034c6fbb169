//! Presentation Layer
//!
//! HTTP middleware, headers and DTOs.

pub mod dto;
pub mod headers;
pub mod middleware;
