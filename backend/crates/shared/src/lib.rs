//! Shared Kernel
//!
//! Vocabulary shared by every crate in the workspace:
//! - Unified error type ([`error::app_error::AppError`]) and its HTTP mapping
//! - Typed identifiers (request IDs)
//!
//! Only things whose meaning is the same in every context belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
