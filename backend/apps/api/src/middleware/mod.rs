//! Request pipeline middleware shared by every route

pub mod request_id;
pub mod security;
pub mod timeout;
pub mod timing;
