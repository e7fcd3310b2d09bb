//! # Authentication Module
//!
//! Authentication handlers and session establishment.

pub mod handlers;
pub mod session;
pub mod users;
