//! # Bazaar User Store
//!
//! User persistence for the Bazaar API: the domain model, the
//! [`UserStore`] contract, and an in-memory backend. The server holds the
//! store as a trait object, so swapping in a database-backed
//! implementation is a wiring change, not an API change.

pub mod memory;
pub mod users;

pub use memory::MemoryUserStore;
pub use users::{normalize_email, Address, NewUser, Role, User, UserStore};
