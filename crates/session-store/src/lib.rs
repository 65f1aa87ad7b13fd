//! In-memory storage for paginated search sessions.
//!
//! Sessions live only in process memory and are keyed by the id of the
//! message the bot rendered for them. Nothing is persisted.

mod store;
mod types;

pub use store::SessionStore;
pub use types::*;
