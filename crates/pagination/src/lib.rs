//! Reaction-driven pagination over search results.
//!
//! A [`ResultProducer`] turns a query into candidate descriptors. The
//! [`PaginationEngine`] validates candidates lazily as the user pages
//! through them, the [`ReactionRouter`] maps reaction events onto page
//! turns, and the [`ExpiryReaper`] evicts sessions that went idle.

mod config;
mod engine;
mod error;
mod producer;
mod reaper;
mod registry;
mod router;

#[cfg(test)]
mod testing;

pub use config::{Glyphs, PaginationConfig, ReaperConfig};
pub use engine::{PaginationEngine, SearchRequest, Turn};
pub use error::{PaginationError, ProducerError};
pub use producer::{truncate_description, RenderableResult, ResultProducer, MAX_DESCRIPTION_CHARS};
pub use reaper::ExpiryReaper;
pub use registry::ProducerRegistry;
pub use router::{Command, IgnoreReason, ReactionRouter, Route};
pub use session_store::{
    Direction, Initiator, InitiatorMatch, ResultDescriptor, Session, SessionStore,
};
