//! Reaction-paginated search bot.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod notifier;

#[cfg(test)]
mod testing;
