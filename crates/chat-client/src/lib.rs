//! Chat platform REST client and messaging capability.

mod client;
mod error;
mod messenger;
mod receiver;
mod types;

pub use client::ChatClient;
pub use error::MessengerError;
pub use messenger::Messenger;
pub use receiver::EventReceiver;
pub use types::*;
