//! Cross-context message protocol for quickbar.
//!
//! This crate provides the message types and the bus that carries them
//! between the page context, the dispatcher and the top-frame overlay.
//!
//! # Architecture
//!
//! - [`protocol`]: `{subject, data}` message and reply types
//! - [`bus`]: routing table with one inbox per listening context
//! - [`client`]: per-context sender with an implicit identity
//! - [`error`]: error type for request/reply round trips
//!
//! # Example
//!
//! ```
//! use quickbar_rpc::{Message, MessageBus};
//! use quickbar_types::{MessageSender, TabInfo};
//!
//! let bus = MessageBus::new();
//! let _runtime = bus.listen_runtime();
//!
//! let page = bus.client(MessageSender::frame(TabInfo { id: 1, index: 0 }, 0));
//! assert!(page.send_message(Message::open_searchbar("a", "")));
//! ```

pub mod bus;
pub mod client;
pub mod error;
pub mod protocol;

pub use bus::{Envelope, MessageBus, ReplyHandle};
pub use client::RuntimeClient;
pub use error::{Error, Result};
pub use protocol::{
    Message, Reply, SUBJECT_GET_SEARCH_ENGINES, SUBJECT_OPEN_SEARCHBAR, SUBJECT_SEARCH,
};
