//! The privileged, page-independent quickbar dispatcher.
//!
//! One instance serves the whole extension. It routes activations from page
//! contexts to the top frame of the same tab, answers provider-list requests,
//! and runs searches in a tab chosen by the `searchTargetTab` setting.

pub mod error;
pub mod host;
pub mod placement;
pub mod server;

pub use error::{DispatchError, HostError, Result};
pub use host::{BLANK_URL, BrowserHost, CreateTab, SearchParams};
pub use placement::{TabTarget, resolve_target};
pub use server::Dispatcher;
