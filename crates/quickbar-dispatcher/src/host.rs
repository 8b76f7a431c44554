//! Host browser facilities the dispatcher drives.
//!
//! These are thin I/O wrappers; the dispatcher owns no state of its own.

use std::future::Future;

use quickbar_types::{SearchProvider, TabId};

use crate::error::HostError;

/// Blank page loaded into tabs created for a search.
pub const BLANK_URL: &str = "about:blank";

/// Properties of a tab the dispatcher asks the host to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTab {
    pub opener_tab_id: TabId,
    pub url: String,
    /// Requested position; the host clamps it to the tab strip.
    pub index: u64,
}

/// A search the host should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub engine: String,
    pub tab_id: TabId,
}

pub trait BrowserHost: Send + Sync + 'static {
    /// Create a tab and return its id.
    fn create_tab(
        &self,
        properties: CreateTab,
    ) -> impl Future<Output = Result<TabId, HostError>> + Send;

    /// Run `query` with the named provider, showing results in `tab_id`.
    fn search(&self, params: SearchParams) -> impl Future<Output = Result<(), HostError>> + Send;

    /// The host's ordered provider list.
    fn search_engines(&self) -> impl Future<Output = Result<Vec<SearchProvider>, HostError>> + Send;
}
