//! Memoized provider list for one controller instance.

use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use quickbar_rpc::RuntimeClient;
use quickbar_types::SearchProvider;
use tracing::{debug, warn};

pub type ProviderList = Arc<[SearchProvider]>;
pub type ProviderResult = Result<ProviderList, quickbar_rpc::Error>;

type PendingList = Shared<BoxFuture<'static, ProviderResult>>;

/// The provider list is requested once and never invalidated; every consumer
/// awaits the same shared future.
pub struct ProviderCache {
    pending: PendingList,
    resolved: Option<ProviderList>,
}

impl ProviderCache {
    /// Issue `getSearchEngines` now and cache the pending reply.
    pub fn request(client: &RuntimeClient) -> Self {
        debug!("Requesting search engines");
        let reply = client.get_search_engines();
        Self::from_future(async move { reply.await.map(ProviderList::from) })
    }

    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = ProviderResult> + Send + 'static,
    {
        Self {
            pending: future.boxed().shared(),
            resolved: None,
        }
    }

    /// A cache that is already resolved.
    pub fn ready(providers: impl Into<ProviderList>) -> Self {
        let providers = providers.into();
        let value = Arc::clone(&providers);
        let mut cache = Self::from_future(async move { Ok(value) });
        cache.resolved = Some(providers);
        cache
    }

    /// The shared lookup; clones resolve to the same value.
    #[must_use]
    pub fn shared(&self) -> PendingList {
        self.pending.clone()
    }

    #[must_use]
    pub fn get(&self) -> Option<&ProviderList> {
        self.resolved.as_ref()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Record the outcome of the lookup. A failed lookup resolves to an empty
    /// list; there is no retry.
    pub fn complete(&mut self, result: ProviderResult) -> ProviderList {
        let providers = result.unwrap_or_else(|e| {
            warn!("Failed to fetch search engines: {}", e);
            ProviderList::from(Vec::new())
        });
        debug!("Search engines resolved: {}", providers.len());
        self.resolved = Some(Arc::clone(&providers));
        providers
    }
}
