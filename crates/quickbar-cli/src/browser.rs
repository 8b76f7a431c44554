//! In-process browser used by `quickbar run`.

use std::sync::{Arc, Mutex, PoisonError};

use quickbar_dispatcher::{BrowserHost, CreateTab, HostError, SearchParams};
use quickbar_types::{SearchProvider, TabId, TabInfo};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

/// The tab the simulated page lives in.
pub const FIRST_TAB: TabInfo = TabInfo { id: 1, index: 0 };

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub index: u64,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opener: Option<TabId>,
}

/// A search the browser carried out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub query: String,
    pub engine: String,
    pub tab_id: TabId,
}

/// Providers used when no provider file is given.
#[must_use]
pub fn demo_providers() -> Vec<SearchProvider> {
    vec![
        SearchProvider::new("Google", "g")
            .with_icon("https://www.google.com/favicon.ico")
            .as_default(),
        SearchProvider::new("DuckDuckGo", "d").with_icon("https://duckduckgo.com/favicon.ico"),
        SearchProvider::new("Wikipedia", "w").with_icon("https://en.wikipedia.org/favicon.ico"),
        SearchProvider::new("Bookmarks", ""),
    ]
}

/// Results page address for a search.
#[must_use]
pub fn results_url(engine: &str, query: &str) -> String {
    format!("search://{}?q={}", engine.to_lowercase(), query.replace(' ', "+"))
}

struct Tabs {
    tabs: Vec<Tab>,
    next_id: TabId,
}

impl Tabs {
    fn reindex(&mut self) {
        for (index, tab) in (0u64..).zip(self.tabs.iter_mut()) {
            tab.index = index;
        }
    }
}

/// A one-window browser with an ordered tab strip.
#[derive(Clone)]
pub struct SimulatedBrowser {
    providers: Arc<Vec<SearchProvider>>,
    tabs: Arc<Mutex<Tabs>>,
    completed: mpsc::UnboundedSender<SearchRecord>,
}

impl SimulatedBrowser {
    /// Create a browser with one blank tab. Every completed search is also
    /// reported on the returned channel.
    pub fn new(providers: Vec<SearchProvider>) -> (Self, mpsc::UnboundedReceiver<SearchRecord>) {
        let (completed, rx) = mpsc::unbounded_channel();
        let first = Tab {
            id: FIRST_TAB.id,
            index: FIRST_TAB.index,
            url: "about:home".to_string(),
            opener: None,
        };
        let browser = Self {
            providers: Arc::new(providers),
            tabs: Arc::new(Mutex::new(Tabs {
                tabs: vec![first],
                next_id: FIRST_TAB.id + 1,
            })),
            completed,
        };
        (browser, rx)
    }

    #[must_use]
    pub fn tabs(&self) -> Vec<Tab> {
        self.tabs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tabs
            .clone()
    }
}

impl BrowserHost for SimulatedBrowser {
    async fn create_tab(&self, properties: CreateTab) -> Result<TabId, HostError> {
        let mut state = self.tabs.lock().unwrap_or_else(PoisonError::into_inner);

        let id = state.next_id;
        state.next_id += 1;

        let position = usize::try_from(properties.index)
            .unwrap_or(usize::MAX)
            .min(state.tabs.len());
        state.tabs.insert(
            position,
            Tab {
                id,
                index: 0,
                url: properties.url,
                opener: Some(properties.opener_tab_id),
            },
        );
        state.reindex();

        debug!("Created tab {} at {}", id, position);
        Ok(id)
    }

    async fn search(&self, params: SearchParams) -> Result<(), HostError> {
        if !self.providers.iter().any(|p| p.name == params.engine) {
            return Err(HostError::new(format!("unknown engine '{}'", params.engine)));
        }

        {
            let mut state = self.tabs.lock().unwrap_or_else(PoisonError::into_inner);
            let tab = state
                .tabs
                .iter_mut()
                .find(|t| t.id == params.tab_id)
                .ok_or_else(|| HostError::new(format!("no tab {}", params.tab_id)))?;
            tab.url = results_url(&params.engine, &params.query);
        }

        let _ = self.completed.send(SearchRecord {
            query: params.query,
            engine: params.engine,
            tab_id: params.tab_id,
        });
        Ok(())
    }

    async fn search_engines(&self) -> Result<Vec<SearchProvider>, HostError> {
        Ok(self.providers.as_ref().clone())
    }
}
