//! Message protocol between the page, dispatcher and top-frame contexts.
//!
//! Every message is `{ "subject": ..., "data": ... }`. Messages are transient:
//! nothing is persisted, there is no id beyond the implicit sender, and there
//! is no acknowledgement or retry layer. Only `getSearchEngines` has a reply.

use serde::{Deserialize, Serialize};

use quickbar_types::{ActivationIntent, SearchProvider, SearchRequest};

pub const SUBJECT_SEARCH: &str = "search";
pub const SUBJECT_GET_SEARCH_ENGINES: &str = "getSearchEngines";
pub const SUBJECT_OPEN_SEARCHBAR: &str = "openSearchbar";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subject", content = "data", rename_all = "camelCase")]
pub enum Message {
    /// Overlay → dispatcher. Fire-and-forget.
    Search(SearchRequest),

    /// Overlay → dispatcher. Replied with [`Reply::SearchEngines`].
    GetSearchEngines,

    /// Page → dispatcher → top frame of the same tab. Fire-and-forget.
    OpenSearchbar(ActivationIntent),
}

impl Message {
    #[must_use]
    pub fn search(query: impl Into<String>, engine: impl Into<String>) -> Self {
        Self::Search(SearchRequest {
            query: query.into(),
            engine: engine.into(),
        })
    }

    #[must_use]
    pub fn open_searchbar(pressed_key: impl Into<String>, selected_text: impl Into<String>) -> Self {
        Self::OpenSearchbar(ActivationIntent {
            pressed_key: pressed_key.into(),
            selected_text: selected_text.into(),
        })
    }

    #[must_use]
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Search(_) => SUBJECT_SEARCH,
            Self::GetSearchEngines => SUBJECT_GET_SEARCH_ENGINES,
            Self::OpenSearchbar(_) => SUBJECT_OPEN_SEARCHBAR,
        }
    }
}

/// Response to a request message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subject", content = "data", rename_all = "camelCase")]
pub enum Reply {
    SearchEngines(Vec<SearchProvider>),
}
