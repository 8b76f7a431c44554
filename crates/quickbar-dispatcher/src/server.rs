//! Runtime inbox handling for the dispatcher.
//!
//! The dispatcher is stateless: every message is handled from its payload,
//! its sender and the current settings. Searches and provider lookups run as
//! independent tasks; activation relays are forwarded inline so that seeds
//! from rapid key presses keep their order.

use std::sync::Arc;

use quickbar_core::config::{SEARCH_TARGET_TAB, SettingsStore};
use quickbar_rpc::{Envelope, Message, MessageBus, Reply, ReplyHandle, SUBJECT_SEARCH};
use quickbar_types::{
    ActivationIntent, MessageSender, Placement, SearchRequest, TOP_FRAME_ID, TabId,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{DispatchError, Result};
use crate::host::{BrowserHost, SearchParams};
use crate::placement::{TabTarget, resolve_target};

/// Sender identity stamped on messages the dispatcher forwards.
const DISPATCHER_SENDER: MessageSender = MessageSender {
    tab: None,
    frame_id: TOP_FRAME_ID,
};

pub struct Dispatcher<H> {
    host: H,
    settings: Arc<dyn SettingsStore>,
    bus: MessageBus,
}

impl<H: BrowserHost> Dispatcher<H> {
    pub fn new(host: H, settings: Arc<dyn SettingsStore>, bus: MessageBus) -> Self {
        Self {
            host,
            settings,
            bus,
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Handle one message to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender has no tab where one is required, or if
    /// a host call fails. Nothing is retried.
    pub async fn handle(&self, envelope: Envelope) -> Result<()> {
        let (message, sender, reply) = envelope.into_parts();
        match message {
            Message::Search(request) => {
                self.handle_search(request, sender).await?;
                Ok(())
            }
            Message::GetSearchEngines => self.handle_get_search_engines(reply).await,
            Message::OpenSearchbar(intent) => {
                self.relay_activation(intent, sender);
                Ok(())
            }
        }
    }

    /// Resolve the destination tab and start the search.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender has no tab or a host call fails.
    pub async fn handle_search(&self, request: SearchRequest, sender: MessageSender) -> Result<TabId> {
        let origin = sender
            .tab
            .ok_or(DispatchError::MissingSender(SUBJECT_SEARCH))?;

        let placement =
            Placement::from_setting(self.settings.get(SEARCH_TARGET_TAB).as_deref());

        let tab_id = match resolve_target(placement, origin) {
            TabTarget::Existing(id) => id,
            TabTarget::New(properties) => self.host.create_tab(properties).await?,
        };

        info!(
            "Searching '{}' with {} in tab {} ({})",
            request.query, request.engine, tab_id, placement
        );

        self.host
            .search(SearchParams {
                query: request.query,
                engine: request.engine,
                tab_id,
            })
            .await?;

        Ok(tab_id)
    }

    async fn handle_get_search_engines(&self, reply: Option<ReplyHandle>) -> Result<()> {
        let providers = self.host.search_engines().await?;
        debug!("Replying with {} search engines", providers.len());

        match reply {
            Some(reply) => reply.send(Reply::SearchEngines(providers)),
            None => debug!("getSearchEngines sent without a reply channel"),
        }
        Ok(())
    }

    /// Forward an activation to the top frame of the sender's tab, never to
    /// sub-frames. Returns whether the top frame was listening.
    pub fn relay_activation(&self, intent: ActivationIntent, sender: MessageSender) -> bool {
        let Some(tab) = sender.tab else {
            warn!("openSearchbar without sender tab, dropping");
            return false;
        };

        debug!(
            "Relaying activation from frame {}:{} to top frame",
            tab.id, sender.frame_id
        );
        self.bus.send_to_frame(
            tab.id,
            TOP_FRAME_ID,
            Message::OpenSearchbar(intent),
            DISPATCHER_SENDER,
        )
    }

    /// Serve the runtime inbox until every sender is gone.
    pub async fn run(self, mut inbox: mpsc::UnboundedReceiver<Envelope>) {
        let this = Arc::new(self);
        info!("Dispatcher listening");

        while let Some(envelope) = inbox.recv().await {
            if matches!(envelope.message, Message::OpenSearchbar(_)) {
                if let Err(e) = this.handle(envelope).await {
                    error!("Failed to relay activation: {}", e);
                }
                continue;
            }

            let this = Arc::clone(&this);
            tokio::spawn(async move {
                let subject = envelope.message.subject();
                if let Err(e) = this.handle(envelope).await {
                    error!("Failed to handle '{}': {}", subject, e);
                }
            });
        }

        info!("Dispatcher stopped");
    }
}
