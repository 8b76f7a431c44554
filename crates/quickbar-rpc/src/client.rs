//! Per-context handle for talking to the dispatcher.

use std::future::Future;

use quickbar_types::{MessageSender, SearchProvider};
use tokio::sync::oneshot;

use crate::bus::{Envelope, MessageBus};
use crate::error::{Error, Result};
use crate::protocol::{Message, Reply, SUBJECT_GET_SEARCH_ENGINES};

/// Sends messages to the runtime listener on behalf of one context.
///
/// The sender identity is stamped on every envelope; receivers never trust a
/// self-reported origin.
#[derive(Clone)]
pub struct RuntimeClient {
    bus: MessageBus,
    sender: MessageSender,
}

impl RuntimeClient {
    pub(crate) fn new(bus: MessageBus, sender: MessageSender) -> Self {
        Self { bus, sender }
    }

    #[must_use]
    pub fn sender(&self) -> MessageSender {
        self.sender
    }

    /// Fire-and-forget send. Returns whether a listener accepted the message;
    /// callers are not expected to act on it.
    pub fn send_message(&self, message: Message) -> bool {
        self.bus.deliver_runtime(Envelope::new(message, self.sender))
    }

    /// Send a request immediately and return a future for its reply.
    ///
    /// The message leaves as soon as this is called, not when the future is
    /// first polled.
    pub fn request(&self, message: Message) -> impl Future<Output = Result<Reply>> + Send + 'static {
        let (tx, rx) = oneshot::channel();
        let delivered = self
            .bus
            .deliver_runtime(Envelope::with_reply(message, self.sender, tx));

        async move {
            if !delivered {
                return Err(Error::NoReceiver);
            }
            rx.await.map_err(|_| Error::Disconnected)
        }
    }

    /// Request the host's ordered provider list.
    pub fn get_search_engines(
        &self,
    ) -> impl Future<Output = Result<Vec<SearchProvider>>> + Send + 'static {
        let reply = self.request(Message::GetSearchEngines);
        async move {
            match reply.await? {
                Reply::SearchEngines(providers) => Ok(providers),
                #[allow(unreachable_patterns)]
                _ => Err(Error::UnexpectedReply(SUBJECT_GET_SEARCH_ENGINES)),
            }
        }
    }
}
