//! In-process message bus connecting isolated contexts.
//!
//! Contexts never share state: each one owns an inbox (an unbounded mpsc
//! receiver) and messages move between them as owned values. Delivery is
//! at-most-once. A send to a context that is not (or no longer) listening is
//! dropped and only logged at `debug`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use quickbar_types::{FrameId, MessageSender, TabId, TabInfo};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use crate::client::RuntimeClient;
use crate::protocol::{Message, Reply};

/// A message in flight together with its implicit origin.
#[derive(Debug)]
pub struct Envelope {
    pub message: Message,
    pub sender: MessageSender,
    reply: Option<ReplyHandle>,
}

impl Envelope {
    #[must_use]
    pub fn new(message: Message, sender: MessageSender) -> Self {
        Self {
            message,
            sender,
            reply: None,
        }
    }

    pub(crate) fn with_reply(
        message: Message,
        sender: MessageSender,
        reply: oneshot::Sender<Reply>,
    ) -> Self {
        Self {
            message,
            sender,
            reply: Some(ReplyHandle(reply)),
        }
    }

    /// Split the envelope so the reply handle can outlive the borrowed message.
    #[must_use]
    pub fn into_parts(self) -> (Message, MessageSender, Option<ReplyHandle>) {
        (self.message, self.sender, self.reply)
    }
}

/// One-shot responder for a request message.
#[derive(Debug)]
pub struct ReplyHandle(oneshot::Sender<Reply>);

impl ReplyHandle {
    /// Send the reply. A requester that has gone away is not an error.
    pub fn send(self, reply: Reply) {
        if self.0.send(reply).is_err() {
            debug!("Requester dropped before reply was delivered");
        }
    }
}

type Inbox = mpsc::UnboundedSender<Envelope>;

#[derive(Default)]
struct Routes {
    runtime: Option<Inbox>,
    frames: HashMap<(TabId, FrameId), Inbox>,
}

/// Shared routing table. Cloning is cheap and yields a handle to the same bus.
#[derive(Clone, Default)]
pub struct MessageBus {
    routes: Arc<Mutex<Routes>>,
}

impl MessageBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn routes(&self) -> MutexGuard<'_, Routes> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register the privileged, page-independent listener. Replaces any
    /// previous listener.
    pub fn listen_runtime(&self) -> mpsc::UnboundedReceiver<Envelope> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.routes().runtime = Some(tx);
        rx
    }

    /// Register a frame context and return its client plus inbox.
    pub fn connect_frame(
        &self,
        tab: TabInfo,
        frame_id: FrameId,
    ) -> (RuntimeClient, mpsc::UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.routes().frames.insert((tab.id, frame_id), tx);
        debug!("Frame {}:{} connected", tab.id, frame_id);
        let client = RuntimeClient::new(self.clone(), MessageSender::frame(tab, frame_id));
        (client, rx)
    }

    /// Client for a frame that only sends (it never receives tab messages).
    #[must_use]
    pub fn client(&self, sender: MessageSender) -> RuntimeClient {
        RuntimeClient::new(self.clone(), sender)
    }

    /// Deliver to a single frame of a tab. Returns whether a live inbox took it.
    pub fn send_to_frame(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
        message: Message,
        sender: MessageSender,
    ) -> bool {
        let Some(inbox) = self.routes().frames.get(&(tab_id, frame_id)).cloned() else {
            debug!(
                "No listener in frame {}:{}, dropping '{}'",
                tab_id,
                frame_id,
                message.subject()
            );
            return false;
        };
        trace!("-> frame {}:{} '{}'", tab_id, frame_id, message.subject());
        inbox.send(Envelope::new(message, sender)).is_ok()
    }

    pub(crate) fn deliver_runtime(&self, envelope: Envelope) -> bool {
        let Some(inbox) = self.routes().runtime.clone() else {
            debug!(
                "No runtime listener, dropping '{}'",
                envelope.message.subject()
            );
            return false;
        };
        trace!("-> runtime '{}'", envelope.message.subject());
        inbox.send(envelope).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB: TabInfo = TabInfo { id: 7, index: 2 };

    #[tokio::test]
    async fn test_frame_delivery() {
        let bus = MessageBus::new();
        let (_client, mut inbox) = bus.connect_frame(TAB, 0);

        let origin = MessageSender::frame(TAB, 3);
        assert!(bus.send_to_frame(7, 0, Message::open_searchbar("a", ""), origin));

        let envelope = inbox.recv().await.unwrap();
        assert_eq!(envelope.message, Message::open_searchbar("a", ""));
        assert_eq!(envelope.sender.frame_id, 3);
        assert!(envelope.into_parts().2.is_none());
    }

    #[test]
    fn test_send_to_missing_frame_is_dropped() {
        let bus = MessageBus::new();
        let (_client, _inbox) = bus.connect_frame(TAB, 0);

        let origin = MessageSender::frame(TAB, 0);
        assert!(!bus.send_to_frame(7, 1, Message::GetSearchEngines, origin));
        assert!(!bus.send_to_frame(8, 0, Message::GetSearchEngines, origin));
    }

    #[test]
    fn test_closed_inbox_reports_not_connected() {
        let bus = MessageBus::new();
        let (_client, inbox) = bus.connect_frame(TAB, 0);
        drop(inbox);
        assert!(!bus.send_to_frame(7, 0, Message::GetSearchEngines, MessageSender::frame(TAB, 0)));
    }

    #[tokio::test]
    async fn test_reply_handle_survives_dropped_requester() {
        let (tx, rx) = oneshot::channel();
        drop(rx);
        let envelope =
            Envelope::with_reply(Message::GetSearchEngines, MessageSender::frame(TAB, 0), tx);
        let (_, _, reply) = envelope.into_parts();
        reply.unwrap().send(Reply::SearchEngines(Vec::new()));
    }
}
