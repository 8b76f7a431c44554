//! Top-frame overlay controller.
//!
//! Owns the overlay state machine. Activations arrive from the dispatcher,
//! UI events from the surface; anything that needs the provider list is
//! queued until the list resolves and then applied in arrival order.

use std::collections::VecDeque;

use quickbar_rpc::{Envelope, Message, RuntimeClient};
use quickbar_types::{ActivationIntent, SearchProvider, default_provider_index};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::providers::{ProviderCache, ProviderResult};
use crate::state::{OverlayState, Phase};
use crate::surface::{FormAnimation, Opacity, OverlayHost, SurfaceEvent};

/// Work that needs the provider list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Reveal,
    Cycle(i32),
    MatchKeyword,
    Submit,
}

/// Signed number of slots from `from` to `to`.
fn step_between(from: usize, to: usize) -> i32 {
    let distance = i32::try_from(from.abs_diff(to)).unwrap_or(i32::MAX);
    if to >= from { distance } else { -distance }
}

/// Submit, wheel and the overlay's own keys never reach the page, even
/// while the overlay is loading or fading out.
fn prevents_default(event: &SurfaceEvent) -> bool {
    match event {
        SurfaceEvent::Submit | SurfaceEvent::Wheel { .. } => true,
        SurfaceEvent::KeyDown { key } => matches!(key.as_str(), "Escape" | "ArrowUp" | "ArrowDown"),
        _ => false,
    }
}

pub struct OverlayController<H> {
    host: H,
    client: RuntimeClient,
    providers: ProviderCache,
    state: OverlayState,
    deferred: VecDeque<Deferred>,
}

impl<H: OverlayHost> OverlayController<H> {
    /// Create a controller and request the provider list right away.
    pub fn new(host: H, client: RuntimeClient) -> Self {
        let providers = ProviderCache::request(&client);
        Self::with_providers(host, client, providers)
    }

    pub fn with_providers(host: H, client: RuntimeClient, providers: ProviderCache) -> Self {
        Self {
            host,
            client,
            providers,
            state: OverlayState::default(),
            deferred: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn active_provider(&self) -> Option<&SearchProvider> {
        let index = self.state.active_index?;
        self.providers.get()?.get(index)
    }

    /// Number of actions waiting for the provider list.
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.deferred.len()
    }

    pub fn handle_message(&mut self, message: Message) {
        match message {
            Message::OpenSearchbar(intent) => self.on_activation(intent),
            other => debug!("Ignoring '{}' in top frame", other.subject()),
        }
    }

    /// Open the overlay, or buffer the seed if a surface is already attached.
    pub fn on_activation(&mut self, intent: ActivationIntent) {
        if self.host.is_surface_attached() {
            debug!(
                "Overlay already attached ({}), buffering {:?}",
                self.state.phase, intent.pressed_key
            );
            self.state.pressed_key.push_str(&intent.pressed_key);
            return;
        }

        info!("Opening overlay");
        self.state.pressed_key = intent.pressed_key;
        self.state.selected_text = intent.selected_text;
        self.state.phase = Phase::Loading;
        self.host.attach_surface();
    }

    /// Apply one surface event. Returns whether its default action must be
    /// prevented, which depends only on the event and not on the phase.
    pub fn handle_surface_event(&mut self, event: &SurfaceEvent) -> bool {
        match event {
            SurfaceEvent::Loaded => self.on_surface_loaded(),
            SurfaceEvent::OverlayTransitionEnd { property } => {
                self.on_overlay_transition_end(property);
            }
            _ if self.state.phase != Phase::Open => {
                debug!("Ignoring {:?} while {}", event, self.state.phase);
            }
            SurfaceEvent::Input => self.defer(Deferred::MatchKeyword),
            SurfaceEvent::Submit => self.defer(Deferred::Submit),
            SurfaceEvent::KeyDown { key } => self.on_keydown(key),
            SurfaceEvent::Wheel { delta_y } => {
                let step = if *delta_y > 0.0 { -1 } else { 1 };
                self.defer(Deferred::Cycle(step));
            }
            SurfaceEvent::FocusOut { within_form } => {
                if !*within_form && self.host.has_document() {
                    debug!("Focus left the search form");
                    self.terminate();
                }
            }
            SurfaceEvent::CarouselTransitionEnd => {
                if self.host.has_document() {
                    self.state.carousel.settle();
                    self.render_carousel();
                }
            }
        }
        prevents_default(event)
    }

    fn on_surface_loaded(&mut self) {
        if self.state.phase != Phase::Loading {
            debug!("Surface load while {}, ignoring", self.state.phase);
            return;
        }

        let input = self.state.initial_input();
        let caret = self.state.seed_caret();
        let Some(doc) = self.host.document() else {
            debug!("Surface loaded without a document");
            return;
        };
        doc.set_input_value(&input);
        doc.focus_window();
        doc.focus_input();
        doc.set_caret(caret);

        self.state.phase = Phase::Open;
        info!("Overlay open");
        self.defer(Deferred::Reveal);
    }

    fn on_keydown(&mut self, key: &str) {
        match key {
            "Escape" => self.terminate(),
            "ArrowUp" => self.defer(Deferred::Cycle(1)),
            "ArrowDown" => self.defer(Deferred::Cycle(-1)),
            _ => {}
        }
    }

    fn on_overlay_transition_end(&mut self, property: &str) {
        if property != "opacity" || self.host.overlay_opacity() != Opacity::Transparent {
            return;
        }
        if self.state.phase != Phase::Closing {
            debug!("Fade-out ended while {}, ignoring", self.state.phase);
            return;
        }
        self.finish_close();
    }

    /// Start closing the overlay. Safe to call in any phase.
    pub fn terminate(&mut self) {
        if matches!(self.state.phase, Phase::Closed | Phase::Closing) {
            debug!("Terminate while {}, nothing to do", self.state.phase);
            return;
        }

        info!("Closing overlay");
        if let Some(doc) = self.host.document() {
            doc.set_form_animation(FormAnimation::SlideOut);
        }
        self.host.set_overlay_opacity(Opacity::Transparent);

        if self.host.is_overlay_transparent() {
            self.finish_close();
        } else {
            self.state.phase = Phase::Closing;
        }
    }

    fn finish_close(&mut self) {
        self.host.remove_surface();
        self.state.reset();
        self.deferred.clear();
        info!("Overlay closed");
    }

    /// Record the provider list and run every queued action in order.
    pub fn on_providers(&mut self, result: ProviderResult) {
        let providers = self.providers.complete(result);
        while let Some(action) = self.deferred.pop_front() {
            self.apply(action, &providers);
        }
    }

    /// Wait for the provider lookup if it is still pending, then apply the
    /// queued actions.
    pub async fn resolve_providers(&mut self) {
        if self.providers.is_resolved() {
            return;
        }
        let result = self.providers.shared().await;
        self.on_providers(result);
    }

    fn defer(&mut self, action: Deferred) {
        match self.providers.get().cloned() {
            Some(providers) => self.apply(action, &providers),
            None => {
                debug!("Queueing {:?} until search engines resolve", action);
                self.deferred.push_back(action);
            }
        }
    }

    fn apply(&mut self, action: Deferred, providers: &[SearchProvider]) {
        if !self.state.phase.is_live() || !self.host.has_document() {
            debug!("Dropping {:?}, overlay is {}", action, self.state.phase);
            return;
        }

        match action {
            Deferred::Reveal => self.reveal(providers),
            Deferred::Cycle(step) => self.cycle(step, providers),
            Deferred::MatchKeyword => self.match_keyword(providers),
            Deferred::Submit => self.submit(providers),
        }
    }

    fn reveal(&mut self, providers: &[SearchProvider]) {
        if providers.is_empty() {
            warn!("No search engines available, closing overlay");
            self.terminate();
            return;
        }

        let index = default_provider_index(providers).unwrap_or(0);
        self.state.active_index = Some(index);
        self.state.carousel.show(index, &providers[index].fav_icon_url);
        self.render_carousel();

        if let Some(doc) = self.host.document() {
            doc.set_form_animation(FormAnimation::SlideIn);
        }
        self.host.set_overlay_opacity(Opacity::Opaque);
        debug!("Revealed with '{}'", providers[index].name);
    }

    fn cycle(&mut self, step: i32, providers: &[SearchProvider]) {
        let Some(mut index) = self.state.active_index else {
            return;
        };
        self.state.carousel.cycle(step, &mut index, providers);
        self.state.active_index = Some(index);
        self.render_carousel();
        debug!("Cycled {} to index {}", step, index);
    }

    fn match_keyword(&mut self, providers: &[SearchProvider]) {
        let Some(active_name) = self
            .state
            .active_index
            .and_then(|i| providers.get(i))
            .map(|p| p.name.as_str())
        else {
            return;
        };
        let Some(doc) = self.host.document() else {
            return;
        };

        let mut value = doc.input_value();
        let mut switched = false;

        for (index, provider) in providers.iter().enumerate() {
            let Some(prefix) = provider.keyword_prefix() else {
                continue;
            };
            if provider.name == active_name || !value.starts_with(&prefix) {
                continue;
            }

            let Some(mut current) = self.state.active_index else {
                break;
            };
            self.state
                .carousel
                .cycle(step_between(current, index), &mut current, providers);
            self.state.active_index = Some(current);

            value = value[prefix.len()..].to_string();
            doc.set_input_value(&value);
            doc.set_caret(0);
            switched = true;
            info!("Switched to '{}' by keyword", provider.name);
        }

        if switched {
            doc.render_carousel(&self.state.carousel.view());
        }
    }

    fn submit(&mut self, providers: &[SearchProvider]) {
        let Some(provider) = self.state.active_index.and_then(|i| providers.get(i)) else {
            warn!("Submit without an active search engine");
            return;
        };
        let Some(doc) = self.host.document() else {
            return;
        };

        let query = doc.input_value();
        info!("Searching with '{}'", provider.name);
        self.client
            .send_message(Message::search(query, provider.name.clone()));
        self.terminate();
    }

    fn render_carousel(&mut self) {
        let view = self.state.carousel.view();
        if let Some(doc) = self.host.document() {
            doc.render_carousel(&view);
        }
    }

    /// Drive the controller from the frame inbox and the surface events until
    /// either side goes away.
    pub async fn run(
        mut self,
        mut inbox: mpsc::UnboundedReceiver<Envelope>,
        mut events: mpsc::UnboundedReceiver<SurfaceEvent>,
    ) {
        let mut lookup = self.providers.shared();
        let mut resolved = self.providers.is_resolved();

        loop {
            tokio::select! {
                result = &mut lookup, if !resolved => {
                    resolved = true;
                    self.on_providers(result);
                }
                envelope = inbox.recv() => match envelope {
                    Some(envelope) => self.handle_message(envelope.message),
                    None => {
                        debug!("Frame disconnected");
                        break;
                    }
                },
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle_surface_event(&event);
                    }
                    None => {
                        debug!("Surface event stream closed");
                        break;
                    }
                },
            }
        }

        info!("Overlay controller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessPage;
    use crate::providers::ProviderList;
    use quickbar_rpc::MessageBus;
    use quickbar_types::{MessageSender, TabInfo};

    const TAB: TabInfo = TabInfo { id: 7, index: 0 };

    fn providers() -> Vec<SearchProvider> {
        vec![
            SearchProvider::new("A", "a").with_icon("a.png").as_default(),
            SearchProvider::new("B", "b").with_icon("b.png"),
            SearchProvider::new("C", "").with_icon("c.png"),
        ]
    }

    struct Fixture {
        controller: OverlayController<HeadlessPage>,
        runtime: mpsc::UnboundedReceiver<Envelope>,
    }

    impl Fixture {
        fn with_cache(cache: ProviderCache) -> Self {
            let bus = MessageBus::new();
            let runtime = bus.listen_runtime();
            let client = bus.client(MessageSender::frame(TAB, 0));
            Self {
                controller: OverlayController::with_providers(HeadlessPage::new(), client, cache),
                runtime,
            }
        }

        fn new() -> Self {
            Self::with_cache(ProviderCache::ready(providers()))
        }

        /// Let the page finish loads and transitions until nothing is left.
        fn pump(&mut self) {
            loop {
                let events = self.controller.host_mut().take_events();
                if events.is_empty() {
                    break;
                }
                for event in events {
                    self.controller.handle_surface_event(&event);
                }
            }
        }

        fn open(&mut self, key: &str, selection: &str) {
            self.controller.on_activation(ActivationIntent {
                pressed_key: key.to_string(),
                selected_text: selection.to_string(),
            });
            self.pump();
        }

        fn send(&mut self, event: SurfaceEvent) -> bool {
            self.controller.handle_surface_event(&event)
        }

        fn surface(&self) -> &crate::headless::HeadlessDocument {
            self.controller.host().surface().unwrap()
        }

        fn active_name(&self) -> &str {
            &self.controller.active_provider().unwrap().name
        }
    }

    #[test]
    fn test_open_reveals_default_provider() {
        let mut f = Fixture::new();
        f.open("", "");

        assert_eq!(f.controller.phase(), Phase::Open);
        assert_eq!(f.surface().input, "");
        assert_eq!(f.active_name(), "A");
        let carousel = &f.surface().carousel;
        assert_eq!(carousel.items.len(), 1);
        assert_eq!(carousel.active().unwrap().icon_url, "a.png");
        assert_eq!(f.controller.host().overlay_opacity(), Opacity::Opaque);
        assert_eq!(f.surface().form_animation, Some(FormAnimation::SlideIn));
        assert!(f.surface().window_focused && f.surface().input_focused);
    }

    #[test]
    fn test_selection_prefills_with_caret_after_seed() {
        let mut f = Fixture::new();
        f.open("x", "hello");

        assert_eq!(f.surface().input, "xhello");
        assert_eq!(f.surface().caret, 1);
    }

    #[test]
    fn test_arrow_down_twice_wraps_backwards() {
        let mut f = Fixture::new();
        f.open("", "");

        assert!(f.send(SurfaceEvent::key_down("ArrowDown")));
        assert_eq!(f.active_name(), "C");
        assert_eq!(f.surface().carousel.items.len(), 2);

        f.send(SurfaceEvent::key_down("ArrowDown"));
        assert_eq!(f.active_name(), "B");
        assert_eq!(f.surface().carousel.items.len(), 3);

        f.pump();
        assert_eq!(f.surface().carousel.items.len(), 1);
        assert_eq!(f.surface().carousel.active().unwrap().icon_url, "b.png");
        assert_eq!(f.surface().carousel.translate_y, 0);
    }

    #[test]
    fn test_settle_between_presses_keeps_two_nodes() {
        let mut f = Fixture::new();
        f.open("", "");

        f.send(SurfaceEvent::key_down("ArrowDown"));
        f.pump();
        f.send(SurfaceEvent::key_down("ArrowDown"));
        assert_eq!(f.surface().carousel.items.len(), 2);
        f.pump();
        assert_eq!(f.surface().carousel.items.len(), 1);
        assert_eq!(f.active_name(), "B");
    }

    #[test]
    fn test_arrow_up_and_wheel() {
        let mut f = Fixture::new();
        f.open("", "");

        f.send(SurfaceEvent::key_down("ArrowUp"));
        assert_eq!(f.active_name(), "B");
        f.send(SurfaceEvent::Wheel { delta_y: 3.0 });
        assert_eq!(f.active_name(), "A");
        f.send(SurfaceEvent::Wheel { delta_y: -3.0 });
        assert_eq!(f.active_name(), "B");
    }

    #[test]
    fn test_other_keys_pass_through() {
        let mut f = Fixture::new();
        f.open("", "");
        assert!(!f.send(SurfaceEvent::key_down("a")));
        assert_eq!(f.active_name(), "A");
    }

    #[test]
    fn test_keyword_switches_provider() {
        let mut f = Fixture::new();
        f.open("", "");

        f.controller
            .host_mut()
            .document()
            .unwrap()
            .set_input_value("b query");
        f.send(SurfaceEvent::Input);

        assert_eq!(f.active_name(), "B");
        assert_eq!(f.surface().input, "query");
        assert_eq!(f.surface().caret, 0);
        assert_eq!(f.surface().carousel.active().unwrap().icon_url, "b.png");
    }

    #[test]
    fn test_keyword_of_active_provider_is_kept() {
        let mut f = Fixture::new();
        f.open("", "");

        f.controller
            .host_mut()
            .document()
            .unwrap()
            .set_input_value("a query");
        f.send(SurfaceEvent::Input);

        assert_eq!(f.active_name(), "A");
        assert_eq!(f.surface().input, "a query");
    }

    #[test]
    fn test_keyword_needs_trailing_space() {
        let mut f = Fixture::new();
        f.open("", "");

        f.controller.host_mut().document().unwrap().set_input_value("bq");
        f.send(SurfaceEvent::Input);
        assert_eq!(f.active_name(), "A");
        assert_eq!(f.surface().input, "bq");
    }

    #[test]
    fn test_empty_alias_never_matches() {
        let mut f = Fixture::new();
        f.open("", "");

        f.controller.host_mut().document().unwrap().set_input_value(" q");
        f.send(SurfaceEvent::Input);
        assert_eq!(f.active_name(), "A");
    }

    #[test]
    fn test_reactivation_buffers_seed() {
        let mut f = Fixture::new();
        f.controller.on_activation(ActivationIntent {
            pressed_key: "h".to_string(),
            selected_text: String::new(),
        });
        f.controller.on_activation(ActivationIntent {
            pressed_key: "i".to_string(),
            selected_text: "ignored".to_string(),
        });
        assert_eq!(f.controller.phase(), Phase::Loading);
        f.pump();

        assert_eq!(f.controller.host().attach_count(), 1);
        assert_eq!(f.surface().input, "hi");
        assert_eq!(f.surface().caret, 2);
    }

    #[test]
    fn test_escape_fades_out_then_removes() {
        let mut f = Fixture::new();
        f.open("", "");

        assert!(f.send(SurfaceEvent::key_down("Escape")));
        assert_eq!(f.controller.phase(), Phase::Closing);
        assert_eq!(f.surface().form_animation, Some(FormAnimation::SlideOut));
        assert!(f.controller.host().is_surface_attached());

        f.pump();
        assert_eq!(f.controller.phase(), Phase::Closed);
        assert!(!f.controller.host().is_surface_attached());
        assert_eq!(f.controller.state().active_index, None);
    }

    #[test]
    fn test_terminate_is_idempotent() {
        let mut f = Fixture::new();
        f.open("", "");

        f.controller.terminate();
        f.controller.terminate();
        assert_eq!(f.controller.phase(), Phase::Closing);
        f.pump();
        f.controller.terminate();
        assert_eq!(f.controller.phase(), Phase::Closed);
        assert_eq!(f.controller.host().attach_count(), 1);
    }

    #[test]
    fn test_terminate_during_fade_in_removes_immediately() {
        let mut f = Fixture::new();
        f.controller.on_activation(ActivationIntent::default());
        for event in f.controller.host_mut().take_events() {
            f.send(event);
        }
        // revealed, but the fade-in has not resolved yet
        assert_eq!(f.controller.host().overlay_opacity(), Opacity::Opaque);
        assert!(f.controller.host().is_overlay_transparent());

        f.controller.terminate();
        assert_eq!(f.controller.phase(), Phase::Closed);
        assert!(!f.controller.host().is_surface_attached());
    }

    #[test]
    fn test_focus_out_within_form_keeps_overlay() {
        let mut f = Fixture::new();
        f.open("", "");

        f.send(SurfaceEvent::FocusOut { within_form: true });
        assert_eq!(f.controller.phase(), Phase::Open);
        f.send(SurfaceEvent::FocusOut { within_form: false });
        assert_eq!(f.controller.phase(), Phase::Closing);
    }

    #[test]
    fn test_submit_sends_search_and_closes() {
        let mut f = Fixture::new();
        f.open("r", "ust");
        f.send(SurfaceEvent::key_down("ArrowUp"));

        assert!(f.send(SurfaceEvent::Submit));
        let envelope = f.runtime.try_recv().unwrap();
        assert_eq!(envelope.message, Message::search("rust", "B"));
        assert_eq!(envelope.sender.tab, Some(TAB));
        assert_eq!(f.controller.phase(), Phase::Closing);
    }

    #[test]
    fn test_events_ignored_unless_open() {
        let mut f = Fixture::new();
        f.send(SurfaceEvent::key_down("ArrowUp"));
        f.send(SurfaceEvent::Submit);
        assert!(f.runtime.try_recv().is_err());
        assert_eq!(f.controller.pending_actions(), 0);

        f.open("", "");
        f.send(SurfaceEvent::key_down("Escape"));
        f.send(SurfaceEvent::Submit);
        assert!(f.runtime.try_recv().is_err());
    }

    #[test]
    fn test_default_actions_prevented_while_closing() {
        let mut f = Fixture::new();
        f.open("", "");
        assert!(f.send(SurfaceEvent::key_down("Escape")));
        assert_eq!(f.controller.phase(), Phase::Closing);

        assert!(f.send(SurfaceEvent::Submit));
        assert!(f.send(SurfaceEvent::key_down("ArrowUp")));
        assert!(f.send(SurfaceEvent::key_down("ArrowDown")));
        assert!(f.send(SurfaceEvent::key_down("Escape")));
        assert!(f.send(SurfaceEvent::Wheel { delta_y: 3.0 }));
        assert!(!f.send(SurfaceEvent::key_down("a")));
        assert!(!f.send(SurfaceEvent::Input));

        // nothing ran: no search and the carousel did not move
        assert!(f.runtime.try_recv().is_err());
        assert_eq!(f.controller.phase(), Phase::Closing);
        assert_eq!(f.active_name(), "A");
    }

    #[test]
    fn test_empty_provider_list_closes_overlay() {
        let mut f = Fixture::with_cache(ProviderCache::ready(Vec::new()));
        f.open("q", "");

        assert_eq!(f.controller.phase(), Phase::Closed);
        assert!(!f.controller.host().is_surface_attached());
    }

    #[test]
    fn test_no_default_falls_back_to_first() {
        let list = vec![SearchProvider::new("X", "x"), SearchProvider::new("Y", "y")];
        let mut f = Fixture::with_cache(ProviderCache::ready(list));
        f.open("", "");
        assert_eq!(f.active_name(), "X");
    }

    #[tokio::test]
    async fn test_actions_queue_until_providers_resolve() {
        let (tx, rx) = tokio::sync::oneshot::channel::<ProviderResult>();
        let cache = ProviderCache::from_future(async move {
            rx.await
                .unwrap_or_else(|_| Err(quickbar_rpc::Error::Disconnected))
        });
        let mut f = Fixture::with_cache(cache);
        f.open("", "");

        f.send(SurfaceEvent::key_down("ArrowUp"));
        f.controller
            .host_mut()
            .document()
            .unwrap()
            .set_input_value("c rust");
        f.send(SurfaceEvent::Submit);
        assert_eq!(f.controller.pending_actions(), 3);
        assert!(f.surface().carousel.items.is_empty());

        tx.send(Ok(ProviderList::from(providers()))).unwrap();
        let result = f.controller.providers.shared().await;
        f.controller.on_providers(result);

        let envelope = f.runtime.try_recv().unwrap();
        assert_eq!(envelope.message, Message::search("c rust", "B"));
        assert_eq!(f.controller.pending_actions(), 0);
    }

    #[tokio::test]
    async fn test_stale_actions_are_dropped_after_close() {
        let (tx, rx) = tokio::sync::oneshot::channel::<ProviderResult>();
        let cache = ProviderCache::from_future(async move {
            rx.await
                .unwrap_or_else(|_| Err(quickbar_rpc::Error::Disconnected))
        });
        let mut f = Fixture::with_cache(cache);
        f.open("", "");
        f.send(SurfaceEvent::Submit);
        f.send(SurfaceEvent::key_down("Escape"));
        assert_eq!(f.controller.phase(), Phase::Closed);

        tx.send(Ok(ProviderList::from(providers()))).unwrap();
        let result = f.controller.providers.shared().await;
        f.controller.on_providers(result);

        assert!(f.runtime.try_recv().is_err());
        assert!(!f.controller.host().is_surface_attached());
    }

    #[test]
    fn test_step_between() {
        assert_eq!(step_between(0, 2), 2);
        assert_eq!(step_between(2, 0), -2);
        assert_eq!(step_between(1, 1), 0);
    }
}
