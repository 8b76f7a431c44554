//! In-memory top-frame page.
//!
//! `HeadlessPage` keeps just enough of a DOM to drive the controller outside a
//! browser: one overlay element with an inline and a resolved opacity, and the
//! surface document with its input, focus and last rendered carousel.
//!
//! Loads and transitions complete when the driver asks for them. Events are
//! either collected in an outbox drained by [`HeadlessPage::take_events`], or
//! forwarded to an event sink; with a sink, opacity changes apply instantly.

use tokio::sync::mpsc;
use tracing::debug;

use crate::carousel::CarouselView;
use crate::surface::{FormAnimation, Opacity, OverlayHost, SurfaceDocument, SurfaceEvent};

#[derive(Debug, Clone, Default)]
pub struct HeadlessDocument {
    pub input: String,
    /// Caret position in characters.
    pub caret: usize,
    pub window_focused: bool,
    pub input_focused: bool,
    pub form_animation: Option<FormAnimation>,
    pub carousel: CarouselView,
    events: Vec<SurfaceEvent>,
    sink: Option<mpsc::UnboundedSender<SurfaceEvent>>,
}

impl SurfaceDocument for HeadlessDocument {
    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        self.input = value.to_string();
        self.caret = self.input.chars().count();
    }

    fn set_caret(&mut self, position: usize) {
        self.caret = position.min(self.input.chars().count());
    }

    fn focus_window(&mut self) {
        self.window_focused = true;
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
    }

    fn set_form_animation(&mut self, animation: FormAnimation) {
        self.form_animation = Some(animation);
    }

    fn render_carousel(&mut self, view: &CarouselView) {
        let moving = view.transition && view.translate_y != self.carousel.translate_y;
        self.carousel = view.clone();
        if !moving {
            return;
        }
        match &self.sink {
            Some(sink) => {
                if sink.send(SurfaceEvent::CarouselTransitionEnd).is_err() {
                    debug!("Carousel transition end dropped, controller gone");
                }
            }
            None if self.events.contains(&SurfaceEvent::CarouselTransitionEnd) => {}
            None => self.events.push(SurfaceEvent::CarouselTransitionEnd),
        }
    }
}

#[derive(Debug, Default)]
pub struct HeadlessPage {
    document: Option<HeadlessDocument>,
    opacity: Opacity,
    computed_opacity: Opacity,
    outbox: Vec<SurfaceEvent>,
    sink: Option<mpsc::UnboundedSender<SurfaceEvent>>,
    attach_count: usize,
}

impl HeadlessPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every event to `sink` as soon as it happens.
    #[must_use]
    pub fn with_event_sink(sink: mpsc::UnboundedSender<SurfaceEvent>) -> Self {
        Self {
            sink: Some(sink),
            ..Self::default()
        }
    }

    fn emit(&mut self, event: SurfaceEvent) {
        match &self.sink {
            Some(sink) => {
                if sink.send(event).is_err() {
                    debug!("Surface event dropped, controller gone");
                }
            }
            None => self.outbox.push(event),
        }
    }

    /// Complete pending loads and transitions and return the events they
    /// raised, in order.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        if let Some(doc) = self.document.as_mut() {
            self.outbox.append(&mut doc.events);
        }
        self.computed_opacity = self.opacity;
        std::mem::take(&mut self.outbox)
    }

    #[must_use]
    pub fn surface(&self) -> Option<&HeadlessDocument> {
        self.document.as_ref()
    }

    /// How many surfaces have been attached over the page's lifetime.
    #[must_use]
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }
}

impl OverlayHost for HeadlessPage {
    fn attach_surface(&mut self) {
        self.document = Some(HeadlessDocument {
            sink: self.sink.clone(),
            ..HeadlessDocument::default()
        });
        self.opacity = Opacity::Transparent;
        self.computed_opacity = Opacity::Transparent;
        self.attach_count += 1;
        self.emit(SurfaceEvent::Loaded);
    }

    fn remove_surface(&mut self) {
        self.document = None;
        self.outbox.clear();
    }

    fn is_surface_attached(&self) -> bool {
        self.document.is_some()
    }

    fn set_overlay_opacity(&mut self, opacity: Opacity) {
        let changed = self.opacity != opacity;
        self.opacity = opacity;
        if self.sink.is_some() {
            self.computed_opacity = opacity;
        } else if changed {
            self.outbox.push(SurfaceEvent::opacity_transition_end());
        }
    }

    fn overlay_opacity(&self) -> Opacity {
        self.opacity
    }

    fn is_overlay_transparent(&self) -> bool {
        self.computed_opacity == Opacity::Transparent
    }

    fn has_document(&self) -> bool {
        self.document.is_some()
    }

    fn document(&mut self) -> Option<&mut dyn SurfaceDocument> {
        self.document
            .as_mut()
            .map(|doc| doc as &mut dyn SurfaceDocument)
    }
}
