//! Script replay against a simulated browser.
//!
//! The dispatcher runs as its own task, exactly as in a browser. The top
//! frame's overlay controller and the per-frame trigger detectors are driven
//! inline so that every step is fully applied before the next one starts.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use quickbar_core::{PageContext, TriggerDetector};
use quickbar_core::config::{SettingsChange, SettingsStore};
use quickbar_dispatcher::Dispatcher;
use quickbar_overlay::{HeadlessPage, OverlayController, OverlayHost, Phase, SurfaceEvent};
use quickbar_rpc::{Envelope, MessageBus};
use quickbar_types::{FrameId, MessageSender, SearchProvider, TOP_FRAME_ID};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::browser::{FIRST_TAB, SearchRecord, SimulatedBrowser, Tab};
use crate::script::Step;

/// Upper bound for one cross-context hop.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Serialize)]
pub struct OverlayReport {
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub tabs: Vec<Tab>,
    pub searches: Vec<SearchRecord>,
    pub overlay: OverlayReport,
}

pub struct Simulation {
    bus: MessageBus,
    browser: SimulatedBrowser,
    settings: Arc<dyn SettingsStore>,
    changes: broadcast::Receiver<SettingsChange>,
    detectors: BTreeMap<FrameId, TriggerDetector>,
    selection: String,
    controller: OverlayController<HeadlessPage>,
    inbox: mpsc::UnboundedReceiver<Envelope>,
    completed: mpsc::UnboundedReceiver<SearchRecord>,
    submitted: usize,
}

impl Simulation {
    /// Start the dispatcher and attach the top frame. Must be called from
    /// inside a tokio runtime.
    pub fn start(providers: Vec<SearchProvider>, settings: Arc<dyn SettingsStore>) -> Self {
        let bus = MessageBus::new();
        let (browser, completed) = SimulatedBrowser::new(providers);

        let dispatcher = Dispatcher::new(browser.clone(), Arc::clone(&settings), bus.clone());
        tokio::spawn(dispatcher.run(bus.listen_runtime()));

        let (client, inbox) = bus.connect_frame(FIRST_TAB, TOP_FRAME_ID);
        let controller = OverlayController::new(HeadlessPage::new(), client);
        let changes = settings.subscribe();

        Self {
            bus,
            browser,
            settings,
            changes,
            detectors: BTreeMap::new(),
            selection: String::new(),
            controller,
            inbox,
            completed,
            submitted: 0,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &OverlayController<HeadlessPage> {
        &self.controller
    }

    fn detector(&mut self, frame: FrameId) -> &TriggerDetector {
        let settings = &self.settings;
        let bus = &self.bus;
        self.detectors.entry(frame).or_insert_with(|| {
            debug!("Injecting trigger detector into frame {}", frame);
            TriggerDetector::from_store(
                settings.as_ref(),
                bus.client(MessageSender::frame(FIRST_TAB, frame)),
            )
        })
    }

    /// Apply one step and everything it sets in motion.
    ///
    /// # Errors
    ///
    /// Returns an error if a setting cannot be stored or an expected message
    /// never arrives.
    pub async fn step(&mut self, step: &Step) -> Result<()> {
        debug!("Step: {:?}", step);
        match step {
            Step::Select { text } => self.selection.clone_from(text),
            Step::Key { frame, .. } => {
                let Some(event) = step.key_event() else {
                    return Ok(());
                };
                let page = PageContext::with_selection(self.selection.clone());
                let disposition = self.detector(*frame).handle_key(&event, &page);
                if disposition.is_consumed() {
                    self.receive_activation().await?;
                }
            }
            Step::Type { text } => {
                let Some(doc) = self.controller.host_mut().document() else {
                    warn!("No overlay to type into");
                    return Ok(());
                };
                doc.set_input_value(text);
                self.surface(SurfaceEvent::Input);
            }
            Step::Keydown { key } => self.surface(SurfaceEvent::key_down(key.clone())),
            Step::Wheel { delta_y } => self.surface(SurfaceEvent::Wheel { delta_y: *delta_y }),
            Step::FocusOut { within_form } => self.surface(SurfaceEvent::FocusOut {
                within_form: *within_form,
            }),
            Step::Submit => {
                let was_open = self.controller.phase() == Phase::Open;
                self.surface(SurfaceEvent::Submit);
                self.settle().await?;
                if was_open && self.controller.phase() != Phase::Open {
                    self.submitted += 1;
                }
            }
            Step::Setting { key, value } => {
                self.settings
                    .set(key, value)
                    .with_context(|| format!("Failed to store setting '{key}'"))?;
            }
        }

        self.settle().await?;
        self.apply_setting_changes();
        Ok(())
    }

    fn surface(&mut self, event: SurfaceEvent) {
        self.controller.handle_surface_event(&event);
    }

    async fn receive_activation(&mut self) -> Result<()> {
        let envelope = timeout(DELIVERY_TIMEOUT, self.inbox.recv())
            .await
            .context("Activation never reached the top frame")?;
        let Some(envelope) = envelope else {
            bail!("Top frame disconnected");
        };
        self.controller.handle_message(envelope.message);
        Ok(())
    }

    /// Resolve the provider list when something waits for it, and let the
    /// page finish loads and transitions until nothing is left to do.
    async fn settle(&mut self) -> Result<()> {
        loop {
            if self.controller.pending_actions() > 0 {
                timeout(DELIVERY_TIMEOUT, self.controller.resolve_providers())
                    .await
                    .context("Search engines never arrived")?;
            }

            let events = self.controller.host_mut().take_events();
            if events.is_empty() && self.controller.pending_actions() == 0 {
                return Ok(());
            }
            for event in &events {
                self.controller.handle_surface_event(event);
            }
        }
    }

    fn apply_setting_changes(&mut self) {
        loop {
            match self.changes.try_recv() {
                Ok(change) => {
                    for detector in self.detectors.values_mut() {
                        detector.apply_change(&change);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    warn!("Missed {} settings changes", missed);
                }
                Err(_) => break,
            }
        }
    }

    /// Wait for submitted searches to land and describe the final state.
    pub async fn finish(mut self) -> Report {
        let mut searches = Vec::new();
        while searches.len() < self.submitted {
            match timeout(DELIVERY_TIMEOUT, self.completed.recv()).await {
                Ok(Some(search)) => searches.push(search),
                _ => {
                    warn!(
                        "{} of {} searches did not complete",
                        self.submitted - searches.len(),
                        self.submitted
                    );
                    break;
                }
            }
        }

        let phase = self.controller.phase();
        let overlay = OverlayReport {
            phase: phase.to_string(),
            input: self
                .controller
                .host()
                .surface()
                .map(|doc| doc.input.clone()),
            provider: self.controller.active_provider().map(|p| p.name.clone()),
        };
        info!("Replay finished with the overlay {}", phase);

        Report {
            tabs: self.browser.tabs(),
            searches,
            overlay,
        }
    }
}

/// Replay `steps` and report the outcome.
///
/// # Errors
///
/// Returns an error if a step fails.
pub async fn replay(
    steps: &[Step],
    providers: Vec<SearchProvider>,
    settings: Arc<dyn SettingsStore>,
) -> Result<Report> {
    let mut simulation = Simulation::start(providers, settings);
    for (number, step) in steps.iter().enumerate() {
        simulation
            .step(step)
            .await
            .with_context(|| format!("Step {} failed", number + 1))?;
    }
    Ok(simulation.finish().await)
}
