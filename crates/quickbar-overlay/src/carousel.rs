//! Provider carousel model.
//!
//! The carousel only materializes the nodes that are visible or in motion.
//! Cycling moves a cursor through existing neighbours and creates a node only
//! when there is none in the direction of travel; [`Carousel::settle`] drops
//! everything but the active node once the slide transition ends.

use quickbar_types::SearchProvider;

/// Height of one icon slot, in percent of the carousel height.
pub const SLOT_HEIGHT: i32 = 100;

/// Next provider index after moving one slot in `direction` (`+1` or `-1`),
/// wrapping in both directions.
#[must_use]
pub fn cycle_index(count: usize, index: usize, direction: i32) -> usize {
    debug_assert!(count > 0);
    if direction < 0 {
        (count + index - 1) % count
    } else {
        (count + index + 1) % count
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselNode {
    pub id: u64,
    pub provider_index: usize,
    pub icon_url: String,
    pub active: bool,
    /// Absolute position override for nodes created mid-cycle, in slots × 100.
    pub position_top: Option<i32>,
}

/// Render description of the carousel, derived purely from the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarouselView {
    /// Vertical translation of the strip.
    pub translate_y: i32,
    /// Whether the translation should animate.
    pub transition: bool,
    /// Nodes from top to bottom.
    pub items: Vec<CarouselNode>,
}

impl CarouselView {
    #[must_use]
    pub fn active(&self) -> Option<&CarouselNode> {
        self.items.iter().find(|n| n.active)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Carousel {
    nodes: Vec<CarouselNode>,
    offset: i32,
    transitioning: bool,
    next_id: u64,
}

impl Carousel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn make_node(&mut self, provider_index: usize, icon_url: &str) -> CarouselNode {
        let id = self.next_id;
        self.next_id += 1;
        CarouselNode {
            id,
            provider_index,
            icon_url: icon_url.to_string(),
            active: false,
            position_top: None,
        }
    }

    /// Replace the strip with a single active node.
    pub fn show(&mut self, provider_index: usize, icon_url: &str) {
        let mut node = self.make_node(provider_index, icon_url);
        node.active = true;
        self.nodes = vec![node];
        self.offset = 0;
        self.transitioning = false;
    }

    /// Move `step` slots and update `active_index` accordingly. Positive steps
    /// move to higher provider indices and slide the strip down; negative steps
    /// move to lower indices and slide it up.
    pub fn cycle(&mut self, step: i32, active_index: &mut usize, providers: &[SearchProvider]) {
        if providers.is_empty() {
            return;
        }

        let mut cursor = self.nodes.iter().position(|n| n.active);
        if let Some(current) = cursor {
            self.nodes[current].active = false;
        }

        let direction = step.signum();
        for _ in 0..step.unsigned_abs() {
            *active_index = cycle_index(providers.len(), *active_index, direction);

            self.offset += direction * SLOT_HEIGHT;
            self.transitioning = true;

            cursor = match cursor {
                Some(c) if direction < 0 && c + 1 < self.nodes.len() => Some(c + 1),
                Some(c) if direction > 0 && c > 0 => Some(c - 1),
                _ => {
                    let mut node =
                        self.make_node(*active_index, &providers[*active_index].fav_icon_url);
                    node.position_top = Some(-self.offset);
                    if direction < 0 {
                        self.nodes.push(node);
                        Some(self.nodes.len() - 1)
                    } else {
                        self.nodes.insert(0, node);
                        Some(0)
                    }
                }
            };
        }

        if let Some(target) = cursor {
            self.nodes[target].active = true;
        }
    }

    /// Drop every inactive node and reset the translation. Called when the
    /// slide transition ends.
    pub fn settle(&mut self) {
        self.nodes.retain(|n| n.active);
        self.offset = 0;
        self.transitioning = false;
        for node in &mut self.nodes {
            node.position_top = None;
        }
    }

    #[must_use]
    pub fn view(&self) -> CarouselView {
        CarouselView {
            translate_y: self.offset,
            transition: self.transitioning,
            items: self.nodes.clone(),
        }
    }

    #[must_use]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    #[must_use]
    pub fn nodes(&self) -> &[CarouselNode] {
        &self.nodes
    }

    #[must_use]
    pub fn active_node(&self) -> Option<&CarouselNode> {
        self.nodes.iter().find(|n| n.active)
    }
}
