//! Top-frame search overlay for quickbar.
//!
//! One [`OverlayController`] lives in the top frame of each tab. It opens the
//! overlay surface on `openSearchbar`, shows the provider carousel, switches
//! providers by arrow keys, wheel or alias keyword, and sends the final
//! `search` to the dispatcher.
//!
//! # Architecture
//!
//! - [`controller`]: the `Closed → Loading → Open → Closing` state machine
//! - [`carousel`]: provider carousel model and its render view
//! - [`providers`]: the memoized `getSearchEngines` lookup
//! - [`surface`]: host and document traits plus the UI event type
//! - [`headless`]: in-memory page used by tests and the CLI

pub mod carousel;
pub mod controller;
pub mod headless;
pub mod providers;
pub mod state;
pub mod surface;

pub use carousel::{Carousel, CarouselNode, CarouselView, cycle_index};
pub use controller::OverlayController;
pub use headless::{HeadlessDocument, HeadlessPage};
pub use providers::{ProviderCache, ProviderList, ProviderResult};
pub use state::{OverlayState, Phase};
pub use surface::{FormAnimation, Opacity, OverlayHost, SurfaceDocument, SurfaceEvent};
