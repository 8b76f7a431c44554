//! Core library for quickbar: settings storage and page-side trigger detection.

pub mod config;
pub mod trigger;

mod error;

pub use error::{Error, Result};
pub use trigger::{KeyDisposition, PageContext, PageKeyEvent, TriggerDetector, TriggerRule};
