//! WMS GetCapabilities client and time-dimension resolution.
//!
//! Supports:
//! - Streaming extraction of layer time dimensions from GetCapabilities XML
//! - Interval (`start/end/period`) and enumerated time dimension forms
//! - Trailing-window filtering of the resulting frame sequence

pub mod client;
pub mod document;
pub mod error;
pub mod resolver;

pub use client::CapabilitiesClient;
pub use document::{CapabilitiesDocument, LayerEntry};
pub use error::CapabilitiesError;
pub use resolver::{resolve, try_resolve, TimeDimensionSpec, FRAME_WINDOW_HOURS};
