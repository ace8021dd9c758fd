//! Error types for capabilities fetching and time-dimension resolution.

use radar_common::TimeParseError;
use thiserror::Error;

/// Errors raised while fetching or resolving a capabilities document.
///
/// None of these are fatal to the surrounding service: the periodic
/// refresh loop absorbs them into an empty frame sequence plus a
/// diagnostic log entry.
#[derive(Debug, Error)]
pub enum CapabilitiesError {
    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Layer '{0}' has no time dimension")]
    DimensionNotFound(String),

    #[error("Malformed time dimension spec: {0}")]
    MalformedTimeSpec(String),

    #[error("Time dimension period expands to a zero step: {0}")]
    ZeroStep(String),

    #[error("Time parse error: {0}")]
    Time(#[from] TimeParseError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Capabilities fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
}
