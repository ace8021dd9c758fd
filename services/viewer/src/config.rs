//! Viewer configuration assembled from CLI arguments and environment.

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the viewer service.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// GetCapabilities endpoint to poll.
    pub capabilities_url: String,
    /// Base WMS URL the radar image layer points at.
    pub wms_url: String,
    /// Layer whose time dimension drives the animation.
    pub layer: String,
    /// How often to refetch capabilities.
    pub refresh_interval: Duration,
    /// Request timeout for capabilities fetches.
    pub fetch_timeout: Duration,
    /// Directory for persisted settings.
    pub state_dir: PathBuf,
}
