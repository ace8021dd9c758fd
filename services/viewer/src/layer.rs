//! Radar image layer handle.
//!
//! Constructed once at startup and held by the coordinator. The handle
//! only carries the `TIME` query parameter; it never issues the image
//! request itself.

/// Handle to the WMS image layer showing the radar overlay.
#[derive(Debug, Clone)]
pub struct RadarLayerHandle {
    wms_url: String,
    layer: String,
    time: Option<String>,
}

impl RadarLayerHandle {
    pub fn new(wms_url: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            wms_url: wms_url.into(),
            layer: layer.into(),
            time: None,
        }
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// Update the `TIME` parameter to the newly selected frame.
    pub fn set_time(&mut self, time: Option<String>) {
        self.time = time;
    }

    /// Render the image request URL for the current frame, for display
    /// clients and the status API. `None` until a frame is selected.
    pub fn image_url(&self) -> Option<String> {
        let time = self.time.as_deref()?;
        Some(format!(
            "{}?SERVICE=WMS&VERSION=1.3.0&REQUEST=GetMap&LAYERS={}&FORMAT=image/png&TRANSPARENT=true&TIME={}",
            self.wms_url, self.layer, time
        ))
    }
}
