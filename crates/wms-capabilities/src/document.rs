//! Streaming extraction of layer metadata from GetCapabilities XML.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::CapabilitiesError;

/// A named layer and the raw text of its `time` dimension, if declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerEntry {
    pub name: String,
    pub time_dimension: Option<String>,
}

/// Parsed view of a WMS GetCapabilities document.
///
/// Holds the document-ordered list of layers; everything else in the
/// capabilities XML (service metadata, styles, bounding boxes) is
/// skipped, since only layer names and time dimensions feed the
/// resolver.
#[derive(Debug, Clone, Default)]
pub struct CapabilitiesDocument {
    layers: Vec<LayerEntry>,
}

/// Which element's text content is currently being accumulated.
enum Capture {
    LayerName(usize),
    TimeDimension(usize),
}

impl CapabilitiesDocument {
    /// Parse a capabilities XML document in a single streaming pass.
    ///
    /// `<Layer>` elements nest; a `<Name>` or `<Dimension name="time">`
    /// is attributed to the innermost open layer. The first `Name` and
    /// the first time dimension per layer win.
    pub fn parse(xml: &str) -> Result<Self, CapabilitiesError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut layers: Vec<LayerEntry> = Vec::new();
        let mut open_layers: Vec<usize> = Vec::new();
        let mut capture: Option<Capture> = None;
        let mut text = String::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"Layer" => {
                        open_layers.push(layers.len());
                        layers.push(LayerEntry::default());
                    }
                    b"Name" => {
                        if let Some(&idx) = open_layers.last() {
                            if layers[idx].name.is_empty() {
                                capture = Some(Capture::LayerName(idx));
                                text.clear();
                            }
                        }
                    }
                    b"Dimension" => {
                        if let Some(&idx) = open_layers.last() {
                            let is_time = e.attributes().flatten().any(|attr| {
                                attr.key.as_ref() == b"name" && attr.value.as_ref() == b"time"
                            });
                            if is_time && layers[idx].time_dimension.is_none() {
                                capture = Some(Capture::TimeDimension(idx));
                                text.clear();
                            }
                        }
                    }
                    _ => {}
                },
                Event::Text(t) if capture.is_some() => {
                    text.push_str(&t.unescape()?);
                }
                Event::End(e) => match e.name().as_ref() {
                    b"Layer" => {
                        open_layers.pop();
                    }
                    b"Name" => {
                        if let Some(Capture::LayerName(idx)) = capture.take() {
                            layers[idx].name = text.clone();
                        }
                    }
                    b"Dimension" => {
                        if let Some(Capture::TimeDimension(idx)) = capture.take() {
                            layers[idx].time_dimension = Some(text.clone());
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Self { layers })
    }

    /// Look up a layer by exact, case-sensitive name. Returns the first
    /// match in document order.
    pub fn layer(&self, name: &str) -> Option<&LayerEntry> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layers(&self) -> &[LayerEntry] {
        &self.layers
    }
}
