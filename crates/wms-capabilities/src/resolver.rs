//! Time-dimension resolution: from capabilities document to frame sequence.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use radar_common::time::{format_instant, parse_instant, TrailingWindow};
use radar_common::IsoDuration;

use crate::document::CapabilitiesDocument;
use crate::error::CapabilitiesError;

/// Lookback window for "currently relevant" radar frames.
pub const FRAME_WINDOW_HOURS: i64 = 2;

/// A layer's time dimension, in one of the two WMS shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeDimensionSpec {
    /// `start/end/period` interval form.
    Interval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        period: IsoDuration,
    },
    /// Comma-separated list of instants, kept verbatim.
    Enumerated(Vec<String>),
}

impl TimeDimensionSpec {
    /// Parse the raw dimension text. Presence of `/` selects the
    /// interval form, which must have exactly three fields.
    pub fn parse(raw: &str) -> Result<Self, CapabilitiesError> {
        if raw.contains('/') {
            let fields: Vec<&str> = raw.split('/').collect();
            let [start, end, period] = fields.as_slice() else {
                return Err(CapabilitiesError::MalformedTimeSpec(raw.to_string()));
            };
            Ok(Self::Interval {
                start: parse_instant(start)?,
                end: parse_instant(end)?,
                period: IsoDuration::parse(period)?,
            })
        } else {
            Ok(Self::Enumerated(
                raw.split(',').map(|t| t.trim().to_string()).collect(),
            ))
        }
    }

    /// Expand into the full (unfiltered) ascending instant list.
    ///
    /// A period that converts to a zero step is rejected rather than
    /// iteration-capped, so expansion always terminates.
    pub fn expand(&self) -> Result<Vec<String>, CapabilitiesError> {
        match self {
            Self::Enumerated(times) => Ok(times.clone()),
            Self::Interval { start, end, period } => {
                let step_ms = period.as_millis();
                if step_ms <= 0 {
                    return Err(CapabilitiesError::ZeroStep(format!("{:?}", period)));
                }

                let mut times = Vec::new();
                let mut current = *start;
                while current <= *end {
                    times.push(format_instant(current));
                    // A step past the representable datetime range ends
                    // the sequence
                    match current.checked_add_signed(Duration::milliseconds(step_ms)) {
                        Some(next) => current = next,
                        None => break,
                    }
                }
                Ok(times)
            }
        }
    }
}

/// Resolve the frame sequence for a layer, restricted to the trailing
/// two-hour window ending at `now`.
///
/// Errors from lookup, parsing, or expansion are propagated; callers
/// that want the absorbing behavior use [`resolve`].
pub fn try_resolve(
    doc: &CapabilitiesDocument,
    layer_name: &str,
    now: DateTime<Utc>,
) -> Result<Vec<String>, CapabilitiesError> {
    let layer = doc
        .layer(layer_name)
        .ok_or_else(|| CapabilitiesError::LayerNotFound(layer_name.to_string()))?;

    let raw = layer
        .time_dimension
        .as_deref()
        .ok_or_else(|| CapabilitiesError::DimensionNotFound(layer_name.to_string()))?;

    let times = TimeDimensionSpec::parse(raw)?.expand()?;

    let window = TrailingWindow::ending_at(now, Duration::hours(FRAME_WINDOW_HOURS));
    Ok(times
        .into_iter()
        .filter(|t| matches!(parse_instant(t), Ok(dt) if window.contains(dt)))
        .collect())
}

/// Resolve the frame sequence for a layer, absorbing every failure into
/// an empty sequence plus a diagnostic. This is the contract the
/// periodic refresh loop relies on: a malformed document or a missing
/// layer must never abort the caller.
pub fn resolve(doc: &CapabilitiesDocument, layer_name: &str, now: DateTime<Utc>) -> Vec<String> {
    match try_resolve(doc, layer_name, now) {
        Ok(times) => times,
        Err(e) => {
            warn!(layer = layer_name, error = %e, "Time dimension resolution failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(dimension: &str) -> CapabilitiesDocument {
        let xml = format!(
            r#"<Layer>
                 <Name>Radar:suomi_dbz_eureffin</Name>
                 <Dimension name="time" units="ISO8601">{}</Dimension>
               </Layer>"#,
            dimension
        );
        CapabilitiesDocument::parse(&xml).unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        parse_instant(s).unwrap()
    }

    #[test]
    fn test_enumerated_within_window() {
        let doc = doc("2024-01-01T10:00:00Z,2024-01-01T10:05:00Z");
        let times = resolve(&doc, "Radar:suomi_dbz_eureffin", at("2024-01-01T10:06:00Z"));
        assert_eq!(
            times,
            vec!["2024-01-01T10:00:00Z", "2024-01-01T10:05:00Z"]
        );
    }

    #[test]
    fn test_enumerated_outside_window() {
        let doc = doc("2024-01-01T10:00:00Z,2024-01-01T10:05:00Z");
        let times = resolve(&doc, "Radar:suomi_dbz_eureffin", at("2024-01-01T13:00:00Z"));
        assert!(times.is_empty());
    }

    #[test]
    fn test_interval_expansion() {
        let spec =
            TimeDimensionSpec::parse("2024-01-01T00:00:00Z/2024-01-01T00:10:00Z/PT5M").unwrap();
        assert_eq!(
            spec.expand().unwrap(),
            vec![
                "2024-01-01T00:00:00Z",
                "2024-01-01T00:05:00Z",
                "2024-01-01T00:10:00Z"
            ]
        );
    }

    #[test]
    fn test_interval_end_inclusive_only_on_exact_step() {
        let spec =
            TimeDimensionSpec::parse("2024-01-01T00:00:00Z/2024-01-01T00:09:00Z/PT5M").unwrap();
        // 00:10 would overshoot the end, so only two frames are emitted
        assert_eq!(
            spec.expand().unwrap(),
            vec!["2024-01-01T00:00:00Z", "2024-01-01T00:05:00Z"]
        );
    }

    #[test]
    fn test_interval_resolved_through_window() {
        let doc = doc("2024-01-01T09:00:00Z/2024-01-01T10:00:00Z/PT15M");
        let times = resolve(&doc, "Radar:suomi_dbz_eureffin", at("2024-01-01T10:00:00Z"));
        assert_eq!(
            times,
            vec![
                "2024-01-01T09:00:00Z",
                "2024-01-01T09:15:00Z",
                "2024-01-01T09:30:00Z",
                "2024-01-01T09:45:00Z",
                "2024-01-01T10:00:00Z"
            ]
        );
    }

    #[test]
    fn test_layer_lookup_case_sensitive() {
        let doc = doc("2024-01-01T10:00:00Z");
        let times = resolve(&doc, "radar:suomi_dbz_eureffin", at("2024-01-01T10:06:00Z"));
        assert!(times.is_empty());
    }

    #[test]
    fn test_missing_layer_yields_empty() {
        let doc = CapabilitiesDocument::parse("<Layer><Name>other</Name></Layer>").unwrap();
        let times = resolve(&doc, "Radar:suomi_dbz_eureffin", Utc::now());
        assert!(times.is_empty());
    }

    #[test]
    fn test_missing_dimension_yields_empty() {
        let xml = "<Layer><Name>Radar:suomi_dbz_eureffin</Name></Layer>";
        let doc = CapabilitiesDocument::parse(xml).unwrap();
        let times = resolve(&doc, "Radar:suomi_dbz_eureffin", Utc::now());
        assert!(times.is_empty());
    }

    #[test]
    fn test_idempotent_at_fixed_now() {
        let doc = doc("2024-01-01T10:00:00Z,2024-01-01T10:05:00Z");
        let now = at("2024-01-01T10:06:00Z");
        let first = resolve(&doc, "Radar:suomi_dbz_eureffin", now);
        let second = resolve(&doc, "Radar:suomi_dbz_eureffin", now);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_step_terminates_with_empty_result() {
        let doc = doc("2024-01-01T00:00:00Z/2024-01-01T10:00:00Z/PT0S");
        let times = resolve(&doc, "Radar:suomi_dbz_eureffin", at("2024-01-01T10:00:00Z"));
        assert!(times.is_empty());
    }

    #[test]
    fn test_zero_step_is_rejected_before_expansion() {
        let spec =
            TimeDimensionSpec::parse("2024-01-01T00:00:00Z/2024-01-01T10:00:00Z/PT").unwrap();
        assert!(matches!(
            spec.expand(),
            Err(CapabilitiesError::ZeroStep(_))
        ));
    }

    #[test]
    fn test_period_past_datetime_range_stops_expansion() {
        let spec =
            TimeDimensionSpec::parse("2024-01-01T00:00:00Z/2024-01-01T10:00:00Z/P1000000Y")
                .unwrap();
        assert_eq!(spec.expand().unwrap(), vec!["2024-01-01T00:00:00Z"]);
    }

    #[test]
    fn test_oversized_period_is_absorbed() {
        let doc = doc("2024-01-01T00:00:00Z/2024-01-01T10:00:00Z/P99999999999999Y");
        let times = resolve(&doc, "Radar:suomi_dbz_eureffin", at("2024-01-01T10:00:00Z"));
        assert!(times.is_empty());
    }

    #[test]
    fn test_malformed_interval_field_counts() {
        assert!(TimeDimensionSpec::parse("2024-01-01T00:00:00Z/PT5M").is_err());
        assert!(
            TimeDimensionSpec::parse("2024-01-01T00:00:00Z/2024-01-01T01:00:00Z/PT5M/extra")
                .is_err()
        );
    }

    #[test]
    fn test_malformed_interval_instants() {
        assert!(TimeDimensionSpec::parse("garbage/2024-01-01T01:00:00Z/PT5M").is_err());
    }

    #[test]
    fn test_enumerated_entries_are_trimmed() {
        let spec = TimeDimensionSpec::parse("2024-01-01T10:00:00Z, 2024-01-01T10:05:00Z").unwrap();
        assert_eq!(
            spec.expand().unwrap(),
            vec!["2024-01-01T10:00:00Z", "2024-01-01T10:05:00Z"]
        );
    }

    #[test]
    fn test_unparseable_enumerated_entries_dropped_by_filter() {
        let doc = doc("not-a-time,2024-01-01T10:05:00Z");
        let times = resolve(&doc, "Radar:suomi_dbz_eureffin", at("2024-01-01T10:06:00Z"));
        assert_eq!(times, vec!["2024-01-01T10:05:00Z"]);
    }
}
