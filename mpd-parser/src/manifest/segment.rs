//! Segment addressing descriptions.
//!
//! These nodes describe how media segments are laid out; turning them into
//! segment URLs or schedules is left to the caller.

use std::io::BufRead;

use serde::Serialize;

use crate::common::xml_decode::{DecodeElement, Element, XmlDecoder};
use crate::error::ParseResult;

/// A `SegmentTemplate` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentTemplate {
    /// Media segment URL template (may contain `$Number$`, `$Time$`, ...)
    #[serde(rename = "@media", skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,

    #[serde(rename = "@initialization", skip_serializing_if = "Option::is_none")]
    pub initialization: Option<String>,

    #[serde(rename = "@index", skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// Units per second for `duration` and `presentationTimeOffset`
    #[serde(rename = "@timescale", skip_serializing_if = "Option::is_none")]
    pub timescale: Option<u64>,

    /// Segment duration in `timescale` units
    #[serde(rename = "@duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    #[serde(rename = "@startNumber", skip_serializing_if = "Option::is_none")]
    pub start_number: Option<u64>,

    #[serde(rename = "@presentationTimeOffset", skip_serializing_if = "Option::is_none")]
    pub presentation_time_offset: Option<u64>,

    #[serde(rename = "@availabilityTimeOffset", skip_serializing_if = "Option::is_none")]
    pub availability_time_offset: Option<f64>,

    #[serde(rename = "SegmentTimeline", skip_serializing_if = "Option::is_none")]
    pub segment_timeline: Option<SegmentTimeline>,
}

impl SegmentTemplate {
    /// Whether media URLs are addressed by `$Time$` rather than `$Number$`.
    pub fn uses_time_addressing(&self) -> bool {
        self.media.as_deref().is_some_and(|m| m.contains("$Time$"))
    }
}

impl DecodeElement for SegmentTemplate {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        let mut template = SegmentTemplate {
            media: attrs.string("media"),
            initialization: attrs.string("initialization"),
            index: attrs.string("index"),
            timescale: attrs.u64("timescale")?,
            duration: attrs.u64("duration")?,
            start_number: attrs.u64("startNumber")?,
            presentation_time_offset: attrs.u64("presentationTimeOffset")?,
            availability_time_offset: attrs.f64("availabilityTimeOffset")?,
            segment_timeline: None,
        };

        decoder.children(&element, |d, child| match child.name().as_str() {
            "SegmentTimeline" if template.segment_timeline.is_none() => {
                template.segment_timeline = Some(d.decode(child)?);
                Ok(())
            }
            _ => d.skip(child),
        })?;

        Ok(template)
    }
}

/// Explicit segment timing as a run-length encoded list of `S` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentTimeline {
    #[serde(rename = "S", skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<SegmentTimelineEntry>,
}

impl SegmentTimeline {
    /// Number of segments described, expanding repeat counts.
    ///
    /// Returns `None` when an entry repeats until the end of the period
    /// (`r="-1"`), since the count then depends on the period duration, or
    /// when the count does not fit in a `u64`.
    pub fn segment_count(&self) -> Option<u64> {
        self.segments.iter().try_fold(0u64, |total, entry| {
            let repeat = u64::try_from(entry.r.unwrap_or(0)).ok()?;
            total.checked_add(repeat)?.checked_add(1)
        })
    }
}

impl DecodeElement for SegmentTimeline {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let mut segments: Vec<SegmentTimelineEntry> = Vec::new();
        decoder.children(&element, |d, child| match child.name().as_str() {
            "S" => {
                segments.push(d.decode(child)?);
                Ok(())
            }
            _ => d.skip(child),
        })?;

        Ok(SegmentTimeline { segments })
    }
}

/// One `S` entry of a [`SegmentTimeline`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentTimelineEntry {
    /// Start time in timescale units
    #[serde(rename = "@t", skip_serializing_if = "Option::is_none")]
    pub t: Option<u64>,

    /// Segment number of the first segment in this run
    #[serde(rename = "@n", skip_serializing_if = "Option::is_none")]
    pub n: Option<u64>,

    /// Duration of each segment in timescale units
    #[serde(rename = "@d", skip_serializing_if = "Option::is_none")]
    pub d: Option<u64>,

    /// Repeat count; `-1` repeats until the next entry or the period end
    #[serde(rename = "@r", skip_serializing_if = "Option::is_none")]
    pub r: Option<i64>,
}

impl DecodeElement for SegmentTimelineEntry {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        decoder.skip(element)?;

        Ok(SegmentTimelineEntry {
            t: attrs.u64("t")?,
            n: attrs.u64("n")?,
            d: attrs.u64("d")?,
            r: attrs.i64("r")?,
        })
    }
}

/// A `SegmentBase` element, used for single-segment (indexed) media.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SegmentBase {
    #[serde(rename = "@timescale", skip_serializing_if = "Option::is_none")]
    pub timescale: Option<u64>,

    #[serde(rename = "@presentationTimeOffset", skip_serializing_if = "Option::is_none")]
    pub presentation_time_offset: Option<u64>,

    #[serde(rename = "@indexRange", skip_serializing_if = "Option::is_none")]
    pub index_range: Option<String>,

    #[serde(rename = "@indexRangeExact", skip_serializing_if = "Option::is_none")]
    pub index_range_exact: Option<bool>,

    #[serde(rename = "Initialization", skip_serializing_if = "Option::is_none")]
    pub initialization: Option<Initialization>,
}

impl DecodeElement for SegmentBase {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        let mut base = SegmentBase {
            timescale: attrs.u64("timescale")?,
            presentation_time_offset: attrs.u64("presentationTimeOffset")?,
            index_range: attrs.string("indexRange"),
            index_range_exact: attrs.bool("indexRangeExact")?,
            initialization: None,
        };

        decoder.children(&element, |d, child| match child.name().as_str() {
            "Initialization" if base.initialization.is_none() => {
                base.initialization = Some(d.decode(child)?);
                Ok(())
            }
            _ => d.skip(child),
        })?;

        Ok(base)
    }
}

/// Location of the initialization segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Initialization {
    #[serde(rename = "@sourceURL", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    #[serde(rename = "@range", skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl DecodeElement for Initialization {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        decoder.skip(element)?;

        Ok(Initialization {
            source_url: attrs.string("sourceURL"),
            range: attrs.string("range"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(r: Option<i64>) -> SegmentTimelineEntry {
        SegmentTimelineEntry {
            d: Some(2000),
            r,
            ..Default::default()
        }
    }

    #[test]
    fn test_segment_count_expands_repeats() {
        let timeline = SegmentTimeline {
            segments: vec![entry(None), entry(Some(3)), entry(Some(0))],
        };
        assert_eq!(timeline.segment_count(), Some(6));
    }

    #[test]
    fn test_segment_count_open_ended() {
        let timeline = SegmentTimeline {
            segments: vec![entry(Some(2)), entry(Some(-1))],
        };
        assert_eq!(timeline.segment_count(), None);
        assert_eq!(SegmentTimeline::default().segment_count(), Some(0));
    }

    #[test]
    fn test_segment_count_overflow() {
        let timeline = SegmentTimeline {
            segments: vec![entry(Some(i64::MAX)), entry(Some(i64::MAX))],
        };
        assert_eq!(timeline.segment_count(), None);

        let largest = SegmentTimeline {
            segments: vec![entry(Some(i64::MAX)), entry(Some(i64::MAX - 1))],
        };
        assert_eq!(largest.segment_count(), Some(u64::MAX));
    }

    #[test]
    fn test_time_addressing() {
        let template = SegmentTemplate {
            media: Some("video_$RepresentationID$_$Time$.m4s".to_string()),
            ..Default::default()
        };
        assert!(template.uses_time_addressing());
        assert!(!SegmentTemplate::default().uses_time_addressing());
    }
}
