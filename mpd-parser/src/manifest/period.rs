//! `Period`: a time slice of the presentation with its own tracks.

use std::io::BufRead;
use std::time::Duration;

use serde::Serialize;

use crate::common::xml_decode::{DecodeElement, Element, XmlDecoder};
use crate::common::xml_encode::optional_duration;
use crate::error::ParseResult;
use crate::manifest::adaptation_set::AdaptationSet;
use crate::manifest::descriptor::BaseUrl;
use crate::manifest::event_stream::EventStream;
use crate::manifest::segment::{SegmentBase, SegmentTemplate};

/// A Period of the presentation.
///
/// `start` and `duration` are kept exactly as present in the document;
/// deriving missing values from neighbouring periods is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Period {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(
        rename = "@start",
        serialize_with = "optional_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<Duration>,

    #[serde(
        rename = "@duration",
        serialize_with = "optional_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration: Option<Duration>,

    #[serde(rename = "@bitstreamSwitching", skip_serializing_if = "Option::is_none")]
    pub bitstream_switching: Option<bool>,

    #[serde(rename = "BaseURL", skip_serializing_if = "Vec::is_empty")]
    pub base_urls: Vec<BaseUrl>,

    #[serde(rename = "SegmentBase", skip_serializing_if = "Option::is_none")]
    pub segment_base: Option<SegmentBase>,

    #[serde(rename = "SegmentTemplate", skip_serializing_if = "Option::is_none")]
    pub segment_template: Option<SegmentTemplate>,

    #[serde(rename = "EventStream", skip_serializing_if = "Vec::is_empty")]
    pub event_streams: Vec<EventStream>,

    #[serde(rename = "AdaptationSet", skip_serializing_if = "Vec::is_empty")]
    pub adaptation_sets: Vec<AdaptationSet>,
}

impl Period {
    /// Adaptation sets carrying audio.
    pub fn audio_sets(&self) -> impl Iterator<Item = &AdaptationSet> {
        self.adaptation_sets.iter().filter(|set| set.is_audio())
    }

    /// Adaptation sets carrying video.
    pub fn video_sets(&self) -> impl Iterator<Item = &AdaptationSet> {
        self.adaptation_sets.iter().filter(|set| set.is_video())
    }
}

impl DecodeElement for Period {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        let mut period = Period {
            id: attrs.string("id"),
            start: attrs.duration("start")?,
            duration: attrs.duration("duration")?,
            bitstream_switching: attrs.bool("bitstreamSwitching")?,
            ..Default::default()
        };

        decoder.children(&element, |d, child| match child.name().as_str() {
            "BaseURL" => {
                period.base_urls.push(d.decode(child)?);
                Ok(())
            }
            "SegmentBase" if period.segment_base.is_none() => {
                period.segment_base = Some(d.decode(child)?);
                Ok(())
            }
            "SegmentTemplate" if period.segment_template.is_none() => {
                period.segment_template = Some(d.decode(child)?);
                Ok(())
            }
            "EventStream" => {
                period.event_streams.push(d.decode(child)?);
                Ok(())
            }
            "AdaptationSet" => {
                period.adaptation_sets.push(d.decode(child)?);
                Ok(())
            }
            _ => d.skip(child),
        })?;

        Ok(period)
    }
}
