//! `Representation`: one encoded variant of a track.

use std::io::BufRead;

use serde::Serialize;

use crate::common::xml_decode::{DecodeElement, Element, XmlDecoder};
use crate::error::ParseResult;
use crate::manifest::descriptor::{AudioChannelConfiguration, BaseUrl, InbandEventStream};
use crate::manifest::segment::{SegmentBase, SegmentTemplate};

/// One bitrate/codec variant within an [`AdaptationSet`](crate::AdaptationSet).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Representation {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Average bandwidth in bits per second
    #[serde(rename = "@bandwidth", skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u64>,

    #[serde(rename = "@qualityRanking", skip_serializing_if = "Option::is_none")]
    pub quality_ranking: Option<u64>,

    #[serde(rename = "@dependencyId", skip_serializing_if = "Option::is_none")]
    pub dependency_id: Option<String>,

    #[serde(rename = "@mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// RFC 6381 codecs string, e.g. `avc1.4D401F`
    #[serde(rename = "@codecs", skip_serializing_if = "Option::is_none")]
    pub codecs: Option<String>,

    #[serde(rename = "@width", skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,

    #[serde(rename = "@height", skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,

    /// Frame rate, possibly a fraction such as `30000/1001`
    #[serde(rename = "@frameRate", skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<String>,

    #[serde(rename = "@sar", skip_serializing_if = "Option::is_none")]
    pub sar: Option<String>,

    #[serde(rename = "@audioSamplingRate", skip_serializing_if = "Option::is_none")]
    pub audio_sampling_rate: Option<String>,

    #[serde(rename = "@startWithSAP", skip_serializing_if = "Option::is_none")]
    pub start_with_sap: Option<u64>,

    #[serde(rename = "BaseURL", skip_serializing_if = "Vec::is_empty")]
    pub base_urls: Vec<BaseUrl>,

    #[serde(rename = "AudioChannelConfiguration", skip_serializing_if = "Vec::is_empty")]
    pub audio_channel_configurations: Vec<AudioChannelConfiguration>,

    #[serde(rename = "InbandEventStream", skip_serializing_if = "Vec::is_empty")]
    pub inband_event_streams: Vec<InbandEventStream>,

    #[serde(rename = "SegmentBase", skip_serializing_if = "Option::is_none")]
    pub segment_base: Option<SegmentBase>,

    #[serde(rename = "SegmentTemplate", skip_serializing_if = "Option::is_none")]
    pub segment_template: Option<SegmentTemplate>,
}

impl DecodeElement for Representation {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        let mut rep = Representation {
            id: attrs.string("id"),
            bandwidth: attrs.u64("bandwidth")?,
            quality_ranking: attrs.u64("qualityRanking")?,
            dependency_id: attrs.string("dependencyId"),
            mime_type: attrs.string("mimeType"),
            codecs: attrs.string("codecs"),
            width: attrs.u64("width")?,
            height: attrs.u64("height")?,
            frame_rate: attrs.string("frameRate"),
            sar: attrs.string("sar"),
            audio_sampling_rate: attrs.string("audioSamplingRate"),
            start_with_sap: attrs.u64("startWithSAP")?,
            ..Default::default()
        };

        decoder.children(&element, |d, child| match child.name().as_str() {
            "BaseURL" => {
                rep.base_urls.push(d.decode(child)?);
                Ok(())
            }
            "AudioChannelConfiguration" => {
                rep.audio_channel_configurations.push(d.decode(child)?);
                Ok(())
            }
            "InbandEventStream" => {
                rep.inband_event_streams.push(d.decode(child)?);
                Ok(())
            }
            "SegmentBase" if rep.segment_base.is_none() => {
                rep.segment_base = Some(d.decode(child)?);
                Ok(())
            }
            "SegmentTemplate" if rep.segment_template.is_none() => {
                rep.segment_template = Some(d.decode(child)?);
                Ok(())
            }
            _ => d.skip(child),
        })?;

        Ok(rep)
    }
}
