//! `AdaptationSet`: a group of interchangeable track variants.

use std::io::BufRead;

use serde::Serialize;

use crate::common::xml_decode::{DecodeElement, Element, XmlDecoder};
use crate::error::ParseResult;
use crate::manifest::descriptor::{AudioChannelConfiguration, BaseUrl, Descriptor, InbandEventStream};
use crate::manifest::representation::Representation;
use crate::manifest::segment::{SegmentBase, SegmentTemplate};

/// One alternative track group, such as a single language's audio.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdaptationSet {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(rename = "@group", skip_serializing_if = "Option::is_none")]
    pub group: Option<u64>,

    /// `audio`, `video`, `text`, ...
    #[serde(rename = "@contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(rename = "@mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(rename = "@codecs", skip_serializing_if = "Option::is_none")]
    pub codecs: Option<String>,

    /// RFC 5646 language tag
    #[serde(rename = "@lang", skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    #[serde(rename = "@par", skip_serializing_if = "Option::is_none")]
    pub par: Option<String>,

    #[serde(rename = "@frameRate", skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<String>,

    #[serde(rename = "@audioSamplingRate", skip_serializing_if = "Option::is_none")]
    pub audio_sampling_rate: Option<String>,

    #[serde(rename = "@width", skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,

    #[serde(rename = "@height", skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,

    #[serde(rename = "@minBandwidth", skip_serializing_if = "Option::is_none")]
    pub min_bandwidth: Option<u64>,

    #[serde(rename = "@maxBandwidth", skip_serializing_if = "Option::is_none")]
    pub max_bandwidth: Option<u64>,

    #[serde(rename = "@maxWidth", skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u64>,

    #[serde(rename = "@maxHeight", skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u64>,

    #[serde(rename = "@segmentAlignment", skip_serializing_if = "Option::is_none")]
    pub segment_alignment: Option<bool>,

    #[serde(rename = "@subsegmentAlignment", skip_serializing_if = "Option::is_none")]
    pub subsegment_alignment: Option<bool>,

    #[serde(rename = "@startWithSAP", skip_serializing_if = "Option::is_none")]
    pub start_with_sap: Option<u64>,

    #[serde(rename = "Accessibility", skip_serializing_if = "Vec::is_empty")]
    pub accessibilities: Vec<Descriptor>,

    #[serde(rename = "Role", skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Descriptor>,

    #[serde(rename = "AudioChannelConfiguration", skip_serializing_if = "Vec::is_empty")]
    pub audio_channel_configurations: Vec<AudioChannelConfiguration>,

    #[serde(rename = "InbandEventStream", skip_serializing_if = "Vec::is_empty")]
    pub inband_event_streams: Vec<InbandEventStream>,

    #[serde(rename = "BaseURL", skip_serializing_if = "Vec::is_empty")]
    pub base_urls: Vec<BaseUrl>,

    #[serde(rename = "SegmentBase", skip_serializing_if = "Option::is_none")]
    pub segment_base: Option<SegmentBase>,

    #[serde(rename = "SegmentTemplate", skip_serializing_if = "Option::is_none")]
    pub segment_template: Option<SegmentTemplate>,

    #[serde(rename = "Representation", skip_serializing_if = "Vec::is_empty")]
    pub representations: Vec<Representation>,
}

impl AdaptationSet {
    /// Whether this set carries audio, judged by `contentType` and then `mimeType`.
    pub fn is_audio(&self) -> bool {
        self.media_kind() == Some("audio")
    }

    /// Whether this set carries video, judged by `contentType` and then `mimeType`.
    pub fn is_video(&self) -> bool {
        self.media_kind() == Some("video")
    }

    fn media_kind(&self) -> Option<&str> {
        if let Some(content_type) = self.content_type.as_deref() {
            return Some(content_type);
        }
        self.mime_type
            .as_deref()
            .or_else(|| {
                self.representations
                    .first()
                    .and_then(|r| r.mime_type.as_deref())
            })
            .and_then(|mime| mime.split('/').next())
    }
}

impl DecodeElement for AdaptationSet {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        let mut set = AdaptationSet {
            id: attrs.u64("id")?,
            group: attrs.u64("group")?,
            content_type: attrs.string("contentType"),
            mime_type: attrs.string("mimeType"),
            codecs: attrs.string("codecs"),
            lang: attrs.string("lang"),
            par: attrs.string("par"),
            frame_rate: attrs.string("frameRate"),
            audio_sampling_rate: attrs.string("audioSamplingRate"),
            width: attrs.u64("width")?,
            height: attrs.u64("height")?,
            min_bandwidth: attrs.u64("minBandwidth")?,
            max_bandwidth: attrs.u64("maxBandwidth")?,
            max_width: attrs.u64("maxWidth")?,
            max_height: attrs.u64("maxHeight")?,
            segment_alignment: attrs.bool("segmentAlignment")?,
            subsegment_alignment: attrs.bool("subsegmentAlignment")?,
            start_with_sap: attrs.u64("startWithSAP")?,
            ..Default::default()
        };

        decoder.children(&element, |d, child| match child.name().as_str() {
            "Accessibility" => {
                set.accessibilities.push(d.decode(child)?);
                Ok(())
            }
            "Role" => {
                set.roles.push(d.decode(child)?);
                Ok(())
            }
            "AudioChannelConfiguration" => {
                set.audio_channel_configurations.push(d.decode(child)?);
                Ok(())
            }
            "InbandEventStream" => {
                set.inband_event_streams.push(d.decode(child)?);
                Ok(())
            }
            "BaseURL" => {
                set.base_urls.push(d.decode(child)?);
                Ok(())
            }
            "SegmentBase" if set.segment_base.is_none() => {
                set.segment_base = Some(d.decode(child)?);
                Ok(())
            }
            "SegmentTemplate" if set.segment_template.is_none() => {
                set.segment_template = Some(d.decode(child)?);
                Ok(())
            }
            "Representation" => {
                set.representations.push(d.decode(child)?);
                Ok(())
            }
            _ => d.skip(child),
        })?;

        Ok(set)
    }
}
