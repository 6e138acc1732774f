//! Scheme descriptors and base URLs.

use std::io::BufRead;

use serde::Serialize;

use crate::common::xml_decode::{DecodeElement, Element, XmlDecoder};
use crate::error::ParseResult;

/// A `DescriptorType` element: a scheme URI plus an optional value.
///
/// The same shape is used by several MPD elements, distinguished only by
/// their tag:
/// ```xml
/// <AudioChannelConfiguration schemeIdUri="urn:mpeg:dash:23003:3:audio_channel_configuration:2011" value="2"/>
/// <InbandEventStream schemeIdUri="urn:mpeg:dash:event:2012" value="1"/>
/// <Role schemeIdUri="urn:mpeg:dash:role:2011" value="main"/>
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    #[serde(rename = "@schemeIdUri", skip_serializing_if = "Option::is_none")]
    pub scheme_id_uri: Option<String>,

    #[serde(rename = "@value", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Audio channel layout of a Representation or AdaptationSet.
pub type AudioChannelConfiguration = Descriptor;

/// Signals that event messages of a scheme are carried inside the media
/// segments rather than in the manifest.
pub type InbandEventStream = Descriptor;

impl Descriptor {
    /// Whether this descriptor uses the given scheme.
    pub fn has_scheme(&self, scheme_id_uri: &str) -> bool {
        self.scheme_id_uri.as_deref() == Some(scheme_id_uri)
    }
}

impl DecodeElement for Descriptor {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        decoder.skip(element)?;

        Ok(Descriptor {
            scheme_id_uri: attrs.string("schemeIdUri"),
            value: attrs.string("value"),
            id: attrs.string("id"),
        })
    }
}

/// A `BaseURL` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BaseUrl {
    #[serde(rename = "@serviceLocation", skip_serializing_if = "Option::is_none")]
    pub service_location: Option<String>,

    #[serde(rename = "@byteRange", skip_serializing_if = "Option::is_none")]
    pub byte_range: Option<String>,

    /// The URL, with surrounding whitespace removed
    #[serde(rename = "$text")]
    pub url: String,
}

impl DecodeElement for BaseUrl {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        let url = decoder.text(element)?;

        Ok(BaseUrl {
            service_location: attrs.string("serviceLocation"),
            byte_range: attrs.string("byteRange"),
            url: url.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml_decode::RootElement;

    #[derive(Debug)]
    struct Probe<T>(T);

    impl RootElement for Probe<Descriptor> {
        const TAG: &'static str = "Role";
    }

    impl RootElement for Probe<BaseUrl> {
        const TAG: &'static str = "BaseURL";
    }

    impl<T: DecodeElement> DecodeElement for Probe<T> {
        fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
            T::decode(decoder, element).map(Probe)
        }
    }

    #[test]
    fn test_decode_descriptor() {
        let xml = r#"<Role schemeIdUri="urn:mpeg:dash:role:2011" value="main" extra="ignored"><Child/></Role>"#;
        let Probe(role) = XmlDecoder::new(xml.as_bytes()).decode_root::<Probe<Descriptor>>().unwrap();

        assert!(role.has_scheme("urn:mpeg:dash:role:2011"));
        assert_eq!(role.value.as_deref(), Some("main"));
        assert_eq!(role.id, None);
    }

    #[test]
    fn test_decode_base_url_trims_text() {
        let xml = "<BaseURL serviceLocation=\"cdn1\">\n  https://cdn1.example.com/video/\n</BaseURL>";
        let Probe(base) = XmlDecoder::new(xml.as_bytes()).decode_root::<Probe<BaseUrl>>().unwrap();

        assert_eq!(base.url, "https://cdn1.example.com/video/");
        assert_eq!(base.service_location.as_deref(), Some("cdn1"));
        assert_eq!(base.byte_range, None);
    }
}
