//! The `MPD` root element.

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};

use crate::common::xml_decode::{DecodeElement, Element, RootElement, XmlDecoder};
use crate::common::xml_encode::{optional_date_time, optional_duration, to_xml_document};
use crate::error::{ParseError, ParseResult};
use crate::manifest::descriptor::{BaseUrl, Descriptor};
use crate::manifest::period::Period;

/// Default namespace written on the root element by [`Mpd::to_xml`].
pub const DASH_NAMESPACE: &str = "urn:mpeg:dash:schema:mpd:2011";

/// Whether the presentation is on-demand or live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationType {
    /// On-demand, fixed duration
    #[default]
    Static,
    /// Live, periodically refreshed
    Dynamic,
}

impl PresentationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationType::Static => "static",
            PresentationType::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for PresentationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a `type` value other than `static` or `dynamic`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPresentationType;

impl FromStr for PresentationType {
    type Err = UnknownPresentationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(PresentationType::Static),
            "dynamic" => Ok(PresentationType::Dynamic),
            _ => Err(UnknownPresentationType),
        }
    }
}

impl Serialize for PresentationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Root of a parsed Media Presentation Description.
///
/// ```xml
/// <MPD xmlns="urn:mpeg:dash:schema:mpd:2011" type="dynamic"
///      publishTime="2013-08-10T22:03:00Z" minBufferTime="PT1.5S">
///   <Period id="1">...</Period>
/// </MPD>
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mpd {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "@profiles", skip_serializing_if = "Option::is_none")]
    pub profiles: Option<String>,

    /// The `type` attribute as written; see [`Mpd::presentation_type`]
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub presentation_type: Option<PresentationType>,

    #[serde(
        rename = "@availabilityStartTime",
        serialize_with = "optional_date_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub availability_start_time: Option<DateTime<FixedOffset>>,

    #[serde(
        rename = "@availabilityEndTime",
        serialize_with = "optional_date_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub availability_end_time: Option<DateTime<FixedOffset>>,

    #[serde(
        rename = "@publishTime",
        serialize_with = "optional_date_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub publish_time: Option<DateTime<FixedOffset>>,

    /// Absent for open-ended live presentations
    #[serde(
        rename = "@mediaPresentationDuration",
        serialize_with = "optional_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub media_presentation_duration: Option<Duration>,

    #[serde(
        rename = "@minimumUpdatePeriod",
        serialize_with = "optional_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_update_period: Option<Duration>,

    #[serde(
        rename = "@minBufferTime",
        serialize_with = "optional_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_buffer_time: Option<Duration>,

    #[serde(
        rename = "@timeShiftBufferDepth",
        serialize_with = "optional_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_shift_buffer_depth: Option<Duration>,

    #[serde(
        rename = "@suggestedPresentationDelay",
        serialize_with = "optional_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub suggested_presentation_delay: Option<Duration>,

    #[serde(
        rename = "@maxSegmentDuration",
        serialize_with = "optional_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_segment_duration: Option<Duration>,

    #[serde(
        rename = "@maxSubsegmentDuration",
        serialize_with = "optional_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_subsegment_duration: Option<Duration>,

    #[serde(rename = "BaseURL", skip_serializing_if = "Vec::is_empty")]
    pub base_urls: Vec<BaseUrl>,

    /// Alternative locations the manifest can be refreshed from
    #[serde(rename = "Location", skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,

    #[serde(rename = "Period", skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<Period>,

    #[serde(rename = "UTCTiming", skip_serializing_if = "Vec::is_empty")]
    pub utc_timings: Vec<Descriptor>,
}

impl Mpd {
    /// Parse an MPD from a buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> ParseResult<Self> {
        crate::parser::parse(reader)
    }

    /// Parse an MPD held in memory.
    pub fn from_xml(xml: &str) -> ParseResult<Self> {
        Self::from_reader(xml.as_bytes())
    }

    /// Write the MPD back to XML.
    ///
    /// Durations and timestamps are written in canonical form, so the text
    /// may differ from the input document while parsing back to an equal tree.
    pub fn to_xml(&self) -> ParseResult<String> {
        to_xml_document(<Self as RootElement>::TAG, Some(DASH_NAMESPACE), self)
    }

    /// The presentation type, applying the schema default of `static`.
    pub fn presentation_type(&self) -> PresentationType {
        self.presentation_type.unwrap_or_default()
    }

    pub fn is_dynamic(&self) -> bool {
        self.presentation_type() == PresentationType::Dynamic
    }

    /// A dynamic presentation with no known end.
    pub fn is_live(&self) -> bool {
        self.is_dynamic() && self.media_presentation_duration.is_none()
    }
}

impl FromStr for Mpd {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_xml(s)
    }
}

impl RootElement for Mpd {
    const TAG: &'static str = "MPD";
}

impl DecodeElement for Mpd {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        let mut mpd = Mpd {
            id: attrs.string("id"),
            profiles: attrs.string("profiles"),
            presentation_type: attrs.parse("type", "`static` or `dynamic`")?,
            availability_start_time: attrs.date_time("availabilityStartTime")?,
            availability_end_time: attrs.date_time("availabilityEndTime")?,
            publish_time: attrs.date_time("publishTime")?,
            media_presentation_duration: attrs.duration("mediaPresentationDuration")?,
            minimum_update_period: attrs.duration("minimumUpdatePeriod")?,
            min_buffer_time: attrs.duration("minBufferTime")?,
            time_shift_buffer_depth: attrs.duration("timeShiftBufferDepth")?,
            suggested_presentation_delay: attrs.duration("suggestedPresentationDelay")?,
            max_segment_duration: attrs.duration("maxSegmentDuration")?,
            max_subsegment_duration: attrs.duration("maxSubsegmentDuration")?,
            ..Default::default()
        };

        decoder.children(&element, |d, child| match child.name().as_str() {
            "BaseURL" => {
                mpd.base_urls.push(d.decode(child)?);
                Ok(())
            }
            "Location" => {
                let location = d.text(child)?;
                mpd.locations.push(location.trim().to_string());
                Ok(())
            }
            "Period" => {
                mpd.periods.push(d.decode(child)?);
                Ok(())
            }
            "UTCTiming" => {
                mpd.utc_timings.push(d.decode(child)?);
                Ok(())
            }
            _ => d.skip(child),
        })?;

        Ok(mpd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_presentation_type_default() {
        let mpd = Mpd::default();
        assert_eq!(mpd.presentation_type, None);
        assert_eq!(mpd.presentation_type(), PresentationType::Static);
        assert!(!mpd.is_live());
    }

    #[test]
    fn test_live_requires_open_end() {
        let live = Mpd {
            presentation_type: Some(PresentationType::Dynamic),
            ..Default::default()
        };
        assert!(live.is_live());

        let bounded = Mpd {
            media_presentation_duration: Some(Duration::from_secs(654)),
            ..live.clone()
        };
        assert!(bounded.is_dynamic());
        assert!(!bounded.is_live());
    }

    #[test]
    fn test_unknown_presentation_type() {
        let err = Mpd::from_xml(r#"<MPD type="live"/>"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedValue);
        assert_eq!(err.location().unwrap().to_string(), "MPD@type");
    }

    #[test]
    fn test_locations_and_timing() {
        let mpd: Mpd = r#"<MPD type="dynamic">
              <Location> https://example.com/live.mpd </Location>
              <UTCTiming schemeIdUri="urn:mpeg:dash:utc:http-iso:2014" value="https://time.example.com/"/>
            </MPD>"#
            .parse()
            .unwrap();

        assert_eq!(mpd.locations, vec!["https://example.com/live.mpd"]);
        assert_eq!(mpd.utc_timings.len(), 1);
        assert!(mpd.utc_timings[0].has_scheme("urn:mpeg:dash:utc:http-iso:2014"));
        assert!(mpd.periods.is_empty());
    }
}
