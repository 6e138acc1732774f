//! Manifest-level timed signaling: `EventStream` and `Event`.

use std::io::BufRead;

use serde::Serialize;

use crate::common::xml_decode::{DecodeElement, Element, XmlDecoder};
use crate::error::ParseResult;

/// A group of events sharing one signaling scheme.
///
/// ```xml
/// <EventStream schemeIdUri="urn:uuid:XYZY" value="call" timescale="1000">
///   <Event presentationTime="0" duration="10000">+ 1 800 10101010</Event>
/// </EventStream>
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventStream {
    #[serde(rename = "@schemeIdUri", skip_serializing_if = "Option::is_none")]
    pub scheme_id_uri: Option<String>,

    #[serde(rename = "@value", skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Units per second for event `presentationTime` and `duration`
    #[serde(rename = "@timescale", skip_serializing_if = "Option::is_none")]
    pub timescale: Option<u64>,

    #[serde(rename = "Event", skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
}

impl EventStream {
    /// Find an event by its id.
    pub fn event(&self, id: u64) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }
}

impl DecodeElement for EventStream {
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        let mut stream = EventStream {
            scheme_id_uri: attrs.string("schemeIdUri"),
            value: attrs.string("value"),
            timescale: attrs.u64("timescale")?,
            events: Vec::new(),
        };

        decoder.children(&element, |d, child| match child.name().as_str() {
            "Event" => {
                let position = stream.events.len() as u64;
                stream.events.push(Event::decode_at(d, child, position)?);
                Ok(())
            }
            _ => d.skip(child),
        })?;

        Ok(stream)
    }
}

/// A single timed event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Start time relative to the period, in the stream's timescale
    #[serde(rename = "@presentationTime", skip_serializing_if = "Option::is_none")]
    pub presentation_time: Option<u64>,

    /// Duration in the stream's timescale
    #[serde(rename = "@duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,

    /// Explicit `id`, or the event's zero-based position in its stream
    #[serde(rename = "@id")]
    pub id: u64,

    #[serde(rename = "@messageData", skip_serializing_if = "Option::is_none")]
    pub message_data: Option<String>,

    /// Text body, exactly as written (whitespace included)
    #[serde(rename = "$text")]
    pub message: String,
}

impl Event {
    /// Decode an event that sits at `position` among its siblings.
    fn decode_at<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element, position: u64) -> ParseResult<Self> {
        let attrs = decoder.attributes(&element)?;
        let presentation_time = attrs.u64("presentationTime")?;
        let duration = attrs.u64("duration")?;
        let id = attrs.u64("id")?.unwrap_or(position);
        let message = decoder.children_with_text(&element, |d, child| d.skip(child))?;

        Ok(Event {
            presentation_time,
            duration,
            id,
            message_data: attrs.string("messageData"),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml_decode::RootElement;

    impl RootElement for EventStream {
        const TAG: &'static str = "EventStream";
    }

    fn decode(xml: &str) -> EventStream {
        XmlDecoder::new(xml.as_bytes()).decode_root().unwrap()
    }

    #[test]
    fn test_positional_ids() {
        let stream = decode(
            r#"<EventStream schemeIdUri="urn:uuid:XYZY" value="call" timescale="1000">
                 <Event presentationTime="0" duration="10000">+ 1 800 10101010</Event>
                 <Event presentationTime="20000" duration="10000">+ 1 800 10101011</Event>
                 <Event presentationTime="40000" duration="10000">+ 1 800 10101012</Event>
               </EventStream>"#,
        );

        assert_eq!(stream.scheme_id_uri.as_deref(), Some("urn:uuid:XYZY"));
        assert_eq!(stream.timescale, Some(1000));
        assert_eq!(stream.events.len(), 3);
        for (i, event) in stream.events.iter().enumerate() {
            assert_eq!(event.id, i as u64);
            assert_eq!(event.duration, Some(10000));
        }
        assert_eq!(stream.events[2].message, "+ 1 800 10101012");
    }

    #[test]
    fn test_explicit_id_wins() {
        let stream = decode(
            r#"<EventStream><Event id="7">a</Event><Event>b</Event><Event id="0">c</Event></EventStream>"#,
        );

        let ids: Vec<u64> = stream.events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![7, 1, 0]);
        assert_eq!(stream.event(7).map(|e| e.message.as_str()), Some("a"));
        assert_eq!(stream.event(1).map(|e| e.message.as_str()), Some("b"));
    }

    #[test]
    fn test_message_is_verbatim() {
        let stream = decode("<EventStream><Event>\n  spaced &lt;out&gt;  \n</Event><Event/></EventStream>");

        assert_eq!(stream.events[0].message, "\n  spaced <out>  \n");
        assert_eq!(stream.events[1].message, "");
        assert_eq!(stream.events[1].duration, None);
    }

    #[test]
    fn test_nested_signal_is_skipped() {
        let stream = decode(
            r#"<EventStream><Event presentationTime="5"><Signal><Binary>AAAA</Binary></Signal></Event></EventStream>"#,
        );

        assert_eq!(stream.events[0].presentation_time, Some(5));
        assert_eq!(stream.events[0].message, "");
    }
}
