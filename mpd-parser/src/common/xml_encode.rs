//! Serialization helpers for writing the model back to MPD XML.
//!
//! The model types derive `Serialize` with quick-xml naming conventions
//! (`@name` for attributes, `$text` for text content). Durations and
//! timestamps go through the canonical ISO-8601 writers in
//! [`crate::common::iso8601`].

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};

use crate::common::iso8601::{format_date_time, format_duration};
use crate::error::{ParseError, ParseResult};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Serialize `value` as the document root `root`, with an XML declaration
/// and, when given, a default namespace on the root element.
pub fn to_xml_document<T: Serialize>(root: &str, namespace: Option<&str>, value: &T) -> ParseResult<String> {
    let body = quick_xml::se::to_string_with_root(root, value)
        .map_err(|e| ParseError::SerializationFailed(e.to_string()))?;

    let open = format!("<{}", root);
    let body = match namespace {
        Some(ns) if body.starts_with(&open) => {
            format!("{} xmlns=\"{}\"{}", open, ns, &body[open.len()..])
        }
        _ => body,
    };

    Ok(format!("{}\n{}", XML_DECLARATION, body))
}

/// `serialize_with` helper for optional `xs:duration` attributes.
pub fn optional_duration<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(duration) => serializer.serialize_str(&format_duration(*duration)),
        None => serializer.serialize_none(),
    }
}

/// `serialize_with` helper for optional `xs:dateTime` attributes.
pub fn optional_date_time<S: Serializer>(
    value: &Option<DateTime<FixedOffset>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(instant) => serializer.serialize_str(&format_date_time(instant)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Clip {
        #[serde(rename = "@length", serialize_with = "optional_duration", skip_serializing_if = "Option::is_none")]
        length: Option<Duration>,
        #[serde(rename = "@at", serialize_with = "optional_date_time", skip_serializing_if = "Option::is_none")]
        at: Option<DateTime<FixedOffset>>,
    }

    #[test]
    fn test_writes_scalar_attributes() {
        let clip = Clip {
            length: Some(Duration::from_secs(654)),
            at: Some(DateTime::parse_from_rfc3339("2013-08-10T22:03:00Z").unwrap()),
        };

        let xml = to_xml_document("Clip", Some("urn:test"), &clip).unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"<Clip xmlns="urn:test" "#));
        assert!(xml.contains(r#"length="PT10M54S""#));
        assert!(xml.contains(r#"at="2013-08-10T22:03:00Z""#));
    }

    #[test]
    fn test_skips_absent_attributes() {
        let clip = Clip { length: None, at: None };

        let xml = to_xml_document("Clip", None, &clip).unwrap();
        assert!(!xml.contains("length"));
        assert!(!xml.contains("at="));
    }
}
