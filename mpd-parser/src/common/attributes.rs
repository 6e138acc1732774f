//! Typed attribute lookup for decoded elements.
//!
//! Attributes are matched by local name, case-sensitively. An unprefixed
//! attribute takes precedence over prefixed ones with the same local name,
//! so extension attributes never shadow the element's own. Namespace
//! declarations are dropped, and lookups for names the element does not
//! carry simply return `None`.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use quick_xml::events::BytesStart;

use crate::common::iso8601::{parse_date_time, parse_duration};
use crate::error::{AttributeLocation, ElementPath, ParseError, ParseResult};

#[derive(Debug, Clone)]
struct Item {
    name: String,
    value: String,
    prefixed: bool,
}

/// The attributes of one element, unescaped, in document order.
#[derive(Debug, Clone)]
pub struct Attributes {
    path: ElementPath,
    items: Vec<Item>,
}

impl Attributes {
    /// Collect the attributes of a start tag. The error is a human-readable
    /// reason; the caller attaches document position.
    pub(crate) fn read(start: &BytesStart<'_>, path: &ElementPath) -> Result<Self, String> {
        let mut items = Vec::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }

            let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| e.to_string())?.into_owned();
            items.push(Item {
                name,
                value,
                prefixed: attr.key.prefix().is_some(),
            });
        }

        Ok(Self {
            path: path.clone(),
            items,
        })
    }

    /// Raw text of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        let mut matching = self.items.iter().filter(|item| item.name == name);
        let first = matching.next()?;
        if !first.prefixed {
            return Some(first.value.as_str());
        }
        let plain = matching.find(|item| !item.prefixed).unwrap_or(first);
        Some(plain.value.as_str())
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string)
    }

    /// Parse an attribute with its `FromStr` implementation.
    pub fn parse<T: FromStr>(&self, name: &str, expected: &'static str) -> ParseResult<Option<T>> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|_| self.malformed_value(name, raw, expected)),
        }
    }

    pub fn u64(&self, name: &str) -> ParseResult<Option<u64>> {
        self.parse(name, "an unsigned integer")
    }

    pub fn i64(&self, name: &str) -> ParseResult<Option<i64>> {
        self.parse(name, "an integer")
    }

    pub fn f64(&self, name: &str) -> ParseResult<Option<f64>> {
        self.parse(name, "a decimal number")
    }

    /// `xs:boolean`: `true`, `false`, `1` or `0`.
    pub fn bool(&self, name: &str) -> ParseResult<Option<bool>> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => match raw.trim() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" => Ok(Some(false)),
                _ => Err(self.malformed_value(name, raw, "a boolean")),
            },
        }
    }

    /// `xs:duration`, e.g. `PT10M54.00S`.
    pub fn duration(&self, name: &str) -> ParseResult<Option<Duration>> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => parse_duration(raw).map(Some).map_err(|source| ParseError::Scalar {
                location: self.location(name),
                source,
            }),
        }
    }

    /// `xs:dateTime` in its RFC 3339 form.
    pub fn date_time(&self, name: &str) -> ParseResult<Option<DateTime<FixedOffset>>> {
        match self.get(name) {
            None => Ok(None),
            Some(raw) => parse_date_time(raw).map(Some).map_err(|source| ParseError::Scalar {
                location: self.location(name),
                source,
            }),
        }
    }

    pub(crate) fn malformed_value(&self, name: &str, raw: &str, expected: &'static str) -> ParseError {
        ParseError::MalformedValue {
            location: self.location(name),
            value: raw.to_string(),
            expected,
        }
    }

    fn location(&self, name: &str) -> AttributeLocation {
        AttributeLocation {
            path: self.path.clone(),
            attribute: name.to_string(),
        }
    }
}
