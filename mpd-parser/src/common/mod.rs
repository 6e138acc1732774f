//! Common utilities shared by the manifest model
//!
//! ## Available Utilities
//!
//! - [`iso8601`]: duration and date-time codecs for MPD scalar attributes
//! - [`xml_decode`]: streaming element decoder driving the model types
//! - [`attributes`]: typed attribute lookup used by the decoders
//! - [`xml_encode`]: serde helpers for writing the model back to XML
//!
//! ## Usage
//!
//! ```rust
//! use mpd_parser::common::iso8601::parse_duration;
//!
//! let duration = parse_duration("PT10M54.00S").unwrap();
//! assert_eq!(duration.as_secs(), 654);
//! ```

pub mod attributes;
pub mod iso8601;
pub mod xml_decode;
pub mod xml_encode;

// Re-export commonly used types for convenient access
pub use attributes::Attributes;
pub use iso8601::{format_date_time, format_duration, parse_date_time, parse_duration, ScalarError};
pub use xml_decode::{DecodeElement, Element, RootElement, XmlDecoder};
