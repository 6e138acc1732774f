//! # mpd-parser
//!
//! A strongly-typed parser for DASH Media Presentation Description (MPD)
//! manifests. It turns the XML document into a tree of plain Rust values:
//! periods, adaptation sets, representations and event streams, with
//! durations as [`std::time::Duration`] and timestamps as
//! [`chrono::DateTime`].
//!
//! ## Usage
//!
//! ### Top-level convenience access
//! ```rust
//! use mpd_parser::{Mpd, ParseResult};
//!
//! # fn main() -> ParseResult<()> {
//! let mpd = Mpd::from_xml(r#"<MPD type="dynamic" publishTime="2013-08-10T22:03:00Z"/>"#)?;
//! assert!(mpd.is_live());
//! # Ok(())
//! # }
//! ```
//!
//! ### Reading from any buffered source
//! ```rust,no_run
//! use std::{fs::File, io::BufReader};
//!
//! let file = File::open("manifest.mpd")?;
//! let mpd = mpd_parser::parse(BufReader::new(file))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Model and codec access
//! ```rust
//! use mpd_parser::manifest::{AdaptationSet, Period};
//! use mpd_parser::common::iso8601::parse_duration;
//! ```

pub mod common;
pub mod error;
pub mod manifest;
pub mod parser;

// Re-export error types for convenient top-level access
pub use error::{AttributeLocation, ElementPath, ErrorKind, ParseError, ParseResult};

// Re-export the model for convenient top-level access
pub use manifest::{
    AdaptationSet, AudioChannelConfiguration, BaseUrl, Descriptor, Event, EventStream,
    InbandEventStream, Mpd, Period, PresentationType, Representation, SegmentBase,
    SegmentTemplate, SegmentTimeline,
};

pub use parser::{parse, MpdParser, MpdParserBuilder, ParseOptions};
