//! Entry points for reading an MPD.
//!
//! [`parse`] covers the common case. [`MpdParser`] carries the decoding
//! options and can be reused across documents.
//!
//! # Example
//!
//! ```rust
//! use mpd_parser::MpdParser;
//!
//! let parser = MpdParser::builder().with_max_depth(16).build();
//! let mpd = parser.parse(r#"<MPD type="static"><Period/></MPD>"#.as_bytes())?;
//! assert_eq!(mpd.periods.len(), 1);
//! # Ok::<(), mpd_parser::ParseError>(())
//! ```

use std::io::BufRead;

use crate::common::xml_decode::{XmlDecoder, DEFAULT_MAX_DEPTH};
use crate::error::ParseResult;
use crate::manifest::Mpd;

/// Options controlling how documents are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest element nesting accepted, counting the `MPD` root as 1
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Reusable MPD parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct MpdParser {
    options: ParseOptions,
}

impl MpdParser {
    /// Parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MpdParserBuilder {
        MpdParserBuilder::new()
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Read one MPD document from `reader`.
    ///
    /// The input is read forward once. Nothing is returned unless the whole
    /// document decodes; the first failure aborts the parse.
    pub fn parse<R: BufRead>(&self, reader: R) -> ParseResult<Mpd> {
        let mpd: Mpd = XmlDecoder::with_max_depth(reader, self.options.max_depth).decode_root()?;

        tracing::debug!(
            presentation_type = %mpd.presentation_type(),
            periods = mpd.periods.len(),
            "parsed MPD"
        );

        Ok(mpd)
    }
}

/// Builder for [`MpdParser`].
#[derive(Debug, Clone, Default)]
pub struct MpdParserBuilder {
    options: ParseOptions,
}

impl MpdParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit element nesting. Values below 1 are raised to 1.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth.max(1);
        self
    }

    pub fn build(self) -> MpdParser {
        MpdParser {
            options: self.options,
        }
    }
}

/// Parse an MPD document with default options.
///
/// ```rust
/// let mpd = mpd_parser::parse(r#"<MPD minBufferTime="PT1.5S"/>"#.as_bytes())?;
/// assert_eq!(mpd.min_buffer_time, Some(std::time::Duration::from_millis(1500)));
/// # Ok::<(), mpd_parser::ParseError>(())
/// ```
pub fn parse<R: BufRead>(reader: R) -> ParseResult<Mpd> {
    MpdParser::new().parse(reader)
}
