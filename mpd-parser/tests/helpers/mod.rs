//! Test helpers for fixture-based integration tests

#![allow(dead_code)]

use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

use mpd_parser::Mpd;

/// Path of a file in the fixtures directory
pub fn fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);
    path
}

/// Load a fixture as text
pub fn load_fixture(filename: &str) -> String {
    fs::read_to_string(fixture_path(filename))
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// Open a fixture as a buffered reader, the way callers feed files in
pub fn open_fixture(filename: &str) -> impl BufRead {
    let file = fs::File::open(fixture_path(filename))
        .unwrap_or_else(|e| panic!("Failed to open fixture {}: {}", filename, e));
    BufReader::new(file)
}

/// Parse a fixture, failing the test on error
pub fn parse_fixture(filename: &str) -> Mpd {
    mpd_parser::parse(open_fixture(filename))
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", filename, e))
}

/// Reader that yields `data` and then fails
pub struct FailingReader {
    data: io::Cursor<Vec<u8>>,
}

impl FailingReader {
    pub fn new(data: &str) -> Self {
        Self {
            data: io::Cursor::new(data.as_bytes().to_vec()),
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream reset")),
            n => Ok(n),
        }
    }
}
