//! Integration tests for error classification and locations

mod helpers;

use helpers::{load_fixture, FailingReader};
use mpd_parser::{ErrorKind, Mpd, ParseError};
use rstest::rstest;
use std::io::BufReader;

#[rstest]
#[case::empty("")]
#[case::not_xml("this is not a manifest")]
#[case::unknown_root(r#"<Playlist type="static"/>"#)]
#[case::truncated(r#"<MPD type="static"><Period id="1"><AdaptationSet>"#)]
#[case::mismatched(r#"<MPD><Period></AdaptationSet></MPD>"#)]
#[case::two_roots(r#"<MPD/><MPD/>"#)]
fn test_malformed_documents(#[case] xml: &str) {
    let err = Mpd::from_xml(xml).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDocument, "{}", err);
    assert!(err.location().is_none());
}

#[test]
fn test_truncated_fixture_is_rejected() {
    let xml = load_fixture("dynamic.mpd");
    let cut = &xml[..xml.len() / 2];

    let err = Mpd::from_xml(cut).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDocument);
}

#[rstest]
#[case(
    r#"<MPD mediaPresentationDuration="10 minutes"/>"#,
    ErrorKind::MalformedDuration,
    "MPD@mediaPresentationDuration"
)]
#[case(
    r#"<MPD publishTime="2013-13-10T22:03:00Z"/>"#,
    ErrorKind::MalformedTimestamp,
    "MPD@publishTime"
)]
#[case(
    r#"<MPD><Period/><Period duration="PTxM"/></MPD>"#,
    ErrorKind::MalformedDuration,
    "MPD/Period[1]@duration"
)]
#[case(
    r#"<MPD><Period><AdaptationSet/><AdaptationSet><Representation bandwidth="fast"/></AdaptationSet></Period></MPD>"#,
    ErrorKind::MalformedValue,
    "MPD/Period[0]/AdaptationSet[1]/Representation[0]@bandwidth"
)]
#[case(
    r#"<MPD><Period><EventStream><Event duration="-5"/></EventStream></Period></MPD>"#,
    ErrorKind::MalformedValue,
    "MPD/Period[0]/EventStream[0]/Event[0]@duration"
)]
#[case(
    r#"<MPD><Period><AdaptationSet segmentAlignment="maybe"/></Period></MPD>"#,
    ErrorKind::MalformedValue,
    "MPD/Period[0]/AdaptationSet[0]@segmentAlignment"
)]
fn test_error_locations(#[case] xml: &str, #[case] kind: ErrorKind, #[case] location: &str) {
    let err = Mpd::from_xml(xml).unwrap_err();

    assert_eq!(err.kind(), kind, "{}", err);
    assert_eq!(err.location().unwrap().to_string(), location);
    assert!(err.to_string().contains(location));
}

#[test]
fn test_scalar_error_keeps_source() {
    let err = Mpd::from_xml(r#"<MPD minBufferTime="1.5"/>"#).unwrap_err();

    let source = std::error::Error::source(&err).expect("scalar errors carry their cause");
    assert!(source.to_string().contains("missing 'P' designator"));
}

#[test]
fn test_document_error_names_path() {
    let err = Mpd::from_xml(r#"<MPD><Period id="1"><AdaptationSet></Period></MPD>"#).unwrap_err();

    match err {
        ParseError::MalformedDocument { path, .. } => {
            assert_eq!(path.to_string(), "MPD/Period[0]/AdaptationSet[0]");
        }
        other => panic!("Expected MalformedDocument, got {:?}", other),
    }
}

#[test]
fn test_reader_failure_is_io() {
    let reader = BufReader::new(FailingReader::new(r#"<MPD type="static"><Period>"#));

    let err = mpd_parser::parse(reader).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(matches!(err, ParseError::Io(ref e) if e.kind() == std::io::ErrorKind::ConnectionReset));
}
