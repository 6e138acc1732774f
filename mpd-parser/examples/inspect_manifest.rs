//! Inspect Manifest - prints the structure of an MPD file
//!
//! Parses the manifest given on the command line and prints one line per
//! period, adaptation set and representation. Parser debug output is shown
//! with `RUST_LOG=mpd_parser=debug`.
//!
//! Run with: cargo run -p mpd-parser --example inspect_manifest -- path/to/manifest.mpd

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::process;

use mpd_parser::{common::format_duration, AdaptationSet, Mpd, Period};

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: inspect_manifest <manifest.mpd>");
        process::exit(2);
    };

    let file = File::open(&path)?;
    let mpd = match mpd_parser::parse(BufReader::new(file)) {
        Ok(mpd) => mpd,
        Err(e) => {
            eprintln!("{}: {} ({:?})", path, e, e.kind());
            process::exit(1);
        }
    };

    print_manifest(&mpd);
    Ok(())
}

fn print_manifest(mpd: &Mpd) {
    let length = mpd
        .media_presentation_duration
        .map(format_duration)
        .unwrap_or_else(|| "open-ended".to_string());
    println!("MPD type={} duration={}", mpd.presentation_type(), length);

    if let Some(published) = mpd.publish_time {
        println!("  published {}", published.to_rfc3339());
    }
    for location in &mpd.locations {
        println!("  location {}", location);
    }

    for (index, period) in mpd.periods.iter().enumerate() {
        print_period(index, period);
    }
}

fn print_period(index: usize, period: &Period) {
    println!(
        "  Period[{}] id={} start={}",
        index,
        period.id.as_deref().unwrap_or("-"),
        period.start.map(format_duration).unwrap_or_else(|| "-".to_string())
    );

    for stream in &period.event_streams {
        println!(
            "    EventStream {} ({} events)",
            stream.scheme_id_uri.as_deref().unwrap_or("-"),
            stream.events.len()
        );
    }
    for set in &period.adaptation_sets {
        print_adaptation_set(set);
    }
}

fn print_adaptation_set(set: &AdaptationSet) {
    let kind = if set.is_video() {
        "video"
    } else if set.is_audio() {
        "audio"
    } else {
        "other"
    };
    println!(
        "    AdaptationSet {} lang={} representations={}",
        kind,
        set.lang.as_deref().unwrap_or("-"),
        set.representations.len()
    );

    for representation in &set.representations {
        println!(
            "      Representation id={} bandwidth={} codecs={}",
            representation.id.as_deref().unwrap_or("-"),
            representation.bandwidth.map(|b| b.to_string()).unwrap_or_else(|| "-".to_string()),
            representation.codecs.as_deref().unwrap_or("-")
        );
    }
}
