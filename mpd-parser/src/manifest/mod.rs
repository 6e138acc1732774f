//! Typed model of an MPD document.
//!
//! One module per element family. Every type decodes itself through
//! [`crate::common::DecodeElement`] and serializes back with serde.

pub mod adaptation_set;
pub mod descriptor;
pub mod event_stream;
pub mod mpd;
pub mod period;
pub mod representation;
pub mod segment;

pub use adaptation_set::AdaptationSet;
pub use descriptor::{AudioChannelConfiguration, BaseUrl, Descriptor, InbandEventStream};
pub use event_stream::{Event, EventStream};
pub use mpd::{Mpd, PresentationType, UnknownPresentationType, DASH_NAMESPACE};
pub use period::Period;
pub use representation::Representation;
pub use segment::{Initialization, SegmentBase, SegmentTemplate, SegmentTimeline, SegmentTimelineEntry};
