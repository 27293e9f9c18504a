//! # Adaptive
//!
//! Live segment index of an adaptive-bitrate representation.
//!
//! - [`SegmentList`] keeps the ordered window of [`Segment`]s, merges manifest
//!   refreshes into it, prunes stale entries and maps between playback time
//!   and sequence numbers.
//! - [`SegmentLease`] marks a segment as in use so pruning leaves it alone.
//! - [`IndexReader`] turns a segment index block into split points and
//!   installs them on a [`SplitPointSink`] such as a [`Representation`].
//!
//! ## License
//!
//! MIT License
//!
//! ## Authors
//!
//! - hua0512
//!

pub mod config;
mod error;
mod index_reader;
mod representation;
mod segment;
mod segment_list;

#[cfg(test)]
mod test_utils;

pub use config::{RepresentationConfig, SegmentListConfig};
pub use error::AdaptiveError;
pub use index_reader::{IndexOutcome, IndexReader};
pub use media_types::{CLOCK_FREQ, ByteRange, SplitPoint, Tick, Timescale};
pub use representation::{Representation, SplitPointSink};
pub use segment::{ListId, Segment, SegmentLease, SubSegment};
pub use segment_list::SegmentList;
