//! Minimal ISOBMFF helpers for segment indexing.
//!
//! Walks the box tree of an index block, parses the Segment Index Box
//! (`sidx`) and turns it into [`SplitPoint`]s: byte offsets paired with clock
//! times that allow byte-range seeking inside a single media segment.

pub mod box_utils;
mod error;
pub mod index;
pub mod sidx;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use error::Mp4Error;
pub use index::{IndexParse, build_split_points, parse_split_points};
pub use media_types::SplitPoint;
pub use sidx::{SegmentIndexBox, SidxReference};
