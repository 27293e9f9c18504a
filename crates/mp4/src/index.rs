//! Split point construction from a segment index record.

use bytes::Bytes;
use media_types::{CLOCK_FREQ, SplitPoint, Tick};
use tracing::{debug, warn};

use crate::Mp4Error;
use crate::sidx::SegmentIndexBox;

/// Result of scanning a byte block for a segment index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexParse {
    /// The block has no `sidx`.
    NoIndex,
    /// A `sidx` was found but has a zero timescale or zero reference count.
    Empty,
    /// Ordered split points, one more than the number of references.
    Points(Vec<SplitPoint>),
}

/// Build split points from a parsed `sidx`.
///
/// The first point sits at `first_offset` with time zero; every reference
/// advances the offset by its size and the time by its duration converted to
/// clock ticks (truncating). Returns an empty list if either the timescale or
/// the reference count is zero.
pub fn build_split_points(sidx: &SegmentIndexBox) -> Vec<SplitPoint> {
    if sidx.timescale == 0 || sidx.reference_count == 0 || sidx.references.is_empty() {
        return Vec::new();
    }

    let timescale = sidx.timescale as i128;
    let mut point = SplitPoint::new(sidx.first_offset, 0);
    let mut points = Vec::with_capacity(sidx.references.len() + 1);
    points.push(point);

    for reference in &sidx.references {
        let delta = CLOCK_FREQ as i128 * reference.subsegment_duration as i128 / timescale;
        point.offset = point.offset.saturating_add(reference.referenced_size as u64);
        point.time = point.time.saturating_add(delta as Tick);
        points.push(point);
    }

    points
}

/// Locate the `sidx` in `data` and turn it into split points.
pub fn parse_split_points(data: &Bytes) -> Result<IndexParse, Mp4Error> {
    let Some(sidx) = SegmentIndexBox::find(data)? else {
        debug!("No sidx box in {} byte index block", data.len());
        return Ok(IndexParse::NoIndex);
    };

    let points = build_split_points(&sidx);
    if points.is_empty() {
        warn!(
            timescale = sidx.timescale,
            reference_count = sidx.reference_count,
            "Ignoring sidx without usable references"
        );
        return Ok(IndexParse::Empty);
    }

    Ok(IndexParse::Points(points))
}
