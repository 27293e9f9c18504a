use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};

use media_types::{ByteRange, SplitPoint, Timescale};

/// Opaque identity of a [`SegmentList`](crate::SegmentList).
///
/// Segments record the id of the list that adopted them instead of a
/// pointer back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(u64);

impl ListId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// A byte range inside a segment, produced from a segment index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubSegment {
    pub sequence: u64,
    /// Start time in list timescale units.
    pub start_time: i64,
    /// Duration in list timescale units.
    pub duration: u64,
    pub byte_range: ByteRange,
}

/// Time span of a segment or sub-segment, as seen by time lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SegmentSpan {
    pub(crate) sequence: u64,
    /// Sequence of the segment the span belongs to.
    pub(crate) parent: u64,
    pub(crate) start: i64,
    /// Zero when unknown.
    pub(crate) duration: u64,
}

/// One fetchable media segment of a representation.
///
/// Times are expressed in the owning list's timescale. A zero duration means
/// "use the list default".
#[derive(Debug)]
pub struct Segment {
    sequence: u64,
    start_time: i64,
    duration: u64,
    uri: Option<String>,
    byte_range: Option<ByteRange>,
    owner: Option<ListId>,
    usage: Arc<AtomicUsize>,
    sub_segments: Vec<SubSegment>,
}

impl Segment {
    pub fn new(sequence: u64, start_time: i64) -> Self {
        Self {
            sequence,
            start_time,
            duration: 0,
            uri: None,
            byte_range: None,
            owner: None,
            usage: Arc::new(AtomicUsize::new(0)),
            sub_segments: Vec::new(),
        }
    }

    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_byte_range(mut self, range: ByteRange) -> Self {
        self.byte_range = Some(range);
        self
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[inline]
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    #[inline]
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn byte_range(&self) -> Option<ByteRange> {
        self.byte_range
    }

    /// Id of the list that owns this segment, if it has been added to one.
    pub fn owner(&self) -> Option<ListId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: ListId) {
        self.owner = Some(owner);
    }

    pub fn sub_segments(&self) -> &[SubSegment] {
        &self.sub_segments
    }

    /// Ordering used by a plain merge: by sequence number.
    #[inline]
    pub fn compare(&self, other: &Segment) -> Ordering {
        self.sequence.cmp(&other.sequence)
    }

    /// Mark the segment as in use until the returned lease is dropped.
    ///
    /// While any lease is alive, pruning leaves the segment in place.
    pub fn acquire(&self) -> SegmentLease {
        self.usage.fetch_add(1, AtomicOrdering::AcqRel);
        SegmentLease {
            sequence: self.sequence,
            usage: Arc::clone(&self.usage),
        }
    }

    /// Number of live leases.
    #[inline]
    pub fn usage(&self) -> usize {
        self.usage.load(AtomicOrdering::Acquire)
    }

    #[inline]
    pub fn is_in_use(&self) -> bool {
        self.usage() != 0
    }

    /// Replace the sub-segments with the ranges delimited by `points`.
    ///
    /// Each consecutive pair of points becomes one sub-segment, numbered
    /// upwards from the segment's own sequence; fewer than two points clears
    /// the sub-segmentation.
    pub fn split_using_index(&mut self, points: &[SplitPoint], timescale: Timescale) {
        self.sub_segments = points
            .windows(2)
            .enumerate()
            .map(|(index, pair)| {
                let (from, to) = (pair[0], pair[1]);
                SubSegment {
                    sequence: self.sequence.saturating_add(index as u64),
                    start_time: self
                        .start_time
                        .saturating_add(timescale.ticks_to_scaled(from.time)),
                    duration: timescale.ticks_to_scaled(to.time - from.time).max(0) as u64,
                    byte_range: ByteRange::new(from.offset, to.offset.saturating_sub(1)),
                }
            })
            .collect();
    }

    pub(crate) fn push_spans(&self, out: &mut Vec<SegmentSpan>) {
        if self.sub_segments.is_empty() {
            out.push(SegmentSpan {
                sequence: self.sequence,
                parent: self.sequence,
                start: self.start_time,
                duration: self.duration,
            });
            return;
        }

        out.extend(self.sub_segments.iter().map(|sub| SegmentSpan {
            sequence: sub.sequence,
            parent: self.sequence,
            start: sub.start_time,
            duration: sub.duration,
        }));
    }
}

/// Keeps a segment's usage counter raised for as long as it lives.
///
/// The lease does not borrow the segment or its list, so it can travel with
/// a fetch or decode task. Dropping it (on any path) releases the segment.
#[derive(Debug)]
pub struct SegmentLease {
    sequence: u64,
    usage: Arc<AtomicUsize>,
}

impl SegmentLease {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl Drop for SegmentLease {
    fn drop(&mut self) {
        self.usage.fetch_sub(1, AtomicOrdering::AcqRel);
    }
}
