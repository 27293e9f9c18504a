//! Ordered segment window of one representation.
//!
//! The list owns its segments and keeps them strictly increasing by sequence
//! number. It embeds no lock: callers serialize mutating calls (add, merge,
//! prune) against readers themselves. Only the per-segment usage counters
//! are shared with consumers, and pruning never waits on them.

use std::cmp::Ordering;

use media_types::{Tick, Timescale};
use tracing::{debug, trace};

use crate::config::SegmentListConfig;
use crate::segment::{ListId, Segment, SegmentSpan};

#[derive(Debug)]
pub struct SegmentList {
    id: ListId,
    segments: Vec<Segment>,
    config: SegmentListConfig,
    inherited_timescale: Timescale,
}

impl Default for SegmentList {
    fn default() -> Self {
        Self::new(SegmentListConfig::default())
    }
}

impl SegmentList {
    pub fn new(config: SegmentListConfig) -> Self {
        Self {
            id: ListId::next(),
            segments: Vec::new(),
            config,
            inherited_timescale: Timescale::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn config(&self) -> &SegmentListConfig {
        &self.config
    }

    /// The list's own timescale, or the one inherited from its owner.
    #[inline]
    pub fn timescale(&self) -> Timescale {
        self.config.timescale.unwrap_or(self.inherited_timescale)
    }

    pub fn set_inherited_timescale(&mut self, timescale: Timescale) {
        self.inherited_timescale = timescale;
    }

    /// Read-only view of the segments, ascending by sequence number.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn first_sequence(&self) -> Option<u64> {
        self.segments.first().map(Segment::sequence)
    }

    pub fn last_sequence(&self) -> Option<u64> {
        self.segments.last().map(Segment::sequence)
    }

    pub(crate) fn first_mut(&mut self) -> Option<&mut Segment> {
        self.segments.first_mut()
    }

    /// Whether `segment` was adopted by this list.
    pub fn owns(&self, segment: &Segment) -> bool {
        segment.owner() == Some(self.id)
    }

    #[inline]
    fn resolve_duration(&self, duration: u64) -> u64 {
        if duration != 0 {
            duration
        } else {
            self.config.default_duration
        }
    }

    /// Sum of all segment durations, in list units.
    pub fn total_duration(&self) -> u64 {
        self.segments
            .iter()
            .map(|s| self.resolve_duration(s.duration()))
            .fold(0u64, u64::saturating_add)
    }

    /// Find the segment with sequence number `number`.
    ///
    /// The scan stops at the first segment with a greater sequence number.
    pub fn segment_by_number(&self, number: u64) -> Option<&Segment> {
        for segment in &self.segments {
            match segment.sequence().cmp(&number) {
                Ordering::Equal => return Some(segment),
                Ordering::Greater => break,
                Ordering::Less => {}
            }
        }
        None
    }

    /// Append `segment` at the tail and take ownership of it.
    ///
    /// The caller must ensure its sequence number is greater than the current
    /// tail's; this is not checked.
    pub fn add_segment(&mut self, mut segment: Segment) {
        segment.set_owner(self.id);
        self.segments.push(segment);
    }

    /// Merge a freshly parsed window into this list, ordering by sequence
    /// number. See [`merge_with_by`](Self::merge_with_by).
    pub fn merge_with(&mut self, update: &mut SegmentList) -> usize {
        self.merge_with_by(update, Segment::compare)
    }

    /// Merge `update` into this list using the caller's total order.
    ///
    /// Each candidate is adopted when the list is empty or the current tail
    /// orders before it; otherwise it is dropped. `update` is always left
    /// empty. Returns the number of adopted segments.
    pub fn merge_with_by<F>(&mut self, update: &mut SegmentList, mut compare: F) -> usize
    where
        F: FnMut(&Segment, &Segment) -> Ordering,
    {
        let incoming = std::mem::take(&mut update.segments);
        let offered = incoming.len();
        let mut adopted = 0;

        for candidate in incoming {
            let is_newer = self
                .segments
                .last()
                .is_none_or(|tail| compare(tail, &candidate) == Ordering::Less);

            if is_newer {
                self.add_segment(candidate);
                adopted += 1;
            } else {
                trace!("Discarding known segment {}", candidate.sequence());
            }
        }

        debug!(
            "Merged segment list update: {} offered, {} adopted, {} discarded",
            offered,
            adopted,
            offered - adopted
        );
        adopted
    }

    /// Drop segments from the front while their sequence number is below
    /// `threshold` and nobody holds a lease on them.
    ///
    /// Stops at the first segment that is at or past the threshold, or still
    /// in use. Returns the number of removed segments.
    pub fn prune_by_segment_number(&mut self, threshold: u64) -> usize {
        let mut removable = 0;
        for segment in &self.segments {
            if segment.sequence() >= threshold {
                break;
            }
            if segment.is_in_use() {
                debug!(
                    "Deferring prune at segment {}: {} active users",
                    segment.sequence(),
                    segment.usage()
                );
                break;
            }
            removable += 1;
        }

        for segment in self.segments.drain(..removable) {
            trace!("Pruned segment {}", segment.sequence());
        }
        removable
    }

    /// Prune every segment that ends before absolute time `time`.
    ///
    /// Does nothing if `time` cannot be mapped to a segment.
    pub fn prune_by_playback_time(&mut self, time: Tick) -> usize {
        let scaled = self
            .timescale()
            .ticks_to_scaled(time.saturating_sub(self.config.clock_base));
        // Sub-segment numbers may run past the next segment's sequence, so
        // the threshold is always the covering segment itself.
        match self.span_at(scaled) {
            Some(span) => self.prune_by_segment_number(span.parent),
            None => {
                trace!("Playback time {} maps to no segment, nothing pruned", time);
                0
            }
        }
    }

    /// Sequence number of the segment (or sub-segment) covering `scaled`,
    /// a time in list units.
    ///
    /// Sub-segment numbers are only reported while the list holds a single
    /// segment; otherwise the covering segment's own number is returned.
    ///
    /// Returns `None` for an empty list, a time before the first segment,
    /// a time past the end of the last segment when its duration is known,
    /// or when start times are evidently not populated.
    pub fn segment_number_by_scaled_time(&self, scaled: i64) -> Option<u64> {
        let span = self.span_at(scaled)?;
        if self.segments.len() == 1 {
            Some(span.sequence)
        } else {
            Some(span.parent)
        }
    }

    fn span_at(&self, scaled: i64) -> Option<SegmentSpan> {
        let mut spans: Vec<SegmentSpan> = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            segment.push_spans(&mut spans);
        }

        // Every start at zero: the window carries durations only.
        if spans.len() > 1 && spans.iter().all(|span| span.start == 0) {
            return None;
        }

        let index = spans.partition_point(|span| span.start <= scaled);
        if index == 0 {
            return None;
        }

        let span = spans[index - 1];
        if index == spans.len() {
            let duration = self.resolve_duration(span.duration);
            if duration != 0 && scaled >= span.start.saturating_add(duration as i64) {
                return None;
            }
        }

        Some(span)
    }

    /// Absolute clock time at which segment `number` starts.
    ///
    /// Accumulates durations from the first segment's start time and assumes
    /// retained sequence numbers have no gaps. Returns `None` when the list
    /// is empty or `number` precedes the first segment.
    pub fn playback_time_by_segment_number(&self, number: u64) -> Option<Tick> {
        let first = self.segments.first()?;
        if first.sequence() > number {
            return None;
        }

        let mut time = first.start_time();
        for segment in &self.segments {
            if segment.sequence() >= number {
                break;
            }
            time = time.saturating_add(self.resolve_duration(segment.duration()) as i64);
        }

        Some(
            self.config
                .clock_base
                .saturating_add(self.timescale().scaled_to_ticks(time)),
        )
    }
}
