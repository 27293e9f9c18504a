use std::sync::Arc;

use media_types::{SplitPoint, Tick, Timescale};
use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::debug;

use crate::config::RepresentationConfig;
use crate::segment_list::SegmentList;

/// Receiver of a freshly parsed set of split points.
///
/// Implementations replace any previously installed set in one step.
pub trait SplitPointSink {
    fn install_split_points(&self, points: Vec<SplitPoint>);
}

/// One representation of an adaptation set: its live segment window plus the
/// split points of its segment index.
///
/// The window sits behind a mutex so a manifest refresh and a playback reader
/// never observe a half-merged or half-pruned list. Usage counters of the
/// segments stay outside that lock.
#[derive(Debug)]
pub struct Representation {
    id: String,
    timescale: Timescale,
    segments: Mutex<SegmentList>,
    split_points: RwLock<Arc<[SplitPoint]>>,
}

impl Representation {
    pub fn new(config: RepresentationConfig) -> Self {
        let mut segments = SegmentList::new(config.segment_list);
        segments.set_inherited_timescale(config.timescale);
        Self {
            id: config.id,
            timescale: config.timescale,
            segments: Mutex::new(segments),
            split_points: RwLock::new(Arc::from(Vec::new())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timescale(&self) -> Timescale {
        self.timescale
    }

    /// Exclusive access to the segment window for the guard's lifetime.
    pub fn segments(&self) -> MutexGuard<'_, SegmentList> {
        self.segments.lock()
    }

    /// Currently installed split points (empty until an index is installed).
    pub fn split_points(&self) -> Arc<[SplitPoint]> {
        self.split_points.read().clone()
    }

    /// Merge a freshly parsed window, then optionally prune everything that
    /// ends before `keep_from`. Returns the number of adopted segments.
    pub fn refresh(&self, mut update: SegmentList, keep_from: Option<Tick>) -> usize {
        update.set_inherited_timescale(self.timescale);
        let mut segments = self.segments.lock();
        let adopted = segments.merge_with(&mut update);
        if let Some(time) = keep_from {
            segments.prune_by_playback_time(time);
        }
        adopted
    }
}

impl SplitPointSink for Representation {
    fn install_split_points(&self, points: Vec<SplitPoint>) {
        let points: Arc<[SplitPoint]> = Arc::from(points);
        {
            let mut segments = self.segments.lock();
            let timescale = segments.timescale();
            if let Some(first) = segments.first_mut() {
                first.split_using_index(&points, timescale);
                debug!(
                    "Representation {} split segment {} into {} sub-segments",
                    self.id,
                    first.sequence(),
                    first.sub_segments().len()
                );
            }
        }
        *self.split_points.write() = points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Segment;
    use crate::config::SegmentListConfig;
    use media_types::{ByteRange, CLOCK_FREQ};

    fn representation(timescale: u64) -> Representation {
        Representation::new(
            RepresentationConfig::new("video-1")
                .with_timescale(Timescale::new(timescale).unwrap()),
        )
    }

    fn window(sequences: std::ops::Range<u64>, duration: u64) -> SegmentList {
        let mut list = SegmentList::default();
        for seq in sequences {
            let start = seq as i64 * duration as i64;
            list.add_segment(Segment::new(seq, start).with_duration(duration));
        }
        list
    }

    #[test]
    fn test_install_split_points_replaces_wholesale() {
        let rep = representation(10);
        rep.segments().add_segment(Segment::new(1, 0).with_duration(30));
        assert!(rep.split_points().is_empty());

        rep.install_split_points(vec![
            SplitPoint::new(0, 0),
            SplitPoint::new(100, CLOCK_FREQ),
            SplitPoint::new(300, CLOCK_FREQ * 3),
        ]);
        assert_eq!(rep.split_points().len(), 3);
        {
            let segments = rep.segments();
            let subs = segments.segments()[0].sub_segments();
            assert_eq!(subs.len(), 2);
            assert_eq!(subs[1].byte_range, ByteRange::new(100, 299));
            assert_eq!(subs[1].start_time, 10);
        }

        let replacement = vec![SplitPoint::new(0, 0), SplitPoint::new(50, CLOCK_FREQ)];
        rep.install_split_points(replacement.clone());
        assert_eq!(&*rep.split_points(), replacement.as_slice());
        assert_eq!(rep.segments().segments()[0].sub_segments().len(), 1);
    }

    #[test]
    fn test_refresh_keeps_split_segment_under_playhead() {
        let rep = representation(10);
        rep.refresh(window(1..3, 30), None);
        rep.install_split_points(vec![
            SplitPoint::new(0, 0),
            SplitPoint::new(100, CLOCK_FREQ),
            SplitPoint::new(300, CLOCK_FREQ * 3),
        ]);

        // Segment 1 covers 3s..6s and is split at 4s; 4.5s is still inside it.
        rep.refresh(SegmentList::default(), Some(CLOCK_FREQ * 9 / 2));
        let segments = rep.segments();
        assert_eq!(segments.first_sequence(), Some(1));
        assert_eq!(segments.segment_number_by_scaled_time(45), Some(1));
        assert_eq!(segments.segment_number_by_scaled_time(65), Some(2));
    }

    #[test]
    fn test_install_without_segments_keeps_points() {
        let rep = representation(1);
        rep.install_split_points(vec![SplitPoint::new(0, 0), SplitPoint::new(1, 1)]);
        assert_eq!(rep.split_points().len(), 2);
        assert!(rep.segments().is_empty());
    }

    #[test]
    fn test_refresh_merges_and_prunes() {
        let rep = representation(1);
        assert_eq!(rep.refresh(window(0..4, 2), None), 4);
        assert_eq!(rep.refresh(window(2..6, 2), Some(5 * CLOCK_FREQ)), 2);

        let segments = rep.segments();
        let remaining: Vec<u64> = segments.segments().iter().map(Segment::sequence).collect();
        assert_eq!(remaining, vec![2, 3, 4, 5]);
        assert_eq!(segments.timescale(), Timescale::ONE);
    }

    #[test]
    fn test_refresh_keeps_leased_segments() {
        let rep = representation(1);
        rep.refresh(window(0..4, 2), None);
        let lease = rep.segments().segments()[0].acquire();

        rep.refresh(window(4..6, 2), Some(7 * CLOCK_FREQ));
        assert_eq!(rep.segments().first_sequence(), Some(0));

        drop(lease);
        rep.refresh(SegmentList::default(), Some(7 * CLOCK_FREQ));
        assert_eq!(rep.segments().first_sequence(), Some(3));
    }

    #[test]
    fn test_list_timescale_overrides_representation() {
        let rep = Representation::new(
            RepresentationConfig::new("audio")
                .with_timescale(Timescale::new(48_000).unwrap())
                .with_segment_list(
                    SegmentListConfig::default().with_timescale(Timescale::new(1000).unwrap()),
                ),
        );
        assert_eq!(rep.id(), "audio");
        assert_eq!(rep.timescale().get(), 48_000);
        assert_eq!(rep.segments().timescale().get(), 1000);
    }
}
