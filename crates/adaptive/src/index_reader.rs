use bytes::Bytes;
use mp4::IndexParse;
use tracing::debug;

use crate::error::AdaptiveError;
use crate::representation::SplitPointSink;

/// What happened to an index block handed to [`IndexReader::parse_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The block carries no segment index; nothing was installed.
    NoIndex,
    /// The index has a zero timescale or no references; nothing was
    /// installed and the previous split points stay in place.
    Malformed,
    /// This many split points replaced the previous set.
    Installed(usize),
}

/// Parses segment index blocks and installs the resulting split points.
pub struct IndexReader;

impl IndexReader {
    pub fn parse_index<S>(data: &Bytes, sink: &S) -> Result<IndexOutcome, AdaptiveError>
    where
        S: SplitPointSink + ?Sized,
    {
        match mp4::parse_split_points(data)? {
            IndexParse::NoIndex => Ok(IndexOutcome::NoIndex),
            IndexParse::Empty => Ok(IndexOutcome::Malformed),
            IndexParse::Points(points) => {
                let count = points.len();
                sink.install_split_points(points);
                debug!("Installed {} split points", count);
                Ok(IndexOutcome::Installed(count))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepresentationConfig;
    use crate::test_utils::init_tracing;
    use crate::{Representation, Segment};
    use media_types::{CLOCK_FREQ, SplitPoint, Timescale};
    use mp4::test_support::{make_index_block, make_sidx};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        installs: Mutex<Vec<Vec<SplitPoint>>>,
    }

    impl SplitPointSink for RecordingSink {
        fn install_split_points(&self, points: Vec<SplitPoint>) {
            self.installs.lock().push(points);
        }
    }

    #[test]
    fn test_installs_split_points() {
        init_tracing();
        let sink = RecordingSink::default();
        let block = Bytes::from(make_sidx(0, 10, 0, &[(100, 10), (200, 20)]));

        let outcome = IndexReader::parse_index(&block, &sink).unwrap();
        assert_eq!(outcome, IndexOutcome::Installed(3));
        assert_eq!(
            sink.installs.lock().as_slice(),
            &[vec![
                SplitPoint::new(0, 0),
                SplitPoint::new(100, CLOCK_FREQ),
                SplitPoint::new(300, CLOCK_FREQ * 3),
            ]]
        );
    }

    #[test]
    fn test_zero_timescale_installs_nothing() {
        init_tracing();
        let sink = RecordingSink::default();
        let block = Bytes::from(make_sidx(0, 0, 0, &[(100, 10)]));
        assert_eq!(
            IndexReader::parse_index(&block, &sink).unwrap(),
            IndexOutcome::Malformed
        );
        assert!(sink.installs.lock().is_empty());
    }

    #[test]
    fn test_missing_index_is_not_an_error() {
        let sink = RecordingSink::default();
        let block = Bytes::from_static(b"\0\0\0\x08free");
        assert_eq!(
            IndexReader::parse_index(&block, &sink).unwrap(),
            IndexOutcome::NoIndex
        );
        assert!(sink.installs.lock().is_empty());
    }

    #[test]
    fn test_truncated_index_is_an_error() {
        let sink = RecordingSink::default();
        let mut block = make_sidx(0, 10, 0, &[(100, 10)]);
        // Keep the declared size consistent but cut the reference entry.
        block.truncate(block.len() - 12);
        let size = block.len() as u32;
        block[..4].copy_from_slice(&size.to_be_bytes());

        let err = IndexReader::parse_index(&Bytes::from(block), &sink).unwrap_err();
        assert!(matches!(err, AdaptiveError::Index { .. }));
        assert!(sink.installs.lock().is_empty());
    }

    #[test]
    fn test_malformed_index_keeps_previous_points() {
        init_tracing();
        let rep = Representation::new(
            RepresentationConfig::new("v").with_timescale(Timescale::new(10).unwrap()),
        );
        rep.segments().add_segment(Segment::new(1, 0).with_duration(30));

        let good = Bytes::from(make_index_block(&make_sidx(0, 10, 0, &[(100, 10), (200, 20)])));
        assert_eq!(
            IndexReader::parse_index(&good, &rep).unwrap(),
            IndexOutcome::Installed(3)
        );

        let bad = Bytes::from(make_index_block(&make_sidx(0, 0, 0, &[(100, 10)])));
        assert_eq!(
            IndexReader::parse_index(&bad, &rep).unwrap(),
            IndexOutcome::Malformed
        );
        assert_eq!(rep.split_points().len(), 3);
        assert_eq!(rep.segments().segments()[0].sub_segments().len(), 2);
        assert_eq!(rep.segments().segment_number_by_scaled_time(15), Some(2));
    }
}
