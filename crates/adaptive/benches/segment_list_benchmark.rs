use std::hint::black_box;

use adaptive::{CLOCK_FREQ, Segment, SegmentList, SegmentListConfig, Timescale};
use criterion::{Criterion, criterion_group, criterion_main};

fn make_window(first: u64, count: u64) -> SegmentList {
    let config = SegmentListConfig::default().with_timescale(Timescale::new(90_000).unwrap());
    let mut list = SegmentList::new(config);
    for seq in first..first + count {
        list.add_segment(Segment::new(seq, seq as i64 * 180_000).with_duration(180_000));
    }
    list
}

fn bench_segment_list(c: &mut Criterion) {
    let list = make_window(0, 1024);

    c.bench_function("segment_by_number_1024", |b| {
        b.iter(|| list.segment_by_number(black_box(900)))
    });
    c.bench_function("segment_number_by_scaled_time_1024", |b| {
        b.iter(|| list.segment_number_by_scaled_time(black_box(900 * 180_000 + 5)))
    });
    c.bench_function("playback_time_by_segment_number_1024", |b| {
        b.iter(|| list.playback_time_by_segment_number(black_box(900)))
    });

    c.bench_function("merge_and_prune_window", |b| {
        b.iter_batched(
            || (make_window(0, 64), make_window(32, 64)),
            |(mut live, mut update)| {
                live.merge_with(&mut update);
                live.prune_by_playback_time(black_box(60 * CLOCK_FREQ));
                live
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_segment_list);
criterion_main!(benches);
