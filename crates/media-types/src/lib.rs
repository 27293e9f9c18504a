//! Shared media timing types.
//!
//! Absolute time is counted in [`Tick`]s of a process-wide clock running at
//! [`CLOCK_FREQ`] ticks per second. Each representation stores its own times
//! in a local [`Timescale`] and converts at the boundary.

use std::num::NonZeroU64;

/// Ticks per second of the process-wide clock (microseconds).
pub const CLOCK_FREQ: i64 = 1_000_000;

/// Absolute clock time, in units of `1 / CLOCK_FREQ` seconds.
pub type Tick = i64;

#[inline]
fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Units-per-second of a representation-local timeline. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timescale(NonZeroU64);

impl Timescale {
    /// One unit per second.
    pub const ONE: Timescale = Timescale(NonZeroU64::MIN);

    /// Returns `None` for a zero timescale.
    #[inline]
    pub fn new(units_per_second: u64) -> Option<Self> {
        NonZeroU64::new(units_per_second).map(Self)
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Convert absolute clock ticks into this timescale (truncating).
    pub fn ticks_to_scaled(self, ticks: Tick) -> i64 {
        saturate(ticks as i128 * self.get() as i128 / CLOCK_FREQ as i128)
    }

    /// Convert a value in this timescale into clock ticks (truncating).
    pub fn scaled_to_ticks(self, scaled: i64) -> Tick {
        saturate(CLOCK_FREQ as i128 * scaled as i128 / self.get() as i128)
    }
}

impl Default for Timescale {
    fn default() -> Self {
        Self::ONE
    }
}

impl std::fmt::Display for Timescale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/s", self.get())
    }
}

/// A byte-offset / time-offset boundary inside a segment, as described by a
/// segment index record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitPoint {
    /// Byte offset of the boundary.
    pub offset: u64,
    /// Time of the boundary relative to the first point, in clock ticks.
    pub time: Tick,
}

impl SplitPoint {
    #[inline]
    pub fn new(offset: u64, time: Tick) -> Self {
        Self { offset, time }
    }
}

/// Inclusive byte range, as used by HTTP `Range` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    #[inline]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.end - self.start + 1
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

impl std::fmt::Display for ByteRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
