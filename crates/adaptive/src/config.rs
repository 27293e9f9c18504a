use media_types::{Tick, Timescale};

/// Configuration of a single [`SegmentList`](crate::SegmentList).
#[derive(Debug, Clone, Default)]
pub struct SegmentListConfig {
    /// The list's own timescale. `None` inherits the owner's timescale.
    pub timescale: Option<Timescale>,
    /// Duration used for segments that do not carry one, in list units.
    pub default_duration: u64,
    /// Absolute clock time of list time zero.
    pub clock_base: Tick,
}

impl SegmentListConfig {
    pub fn with_timescale(mut self, timescale: Timescale) -> Self {
        self.timescale = Some(timescale);
        self
    }

    pub fn with_default_duration(mut self, duration: u64) -> Self {
        self.default_duration = duration;
        self
    }

    pub fn with_clock_base(mut self, clock_base: Tick) -> Self {
        self.clock_base = clock_base;
        self
    }
}

/// Configuration of a [`Representation`](crate::Representation).
#[derive(Debug, Clone, Default)]
pub struct RepresentationConfig {
    /// Representation identifier from the manifest.
    pub id: String,
    /// Timescale inherited by the segment list unless it sets its own.
    pub timescale: Timescale,
    pub segment_list: SegmentListConfig,
}

impl RepresentationConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_timescale(mut self, timescale: Timescale) -> Self {
        self.timescale = timescale;
        self
    }

    pub fn with_segment_list(mut self, config: SegmentListConfig) -> Self {
        self.segment_list = config;
        self
    }
}
