//! Segment Index Box (`sidx`, ISO/IEC 14496-12 8.16.3).
//!
//! Layout (big-endian FullBox):
//!
//! ```text
//! version(8) flags(24)
//! reference_ID(32)
//! timescale(32)
//! v0: earliest_presentation_time(32) first_offset(32)
//! v1: earliest_presentation_time(64) first_offset(64)
//! reserved(16) reference_count(16)
//! reference_count x {
//!     reference_type(1) referenced_size(31)
//!     subsegment_duration(32)
//!     starts_with_SAP(1) SAP_type(3) SAP_delta_time(28)
//! }
//! ```

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};
use bytes::Bytes;
use tracing::trace;

use crate::Mp4Error;
use crate::box_utils::find_box;

pub const SIDX: [u8; 4] = *b"sidx";

/// Size in bytes of one reference entry.
const REFERENCE_SIZE: usize = 12;

/// One `sidx` reference (a sub-segment or a nested index).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SidxReference {
    /// `true` when the reference points to another `sidx` rather than media.
    pub reference_type: bool,
    pub referenced_size: u32,
    pub subsegment_duration: u32,
    pub starts_with_sap: bool,
    pub sap_type: u8,
    pub sap_delta_time: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentIndexBox {
    pub version: u8,
    pub flags: u32,
    pub reference_id: u32,
    pub timescale: u32,
    pub earliest_presentation_time: u64,
    pub first_offset: u64,
    /// Declared count, kept separately so a zero count is visible even
    /// though `references` is then empty.
    pub reference_count: u16,
    pub references: Vec<SidxReference>,
}

impl SegmentIndexBox {
    /// Parse a `sidx` box body (the bytes following the box header).
    pub fn parse(body: &[u8]) -> Result<Self, Mp4Error> {
        if body.len() < 12 {
            return Err(Mp4Error::truncated(&SIDX, "missing full box header"));
        }

        let mut reader = Cursor::new(body);
        let version = reader.read_u8()?;
        let flags = reader.read_u24::<BigEndian>()?;
        if version > 1 {
            return Err(Mp4Error::unsupported_version(&SIDX, version));
        }

        let reference_id = reader.read_u32::<BigEndian>()?;
        let timescale = reader.read_u32::<BigEndian>()?;

        let fixed_tail = if version == 0 { 8 + 4 } else { 16 + 4 };
        if body.len() < 12 + fixed_tail {
            return Err(Mp4Error::truncated(&SIDX, "missing offset fields"));
        }

        let (earliest_presentation_time, first_offset) = if version == 0 {
            (
                reader.read_u32::<BigEndian>()? as u64,
                reader.read_u32::<BigEndian>()? as u64,
            )
        } else {
            (
                reader.read_u64::<BigEndian>()?,
                reader.read_u64::<BigEndian>()?,
            )
        };

        let _reserved = reader.read_u16::<BigEndian>()?;
        let reference_count = reader.read_u16::<BigEndian>()?;

        let needed = reference_count as usize * REFERENCE_SIZE;
        let remaining = body.len() - reader.position() as usize;
        if remaining < needed {
            return Err(Mp4Error::truncated(
                &SIDX,
                format!("{reference_count} references need {needed} bytes, {remaining} available"),
            ));
        }

        let mut references = Vec::with_capacity(reference_count as usize);
        for _ in 0..reference_count {
            let word = reader.read_u32::<BigEndian>()?;
            let subsegment_duration = reader.read_u32::<BigEndian>()?;
            let sap = reader.read_u32::<BigEndian>()?;
            references.push(SidxReference {
                reference_type: word & 0x8000_0000 != 0,
                referenced_size: word & 0x7FFF_FFFF,
                subsegment_duration,
                starts_with_sap: sap & 0x8000_0000 != 0,
                sap_type: ((sap >> 28) & 0x7) as u8,
                sap_delta_time: sap & 0x0FFF_FFFF,
            });
        }

        trace!(
            version,
            reference_id,
            timescale,
            first_offset,
            reference_count,
            "Parsed sidx"
        );

        Ok(Self {
            version,
            flags,
            reference_id,
            timescale,
            earliest_presentation_time,
            first_offset,
            reference_count,
            references,
        })
    }

    /// Locate the first `sidx` anywhere in `data` and parse it.
    ///
    /// Returns `Ok(None)` when the block carries no `sidx`.
    pub fn find(data: &Bytes) -> Result<Option<Self>, Mp4Error> {
        let Some(view) = find_box(data, SIDX) else {
            return Ok(None);
        };
        Self::parse(&data[view.body_start()..view.end]).map(Some)
    }
}
