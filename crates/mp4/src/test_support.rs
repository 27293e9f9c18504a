//! Shared ISOBMFF test builders.
//!
//! This module is available for local mp4 tests and optionally for downstream
//! crate tests when the `test-utils` feature is enabled.

/// SAP word used by the builders: `starts_with_SAP = 1`, `SAP_type = 1`.
const DEFAULT_SAP: u32 = 0x9000_0000;

pub fn make_box(fourcc: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let size = (8 + body.len()) as u32;
    let mut out = Vec::with_capacity(size as usize);
    out.extend_from_slice(&size.to_be_bytes());
    out.extend_from_slice(fourcc);
    out.extend_from_slice(body);
    out
}

pub fn make_full_box(fourcc: &[u8; 4], version: u8, flags: u32, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(4 + payload.len());
    body.push(version);
    body.extend_from_slice(&flags.to_be_bytes()[1..]);
    body.extend_from_slice(payload);
    make_box(fourcc, &body)
}

fn push_references(payload: &mut Vec<u8>, references: &[(u32, u32)]) {
    payload.extend_from_slice(&0u16.to_be_bytes()); // reserved
    payload.extend_from_slice(&(references.len() as u16).to_be_bytes());
    for &(size, duration) in references {
        payload.extend_from_slice(&(size & 0x7FFF_FFFF).to_be_bytes());
        payload.extend_from_slice(&duration.to_be_bytes());
        payload.extend_from_slice(&DEFAULT_SAP.to_be_bytes());
    }
}

/// Version 0 `sidx` with `(referenced_size, subsegment_duration)` references.
pub fn make_sidx(
    first_offset: u32,
    timescale: u32,
    earliest_presentation_time: u32,
    references: &[(u32, u32)],
) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&1u32.to_be_bytes()); // reference_ID
    payload.extend_from_slice(&timescale.to_be_bytes());
    payload.extend_from_slice(&earliest_presentation_time.to_be_bytes());
    payload.extend_from_slice(&first_offset.to_be_bytes());
    push_references(&mut payload, references);
    make_full_box(b"sidx", 0, 0, &payload)
}

/// Version 1 `sidx` (64-bit time and offset fields).
pub fn make_sidx_v1(first_offset: u64, timescale: u32, references: &[(u32, u32)]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&1u32.to_be_bytes());
    payload.extend_from_slice(&timescale.to_be_bytes());
    payload.extend_from_slice(&0u64.to_be_bytes());
    payload.extend_from_slice(&first_offset.to_be_bytes());
    push_references(&mut payload, references);
    make_full_box(b"sidx", 1, 0, &payload)
}

/// An on-demand style index block: `styp` followed by a `sidx`.
pub fn make_index_block(sidx: &[u8]) -> Vec<u8> {
    let mut out = make_box(b"styp", b"msdh\0\0\0\0msdhmsix");
    out.extend_from_slice(sidx);
    out
}
