use bytes::Bytes;

/// Container boxes that may hold a `sidx` (or any other target) further down.
pub(crate) const CONTAINER_BOXES: &[[u8; 4]] = &[
    *b"moov", *b"trak", *b"mdia", *b"minf", *b"stbl", *b"moof", *b"traf", *b"mvex",
];

/// Parsed view over a single ISOBMFF box inside a parent byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxView {
    pub start: usize,
    pub end: usize,
    pub header_size: usize,
    pub fourcc: [u8; 4],
}

impl BoxView {
    #[inline]
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn body_start(&self) -> usize {
        self.start + self.header_size
    }

    #[inline]
    pub fn body(&self, data: &Bytes) -> Bytes {
        data.slice(self.body_start()..self.end)
    }
}

/// Read a box header: returns `(total_box_size, fourcc, header_size)`.
///
/// Handles 32-bit size, 64-bit extended size (`size == 1`),
/// and box-extends-to-EOF (`size == 0`).
pub(crate) fn read_box_header(data: &[u8]) -> Option<(u64, [u8; 4], usize)> {
    if data.len() < 8 {
        return None;
    }

    let size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as u64;
    let fourcc = [data[4], data[5], data[6], data[7]];

    match size {
        1 => {
            let ext: [u8; 8] = data.get(8..16)?.try_into().ok()?;
            Some((u64::from_be_bytes(ext), fourcc, 16))
        }
        0 => Some((data.len() as u64, fourcc, 8)),
        _ => Some((size, fourcc, 8)),
    }
}

/// Parse a single box located at `offset` within `[0..end)`.
///
/// Returns `None` when the header is truncated or the declared size does not
/// fit the parent range.
pub(crate) fn box_at(data: &[u8], offset: usize, end: usize) -> Option<BoxView> {
    if offset >= end || end > data.len() {
        return None;
    }

    let (size, fourcc, header_size) = read_box_header(&data[offset..end])?;
    let size = usize::try_from(size).ok()?;
    if size < header_size || size > end - offset {
        return None;
    }

    Some(BoxView {
        start: offset,
        end: offset + size,
        header_size,
        fourcc,
    })
}

/// Depth-first search for the first box with the given FourCC, descending
/// into [`CONTAINER_BOXES`]. A malformed header ends the walk of its level.
pub fn find_box(data: &[u8], target: [u8; 4]) -> Option<BoxView> {
    find_box_in(data, 0, data.len(), target)
}

fn find_box_in(data: &[u8], start: usize, end: usize, target: [u8; 4]) -> Option<BoxView> {
    let mut offset = start;
    while offset < end {
        let parsed = box_at(data, offset, end)?;
        if parsed.fourcc == target {
            return Some(parsed);
        }

        if CONTAINER_BOXES.contains(&parsed.fourcc)
            && let Some(found) = find_box_in(data, parsed.body_start(), parsed.end, target)
        {
            return Some(found);
        }

        offset = parsed.end;
    }

    None
}

/// Render a FourCC for logs, replacing non-printable bytes with `?`.
pub fn fourcc_to_string(fourcc: &[u8; 4]) -> String {
    fourcc
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            }
        })
        .collect()
}
