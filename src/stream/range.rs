//! HTTP Range header parsing.

use crate::{FilegateError, Result};

/// An inclusive byte range validated against a resource size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset, inclusive.
    pub start: u64,
    /// Last byte offset, inclusive. Always < the resource size.
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes the range covers.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false for a validated range; present for API completeness.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Parse a `Range` header value of the single-range form
/// `bytes=<start>-<end>?` against a resource of `size` bytes.
///
/// A missing end means "through the last byte". Anything else is
/// rejected: multi-range lists, the suffix form `bytes=-N`, non-numeric
/// offsets, `start > end`, and offsets at or past the end of the
/// resource all map to `RangeNotSatisfiable`.
pub fn parse(header: &str, size: u64) -> Result<ByteRange> {
    let unsatisfiable = || FilegateError::RangeNotSatisfiable { size };

    let spec = header
        .trim()
        .strip_prefix("bytes=")
        .ok_or_else(unsatisfiable)?;

    if spec.contains(',') {
        return Err(unsatisfiable());
    }

    let (start, end) = spec.split_once('-').ok_or_else(unsatisfiable)?;

    // An empty start would be the suffix form, which `parse` rejects.
    let start: u64 = start.parse().map_err(|_| unsatisfiable())?;
    let end: u64 = if end.is_empty() {
        size.checked_sub(1).ok_or_else(unsatisfiable)?
    } else {
        end.parse().map_err(|_| unsatisfiable())?
    };

    if start >= size || end >= size || start > end {
        return Err(unsatisfiable());
    }

    Ok(ByteRange { start, end })
}
