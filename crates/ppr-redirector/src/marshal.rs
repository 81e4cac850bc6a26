//! Fixed-buffer string copy with legacy truncation rules
//!
//! Every string the profile API hands back goes through
//! [`copy_to_fixed_buffer`]. Callers of the legacy API depend on the exact
//! behaviour below, including the returned lengths derived from it:
//!
//! 1. The whole destination is zeroed first.
//! 2. `min(capacity, source length)` units are copied.
//! 3. If the destination is larger than the source, a terminator follows the
//!    copied data and the copy is complete.
//! 4. If both are the same size and the last copied unit is already a
//!    terminator, the copy is complete.
//! 5. Otherwise the last destination unit is overwritten with a terminator and
//!    the copy is reported as truncated.
//!
//! A zero-capacity destination cannot hold anything, so it reports truncation
//! whenever the source is non-empty and never writes.

use crate::encoding::ProfileChar;
use tracing::{Level, trace};

/// Result of a fixed-buffer copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Units copied from the source before termination was applied
    pub copied: usize,
    /// Whether the destination holds less than the full source
    pub truncated: bool,
}

impl CopyOutcome {
    const fn complete(copied: usize) -> Self {
        Self {
            copied,
            truncated: false,
        }
    }

    const fn truncated(copied: usize) -> Self {
        Self {
            copied,
            truncated: true,
        }
    }

    /// Whether the full source fit in the destination.
    pub const fn is_complete(&self) -> bool {
        !self.truncated
    }
}

/// Copy `src` into `dst`, terminating and truncating the way the legacy API does.
///
/// The capacity is `dst.len()`. `src` may contain embedded terminators (as in a
/// multi-string); they are copied verbatim.
pub fn copy_to_fixed_buffer<C: ProfileChar>(dst: &mut [C], src: &[C]) -> CopyOutcome {
    dst.fill(C::NUL);

    let copy_size = dst.len().min(src.len());
    let outcome = if copy_size == 0 {
        if src.is_empty() {
            CopyOutcome::complete(0)
        } else {
            CopyOutcome::truncated(0)
        }
    } else {
        dst[..copy_size].copy_from_slice(&src[..copy_size]);

        if dst.len() > src.len() {
            dst[src.len()] = C::NUL;
            CopyOutcome::complete(copy_size)
        } else if dst.len() == src.len() && dst[copy_size - 1] == C::NUL {
            CopyOutcome::complete(copy_size)
        } else {
            dst[copy_size - 1] = C::NUL;
            CopyOutcome::truncated(copy_size)
        }
    };

    if tracing::enabled!(Level::TRACE) {
        trace_copy(dst, src.len(), copy_size);
    }

    outcome
}

/// Dump the copied region plus up to two units of padding as hex.
fn trace_copy<C: ProfileChar>(dst: &[C], src_size: usize, copy_size: usize) {
    let mut padding = 0;
    if dst.len() > copy_size {
        padding += 1;
    }
    if dst.len() > copy_size + 1 {
        padding += 1;
    }

    let mut copied = Vec::new();
    C::extend_bytes(&dst[..copy_size], &mut copied);
    let mut tail = Vec::new();
    C::extend_bytes(&dst[copy_size..copy_size + padding], &mut tail);

    trace!(
        "StringCopyBuffer: srcSize: {}, dstSize: {}, copySize: {} ({} bytes), dst contents: [{} | {}]",
        src_size,
        dst.len(),
        copy_size,
        copied.len(),
        hex::encode(&copied),
        hex::encode(&tail)
    );
}
