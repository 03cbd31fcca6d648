//! Frame calculation for window functions
//!
//! Calculates frame boundaries (ROWS mode) for window function evaluation.

use std::ops::Range;

use winsql_ast::{FrameBound, FrameSpec};

use crate::errors::SpecError;

/// Reject frames that can never hold a row
pub fn validate_frame(frame: &FrameSpec) -> Result<(), SpecError> {
    match frame {
        FrameSpec::Sliding(0) => Err(SpecError::InvalidSlidingFrame(0)),
        FrameSpec::Rows { start, end } => {
            let invalid = matches!(start, FrameBound::UnboundedFollowing)
                || matches!(end, FrameBound::UnboundedPreceding)
                || bound_offset(start) > bound_offset(end);
            if invalid {
                Err(SpecError::InvalidFrameBounds { start: start.to_string(), end: end.to_string() })
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

/// Pick the frame a call runs over
///
/// The call's own frame wins, then the window's. Without either, ordered
/// windows use a running frame and unordered ones the whole partition.
pub fn resolve_frame(
    call_frame: Option<&FrameSpec>,
    window_frame: Option<&FrameSpec>,
    has_order_by: bool,
) -> FrameSpec {
    match call_frame.or(window_frame) {
        Some(frame) => *frame,
        None if has_order_by => FrameSpec::Running,
        None => FrameSpec::Whole,
    }
}

/// Row offset of a bound relative to the current row
fn bound_offset(bound: &FrameBound) -> i128 {
    match bound {
        FrameBound::UnboundedPreceding => i128::MIN,
        FrameBound::Preceding(n) => -(*n as i128),
        FrameBound::CurrentRow => 0,
        FrameBound::Following(n) => *n as i128,
        FrameBound::UnboundedFollowing => i128::MAX,
    }
}

/// Number of rows a full frame holds, for frames with a fixed width
pub fn nominal_width(frame: &FrameSpec) -> Option<usize> {
    match frame {
        FrameSpec::Sliding(k) => Some(*k),
        FrameSpec::Rows { start, end } => {
            let finite = |b: &FrameBound| {
                !matches!(b, FrameBound::UnboundedPreceding | FrameBound::UnboundedFollowing)
            };
            if finite(start) && finite(end) {
                usize::try_from(bound_offset(end) - bound_offset(start) + 1).ok()
            } else {
                None
            }
        }
        FrameSpec::Running | FrameSpec::Whole => None,
    }
}

/// Calculate frame boundaries for a given row in a partition
///
/// Returns a `Range<usize>` representing the [start, end) indices of rows in the frame,
/// clipped to the partition.
pub fn calculate_frame(
    partition_size: usize,
    current_row_idx: usize,
    frame: &FrameSpec,
) -> Range<usize> {
    let (start_idx, end_idx) = match frame {
        FrameSpec::Running => (0, current_row_idx + 1),
        FrameSpec::Whole => (0, partition_size),
        FrameSpec::Sliding(k) => ((current_row_idx + 1).saturating_sub(*k), current_row_idx + 1),
        FrameSpec::Rows { start, end } => (
            calculate_frame_boundary(start, current_row_idx, partition_size, true),
            calculate_frame_boundary(end, current_row_idx, partition_size, false),
        ),
    };

    let start = start_idx.min(partition_size);
    let end = end_idx.min(partition_size).max(start);

    start..end
}

/// Calculate a single frame boundary (start or end)
///
/// For start boundaries, returns inclusive index.
/// For end boundaries, returns exclusive index (Range semantics).
fn calculate_frame_boundary(
    bound: &FrameBound,
    current_row_idx: usize,
    partition_size: usize,
    is_start: bool,
) -> usize {
    let inclusive_end = |idx: usize| if is_start { idx } else { idx.saturating_add(1) };

    match bound {
        FrameBound::UnboundedPreceding => 0,
        FrameBound::UnboundedFollowing => partition_size,
        FrameBound::CurrentRow => inclusive_end(current_row_idx),
        FrameBound::Preceding(offset) => {
            if is_start {
                current_row_idx.saturating_sub(*offset)
            } else {
                (current_row_idx + 1).saturating_sub(*offset)
            }
        }
        FrameBound::Following(offset) => {
            inclusive_end(current_row_idx.saturating_add(*offset)).min(partition_size)
        }
    }
}
