//! Pipeline stages and the forward-only tracker that walks them

use std::fmt;

/// Stages of one evaluation run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineState {
    Scanned,
    Partitioned,
    Ordered,
    WindowApplied,
    PostFiltered,
    Pivoted,
    Projected,
    Sorted,
    Done,
}

impl PipelineState {
    pub const ALL: [PipelineState; 9] = [
        PipelineState::Scanned,
        PipelineState::Partitioned,
        PipelineState::Ordered,
        PipelineState::WindowApplied,
        PipelineState::PostFiltered,
        PipelineState::Pivoted,
        PipelineState::Projected,
        PipelineState::Sorted,
        PipelineState::Done,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Scanned => "scanned",
            PipelineState::Partitioned => "partitioned",
            PipelineState::Ordered => "ordered",
            PipelineState::WindowApplied => "window-applied",
            PipelineState::PostFiltered => "post-filtered",
            PipelineState::Pivoted => "pivoted",
            PipelineState::Projected => "projected",
            PipelineState::Sorted => "sorted",
            PipelineState::Done => "done",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Walks the planned stages of a run, strictly forward
#[derive(Debug)]
pub(crate) struct StageTracker<'a> {
    planned: &'a [PipelineState],
    current: PipelineState,
    rows: usize,
}

impl<'a> StageTracker<'a> {
    pub(crate) fn start(planned: &'a [PipelineState], rows: usize) -> Self {
        log::debug!("pipeline {}: {} rows", PipelineState::Scanned, rows);
        StageTracker { planned, current: PipelineState::Scanned, rows }
    }

    pub(crate) fn current(&self) -> PipelineState {
        self.current
    }

    /// Move to `next`, logging every planned stage passed over on the way
    pub(crate) fn advance(&mut self, next: PipelineState, rows: usize) {
        debug_assert!(next > self.current, "pipeline moved backwards: {} -> {next}", self.current);

        for skipped in PipelineState::ALL
            .iter()
            .filter(|state| **state > self.current && **state < next)
            .filter(|state| !self.planned.contains(state))
        {
            log::debug!("pipeline {skipped}: skipped");
        }

        log::debug!("pipeline {next}: {} -> {} rows", self.rows, rows);
        self.current = next;
        self.rows = rows;
    }
}
