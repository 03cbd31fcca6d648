//! Parallel execution heuristics and configuration
//!
//! Decides when independent work (partitions, row-wise stages, the final
//! sort) is fanned out over rayon's thread pool, based on:
//! - Available CPU cores
//! - Row count
//! - Operation type
//! - User overrides via PARALLEL_THRESHOLD environment variable

use std::sync::OnceLock;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use winsql_storage::Row;

/// Global parallel configuration, initialized once on first access
static PARALLEL_CONFIG: OnceLock<ParallelConfig> = OnceLock::new();

/// Configuration for parallel execution decisions
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of threads available (from rayon)
    pub num_threads: usize,
    /// Thresholds for different operations based on hardware tier
    pub thresholds: ParallelThresholds,
}

/// Operation-specific row count thresholds for parallel execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelThresholds {
    /// Threshold for row-wise stages (filter, projection)
    pub scan_filter: usize,
    /// Threshold for per-partition window evaluation
    pub window: usize,
    /// Threshold for the final sort
    pub sort: usize,
}

impl ParallelThresholds {
    fn uniform(threshold: usize) -> Self {
        ParallelThresholds { scan_filter: threshold, window: threshold, sort: threshold }
    }
}

impl ParallelConfig {
    /// Get or initialize the global parallel configuration
    pub fn global() -> &'static ParallelConfig {
        PARALLEL_CONFIG.get_or_init(Self::detect)
    }

    /// Detect hardware capabilities and create appropriate configuration
    fn detect() -> Self {
        let num_threads = rayon::current_num_threads();

        let thresholds = if let Ok(threshold_str) = std::env::var("PARALLEL_THRESHOLD") {
            Self::parse_threshold_override(&threshold_str)
        } else {
            Self::thresholds_for_hardware(num_threads)
        };

        log::debug!("parallel config: {} threads, thresholds {:?}", num_threads, thresholds);

        ParallelConfig { num_threads, thresholds }
    }

    /// Parse PARALLEL_THRESHOLD environment variable
    /// Supports:
    /// - Numbers: "5000" -> custom threshold
    /// - "max" or "disabled" -> effectively disable parallelism
    fn parse_threshold_override(threshold_str: &str) -> ParallelThresholds {
        let threshold_str = threshold_str.trim().to_lowercase();

        if threshold_str == "max" || threshold_str == "disabled" {
            ParallelThresholds::uniform(usize::MAX)
        } else if let Ok(threshold) = threshold_str.parse::<usize>() {
            ParallelThresholds::uniform(threshold)
        } else {
            log::warn!("ignoring invalid PARALLEL_THRESHOLD value '{}'", threshold_str);
            Self::thresholds_for_hardware(rayon::current_num_threads())
        }
    }

    /// Determine appropriate thresholds based on hardware tier
    fn thresholds_for_hardware(num_threads: usize) -> ParallelThresholds {
        match num_threads {
            // Single core: never parallelize
            0 | 1 => ParallelThresholds::uniform(usize::MAX),
            2..=3 => ParallelThresholds { scan_filter: 10_000, window: 12_500, sort: 15_000 },
            4..=7 => ParallelThresholds { scan_filter: 2_500, window: 3_750, sort: 5_000 },
            _ => ParallelThresholds { scan_filter: 1_000, window: 1_500, sort: 2_000 },
        }
    }

    pub fn should_parallelize_scan(&self, row_count: usize) -> bool {
        row_count >= self.thresholds.scan_filter
    }

    pub fn should_parallelize_window(&self, row_count: usize) -> bool {
        row_count >= self.thresholds.window
    }

    pub fn should_parallelize_sort(&self, row_count: usize) -> bool {
        row_count >= self.thresholds.sort
    }
}

/// Caller's choice between sequential and parallel execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Parallelism {
    /// Let [`ParallelConfig`] decide from the row count
    #[default]
    Auto,
    Sequential,
    Parallel,
}

/// Per-run evaluator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvaluatorOptions {
    #[serde(default)]
    pub parallelism: Parallelism,
}

impl EvaluatorOptions {
    pub fn sequential() -> Self {
        EvaluatorOptions { parallelism: Parallelism::Sequential }
    }

    pub fn parallel() -> Self {
        EvaluatorOptions { parallelism: Parallelism::Parallel }
    }

    pub(crate) fn parallel_window(&self, row_count: usize) -> bool {
        self.decide(|config| config.should_parallelize_window(row_count))
    }

    pub(crate) fn parallel_scan(&self, row_count: usize) -> bool {
        self.decide(|config| config.should_parallelize_scan(row_count))
    }

    pub(crate) fn parallel_sort(&self, row_count: usize) -> bool {
        self.decide(|config| config.should_parallelize_sort(row_count))
    }

    fn decide(&self, auto: impl FnOnce(&ParallelConfig) -> bool) -> bool {
        match self.parallelism {
            Parallelism::Sequential => false,
            Parallelism::Parallel => true,
            Parallelism::Auto => auto(ParallelConfig::global()),
        }
    }
}

/// Keep the rows `predicate` accepts, in order, stopping at the first error.
pub(crate) fn filter_rows<F, E>(rows: Vec<Row>, parallel: bool, predicate: F) -> Result<Vec<Row>, E>
where
    F: Fn(&Row) -> Result<bool, E> + Sync + Send,
    E: Send,
{
    if parallel {
        let keep = rows.par_iter().map(&predicate).collect::<Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().zip(keep).filter_map(|(row, keep)| keep.then_some(row)).collect())
    } else {
        let mut kept = Vec::with_capacity(rows.len());
        for row in rows {
            if predicate(&row)? {
                kept.push(row);
            }
        }
        Ok(kept)
    }
}

/// Transform every row, preserving order, stopping at the first error.
pub(crate) fn map_rows<F, E>(rows: &[Row], parallel: bool, transform: F) -> Result<Vec<Row>, E>
where
    F: Fn(&Row) -> Result<Row, E> + Sync + Send,
    E: Send,
{
    if parallel {
        rows.par_iter().map(transform).collect()
    } else {
        rows.iter().map(transform).collect()
    }
}
