//! Running a bound plan over rows

use itertools::Itertools;
use rayon::prelude::*;
use winsql_ast::IslandOutput;
use winsql_storage::{Relation, Row};
use winsql_types::SqlValue;

use super::{
    plan::{ExecutionPlan, ProjectionStage, WindowStage},
    state::{PipelineState, StageTracker},
};
use crate::{
    errors::{CoreError, SchemaError},
    evaluator::window::{
        compare_rows, evaluate_window_call, partition_rows, sort_partition, Partition,
    },
    parallel::{filter_rows, map_rows, EvaluatorOptions},
};

impl ExecutionPlan {
    pub(crate) fn execute(
        &self,
        relation: &Relation,
        options: &EvaluatorOptions,
    ) -> Result<Relation, CoreError> {
        let mut tracker = StageTracker::start(&self.stages, relation.len());

        let mut rows = match &self.window {
            Some(window) => window.run(relation.rows(), options, &mut tracker),
            None => relation.rows().to_vec(),
        };

        if let Some(filter) = &self.filter {
            let parallel = options.parallel_scan(rows.len());
            rows = filter_rows(rows, parallel, |row| filter.is_true(row))?;
            tracker.advance(PipelineState::PostFiltered, rows.len());
        }

        if let Some(pivot) = &self.pivot {
            rows = pivot.apply(&rows)?;
            tracker.advance(PipelineState::Pivoted, rows.len());
        }

        if let Some(projection) = &self.projection {
            rows = projection.run(rows, options)?;
            tracker.advance(PipelineState::Projected, rows.len());
        }

        if self.stages.contains(&PipelineState::Sorted) {
            if !self.order_by.is_empty() {
                let keys = &self.order_by;
                if options.parallel_sort(rows.len()) {
                    rows.par_sort_by(|a, b| compare_rows(a, b, keys));
                } else {
                    rows.sort_by(|a, b| compare_rows(a, b, keys));
                }
            }
            if let Some(limit) = self.limit {
                rows.truncate(limit);
            }
            tracker.advance(PipelineState::Sorted, rows.len());
        }

        tracker.advance(PipelineState::Done, rows.len());
        debug_assert_eq!(tracker.current(), PipelineState::Done);

        let mut schema = self.output_schema.clone();
        schema.widen_to_fit(&rows);
        Ok(Relation::try_new(schema, rows)?)
    }
}

impl WindowStage {
    /// Partition, sort and evaluate, returning rows in input order
    /// (or one row per island, partition by partition, for grouped islands)
    fn run(
        &self,
        rows: &[Row],
        options: &EvaluatorOptions,
        tracker: &mut StageTracker<'_>,
    ) -> Vec<Row> {
        let partitions = partition_rows(rows, &self.partition_columns);
        tracker.advance(PipelineState::Partitioned, rows.len());
        log::debug!("{} partitions over {} rows", partitions.len(), rows.len());

        let parallel = partitions.len() > 1 && options.parallel_window(rows.len());
        let sorted: Vec<Partition<'_>> = if parallel {
            partitions.into_par_iter().map(|p| self.sort(p)).collect()
        } else {
            partitions.into_iter().map(|p| self.sort(p)).collect()
        };
        if !self.sort_keys.is_empty() {
            tracker.advance(PipelineState::Ordered, rows.len());
        }

        let evaluated: Vec<Vec<(usize, Row)>> = if parallel {
            sorted.par_iter().map(|p| self.evaluate(p)).collect()
        } else {
            sorted.iter().map(|p| self.evaluate(p)).collect()
        };

        let grouped = matches!(
            self.islands.as_ref().map(|islands| islands.output()),
            Some(IslandOutput::Groups)
        );
        let mut output: Vec<(usize, Row)> = evaluated.into_iter().flatten().collect();
        if !grouped {
            output.sort_by_key(|(original, _)| *original);
        }

        tracker.advance(PipelineState::WindowApplied, output.len());
        output.into_iter().map(|(_, row)| row).collect()
    }

    fn sort<'a>(&self, mut partition: Partition<'a>) -> Partition<'a> {
        sort_partition(&mut partition, &self.sort_keys);
        partition
    }

    /// Evaluate one sorted partition.
    ///
    /// Rows come back paired with their input position, except grouped
    /// islands, which are numbered in emission order.
    fn evaluate(&self, partition: &Partition<'_>) -> Vec<(usize, Row)> {
        log::trace!("evaluating partition {:?} ({} rows)", partition.key, partition.len());

        let columns: Vec<Vec<SqlValue>> = self
            .calls
            .iter()
            .map(|call| evaluate_window_call(partition, call, &self.sort_keys))
            .collect();

        let augmented: Vec<Row> = partition
            .rows
            .iter()
            .enumerate()
            .map(|(position, row)| {
                let mut row = (*row).clone();
                for column in &columns {
                    row.add_value(column[position].clone());
                }
                row
            })
            .collect();

        let Some(islands) = &self.islands else {
            return partition.original_indices.iter().copied().zip(augmented).collect();
        };

        let detection = islands.detect(&Partition::new(&augmented));
        match islands.output() {
            IslandOutput::PerRow => islands
                .annotate(augmented, &detection)
                .into_iter()
                .map(|(position, row)| (partition.original_indices[position], row))
                .collect(),
            IslandOutput::Groups => islands
                .group_rows(&Partition::new(&augmented), &detection)
                .into_iter()
                .enumerate()
                .collect(),
        }
    }
}

impl ProjectionStage {
    fn run(&self, rows: Vec<Row>, options: &EvaluatorOptions) -> Result<Vec<Row>, CoreError> {
        let rows = if self.exprs.is_empty() {
            rows
        } else {
            let parallel = options.parallel_scan(rows.len());
            map_rows(&rows, parallel, |row| {
                let values =
                    self.exprs.iter().map(|expr| expr.evaluate(row)).collect::<Result<_, _>>()?;
                Ok::<_, SchemaError>(Row::new(values))
            })?
        };

        Ok(if self.distinct { apply_distinct(rows) } else { rows })
    }
}

/// Drop repeated rows, keeping the first occurrence (NULL equals NULL)
fn apply_distinct(rows: Vec<Row>) -> Vec<Row> {
    rows.into_iter().unique().collect()
}
