//! Validation and column resolution for window function calls

use winsql_ast::{AggregateFunction, FrameSpec, WindowFunction, WindowFunctionCall, WindowSpec};
use winsql_storage::{ColumnSchema, RelationSchema};
use winsql_types::{DataType, SqlValue};

use super::frames::{resolve_frame, validate_frame};
use crate::errors::{column_not_found, CoreError, SchemaError, SpecError};

/// A window function with its arguments resolved to column positions
#[derive(Debug, Clone, PartialEq)]
pub enum BoundWindowFunction {
    RowNumber,
    Rank,
    DenseRank,
    PercentRank,
    CumeDist,
    Ntile(usize),
    Lag { column: usize, offset: usize, default: SqlValue },
    Lead { column: usize, offset: usize, default: SqlValue },
    FirstValue { column: usize },
    LastValue { column: usize },
    NthValue { column: usize, n: usize },
    Aggregate { function: AggregateFunction, column: Option<usize>, strict: bool },
}

/// A validated call, ready to run on any partition of the bound schema
#[derive(Debug, Clone, PartialEq)]
pub struct BoundWindowCall {
    pub function: BoundWindowFunction,
    pub frame: FrameSpec,
    /// Output column appended to each row
    pub output: ColumnSchema,
}

/// Check one call against the window and input schema
pub fn bind_window_call(
    call: &WindowFunctionCall,
    window: &WindowSpec,
    schema: &RelationSchema,
) -> Result<BoundWindowCall, CoreError> {
    let function_name = call.function.name();

    if call.function.requires_order() && window.order_by.is_empty() {
        return Err(SpecError::OrderRequired { function: function_name.to_string() }.into());
    }

    if let Some(frame) = &call.frame {
        validate_frame(frame)?;
    }
    let frame =
        resolve_frame(call.frame.as_ref(), window.frame.as_ref(), !window.order_by.is_empty());

    let resolve = |name: &str| -> Result<(usize, DataType), SchemaError> {
        let idx = schema
            .index_of(name)
            .ok_or_else(|| column_not_found(name, &schema.column_names()))?;
        Ok((idx, schema.columns()[idx].data_type))
    };

    let (function, data_type, nullable) = match &call.function {
        WindowFunction::RowNumber => (BoundWindowFunction::RowNumber, DataType::Integer, false),
        WindowFunction::Rank => (BoundWindowFunction::Rank, DataType::Integer, false),
        WindowFunction::DenseRank => (BoundWindowFunction::DenseRank, DataType::Integer, false),
        WindowFunction::PercentRank => (BoundWindowFunction::PercentRank, DataType::Numeric, false),
        WindowFunction::CumeDist => (BoundWindowFunction::CumeDist, DataType::Numeric, false),
        WindowFunction::Ntile(n) => {
            let buckets = usize::try_from(*n)
                .ok()
                .filter(|&b| b > 0)
                .ok_or(SpecError::InvalidNtile(*n))?;
            (BoundWindowFunction::Ntile(buckets), DataType::Integer, false)
        }
        WindowFunction::Lag { column, offset, default }
        | WindowFunction::Lead { column, offset, default } => {
            let offset = usize::try_from(*offset).map_err(|_| SpecError::NegativeOffset {
                function: function_name.to_string(),
                offset: *offset,
            })?;
            let (column_idx, data_type) = resolve(column)?;
            let default = bind_default(column, data_type, default.clone())?;
            let function = if matches!(call.function, WindowFunction::Lag { .. }) {
                BoundWindowFunction::Lag { column: column_idx, offset, default }
            } else {
                BoundWindowFunction::Lead { column: column_idx, offset, default }
            };
            (function, data_type, true)
        }
        WindowFunction::FirstValue { column } => {
            let (column, data_type) = resolve(column)?;
            (BoundWindowFunction::FirstValue { column }, data_type, true)
        }
        WindowFunction::LastValue { column } => {
            let (column, data_type) = resolve(column)?;
            (BoundWindowFunction::LastValue { column }, data_type, true)
        }
        WindowFunction::NthValue { column, n } => {
            let position = usize::try_from(*n)
                .ok()
                .filter(|&p| p > 0)
                .ok_or(SpecError::InvalidNthValue(*n))?;
            let (column, data_type) = resolve(column)?;
            (BoundWindowFunction::NthValue { column, n: position }, data_type, true)
        }
        WindowFunction::Aggregate { function, column, strict } => {
            let bound_column = match (function, column) {
                (AggregateFunction::CountStar, _) => None,
                (_, Some(name)) => {
                    let (idx, data_type) = resolve(name)?;
                    if !function.accepts(data_type) {
                        return Err(SchemaError::TypeMismatch {
                            column: name.clone(),
                            expected: "INTEGER or NUMERIC".to_string(),
                            found: data_type,
                        }
                        .into());
                    }
                    Some((idx, data_type))
                }
                (_, None) => {
                    return Err(SpecError::MissingAggregateColumn {
                        function: function.name().to_string(),
                    }
                    .into())
                }
            };
            let input_type = bound_column.map_or(DataType::Null, |(_, t)| t);
            let nullable =
                !matches!(function, AggregateFunction::Count | AggregateFunction::CountStar);
            (
                BoundWindowFunction::Aggregate {
                    function: *function,
                    column: bound_column.map(|(idx, _)| idx),
                    strict: *strict,
                },
                function.result_type(input_type),
                nullable,
            )
        }
    };

    Ok(BoundWindowCall {
        function,
        frame,
        output: ColumnSchema::new(call.output.clone(), data_type, nullable),
    })
}

/// Check a LAG/LEAD default against the column type, widening INTEGER to NUMERIC
fn bind_default(
    column: &str,
    column_type: DataType,
    default: Option<SqlValue>,
) -> Result<SqlValue, SchemaError> {
    let default = default.unwrap_or(SqlValue::Null);
    if !column_type.is_compatible_with(&default) {
        return Err(SchemaError::TypeMismatch {
            column: column.to_string(),
            expected: column_type.to_string(),
            found: default.get_type(),
        });
    }
    Ok(match (column_type, &default) {
        (DataType::Numeric, SqlValue::Integer(i)) => SqlValue::Numeric(*i as f64),
        _ => default,
    })
}
