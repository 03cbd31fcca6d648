//! Evaluation of bound expressions with SQL three-valued logic

use std::cmp::Ordering;

use winsql_ast::BinaryOperator;
use winsql_storage::Row;
use winsql_types::SqlValue;

use super::{BoundExpression, BoundKind};
use crate::errors::SchemaError;

impl BoundExpression {
    /// Evaluate against one row of the schema this expression was bound to
    pub fn evaluate(&self, row: &Row) -> Result<SqlValue, SchemaError> {
        match &self.kind {
            BoundKind::Literal(value) => Ok(value.clone()),
            BoundKind::Column(idx) => Ok(row.get(*idx).cloned().unwrap_or(SqlValue::Null)),
            BoundKind::Arithmetic { op, left, right } => {
                let left = left.evaluate(row)?;
                let right = right.evaluate(row)?;
                Ok(left.arithmetic(*op, &right)?)
            }
            BoundKind::Comparison { op, left, right } => {
                let left = left.evaluate(row)?;
                let right = right.evaluate(row)?;
                Ok(compare(*op, &left, &right))
            }
            BoundKind::And(left, right) => {
                let left = truth(&left.evaluate(row)?);
                if left == Some(false) {
                    return Ok(SqlValue::Boolean(false));
                }
                let right = truth(&right.evaluate(row)?);
                Ok(match (left, right) {
                    (_, Some(false)) => SqlValue::Boolean(false),
                    (Some(true), Some(true)) => SqlValue::Boolean(true),
                    _ => SqlValue::Null,
                })
            }
            BoundKind::Or(left, right) => {
                let left = truth(&left.evaluate(row)?);
                if left == Some(true) {
                    return Ok(SqlValue::Boolean(true));
                }
                let right = truth(&right.evaluate(row)?);
                Ok(match (left, right) {
                    (_, Some(true)) => SqlValue::Boolean(true),
                    (Some(false), Some(false)) => SqlValue::Boolean(false),
                    _ => SqlValue::Null,
                })
            }
            BoundKind::Not(inner) => {
                Ok(truth(&inner.evaluate(row)?).map_or(SqlValue::Null, |b| SqlValue::Boolean(!b)))
            }
            BoundKind::Negate(inner) => Ok(inner.evaluate(row)?.negate()?),
            BoundKind::IsNull { expr, negated } => {
                let is_null = expr.evaluate(row)?.is_null();
                Ok(SqlValue::Boolean(is_null != *negated))
            }
            BoundKind::Case { operand, when_clauses, else_result } => {
                let operand = operand.as_ref().map(|o| o.evaluate(row)).transpose()?;
                for (conditions, result) in when_clauses {
                    for condition in conditions {
                        let value = condition.evaluate(row)?;
                        let matched = match &operand {
                            Some(operand) => operand.sql_equals(&value) == Some(true),
                            None => truth(&value) == Some(true),
                        };
                        if matched {
                            return result.evaluate(row);
                        }
                    }
                }
                match else_result {
                    Some(else_result) => else_result.evaluate(row),
                    None => Ok(SqlValue::Null),
                }
            }
            BoundKind::Coalesce(args) => {
                for arg in args {
                    let value = arg.evaluate(row)?;
                    if !value.is_null() {
                        return Ok(value);
                    }
                }
                Ok(SqlValue::Null)
            }
        }
    }

    /// Evaluate as a predicate: only TRUE keeps a row, NULL counts as not true
    pub fn is_true(&self, row: &Row) -> Result<bool, SchemaError> {
        Ok(truth(&self.evaluate(row)?) == Some(true))
    }
}

fn truth(value: &SqlValue) -> Option<bool> {
    value.as_bool()
}

fn compare(op: BinaryOperator, left: &SqlValue, right: &SqlValue) -> SqlValue {
    let Some(ordering) = left.sql_cmp(right) else {
        return SqlValue::Null;
    };
    let result = match op {
        BinaryOperator::Equal => ordering == Ordering::Equal,
        BinaryOperator::NotEqual => ordering != Ordering::Equal,
        BinaryOperator::LessThan => ordering == Ordering::Less,
        BinaryOperator::LessThanOrEqual => ordering != Ordering::Greater,
        BinaryOperator::GreaterThan => ordering == Ordering::Greater,
        BinaryOperator::GreaterThanOrEqual => ordering != Ordering::Less,
        _ => return SqlValue::Null,
    };
    SqlValue::Boolean(result)
}
