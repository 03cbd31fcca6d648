//! Name resolution and static typing

use winsql_ast::{BinaryOperator, Expression, UnaryOperator};
use winsql_storage::RelationSchema;
use winsql_types::DataType;

use super::{BoundExpression, BoundKind};
use crate::errors::{column_not_found, SchemaError};

/// Resolve column names and check operand types against `schema`
pub fn bind_expression(
    expr: &Expression,
    schema: &RelationSchema,
) -> Result<BoundExpression, SchemaError> {
    Binder { schema }.bind(expr)
}

struct Binder<'a> {
    schema: &'a RelationSchema,
}

/// Whether values of the two types can be ordered against each other
fn comparable(left: DataType, right: DataType) -> bool {
    left == DataType::Null
        || right == DataType::Null
        || left == right
        || (left.is_numeric() && right.is_numeric())
}

fn is_boolean(data_type: DataType) -> bool {
    matches!(data_type, DataType::Boolean | DataType::Null)
}

impl Binder<'_> {
    fn bind(&self, expr: &Expression) -> Result<BoundExpression, SchemaError> {
        match expr {
            Expression::Literal(value) => Ok(BoundExpression {
                data_type: value.get_type(),
                kind: BoundKind::Literal(value.clone()),
            }),

            Expression::ColumnRef(name) => {
                let idx = self
                    .schema
                    .index_of(name)
                    .ok_or_else(|| column_not_found(name, &self.schema.column_names()))?;
                Ok(BoundExpression {
                    data_type: self.schema.columns()[idx].data_type,
                    kind: BoundKind::Column(idx),
                })
            }

            Expression::BinaryOp { op, left, right } => {
                let left = self.bind(left)?;
                let right = self.bind(right)?;
                self.bind_binary(*op, left, right)
            }

            Expression::UnaryOp { op, expr: operand } => {
                let inner = self.bind(operand)?;
                let ty = inner.data_type;
                match op {
                    UnaryOperator::Not if is_boolean(ty) => Ok(BoundExpression {
                        data_type: DataType::Boolean,
                        kind: BoundKind::Not(Box::new(inner)),
                    }),
                    UnaryOperator::Minus if ty.is_numeric() || ty == DataType::Null => {
                        Ok(BoundExpression { data_type: ty, kind: BoundKind::Negate(Box::new(inner)) })
                    }
                    UnaryOperator::Not => Err(SchemaError::TypeMismatch {
                        column: operand.to_string(),
                        expected: "BOOLEAN".to_string(),
                        found: ty,
                    }),
                    UnaryOperator::Minus => Err(SchemaError::TypeMismatch {
                        column: operand.to_string(),
                        expected: "INTEGER or NUMERIC".to_string(),
                        found: ty,
                    }),
                }
            }

            Expression::IsNull { expr, negated } => Ok(BoundExpression {
                data_type: DataType::Boolean,
                kind: BoundKind::IsNull { expr: Box::new(self.bind(expr)?), negated: *negated },
            }),

            Expression::Case { operand, when_clauses, else_result } => {
                let operand = operand.as_deref().map(|e| self.bind(e)).transpose()?;
                let mut result_type = DataType::Null;
                let mut bound_whens = Vec::with_capacity(when_clauses.len());

                for when in when_clauses {
                    let mut conditions = Vec::with_capacity(when.conditions.len());
                    for condition_expr in &when.conditions {
                        let condition = self.bind(condition_expr)?;
                        match &operand {
                            Some(operand) if !comparable(operand.data_type, condition.data_type) => {
                                return Err(SchemaError::OperandTypeMismatch {
                                    left: operand.data_type,
                                    op: "CASE".to_string(),
                                    right: condition.data_type,
                                })
                            }
                            None if !is_boolean(condition.data_type) => {
                                return Err(SchemaError::TypeMismatch {
                                    column: condition_expr.to_string(),
                                    expected: "BOOLEAN".to_string(),
                                    found: condition.data_type,
                                })
                            }
                            _ => {}
                        }
                        conditions.push(condition);
                    }
                    let result = self.bind(&when.result)?;
                    result_type = unify_branch(result_type, result.data_type)?;
                    bound_whens.push((conditions, result));
                }

                let else_result = else_result.as_deref().map(|e| self.bind(e)).transpose()?;
                if let Some(else_result) = &else_result {
                    result_type = unify_branch(result_type, else_result.data_type)?;
                }

                Ok(BoundExpression {
                    data_type: result_type,
                    kind: BoundKind::Case {
                        operand: operand.map(Box::new),
                        when_clauses: bound_whens,
                        else_result: else_result.map(Box::new),
                    },
                })
            }

            Expression::Coalesce(args) => {
                let mut result_type = DataType::Null;
                let mut bound = Vec::with_capacity(args.len());
                for arg in args {
                    let arg = self.bind(arg)?;
                    result_type = result_type.unify(arg.data_type).ok_or_else(|| {
                        SchemaError::OperandTypeMismatch {
                            left: result_type,
                            op: "COALESCE".to_string(),
                            right: arg.data_type,
                        }
                    })?;
                    bound.push(arg);
                }
                Ok(BoundExpression { data_type: result_type, kind: BoundKind::Coalesce(bound) })
            }
        }
    }

    fn bind_binary(
        &self,
        op: BinaryOperator,
        left: BoundExpression,
        right: BoundExpression,
    ) -> Result<BoundExpression, SchemaError> {
        let (lt, rt) = (left.data_type, right.data_type);
        let mismatch =
            || SchemaError::OperandTypeMismatch { left: lt, op: op.to_string(), right: rt };
        let (left, right) = (Box::new(left), Box::new(right));

        if let Some(arith) = op.arithmetic_op() {
            let data_type = arith.result_type(lt, rt)?;
            return Ok(BoundExpression {
                data_type,
                kind: BoundKind::Arithmetic { op: arith, left, right },
            });
        }

        let kind = match op {
            _ if op.is_comparison() => {
                if !comparable(lt, rt) {
                    return Err(mismatch());
                }
                BoundKind::Comparison { op, left, right }
            }
            BinaryOperator::And | BinaryOperator::Or => {
                if !is_boolean(lt) || !is_boolean(rt) {
                    return Err(mismatch());
                }
                if op == BinaryOperator::And {
                    BoundKind::And(left, right)
                } else {
                    BoundKind::Or(left, right)
                }
            }
            _ => return Err(mismatch()),
        };

        Ok(BoundExpression { data_type: DataType::Boolean, kind })
    }
}

fn unify_branch(current: DataType, next: DataType) -> Result<DataType, SchemaError> {
    current.unify(next).ok_or(SchemaError::OperandTypeMismatch {
        left: current,
        op: "CASE".to_string(),
        right: next,
    })
}
