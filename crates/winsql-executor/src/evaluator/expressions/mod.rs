//! Row-level expression binding and evaluation
//!
//! Expressions are bound against a schema once: column names become
//! positions and every node gets a static type. Type errors surface at bind
//! time, so evaluation over validated rows only ever yields values.

mod bind;
mod eval;


pub use bind::bind_expression;

use winsql_ast::BinaryOperator;
use winsql_types::{ArithmeticOp, DataType, SqlValue};

/// An expression resolved against a schema
#[derive(Debug, Clone, PartialEq)]
pub struct BoundExpression {
    kind: BoundKind,
    data_type: DataType,
}

#[derive(Debug, Clone, PartialEq)]
enum BoundKind {
    Literal(SqlValue),
    Column(usize),
    Arithmetic { op: ArithmeticOp, left: Box<BoundExpression>, right: Box<BoundExpression> },
    Comparison { op: BinaryOperator, left: Box<BoundExpression>, right: Box<BoundExpression> },
    And(Box<BoundExpression>, Box<BoundExpression>),
    Or(Box<BoundExpression>, Box<BoundExpression>),
    Not(Box<BoundExpression>),
    Negate(Box<BoundExpression>),
    IsNull { expr: Box<BoundExpression>, negated: bool },
    Case {
        operand: Option<Box<BoundExpression>>,
        when_clauses: Vec<(Vec<BoundExpression>, BoundExpression)>,
        else_result: Option<Box<BoundExpression>>,
    },
    Coalesce(Vec<BoundExpression>),
}

impl BoundExpression {
    /// Static result type; `Null` only for expressions that are always NULL
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The column position if this expression is a bare column reference
    pub fn as_column(&self) -> Option<usize> {
        match self.kind {
            BoundKind::Column(idx) => Some(idx),
            _ => None,
        }
    }
}
