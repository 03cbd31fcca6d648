//! Scalar expressions used by filters and projections

use std::fmt;

use serde::{Deserialize, Serialize};
use winsql_types::SqlValue;

use crate::{BinaryOperator, UnaryOperator};

/// A scalar expression evaluated against a single row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal(SqlValue),
    ColumnRef(String),
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expression>,
    },
    IsNull {
        expr: Box<Expression>,
        negated: bool,
    },
    /// CASE expression (simple when `operand` is set, searched otherwise)
    Case {
        #[serde(default)]
        operand: Option<Box<Expression>>,
        when_clauses: Vec<CaseWhen>,
        #[serde(default)]
        else_result: Option<Box<Expression>>,
    },
    /// First non-NULL argument
    Coalesce(Vec<Expression>),
}

/// One WHEN arm of a CASE expression
///
/// Multiple conditions are OR'ed: `WHEN a, b THEN r` matches if any matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseWhen {
    pub conditions: Vec<Expression>,
    pub result: Expression,
}

impl CaseWhen {
    pub fn new(condition: Expression, result: Expression) -> Self {
        CaseWhen { conditions: vec![condition], result }
    }
}

impl Expression {
    pub fn column(name: impl Into<String>) -> Self {
        Expression::ColumnRef(name.into())
    }

    pub fn literal(value: impl Into<SqlValue>) -> Self {
        Expression::Literal(value.into())
    }

    pub fn null() -> Self {
        Expression::Literal(SqlValue::Null)
    }

    pub fn binary(self, op: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp { op, left: Box::new(self), right: Box::new(right) }
    }

    pub fn plus(self, right: Expression) -> Self {
        self.binary(BinaryOperator::Plus, right)
    }

    pub fn minus(self, right: Expression) -> Self {
        self.binary(BinaryOperator::Minus, right)
    }

    pub fn multiply(self, right: Expression) -> Self {
        self.binary(BinaryOperator::Multiply, right)
    }

    pub fn divide(self, right: Expression) -> Self {
        self.binary(BinaryOperator::Divide, right)
    }

    pub fn equal(self, right: Expression) -> Self {
        self.binary(BinaryOperator::Equal, right)
    }

    pub fn not_equal(self, right: Expression) -> Self {
        self.binary(BinaryOperator::NotEqual, right)
    }

    pub fn less_than(self, right: Expression) -> Self {
        self.binary(BinaryOperator::LessThan, right)
    }

    pub fn less_than_or_equal(self, right: Expression) -> Self {
        self.binary(BinaryOperator::LessThanOrEqual, right)
    }

    pub fn greater_than(self, right: Expression) -> Self {
        self.binary(BinaryOperator::GreaterThan, right)
    }

    pub fn greater_than_or_equal(self, right: Expression) -> Self {
        self.binary(BinaryOperator::GreaterThanOrEqual, right)
    }

    pub fn and(self, right: Expression) -> Self {
        self.binary(BinaryOperator::And, right)
    }

    pub fn or(self, right: Expression) -> Self {
        self.binary(BinaryOperator::Or, right)
    }

    pub fn logical_not(self) -> Self {
        Expression::UnaryOp { op: UnaryOperator::Not, expr: Box::new(self) }
    }

    pub fn negate(self) -> Self {
        Expression::UnaryOp { op: UnaryOperator::Minus, expr: Box::new(self) }
    }

    pub fn is_null(self) -> Self {
        Expression::IsNull { expr: Box::new(self), negated: false }
    }

    pub fn is_not_null(self) -> Self {
        Expression::IsNull { expr: Box::new(self), negated: true }
    }

    /// Names of every column this expression reads, in first-use order
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut columns = Vec::new();
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expression::Literal(_) => {}
            Expression::ColumnRef(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Expression::BinaryOp { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Expression::UnaryOp { expr, .. } | Expression::IsNull { expr, .. } => {
                expr.collect_columns(out)
            }
            Expression::Case { operand, when_clauses, else_result } => {
                if let Some(operand) = operand {
                    operand.collect_columns(out);
                }
                for when in when_clauses {
                    for condition in &when.conditions {
                        condition.collect_columns(out);
                    }
                    when.result.collect_columns(out);
                }
                if let Some(else_result) = else_result {
                    else_result.collect_columns(out);
                }
            }
            Expression::Coalesce(args) => {
                for arg in args {
                    arg.collect_columns(out);
                }
            }
        }
    }
}

/// SQL-like rendering, used for default output names and error messages
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(SqlValue::Varchar(s)) => write!(f, "'{}'", s.replace('\'', "''")),
            Expression::Literal(SqlValue::Date(d)) => write!(f, "DATE '{}'", d),
            Expression::Literal(SqlValue::Timestamp(ts)) => write!(f, "TIMESTAMP '{}'", ts),
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::ColumnRef(name) => write!(f, "{}", name),
            Expression::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expression::UnaryOp { op: UnaryOperator::Not, expr } => write!(f, "NOT {}", expr),
            Expression::UnaryOp { op: UnaryOperator::Minus, expr } => write!(f, "-{}", expr),
            Expression::IsNull { expr, negated: false } => write!(f, "{} IS NULL", expr),
            Expression::IsNull { expr, negated: true } => write!(f, "{} IS NOT NULL", expr),
            Expression::Case { operand, when_clauses, else_result } => {
                write!(f, "CASE")?;
                if let Some(operand) = operand {
                    write!(f, " {}", operand)?;
                }
                for when in when_clauses {
                    write!(f, " WHEN ")?;
                    for (i, condition) in when.conditions.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", condition)?;
                    }
                    write!(f, " THEN {}", when.result)?;
                }
                if let Some(else_result) = else_result {
                    write!(f, " ELSE {}", else_result)?;
                }
                write!(f, " END")
            }
            Expression::Coalesce(args) => {
                write!(f, "COALESCE(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<SqlValue> for Expression {
    fn from(value: SqlValue) -> Self {
        Expression::Literal(value)
    }
}
