//! The operator tagged union consumed by store renderers.

use std::fmt;

use super::Operator;

/// A comparison operand, reduced to what the store needs to bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarValue {
    /// An integer, identifier or integer-backed value.
    Integer(i64),
    /// A string or enum name.
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One operator with its operand(s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Field equals the value.
    Equals(ScalarValue),
    /// Field differs from the value.
    NotEquals(ScalarValue),
    /// Field equals one of the values.
    In(Vec<ScalarValue>),
    /// Field equals none of the values.
    NotIn(Vec<ScalarValue>),
    /// Field is non-null (`true`) or null (`false`).
    Specified(bool),
    /// Field is strictly greater.
    GreaterThan(ScalarValue),
    /// Field is greater or equal.
    GreaterThanOrEqual(ScalarValue),
    /// Field is strictly less.
    LessThan(ScalarValue),
    /// Field is less or equal.
    LessThanOrEqual(ScalarValue),
    /// Field contains the substring.
    Contains(String),
    /// Field does not contain the substring.
    DoesNotContain(String),
}

impl Predicate {
    /// Returns the operator of this predicate.
    pub fn operator(&self) -> Operator {
        match self {
            Predicate::Equals(_) => Operator::Equals,
            Predicate::NotEquals(_) => Operator::NotEquals,
            Predicate::In(_) => Operator::In,
            Predicate::NotIn(_) => Operator::NotIn,
            Predicate::Specified(_) => Operator::Specified,
            Predicate::GreaterThan(_) => Operator::GreaterThan,
            Predicate::GreaterThanOrEqual(_) => Operator::GreaterThanOrEqual,
            Predicate::LessThan(_) => Operator::LessThan,
            Predicate::LessThanOrEqual(_) => Operator::LessThanOrEqual,
            Predicate::Contains(_) => Operator::Contains,
            Predicate::DoesNotContain(_) => Operator::DoesNotContain,
        }
    }
}
