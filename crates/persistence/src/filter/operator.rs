//! Filter operators and the per-kind availability matrix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A comparison operator, named as it appears in `field.operator=value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// `equals`
    Equals,
    /// `notEquals`
    NotEquals,
    /// `in`, with a comma separated list.
    In,
    /// `notIn`, relation fields only.
    NotIn,
    /// `specified`, with `true` or `false`.
    Specified,
    /// `greaterThan`
    GreaterThan,
    /// `greaterThanOrEqual`
    GreaterThanOrEqual,
    /// `lessThan`
    LessThan,
    /// `lessThanOrEqual`
    LessThanOrEqual,
    /// `contains`, string fields only.
    Contains,
    /// `doesNotContain`, string fields only.
    DoesNotContain,
}

impl Operator {
    /// Every operator, in a stable order.
    pub const ALL: &'static [Operator] = &[
        Operator::Equals,
        Operator::NotEquals,
        Operator::In,
        Operator::NotIn,
        Operator::Specified,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Contains,
        Operator::DoesNotContain,
    ];

    /// Returns the query-string name of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::Specified => "specified",
            Operator::GreaterThan => "greaterThan",
            Operator::GreaterThanOrEqual => "greaterThanOrEqual",
            Operator::LessThan => "lessThan",
            Operator::LessThanOrEqual => "lessThanOrEqual",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "doesNotContain",
        }
    }

    /// Returns true for operators that take a list of values.
    pub fn takes_list(self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown operator '{}'", s))
    }
}

/// The value kind of a filterable field.
///
/// Each kind exposes a fixed operator set. Not every kind has every operator:
/// `notIn` is reserved for relation ids and substring matching for strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text.
    String,
    /// A named enumeration.
    Enum,
    /// An ordered number (ids, dimensions, ordering).
    Range,
    /// The identifier of a related entity, reached through a join.
    Relation,
}

const BASE_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::In,
    Operator::Specified,
];

const STRING_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::In,
    Operator::Specified,
    Operator::Contains,
    Operator::DoesNotContain,
];

const RANGE_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::In,
    Operator::Specified,
    Operator::GreaterThan,
    Operator::GreaterThanOrEqual,
    Operator::LessThan,
    Operator::LessThanOrEqual,
];

const RELATION_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::In,
    Operator::NotIn,
    Operator::Specified,
    Operator::GreaterThan,
    Operator::GreaterThanOrEqual,
    Operator::LessThan,
    Operator::LessThanOrEqual,
];

impl FieldKind {
    /// Operators available for this kind.
    pub fn operators(self) -> &'static [Operator] {
        match self {
            FieldKind::String => STRING_OPERATORS,
            FieldKind::Enum => BASE_OPERATORS,
            FieldKind::Range => RANGE_OPERATORS,
            FieldKind::Relation => RELATION_OPERATORS,
        }
    }

    /// Returns true if `operator` may be used on a field of this kind.
    pub fn supports(self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }

    /// Human-readable kind name for error messages.
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Enum => "enum",
            FieldKind::Range => "numeric",
            FieldKind::Relation => "relation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_round_trip_names() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), *op);
        }
        assert!("between".parse::<Operator>().is_err());
    }

    #[test]
    fn test_operator_matrix() {
        assert!(FieldKind::Relation.supports(Operator::NotIn));
        assert!(!FieldKind::Range.supports(Operator::NotIn));
        assert!(!FieldKind::String.supports(Operator::NotIn));

        assert!(FieldKind::String.supports(Operator::Contains));
        assert!(!FieldKind::Enum.supports(Operator::Contains));
        assert!(!FieldKind::Range.supports(Operator::DoesNotContain));

        assert!(FieldKind::Range.supports(Operator::LessThanOrEqual));
        assert!(!FieldKind::String.supports(Operator::GreaterThan));
        assert!(!FieldKind::Enum.supports(Operator::GreaterThan));
    }

    #[test]
    fn test_every_kind_has_base_operators() {
        for kind in [
            FieldKind::String,
            FieldKind::Enum,
            FieldKind::Range,
            FieldKind::Relation,
        ] {
            for op in BASE_OPERATORS {
                assert!(kind.supports(*op), "{:?} lacks {}", kind, op);
            }
        }
    }
}
