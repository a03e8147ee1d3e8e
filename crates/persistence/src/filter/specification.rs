//! Store-agnostic query specifications.

use super::{FieldDef, Join, Predicate};

/// One predicate bound to the field it constrains.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The constrained field.
    pub field: &'static FieldDef,
    /// The operator and its operand.
    pub predicate: Predicate,
}

/// A deferred conjunction of conditions over one root table.
///
/// Building a specification never touches the store. An empty specification
/// matches every row.
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    root: &'static str,
    conditions: Vec<Condition>,
}

impl Specification {
    /// The unrestricted specification over `root`.
    pub fn all(root: &'static str) -> Self {
        Self {
            root,
            conditions: Vec::new(),
        }
    }

    /// Adds one condition.
    pub fn and(mut self, field: &'static FieldDef, predicate: Predicate) -> Self {
        self.conditions.push(Condition { field, predicate });
        self
    }

    /// Adds one condition per predicate, all on `field`.
    pub fn and_all(
        mut self,
        field: &'static FieldDef,
        predicates: impl IntoIterator<Item = Predicate>,
    ) -> Self {
        self.conditions.extend(
            predicates
                .into_iter()
                .map(|predicate| Condition { field, predicate }),
        );
        self
    }

    /// Root table name.
    pub fn root(&self) -> &'static str {
        self.root
    }

    /// The conditions, in insertion order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns true if the specification matches every row.
    pub fn is_unrestricted(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The join of every condition on a related field, keyed by the
    /// position of that condition in [`conditions`](Self::conditions).
    ///
    /// Each condition gets its own join, so two conditions on a to-many
    /// relation may be satisfied by different related rows.
    pub fn joins(&self) -> Vec<(usize, &'static FieldDef, &'static Join)> {
        self.conditions
            .iter()
            .enumerate()
            .filter_map(|(position, condition)| {
                let field: &'static FieldDef = condition.field;
                field.join().map(|join| (position, field, join))
            })
            .collect()
    }
}
