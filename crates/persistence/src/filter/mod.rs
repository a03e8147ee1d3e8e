//! Filter builder.
//!
//! Turns typed per-field filters into a store-agnostic [`Specification`]:
//!
//! - [`Operator`] and [`FieldKind`] define which operators a field accepts
//! - [`StringFilter`], [`EnumFilter`], [`RangeFilter`] and [`RelationFilter`]
//!   hold the operands for one field
//! - [`Predicate`] is the tagged union of operator and operand
//! - [`FieldDef`] names a field and how to reach it (column or join)
//! - [`Specification`] is the conjunction handed to the store
//!
//! Every set operand contributes exactly one conjunctive condition. Nothing
//! here produces a disjunction or talks to a store.

mod field;
mod filters;
mod operator;
mod predicate;
mod specification;

pub use field::{FieldDef, FieldPath, Join};
pub use filters::{
    EnumFilter, FieldFilter, FilterValue, IdFilter, IntegerFilter, RangeFilter, RelationFilter,
    StringFilter,
};
pub use operator::{FieldKind, Operator};
pub use predicate::{Predicate, ScalarValue};
pub use specification::{Condition, Specification};
