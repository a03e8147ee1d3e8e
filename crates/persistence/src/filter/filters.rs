//! Typed per-field filters.
//!
//! A filter holds the optional operands of one field. Each operand that is set
//! becomes exactly one [`Predicate`]; the predicates of all filters are later
//! combined conjunctively by the [`Specification`](super::Specification).

use std::fmt;

use super::{FieldKind, Operator, Predicate, ScalarValue};
use crate::model::{EntityId, NamedEnum};

/// A value type that can be parsed from a query parameter and bound in a query.
pub trait FilterValue: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Parses one raw query-string value.
    fn parse_value(raw: &str) -> Result<Self, String>;

    /// Converts to a bindable operand.
    fn to_scalar(&self) -> ScalarValue;
}

impl FilterValue for String {
    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Text(self.clone())
    }
}

impl FilterValue for i32 {
    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|_| format!("'{}' is not a valid integer", raw))
    }

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Integer(i64::from(*self))
    }
}

impl FilterValue for i64 {
    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|_| format!("'{}' is not a valid integer", raw))
    }

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Integer(*self)
    }
}

impl FilterValue for EntityId {
    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.parse()
            .map_err(|_| format!("'{}' is not a valid identifier", raw))
    }

    fn to_scalar(&self) -> ScalarValue {
        ScalarValue::Integer(self.value())
    }
}

/// Common behaviour of the typed filters.
pub trait FieldFilter: Default + Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// The field kind, which fixes the available operators.
    const KIND: FieldKind;

    /// Sets the operand of `operator` from raw query values.
    ///
    /// List operators split every value on commas. Other operators use the
    /// last value given.
    fn apply(&mut self, operator: Operator, values: &[&str]) -> Result<(), String>;

    /// One predicate per operand that is set.
    fn predicates(&self) -> Vec<Predicate>;

    /// Returns true if no operand is set.
    fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }
}

fn unsupported(kind: FieldKind, operator: Operator) -> String {
    format!(
        "operator '{}' is not available for {} fields",
        operator,
        kind.label()
    )
}

fn single<'a>(values: &[&'a str]) -> Result<&'a str, String> {
    values
        .last()
        .copied()
        .ok_or_else(|| "a value is required".to_string())
}

fn parse_one<T>(values: &[&str], parse: impl Fn(&str) -> Result<T, String>) -> Result<T, String> {
    parse(single(values)?)
}

fn parse_list<T>(values: &[&str], parse: impl Fn(&str) -> Result<T, String>) -> Result<Vec<T>, String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(parse)
        .collect()
}

fn parse_bool(values: &[&str]) -> Result<bool, String> {
    match single(values)?.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("'{}' is not a boolean", other)),
    }
}

fn scalars<T: FilterValue>(values: &[T]) -> Vec<ScalarValue> {
    values.iter().map(FilterValue::to_scalar).collect()
}

/// Filter for free-text fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringFilter {
    /// `equals`: the field equals this value.
    pub equals: Option<String>,
    /// `notEquals`: the field differs from this value.
    pub not_equals: Option<String>,
    /// `in`: the field equals one of these values.
    pub in_list: Option<Vec<String>>,
    /// `specified`: the field is set (`true`) or null (`false`).
    pub specified: Option<bool>,
    /// `contains`: the field contains this substring.
    pub contains: Option<String>,
    /// `doesNotContain`: the field does not contain this substring.
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    /// Sets `equals`.
    pub fn equals(mut self, value: impl Into<String>) -> Self {
        self.equals = Some(value.into());
        self
    }

    /// Sets `notEquals`.
    pub fn not_equals(mut self, value: impl Into<String>) -> Self {
        self.not_equals = Some(value.into());
        self
    }

    /// Sets `in`.
    pub fn in_list<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.in_list = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets `specified`.
    pub fn specified(mut self, specified: bool) -> Self {
        self.specified = Some(specified);
        self
    }

    /// Sets `contains`.
    pub fn contains(mut self, value: impl Into<String>) -> Self {
        self.contains = Some(value.into());
        self
    }

    /// Sets `doesNotContain`.
    pub fn does_not_contain(mut self, value: impl Into<String>) -> Self {
        self.does_not_contain = Some(value.into());
        self
    }
}

impl FieldFilter for StringFilter {
    const KIND: FieldKind = FieldKind::String;

    fn apply(&mut self, operator: Operator, values: &[&str]) -> Result<(), String> {
        match operator {
            Operator::Equals => self.equals = Some(parse_one(values, String::parse_value)?),
            Operator::NotEquals => {
                self.not_equals = Some(parse_one(values, String::parse_value)?)
            }
            Operator::In => self.in_list = Some(parse_list(values, String::parse_value)?),
            Operator::Specified => self.specified = Some(parse_bool(values)?),
            Operator::Contains => self.contains = Some(parse_one(values, String::parse_value)?),
            Operator::DoesNotContain => {
                self.does_not_contain = Some(parse_one(values, String::parse_value)?)
            }
            other => return Err(unsupported(Self::KIND, other)),
        }
        Ok(())
    }

    fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(v) = &self.equals {
            out.push(Predicate::Equals(v.to_scalar()));
        }
        if let Some(v) = &self.not_equals {
            out.push(Predicate::NotEquals(v.to_scalar()));
        }
        if let Some(v) = &self.in_list {
            out.push(Predicate::In(scalars(v)));
        }
        if let Some(v) = self.specified {
            out.push(Predicate::Specified(v));
        }
        if let Some(v) = &self.contains {
            out.push(Predicate::Contains(v.clone()));
        }
        if let Some(v) = &self.does_not_contain {
            out.push(Predicate::DoesNotContain(v.clone()));
        }
        out
    }
}

/// Filter for enumerated fields, compared by variant name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumFilter<E> {
    /// `equals`: the field equals this value.
    pub equals: Option<E>,
    /// `notEquals`: the field differs from this value.
    pub not_equals: Option<E>,
    /// `in`: the field equals one of these values.
    pub in_list: Option<Vec<E>>,
    /// `specified`: the field is set (`true`) or null (`false`).
    pub specified: Option<bool>,
}

impl<E> Default for EnumFilter<E> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            in_list: None,
            specified: None,
        }
    }
}

impl<E: NamedEnum> EnumFilter<E> {
    /// Sets `equals`.
    pub fn equals(mut self, value: E) -> Self {
        self.equals = Some(value);
        self
    }

    /// Sets `notEquals`.
    pub fn not_equals(mut self, value: E) -> Self {
        self.not_equals = Some(value);
        self
    }

    /// Sets `in`.
    pub fn in_list(mut self, values: impl IntoIterator<Item = E>) -> Self {
        self.in_list = Some(values.into_iter().collect());
        self
    }

    /// Sets `specified`.
    pub fn specified(mut self, specified: bool) -> Self {
        self.specified = Some(specified);
        self
    }
}

fn parse_enum<E: NamedEnum>(raw: &str) -> Result<E, String> {
    raw.parse::<E>().map_err(|e| e.to_string())
}

fn enum_scalar<E: NamedEnum>(value: &E) -> ScalarValue {
    ScalarValue::Text(value.as_str().to_string())
}

impl<E: NamedEnum> FieldFilter for EnumFilter<E> {
    const KIND: FieldKind = FieldKind::Enum;

    fn apply(&mut self, operator: Operator, values: &[&str]) -> Result<(), String> {
        match operator {
            Operator::Equals => self.equals = Some(parse_one(values, parse_enum)?),
            Operator::NotEquals => self.not_equals = Some(parse_one(values, parse_enum)?),
            Operator::In => self.in_list = Some(parse_list(values, parse_enum)?),
            Operator::Specified => self.specified = Some(parse_bool(values)?),
            other => return Err(unsupported(Self::KIND, other)),
        }
        Ok(())
    }

    fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(v) = &self.equals {
            out.push(Predicate::Equals(enum_scalar(v)));
        }
        if let Some(v) = &self.not_equals {
            out.push(Predicate::NotEquals(enum_scalar(v)));
        }
        if let Some(v) = &self.in_list {
            out.push(Predicate::In(v.iter().map(enum_scalar).collect()));
        }
        if let Some(v) = self.specified {
            out.push(Predicate::Specified(v));
        }
        out
    }
}

/// Filter for ordered numeric fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter<T> {
    /// `equals`: the field equals this value.
    pub equals: Option<T>,
    /// `notEquals`: the field differs from this value.
    pub not_equals: Option<T>,
    /// `in`: the field equals one of these values.
    pub in_list: Option<Vec<T>>,
    /// `specified`: the field is set (`true`) or null (`false`).
    pub specified: Option<bool>,
    /// `greaterThan` bound.
    pub greater_than: Option<T>,
    /// `greaterThanOrEqual` bound.
    pub greater_than_or_equal: Option<T>,
    /// `lessThan` bound.
    pub less_than: Option<T>,
    /// `lessThanOrEqual` bound.
    pub less_than_or_equal: Option<T>,
}

/// Filter on an entity identifier.
pub type IdFilter = RangeFilter<EntityId>;

/// Filter on a 32-bit integer field.
pub type IntegerFilter = RangeFilter<i32>;

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            in_list: None,
            specified: None,
            greater_than: None,
            greater_than_or_equal: None,
            less_than: None,
            less_than_or_equal: None,
        }
    }
}

impl<T: FilterValue> RangeFilter<T> {
    /// Sets `equals`.
    pub fn equals(mut self, value: T) -> Self {
        self.equals = Some(value);
        self
    }

    /// Sets `notEquals`.
    pub fn not_equals(mut self, value: T) -> Self {
        self.not_equals = Some(value);
        self
    }

    /// Sets `in`.
    pub fn in_list(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.in_list = Some(values.into_iter().collect());
        self
    }

    /// Sets `specified`.
    pub fn specified(mut self, specified: bool) -> Self {
        self.specified = Some(specified);
        self
    }

    /// Sets `greaterThan`.
    pub fn greater_than(mut self, value: T) -> Self {
        self.greater_than = Some(value);
        self
    }

    /// Sets `greaterThanOrEqual`.
    pub fn greater_than_or_equal(mut self, value: T) -> Self {
        self.greater_than_or_equal = Some(value);
        self
    }

    /// Sets `lessThan`.
    pub fn less_than(mut self, value: T) -> Self {
        self.less_than = Some(value);
        self
    }

    /// Sets `lessThanOrEqual`.
    pub fn less_than_or_equal(mut self, value: T) -> Self {
        self.less_than_or_equal = Some(value);
        self
    }

    fn apply_range(&mut self, operator: Operator, values: &[&str], kind: FieldKind) -> Result<(), String> {
        match operator {
            Operator::Equals => self.equals = Some(parse_one(values, T::parse_value)?),
            Operator::NotEquals => self.not_equals = Some(parse_one(values, T::parse_value)?),
            Operator::In => self.in_list = Some(parse_list(values, T::parse_value)?),
            Operator::Specified => self.specified = Some(parse_bool(values)?),
            Operator::GreaterThan => self.greater_than = Some(parse_one(values, T::parse_value)?),
            Operator::GreaterThanOrEqual => {
                self.greater_than_or_equal = Some(parse_one(values, T::parse_value)?)
            }
            Operator::LessThan => self.less_than = Some(parse_one(values, T::parse_value)?),
            Operator::LessThanOrEqual => {
                self.less_than_or_equal = Some(parse_one(values, T::parse_value)?)
            }
            other => return Err(unsupported(kind, other)),
        }
        Ok(())
    }

    fn range_predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(v) = &self.equals {
            out.push(Predicate::Equals(v.to_scalar()));
        }
        if let Some(v) = &self.not_equals {
            out.push(Predicate::NotEquals(v.to_scalar()));
        }
        if let Some(v) = &self.in_list {
            out.push(Predicate::In(scalars(v)));
        }
        if let Some(v) = self.specified {
            out.push(Predicate::Specified(v));
        }
        if let Some(v) = &self.greater_than {
            out.push(Predicate::GreaterThan(v.to_scalar()));
        }
        if let Some(v) = &self.greater_than_or_equal {
            out.push(Predicate::GreaterThanOrEqual(v.to_scalar()));
        }
        if let Some(v) = &self.less_than {
            out.push(Predicate::LessThan(v.to_scalar()));
        }
        if let Some(v) = &self.less_than_or_equal {
            out.push(Predicate::LessThanOrEqual(v.to_scalar()));
        }
        out
    }
}

impl<T: FilterValue> FieldFilter for RangeFilter<T> {
    const KIND: FieldKind = FieldKind::Range;

    fn apply(&mut self, operator: Operator, values: &[&str]) -> Result<(), String> {
        self.apply_range(operator, values, Self::KIND)
    }

    fn predicates(&self) -> Vec<Predicate> {
        self.range_predicates()
    }
}

/// Filter on the identifier of a related entity.
///
/// Supports everything a numeric filter does plus `notIn`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationFilter {
    /// Operators shared with numeric filters, applied to the related identifier.
    pub ids: IdFilter,
    /// `notIn`: the related identifier is none of these.
    pub not_in: Option<Vec<EntityId>>,
}

impl RelationFilter {
    /// Sets `equals`.
    pub fn equals(mut self, id: EntityId) -> Self {
        self.ids = self.ids.equals(id);
        self
    }

    /// Sets `notEquals`.
    pub fn not_equals(mut self, id: EntityId) -> Self {
        self.ids = self.ids.not_equals(id);
        self
    }

    /// Sets `in`.
    pub fn in_list(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.ids = self.ids.in_list(ids);
        self
    }

    /// Sets `notIn`.
    pub fn not_in(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.not_in = Some(ids.into_iter().collect());
        self
    }

    /// Sets `specified`.
    pub fn specified(mut self, specified: bool) -> Self {
        self.ids = self.ids.specified(specified);
        self
    }

    /// Sets `greaterThan`.
    pub fn greater_than(mut self, id: EntityId) -> Self {
        self.ids = self.ids.greater_than(id);
        self
    }

    /// Sets `lessThan`.
    pub fn less_than(mut self, id: EntityId) -> Self {
        self.ids = self.ids.less_than(id);
        self
    }
}

impl FieldFilter for RelationFilter {
    const KIND: FieldKind = FieldKind::Relation;

    fn apply(&mut self, operator: Operator, values: &[&str]) -> Result<(), String> {
        match operator {
            Operator::NotIn => {
                self.not_in = Some(parse_list(values, EntityId::parse_value)?);
                Ok(())
            }
            other => self.ids.apply_range(other, values, Self::KIND),
        }
    }

    fn predicates(&self) -> Vec<Predicate> {
        let mut out = self.ids.range_predicates();
        if let Some(v) = &self.not_in {
            out.push(Predicate::NotIn(scalars(v)));
        }
        out
    }
}
