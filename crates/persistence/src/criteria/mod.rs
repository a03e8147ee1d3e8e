//! Criteria objects.
//!
//! One criteria type per entity holds an optional filter for each filterable
//! field. Each type also publishes a static field table ([`Criteria::fields`])
//! naming the query parameter, value kind and accessor of every field, so the
//! set of filterable fields can be enumerated and tested without a store.
//!
//! Criteria are bound from query parameters written as `field.operator=value`:
//!
//! ```
//! use bon_content_persistence::criteria::{Criteria, FragmentCriteria};
//!
//! let criteria = FragmentCriteria::from_query_pairs([
//!     ("width.lessThan", "2"),
//!     ("tagId.in", "3,4"),
//!     ("page", "0"),
//! ])
//! .unwrap();
//! assert_eq!(criteria.width.unwrap().less_than, Some(2));
//! ```

use std::fmt;

use crate::error::ValidationError;
use crate::filter::{FieldDef, Operator, Predicate};
use crate::model::Entity;

/// Common behaviour of the per-entity criteria types.
pub trait Criteria: Default + Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// The entity these criteria select.
    type Entity: Entity;

    /// The root table queried.
    const ROOT: &'static str;

    /// The static field table.
    fn fields() -> &'static [FieldDef];

    /// Sets one operator of the field named `parameter`.
    ///
    /// Returns `Ok(false)` when no field has that name.
    fn apply(
        &mut self,
        parameter: &str,
        operator: Operator,
        values: &[&str],
    ) -> Result<bool, ValidationError>;

    /// Predicates of every set filter, paired with their field.
    fn predicates(&self) -> Vec<(&'static FieldDef, Vec<Predicate>)>;

    /// Looks up a field by parameter name.
    fn field(name: &str) -> Option<&'static FieldDef> {
        Self::fields().iter().find(|f| f.name == name)
    }

    /// Returns true if no filter is set.
    fn is_empty(&self) -> bool {
        self.predicates().iter().all(|(_, p)| p.is_empty())
    }

    /// Binds criteria from `field.operator=value` pairs.
    ///
    /// Repeated keys accumulate values. Keys that do not name a field are
    /// ignored; a known field with an unknown or unavailable operator, or a
    /// value that does not parse, is rejected.
    fn from_query_pairs<'a, I>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut grouped: Vec<(&'a str, Vec<&'a str>)> = Vec::new();
        for (key, value) in pairs {
            match grouped.iter_mut().find(|(k, _)| *k == key) {
                Some((_, values)) => values.push(value),
                None => grouped.push((key, vec![value])),
            }
        }

        let mut criteria = Self::default();
        for (key, values) in grouped {
            let Some((name, operator)) = key.rsplit_once('.') else {
                continue;
            };
            if Self::field(name).is_none() {
                continue;
            }
            let operator: Operator =
                operator
                    .parse()
                    .map_err(|message| ValidationError::InvalidFilterParameter {
                        parameter: key.to_string(),
                        message,
                    })?;
            criteria.apply(name, operator, &values)?;
        }
        Ok(criteria)
    }
}

/// Declares a criteria struct together with its static field table.
macro_rules! criteria {
    (
        $(#[$meta:meta])*
        pub struct $name:ident for $entity:ident in $root:literal {
            $(
                $field:ident: $filter:ty = $param:literal => $path:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(
                #[doc = concat!("Filter on `", $param, "`.")]
                pub $field: Option<$filter>,
            )+
        }

        impl $crate::criteria::Criteria for $name {
            type Entity = $entity;

            const ROOT: &'static str = $root;

            fn fields() -> &'static [$crate::filter::FieldDef] {
                static FIELDS: &[$crate::filter::FieldDef] = &[
                    $(
                        $crate::filter::FieldDef {
                            name: $param,
                            kind: <$filter as $crate::filter::FieldFilter>::KIND,
                            path: $path,
                        },
                    )+
                ];
                FIELDS
            }

            fn apply(
                &mut self,
                parameter: &str,
                operator: $crate::filter::Operator,
                values: &[&str],
            ) -> Result<bool, $crate::error::ValidationError> {
                use $crate::filter::FieldFilter;

                match parameter {
                    $(
                        $param => {
                            self.$field
                                .get_or_insert_with(Default::default)
                                .apply(operator, values)
                                .map_err(|message| {
                                    $crate::error::ValidationError::InvalidFilterParameter {
                                        parameter: format!("{}.{}", $param, operator),
                                        message,
                                    }
                                })?;
                            Ok(true)
                        }
                    )+
                    _ => Ok(false),
                }
            }

            fn predicates(
                &self,
            ) -> Vec<(&'static $crate::filter::FieldDef, Vec<$crate::filter::Predicate>)> {
                use $crate::filter::FieldFilter;

                let mut out = Vec::new();
                $(
                    if let (Some(filter), Some(def)) = (&self.$field, Self::field($param)) {
                        out.push((def, filter.predicates()));
                    }
                )+
                out
            }
        }
    };
}

mod fragment;
mod localized;
mod story;
mod tag;

pub use fragment::FragmentCriteria;
pub use localized::LocalizedCriteria;
pub use story::StoryCriteria;
pub use tag::TagCriteria;

#[cfg(test)]
mod tests {
    use super::*;

    fn binding<C: Criteria>() -> (&'static str, &'static str) {
        (<C::Entity as Entity>::NAME, C::ROOT)
    }

    #[test]
    fn test_each_criteria_selects_its_entity() {
        assert_eq!(binding::<StoryCriteria>(), ("Story", "story"));
        assert_eq!(binding::<FragmentCriteria>(), ("Fragment", "fragment"));
        assert_eq!(binding::<LocalizedCriteria>(), ("Localized", "localized"));
        assert_eq!(binding::<TagCriteria>(), ("Tag", "tag"));
    }
}
