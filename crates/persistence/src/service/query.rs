//! Criteria queries against the primary store.

use std::sync::Arc;

use tracing::debug;

use crate::core::SpecificationExecutor;
use crate::criteria::Criteria;
use crate::error::StorageResult;
use crate::filter::Specification;
use crate::model::Entity;
use crate::types::{Page, PageRequest};

/// Runs criteria queries in list, page and count mode.
///
/// One service serves every entity type; the criteria type selects the entity.
pub struct QueryService<R> {
    repository: Arc<R>,
}

impl<R> Clone for QueryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> QueryService<R> {
    /// Creates a query service over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Builds the conjunctive specification for `criteria`.
    ///
    /// `None` and empty criteria both yield the unrestricted specification.
    pub fn create_specification<C: Criteria>(criteria: Option<&C>) -> Specification {
        let mut spec = Specification::all(C::ROOT);
        if let Some(criteria) = criteria {
            for (field, predicates) in criteria.predicates() {
                spec = spec.and_all(field, predicates);
            }
        }
        spec
    }

    /// Returns every entity matching `criteria`.
    pub async fn find_by_criteria<C>(&self, criteria: &C) -> StorageResult<Vec<C::Entity>>
    where
        C: Criteria,
        R: SpecificationExecutor<C::Entity>,
    {
        debug!(entity = C::Entity::NAME, ?criteria, "Find by criteria");
        let spec = Self::create_specification(Some(criteria));
        self.repository.find_all_matching(&spec).await
    }

    /// Returns one page of entities matching `criteria`.
    pub async fn find_page_by_criteria<C>(
        &self,
        criteria: &C,
        page: &PageRequest,
    ) -> StorageResult<Page<C::Entity>>
    where
        C: Criteria,
        R: SpecificationExecutor<C::Entity>,
    {
        debug!(
            entity = C::Entity::NAME,
            ?criteria,
            page = page.page,
            size = page.size,
            "Find page by criteria"
        );
        let spec = Self::create_specification(Some(criteria));
        self.repository.find_page_matching(&spec, page).await
    }

    /// Counts the entities matching `criteria`.
    pub async fn count_by_criteria<C>(&self, criteria: &C) -> StorageResult<u64>
    where
        C: Criteria,
        R: SpecificationExecutor<C::Entity>,
    {
        debug!(entity = C::Entity::NAME, ?criteria, "Count by criteria");
        let spec = Self::create_specification(Some(criteria));
        self.repository.count_matching(&spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{FragmentCriteria, StoryCriteria};
    use crate::filter::{IntegerFilter, Predicate, RelationFilter, ScalarValue, StringFilter};
    use crate::model::EntityId;

    type Service = QueryService<()>;

    #[test]
    fn test_none_yields_unrestricted() {
        let spec = Service::create_specification::<StoryCriteria>(None);
        assert!(spec.is_unrestricted());
        assert_eq!(spec.root(), "story");
    }

    #[test]
    fn test_empty_criteria_yields_unrestricted() {
        let spec = Service::create_specification(Some(&FragmentCriteria::default()));
        assert!(spec.is_unrestricted());

        let empty_filter = FragmentCriteria {
            name: Some(StringFilter::default()),
            ..Default::default()
        };
        assert!(Service::create_specification(Some(&empty_filter)).is_unrestricted());
    }

    #[test]
    fn test_one_condition_per_operand() {
        let criteria = FragmentCriteria {
            width: Some(IntegerFilter::default().greater_than(1).less_than(5)),
            tag_id: Some(RelationFilter::default().equals(EntityId::new(3))),
            ..Default::default()
        };
        let spec = Service::create_specification(Some(&criteria));
        assert_eq!(spec.conditions().len(), 3);
        assert!(spec.conditions().iter().any(|c| c.field.name == "tagId"
            && c.predicate == Predicate::Equals(ScalarValue::Integer(3))));
        assert_eq!(spec.joins().len(), 1);
        assert_eq!(spec.joins()[0].0, 2);
    }

    #[test]
    fn test_building_is_order_independent() {
        let a = FragmentCriteria::from_query_pairs([
            ("width.equals", "1"),
            ("name.equals", "x1"),
        ])
        .unwrap();
        let b = FragmentCriteria::from_query_pairs([
            ("name.equals", "x1"),
            ("width.equals", "1"),
        ])
        .unwrap();
        assert_eq!(
            Service::create_specification(Some(&a)),
            Service::create_specification(Some(&b))
        );
    }
}
