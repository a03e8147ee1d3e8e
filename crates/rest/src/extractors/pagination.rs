//! Pagination extractor.
//!
//! Extracts `page`, `size`, `sort` and `eagerload` from the query string.
//! `sort` may repeat: `?sort=name,desc&sort=id`.

use axum::{extract::FromRequestParts, http::request::Parts};
use bon_content_persistence::types::{Direction, PageRequest, SortOrder};

use crate::error::RestError;
use crate::state::AppState;

/// Axum extractor for pagination parameters.
///
/// Defaults and the size cap come from the server configuration.
///
/// # Example
///
/// ```rust,ignore
/// use bon_content_rest::extractors::Pagination;
///
/// async fn list_handler(pagination: Pagination) {
///     let request = pagination.page_request();
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Pagination {
    /// Zero-based page number.
    page: u32,
    /// Page size, already capped.
    size: u32,
    /// Sort directives in request order.
    sort: Vec<SortOrder>,
    /// Whether to-many relations should be loaded.
    eager: bool,
}

impl Pagination {
    /// Parses pagination from query pairs.
    pub fn from_pairs<'a, I>(pairs: I, default_size: u32, max_size: u32) -> Result<Self, RestError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut pagination = Self {
            page: 0,
            size: default_size.min(max_size),
            sort: Vec::new(),
            eager: false,
        };

        for (key, value) in pairs {
            match key {
                "page" => pagination.page = parse_number(key, value)?,
                "size" => pagination.size = parse_number(key, value)?.min(max_size),
                "sort" => {
                    if let Some(order) = parse_sort(value)? {
                        pagination.sort.push(order);
                    }
                }
                "eagerload" => {
                    pagination.eager = value.parse().map_err(|_| {
                        RestError::bad_request(
                            "invalidpagination",
                            format!("Invalid eagerload value '{}'", value),
                        )
                    })?
                }
                _ => {}
            }
        }

        Ok(pagination)
    }

    /// Returns the page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the sort directives.
    pub fn sort(&self) -> &[SortOrder] {
        &self.sort
    }

    /// Returns whether relations should be loaded eagerly.
    pub fn eager(&self) -> bool {
        self.eager
    }

    /// Converts into a store page request.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32, RestError> {
    value.trim().parse().map_err(|_| {
        RestError::bad_request(
            "invalidpagination",
            format!("Invalid {} value '{}'", key, value),
        )
    })
}

/// Parses `property[,asc|desc]`. An empty value is ignored.
fn parse_sort(value: &str) -> Result<Option<SortOrder>, RestError> {
    let mut parts = value.split(',').map(str::trim);
    let property = match parts.next() {
        Some(property) if !property.is_empty() => property,
        _ => return Ok(None),
    };
    let direction = match parts.next() {
        Some(direction) if !direction.is_empty() => direction
            .parse::<Direction>()
            .map_err(|message| RestError::bad_request("invalidsort", message))?,
        _ => Direction::Asc,
    };
    if parts.next().is_some() {
        return Err(RestError::bad_request(
            "invalidsort",
            format!("Invalid sort '{}'", value),
        ));
    }
    Ok(Some(SortOrder {
        property: property.to_string(),
        direction,
    }))
}

impl<S, I> FromRequestParts<AppState<S, I>> for Pagination
where
    S: Send + Sync,
    I: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, I>,
    ) -> Result<Self, Self::Rejection> {
        let pairs = super::query_pairs(parts);
        Pagination::from_pairs(
            pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            state.default_page_size(),
            state.max_page_size(),
        )
    }
}
