//! Core types shared by stores, indexes and services.

mod pagination;

pub use pagination::{DEFAULT_PAGE_SIZE, Direction, Page, PageRequest, SortOrder};
