pub mod comparator;
pub mod paginator;
pub mod predicate;
