//! Aggregation and grading over processed feedback records.
//!
//! This module groups records by a categorical column, averages numeric
//! columns, ranks groups and assigns letter grades. Every report is built
//! from these aggregates.

pub mod aggregate;
pub mod grade;
pub mod types;
pub mod utility;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::{Aggregator, fill_universe};
pub use grade::{Grade, grade};
pub use types::{
    CourseProfile, GroupStat, InstructorProfile, KeyField, Overview, SearchQuery, SearchResult,
    ValueField,
};
