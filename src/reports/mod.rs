//! Presentation layer.
//!
//! Every renderer takes an [`Aggregator`](crate::analyzers::Aggregator) and
//! returns text or writes files; none of them compute statistics of their own.

pub mod chart;
pub mod console;
pub mod dashboard;
pub mod export;
pub mod html;
pub mod interactive;

use crate::records::{DifficultyCategory, PerformanceCategory};

/// Difficulty categories in display order.
pub fn difficulty_universe() -> [&'static str; 4] {
    DifficultyCategory::ALL.map(DifficultyCategory::as_str)
}

/// Performance categories in display order.
pub fn performance_universe() -> [&'static str; 3] {
    PerformanceCategory::ALL.map(PerformanceCategory::as_str)
}
