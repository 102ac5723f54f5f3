pub mod analyzers;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod reports;
pub mod transform;
