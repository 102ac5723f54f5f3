use std::path::{Path, PathBuf};

pub const RAW_CSV: &str = "data/raw/student_feedback.csv";
pub const RAW_METADATA: &str = "data/raw/metadata.json";
pub const PROCESSED_CSV: &str = "data/processed/processed_feedback.csv";
pub const QUALITY_REPORT: &str = "data/processed/data_quality_report.json";
pub const AGGREGATIONS: &str = "data/processed/aggregations.json";
pub const REPORTS_DIR: &str = "reports";

/// Resolves every pipeline file from a single root directory.
///
/// The layout under the root is fixed:
/// ```text
/// data/raw/student_feedback.csv
/// data/raw/metadata.json
/// data/processed/processed_feedback.csv
/// data/processed/data_quality_report.json
/// reports/*
/// ```
#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_csv(&self) -> PathBuf {
        self.root.join(RAW_CSV)
    }

    pub fn raw_metadata(&self) -> PathBuf {
        self.root.join(RAW_METADATA)
    }

    pub fn processed_csv(&self) -> PathBuf {
        self.root.join(PROCESSED_CSV)
    }

    pub fn quality_report(&self) -> PathBuf {
        self.root.join(QUALITY_REPORT)
    }

    pub fn aggregations(&self) -> PathBuf {
        self.root.join(AGGREGATIONS)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join(REPORTS_DIR)
    }

    /// Path of a named file inside the reports directory.
    pub fn report(&self, file_name: &str) -> PathBuf {
        self.reports_dir().join(file_name)
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new(".")
    }
}
