//! Derived metrics for raw feedback records.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error, info};

use crate::analyzers::utility::round_to;
use crate::error::RecordError;
use crate::output::{read_records_checked, write_json, write_records};
use crate::records::{
    DifficultyCategory, MAX_ATTENDANCE, MAX_RATING, MIN_ATTENDANCE, MIN_RATING,
    PerformanceCategory, ProcessedRecord, RawRecord,
};

/// Mean of the four satisfaction inputs, rounded to two decimals.
pub fn satisfaction_score(raw: &RawRecord) -> f64 {
    let sum = u32::from(raw.overall_rating)
        + u32::from(raw.course_content_rating)
        + u32::from(raw.instructor_effectiveness)
        + u32::from(raw.recommendation_score);
    round_to(sum as f64 / 4.0, 2)
}

/// Computes the derived fields for one record. Pure.
pub fn enhance(raw: RawRecord) -> ProcessedRecord {
    let score = satisfaction_score(&raw);
    let difficulty = DifficultyCategory::from_level(raw.difficulty_level);
    let performance = PerformanceCategory::from_score(score);
    ProcessedRecord::from_raw(raw, score, difficulty, performance)
}

/// Checks the value ranges a deserialized row cannot express in its types.
pub fn validate(raw: &RawRecord, line: u64) -> Result<(), RecordError> {
    for (field, value) in raw.ratings() {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(RecordError::OutOfRange {
                line,
                field,
                value: value.to_string(),
            });
        }
    }

    if !(MIN_ATTENDANCE..=MAX_ATTENDANCE).contains(&raw.attendance_rate) {
        return Err(RecordError::OutOfRange {
            line,
            field: "attendance_rate",
            value: raw.attendance_rate.to_string(),
        });
    }

    Ok(())
}

/// Counts written to `data_quality_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub records_processed: usize,
    pub records_cleaned: usize,
    pub records_skipped: usize,
    pub data_quality_score: f64,
    pub skipped_lines: Vec<u64>,
    pub generated_at: DateTime<Local>,
}

impl QualityReport {
    pub fn new(records_processed: usize, skipped: &[RecordError]) -> Self {
        let records_skipped = skipped.len();
        let records_cleaned = records_processed.saturating_sub(records_skipped);
        let data_quality_score = if records_processed == 0 {
            100.0
        } else {
            round_to(records_cleaned as f64 / records_processed as f64 * 100.0, 1)
        };

        QualityReport {
            records_processed,
            records_cleaned,
            records_skipped,
            data_quality_score,
            skipped_lines: skipped.iter().map(RecordError::line).collect(),
            generated_at: Local::now(),
        }
    }

    /// Reads a report written by a previous run. A missing file yields `None`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!(path = %path.display(), "No data quality report");
            return Ok(None);
        }
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let report = serde_json::from_str(&body)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Some(report))
    }
}

/// Result of a transformation run.
#[derive(Debug)]
pub struct Transformed {
    pub records: Vec<ProcessedRecord>,
    pub quality: QualityReport,
}

/// Enhances every row of `raw_path` and writes the processed CSV and quality report.
///
/// A missing input file is logged and yields `Ok(None)`. Rows that fail to
/// parse or validate are skipped with a warning and counted in the report.
#[tracing::instrument]
pub fn transform(
    raw_path: &Path,
    processed_path: &Path,
    quality_path: &Path,
) -> Result<Option<Transformed>> {
    if !raw_path.exists() {
        error!(path = %raw_path.display(), "Raw data file not found");
        return Ok(None);
    }

    let outcome = read_records_checked(raw_path, validate)?;
    let rows_read = outcome.rows_read();
    info!(records = rows_read, "Loaded raw records");

    let records: Vec<ProcessedRecord> = outcome.records.into_iter().map(enhance).collect();
    let skipped = outcome.skipped;

    write_records(processed_path, &records)?;
    info!(
        records = records.len(),
        skipped = skipped.len(),
        path = %processed_path.display(),
        "Processed data saved"
    );

    let quality = QualityReport::new(rows_read, &skipped);
    write_json(quality_path, &quality)?;

    Ok(Some(Transformed { records, quality }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CsvRow;
    use chrono::NaiveDate;

    /// Raw CSV columns after `overall_rating`, all valid.
    const VALID_TAIL: &str = "3,3,3,3,3,0.8,3,2024-07-13,2024-07-13 09:00:00";

    fn raw(ratings: (u8, u8, u8, u8), difficulty: u8) -> RawRecord {
        RawRecord {
            feedback_id: 1,
            student_id: "STU001".to_string(),
            course_id: "COURSE01".to_string(),
            instructor_id: "INST01".to_string(),
            semester: "Fall2024".to_string(),
            overall_rating: ratings.0,
            course_content_rating: ratings.1,
            instructor_effectiveness: ratings.2,
            difficulty_level: difficulty,
            workload_rating: 3,
            recommendation_score: ratings.3,
            attendance_rate: 0.9,
            assignment_quality: 4,
            feedback_date: NaiveDate::from_ymd_opt(2024, 7, 13).unwrap(),
            created_at: "2024-07-13 09:00:00".to_string(),
        }
    }

    #[test]
    fn test_satisfaction_is_rounded_mean() {
        assert_eq!(satisfaction_score(&raw((5, 5, 5, 5), 3)), 5.0);
        assert_eq!(satisfaction_score(&raw((4, 3, 3, 3), 3)), 3.25);
        assert_eq!(satisfaction_score(&raw((1, 1, 1, 2), 3)), 1.25);
        assert_eq!(satisfaction_score(&raw((1, 1, 1, 1), 3)), 1.0);
    }

    #[test]
    fn test_enhance_scenario() {
        let cases = [
            ((5, 5, 5, 5), 5.0, PerformanceCategory::Excellent),
            ((3, 3, 3, 3), 3.0, PerformanceCategory::Good),
            ((1, 1, 1, 1), 1.0, PerformanceCategory::Poor),
        ];
        for (ratings, score, category) in cases {
            let processed = enhance(raw(ratings, 2));
            assert_eq!(processed.satisfaction_score, score);
            assert_eq!(processed.performance_category, category);
            assert_eq!(processed.difficulty_category, DifficultyCategory::Easy);
        }
    }

    #[test]
    fn test_enhance_is_idempotent() {
        let first = enhance(raw((4, 2, 5, 3), 4));
        let second = enhance(first.to_raw());
        assert_eq!(first, second);
    }

    #[test]
    fn test_satisfaction_stays_in_scale() {
        for a in 1..=5 {
            for b in 1..=5 {
                let score = satisfaction_score(&raw((a, b, a, b), 3));
                assert!((1.0..=5.0).contains(&score));
            }
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(validate(&raw((3, 3, 3, 3), 3), 2).is_ok());

        let err = validate(&raw((6, 3, 3, 3), 3), 4).unwrap_err();
        assert_eq!(err.line(), 4);
        assert!(err.to_string().contains("overall_rating"));

        let mut low_attendance = raw((3, 3, 3, 3), 3);
        low_attendance.attendance_rate = 0.2;
        assert!(validate(&low_attendance, 5).is_err());
    }

    #[test]
    fn test_quality_report_scores() {
        let empty = QualityReport::new(0, &[]);
        assert_eq!(empty.data_quality_score, 100.0);

        let skipped = vec![RecordError::OutOfRange {
            line: 3,
            field: "overall_rating",
            value: "9".to_string(),
        }];
        let report = QualityReport::new(8, &skipped);
        assert_eq!(report.records_cleaned, 7);
        assert_eq!(report.records_skipped, 1);
        assert_eq!(report.data_quality_score, 87.5);
        assert_eq!(report.skipped_lines, vec![3]);
    }

    #[test]
    fn test_transform_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = transform(
            &dir.path().join("raw.csv"),
            &dir.path().join("processed.csv"),
            &dir.path().join("quality.json"),
        )
        .unwrap();
        assert!(result.is_none());
        assert!(!dir.path().join("processed.csv").exists());
    }

    #[test]
    fn test_transform_skips_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("raw.csv");
        let rows = vec![raw((5, 5, 5, 5), 1), raw((2, 2, 2, 2), 5)];
        write_records(&raw_path, &rows).unwrap();

        // append a non-numeric row and an out-of-range row
        let mut content = std::fs::read_to_string(&raw_path).unwrap();
        content.push_str(&format!("3,STU003,COURSE02,INST02,Fall2024,abc,{VALID_TAIL}\n"));
        content.push_str(
            "4,STU004,COURSE02,INST02,Fall2024,9,3,3,3,3,3,0.8,3,2024-07-13,2024-07-13 09:00:00\n",
        );
        std::fs::write(&raw_path, content).unwrap();

        let processed_path = dir.path().join("processed.csv");
        let quality_path = dir.path().join("quality.json");
        let result = transform(&raw_path, &processed_path, &quality_path)
            .unwrap()
            .unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.quality.records_processed, 4);
        assert_eq!(result.quality.records_skipped, 2);
        assert_eq!(result.quality.skipped_lines, vec![4, 5]);
        assert!(processed_path.exists());

        let saved = QualityReport::load(&quality_path).unwrap().unwrap();
        assert_eq!(saved.records_cleaned, 2);
        assert_eq!(saved.data_quality_score, 50.0);
        assert!(QualityReport::load(&dir.path().join("none.json")).unwrap().is_none());
    }

    #[test]
    fn test_transform_all_rows_rejected_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("raw.csv");
        write_records::<RawRecord>(&raw_path, &[]).unwrap();

        let mut content = std::fs::read_to_string(&raw_path).unwrap();
        content.push_str(&format!("1,STU001,COURSE01,INST01,Fall2024,abc,{VALID_TAIL}\n"));
        std::fs::write(&raw_path, content).unwrap();

        let processed_path = dir.path().join("processed.csv");
        let result = transform(&raw_path, &processed_path, &dir.path().join("quality.json"))
            .unwrap()
            .unwrap();

        assert!(result.records.is_empty());
        assert_eq!(result.quality.records_skipped, 1);
        assert_eq!(result.quality.data_quality_score, 0.0);

        let body = std::fs::read_to_string(&processed_path).unwrap();
        assert!(body.starts_with("feedback_id,student_id,course_id"));
        assert_eq!(
            body.trim_end(),
            ProcessedRecord::HEADERS.join(","),
            "header-only file expected"
        );
    }
}
