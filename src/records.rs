use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::output::CsvRow;

/// Lowest value on every rating scale.
pub const MIN_RATING: u8 = 1;
/// Highest value on every rating scale.
pub const MAX_RATING: u8 = 5;
pub const MIN_ATTENDANCE: f64 = 0.6;
pub const MAX_ATTENDANCE: f64 = 1.0;

/// A synthetic feedback entry as written by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub feedback_id: u32,
    pub student_id: String,
    pub course_id: String,
    pub instructor_id: String,
    pub semester: String,

    // ratings, 1..=5
    pub overall_rating: u8,
    pub course_content_rating: u8,
    pub instructor_effectiveness: u8,
    pub difficulty_level: u8,
    pub workload_rating: u8,
    pub recommendation_score: u8,

    pub attendance_rate: f64,
    pub assignment_quality: u8,

    pub feedback_date: NaiveDate,
    pub created_at: String,
}

impl RawRecord {
    /// Returns every rating column by name, in CSV order.
    pub fn ratings(&self) -> [(&'static str, u8); 7] {
        [
            ("overall_rating", self.overall_rating),
            ("course_content_rating", self.course_content_rating),
            ("instructor_effectiveness", self.instructor_effectiveness),
            ("difficulty_level", self.difficulty_level),
            ("workload_rating", self.workload_rating),
            ("recommendation_score", self.recommendation_score),
            ("assignment_quality", self.assignment_quality),
        ]
    }
}

/// Bucket of `difficulty_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifficultyCategory {
    Easy,
    Moderate,
    Hard,
    #[serde(rename = "Very Hard")]
    VeryHard,
}

impl DifficultyCategory {
    pub const ALL: [DifficultyCategory; 4] = [
        DifficultyCategory::Easy,
        DifficultyCategory::Moderate,
        DifficultyCategory::Hard,
        DifficultyCategory::VeryHard,
    ];

    /// | Level | Category  |
    /// |-------|-----------|
    /// | <= 2  | Easy      |
    /// | 3     | Moderate  |
    /// | 4     | Hard      |
    /// | >= 5  | Very Hard |
    pub fn from_level(level: u8) -> Self {
        match level {
            0..=2 => DifficultyCategory::Easy,
            3 => DifficultyCategory::Moderate,
            4 => DifficultyCategory::Hard,
            _ => DifficultyCategory::VeryHard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyCategory::Easy => "Easy",
            DifficultyCategory::Moderate => "Moderate",
            DifficultyCategory::Hard => "Hard",
            DifficultyCategory::VeryHard => "Very Hard",
        }
    }
}

impl fmt::Display for DifficultyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket of `satisfaction_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PerformanceCategory {
    Excellent,
    Good,
    Poor,
}

impl PerformanceCategory {
    pub const ALL: [PerformanceCategory; 3] = [
        PerformanceCategory::Excellent,
        PerformanceCategory::Good,
        PerformanceCategory::Poor,
    ];

    /// Both thresholds are inclusive: 4.0 is Excellent, 3.0 is Good.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 4.0 => PerformanceCategory::Excellent,
            s if s >= 3.0 => PerformanceCategory::Good,
            _ => PerformanceCategory::Poor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceCategory::Excellent => "Excellent",
            PerformanceCategory::Good => "Good",
            PerformanceCategory::Poor => "Poor",
        }
    }
}

impl fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw record plus its derived metrics, one row of the processed CSV.
///
/// The raw columns are repeated rather than flattened so the CSV writer can
/// serialize the struct directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub feedback_id: u32,
    pub student_id: String,
    pub course_id: String,
    pub instructor_id: String,
    pub semester: String,

    pub overall_rating: u8,
    pub course_content_rating: u8,
    pub instructor_effectiveness: u8,
    pub difficulty_level: u8,
    pub workload_rating: u8,
    pub recommendation_score: u8,

    pub attendance_rate: f64,
    pub assignment_quality: u8,

    pub feedback_date: NaiveDate,
    pub created_at: String,

    // derived
    pub satisfaction_score: f64,
    pub difficulty_category: DifficultyCategory,
    pub performance_category: PerformanceCategory,
}

impl ProcessedRecord {
    /// Attaches already computed derived fields to `raw`.
    pub fn from_raw(
        raw: RawRecord,
        satisfaction_score: f64,
        difficulty_category: DifficultyCategory,
        performance_category: PerformanceCategory,
    ) -> Self {
        ProcessedRecord {
            feedback_id: raw.feedback_id,
            student_id: raw.student_id,
            course_id: raw.course_id,
            instructor_id: raw.instructor_id,
            semester: raw.semester,
            overall_rating: raw.overall_rating,
            course_content_rating: raw.course_content_rating,
            instructor_effectiveness: raw.instructor_effectiveness,
            difficulty_level: raw.difficulty_level,
            workload_rating: raw.workload_rating,
            recommendation_score: raw.recommendation_score,
            attendance_rate: raw.attendance_rate,
            assignment_quality: raw.assignment_quality,
            feedback_date: raw.feedback_date,
            created_at: raw.created_at,
            satisfaction_score,
            difficulty_category,
            performance_category,
        }
    }

    /// Strips the derived fields.
    pub fn to_raw(&self) -> RawRecord {
        RawRecord {
            feedback_id: self.feedback_id,
            student_id: self.student_id.clone(),
            course_id: self.course_id.clone(),
            instructor_id: self.instructor_id.clone(),
            semester: self.semester.clone(),
            overall_rating: self.overall_rating,
            course_content_rating: self.course_content_rating,
            instructor_effectiveness: self.instructor_effectiveness,
            difficulty_level: self.difficulty_level,
            workload_rating: self.workload_rating,
            recommendation_score: self.recommendation_score,
            attendance_rate: self.attendance_rate,
            assignment_quality: self.assignment_quality,
            feedback_date: self.feedback_date,
            created_at: self.created_at.clone(),
        }
    }
}

const RAW_HEADERS: [&str; 15] = [
    "feedback_id",
    "student_id",
    "course_id",
    "instructor_id",
    "semester",
    "overall_rating",
    "course_content_rating",
    "instructor_effectiveness",
    "difficulty_level",
    "workload_rating",
    "recommendation_score",
    "attendance_rate",
    "assignment_quality",
    "feedback_date",
    "created_at",
];

impl CsvRow for RawRecord {
    const HEADERS: &'static [&'static str] = &RAW_HEADERS;
}

impl CsvRow for ProcessedRecord {
    const HEADERS: &'static [&'static str] = &[
        RAW_HEADERS[0],
        RAW_HEADERS[1],
        RAW_HEADERS[2],
        RAW_HEADERS[3],
        RAW_HEADERS[4],
        RAW_HEADERS[5],
        RAW_HEADERS[6],
        RAW_HEADERS[7],
        RAW_HEADERS[8],
        RAW_HEADERS[9],
        RAW_HEADERS[10],
        RAW_HEADERS[11],
        RAW_HEADERS[12],
        RAW_HEADERS[13],
        RAW_HEADERS[14],
        "satisfaction_score",
        "difficulty_category",
        "performance_category",
    ];
}
