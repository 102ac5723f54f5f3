//! Data types used by the aggregation layer.

use serde::Serialize;

use crate::records::ProcessedRecord;

/// A categorical column records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    StudentId,
    CourseId,
    InstructorId,
    Semester,
    DifficultyCategory,
    PerformanceCategory,
}

impl KeyField {
    pub fn of(self, record: &ProcessedRecord) -> &str {
        match self {
            KeyField::StudentId => &record.student_id,
            KeyField::CourseId => &record.course_id,
            KeyField::InstructorId => &record.instructor_id,
            KeyField::Semester => &record.semester,
            KeyField::DifficultyCategory => record.difficulty_category.as_str(),
            KeyField::PerformanceCategory => record.performance_category.as_str(),
        }
    }
}

/// A numeric column that can be averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    SatisfactionScore,
    OverallRating,
    CourseContentRating,
    InstructorEffectiveness,
    DifficultyLevel,
    WorkloadRating,
    RecommendationScore,
    AssignmentQuality,
    AttendanceRate,
}

impl ValueField {
    pub fn of(self, record: &ProcessedRecord) -> f64 {
        match self {
            ValueField::SatisfactionScore => record.satisfaction_score,
            ValueField::OverallRating => f64::from(record.overall_rating),
            ValueField::CourseContentRating => f64::from(record.course_content_rating),
            ValueField::InstructorEffectiveness => f64::from(record.instructor_effectiveness),
            ValueField::DifficultyLevel => f64::from(record.difficulty_level),
            ValueField::WorkloadRating => f64::from(record.workload_rating),
            ValueField::RecommendationScore => f64::from(record.recommendation_score),
            ValueField::AssignmentQuality => f64::from(record.assignment_quality),
            ValueField::AttendanceRate => record.attendance_rate,
        }
    }
}

/// Mean of one value field over the records sharing a key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub key: String,
    pub mean: f64,
    pub count: usize,
}

/// Dataset-wide figures shown at the top of most reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_records: usize,
    pub avg_satisfaction: f64,
    pub avg_overall_rating: f64,
    pub avg_attendance: f64,
    pub unique_students: usize,
    pub unique_courses: usize,
    pub unique_instructors: usize,
    pub unique_semesters: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstructorProfile {
    pub instructor_id: String,
    pub reviews: usize,
    pub avg_overall_rating: f64,
    pub avg_satisfaction: f64,
    pub courses_taught: usize,
    pub semesters_active: usize,
    /// 1.0 when every review has the same satisfaction, 0.0 for a full 1–5 spread.
    pub consistency: f64,
    pub rating_stddev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseProfile {
    pub course_id: String,
    pub reviews: usize,
    pub avg_satisfaction: f64,
    pub avg_difficulty: f64,
    pub instructors: usize,
    pub semesters_offered: usize,
}

/// What the interactive dashboard searches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Exact instructor ID, case-insensitive.
    Instructor(String),
    /// Exact course ID, case-insensitive.
    Course(String),
    /// Semester substring, case-insensitive.
    Semester(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub reviews: usize,
    pub avg_satisfaction: f64,
    pub avg_difficulty: f64,
    pub courses: Vec<String>,
    pub instructors: Vec<String>,
}
