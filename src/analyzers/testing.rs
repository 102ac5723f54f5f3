//! Record builders shared by unit tests.

use chrono::NaiveDate;

use crate::records::{ProcessedRecord, RawRecord};
use crate::transform::enhance;

/// Builds a processed record. `ratings` are overall, content, instructor and
/// recommendation.
pub fn record(
    id: u32,
    course: &str,
    instructor: &str,
    semester: &str,
    ratings: (u8, u8, u8, u8),
    difficulty: u8,
) -> ProcessedRecord {
    enhance(RawRecord {
        feedback_id: id,
        student_id: format!("STU{id:03}"),
        course_id: course.to_string(),
        instructor_id: instructor.to_string(),
        semester: semester.to_string(),
        overall_rating: ratings.0,
        course_content_rating: ratings.1,
        instructor_effectiveness: ratings.2,
        difficulty_level: difficulty,
        workload_rating: 3,
        recommendation_score: ratings.3,
        attendance_rate: 0.8,
        assignment_quality: 3,
        feedback_date: NaiveDate::from_ymd_opt(2024, 7, 13).unwrap(),
        created_at: "2024-07-13 09:00:00".to_string(),
    })
}
