//! Synthetic feedback generation.

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::output::{write_json, write_records};
use crate::records::{MAX_ATTENDANCE, MAX_RATING, MIN_ATTENDANCE, MIN_RATING, RawRecord};

pub const COURSE_POOL: u32 = 10;
pub const INSTRUCTOR_POOL: u32 = 5;
pub const SEMESTERS: &[&str] = &["Fall2024", "Spring2024", "Summer2024"];

/// Format of the `created_at` column.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub count: u32,
    pub feedback_date: NaiveDate,
    pub created_at: DateTime<Local>,
}

impl ExtractOptions {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            feedback_date: NaiveDate::from_ymd_opt(2024, 7, 13).unwrap_or_default(),
            created_at: Local::now(),
        }
    }
}

/// Produces `options.count` raw records numbered from 1.
///
/// Course and instructor are drawn from the fixed pools, every rating is
/// uniform in 1..=5 and attendance is uniform in [0.6, 1.0] rounded to two
/// decimals.
pub fn generate<R: Rng>(rng: &mut R, options: &ExtractOptions) -> Vec<RawRecord> {
    let created_at = options.created_at.format(CREATED_AT_FORMAT).to_string();

    (1..=options.count)
        .map(|i| {
            let mut rating = || rng.gen_range(MIN_RATING..=MAX_RATING);
            let overall_rating = rating();
            let course_content_rating = rating();
            let instructor_effectiveness = rating();
            let difficulty_level = rating();
            let workload_rating = rating();
            let recommendation_score = rating();
            let assignment_quality = rating();

            let attendance = rng.gen_range(MIN_ATTENDANCE..=MAX_ATTENDANCE);

            RawRecord {
                feedback_id: i,
                student_id: format!("STU{i:03}"),
                course_id: format!("COURSE{:02}", rng.gen_range(1..=COURSE_POOL)),
                instructor_id: format!("INST{:02}", rng.gen_range(1..=INSTRUCTOR_POOL)),
                semester: SEMESTERS
                    .choose(&mut *rng)
                    .copied()
                    .unwrap_or(SEMESTERS[0])
                    .to_string(),
                overall_rating,
                course_content_rating,
                instructor_effectiveness,
                difficulty_level,
                workload_rating,
                recommendation_score,
                attendance_rate: (attendance * 100.0).round() / 100.0,
                assignment_quality,
                feedback_date: options.feedback_date,
                created_at: created_at.clone(),
            }
        })
        .collect()
}

/// Side file describing one extraction run.
#[derive(Debug, Serialize)]
pub struct ExtractMetadata {
    pub records: usize,
    pub generated_at: DateTime<Local>,
    pub csv_path: PathBuf,
    pub courses: u32,
    pub instructors: u32,
    pub semesters: Vec<String>,
}

/// Result of [`extract`].
#[derive(Debug)]
pub struct Extracted {
    pub records: Vec<RawRecord>,
    pub csv_path: PathBuf,
}

/// Generates records and writes them to `csv_path`, with metadata next to it.
#[tracing::instrument(skip(rng, options), fields(count = options.count))]
pub fn extract<R: Rng>(
    rng: &mut R,
    options: &ExtractOptions,
    csv_path: &Path,
    metadata_path: &Path,
) -> Result<Extracted> {
    info!(count = options.count, "Creating sample records");
    let records = generate(rng, options);

    write_records(csv_path, &records)?;
    info!(records = records.len(), path = %csv_path.display(), "Raw records saved");

    let metadata = ExtractMetadata {
        records: records.len(),
        generated_at: options.created_at,
        csv_path: csv_path.to_path_buf(),
        courses: COURSE_POOL,
        instructors: INSTRUCTOR_POOL,
        semesters: SEMESTERS.iter().map(|s| s.to_string()).collect(),
    };
    write_json(metadata_path, &metadata)?;

    Ok(Extracted {
        records,
        csv_path: csv_path.to_path_buf(),
    })
}
