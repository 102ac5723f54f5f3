//! Spreadsheet-style CSV reports under `reports/`.
//!
//! Each file stacks titled sections of differing widths, so the writer is
//! flexible and rows are plain string records.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use csv::{Writer, WriterBuilder};
use tracing::info;

use crate::analyzers::utility::pct;
use crate::analyzers::{Aggregator, KeyField, ValueField, fill_universe, grade};
use crate::output::{ensure_parent, write_records};
use crate::records::DifficultyCategory;
use crate::reports::{difficulty_universe, performance_universe};

pub const EXECUTIVE_SUMMARY: &str = "Executive_Summary_Report.csv";
pub const INSTRUCTOR_PERFORMANCE: &str = "Instructor_Performance_Report.csv";
pub const COURSE_ANALYSIS: &str = "Course_Analysis_Report.csv";
pub const TREND_ANALYSIS: &str = "Trend_Analysis_Report.csv";
pub const DETAILED_DATA: &str = "Detailed_Data_Export.csv";

struct Sheet {
    path: PathBuf,
    writer: Writer<File>,
}

impl Sheet {
    fn create(path: PathBuf, title: &str, generated_at: DateTime<Local>) -> Result<Self> {
        ensure_parent(&path)?;
        let writer = WriterBuilder::new()
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        let mut sheet = Sheet { path, writer };
        sheet.row([title])?;
        sheet.row([format!(
            "Generated: {}",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        )])?;
        sheet.blank()?;
        Ok(sheet)
    }

    fn row<I, S>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.writer
            .write_record(fields)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    fn blank(&mut self) -> Result<()> {
        self.row([""])
    }

    fn finish(mut self) -> Result<PathBuf> {
        self.writer
            .flush()
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(self.path)
    }
}

/// Writes all five CSV reports into `reports_dir` and returns their paths.
#[tracing::instrument(skip(agg, generated_at), fields(records = agg.len()))]
pub fn export_all(
    agg: &Aggregator,
    reports_dir: &Path,
    generated_at: DateTime<Local>,
) -> Result<Vec<PathBuf>> {
    let paths = vec![
        executive_summary(agg, &reports_dir.join(EXECUTIVE_SUMMARY), generated_at)?,
        instructor_performance(agg, &reports_dir.join(INSTRUCTOR_PERFORMANCE), generated_at)?,
        course_analysis(agg, &reports_dir.join(COURSE_ANALYSIS), generated_at)?,
        detailed_data(agg, &reports_dir.join(DETAILED_DATA))?,
        trend_analysis(agg, &reports_dir.join(TREND_ANALYSIS), generated_at)?,
    ];
    for path in &paths {
        info!(path = %path.display(), "Report written");
    }
    Ok(paths)
}

fn distribution_section(
    sheet: &mut Sheet,
    title: &str,
    rows: &[(String, usize)],
    total: usize,
) -> Result<()> {
    sheet.row([title])?;
    sheet.row(["Category", "Count", "Percentage"])?;
    for (category, count) in rows {
        sheet.row([
            category.clone(),
            count.to_string(),
            format!("{:.1}%", pct(*count, total)),
        ])?;
    }
    Ok(())
}

pub fn executive_summary(
    agg: &Aggregator,
    path: &Path,
    generated_at: DateTime<Local>,
) -> Result<PathBuf> {
    let mut sheet = Sheet::create(
        path.to_path_buf(),
        "ACADEMIC PULSE - EXECUTIVE SUMMARY REPORT",
        generated_at,
    )?;
    let overview = agg.overview();
    let total = overview.total_records;

    sheet.row(["KEY PERFORMANCE INDICATORS"])?;
    sheet.row(["Metric", "Value"])?;
    sheet.row(["Total Feedback Records".to_string(), total.to_string()])?;
    sheet.row([
        "Average Satisfaction Score".to_string(),
        format!("{:.2}/5.0", overview.avg_satisfaction),
    ])?;
    sheet.row([
        "Performance Grade".to_string(),
        grade(overview.avg_satisfaction).label().to_string(),
    ])?;
    sheet.row(["Students Surveyed".to_string(), overview.unique_students.to_string()])?;
    sheet.row(["Courses Evaluated".to_string(), overview.unique_courses.to_string()])?;
    sheet.row([
        "Instructors Assessed".to_string(),
        overview.unique_instructors.to_string(),
    ])?;
    sheet.row(["Semesters Covered".to_string(), overview.unique_semesters.to_string()])?;
    sheet.blank()?;

    let performance = fill_universe(
        &agg.distribution(KeyField::PerformanceCategory),
        &performance_universe(),
    );
    distribution_section(&mut sheet, "PERFORMANCE DISTRIBUTION", &performance, total)?;
    sheet.blank()?;

    let difficulty = fill_universe(
        &agg.distribution(KeyField::DifficultyCategory),
        &difficulty_universe(),
    );
    distribution_section(&mut sheet, "DIFFICULTY DISTRIBUTION", &difficulty, total)?;

    sheet.finish()
}

pub fn instructor_performance(
    agg: &Aggregator,
    path: &Path,
    generated_at: DateTime<Local>,
) -> Result<PathBuf> {
    let mut sheet = Sheet::create(
        path.to_path_buf(),
        "INSTRUCTOR PERFORMANCE ANALYSIS",
        generated_at,
    )?;

    sheet.row([
        "Instructor ID",
        "Total Reviews",
        "Avg Overall Rating",
        "Avg Satisfaction",
        "Courses Taught",
        "Semesters Active",
        "Rating Std Dev",
        "Consistency",
        "Performance Grade",
    ])?;
    for p in agg.instructor_profiles() {
        sheet.row([
            p.instructor_id.clone(),
            p.reviews.to_string(),
            format!("{:.2}", p.avg_overall_rating),
            format!("{:.2}", p.avg_satisfaction),
            p.courses_taught.to_string(),
            p.semesters_active.to_string(),
            format!("{:.2}", p.rating_stddev),
            format!("{:.1}%", p.consistency * 100.0),
            grade(p.avg_satisfaction).label().to_string(),
        ])?;
    }

    sheet.finish()
}

pub fn course_analysis(
    agg: &Aggregator,
    path: &Path,
    generated_at: DateTime<Local>,
) -> Result<PathBuf> {
    let mut sheet = Sheet::create(path.to_path_buf(), "COURSE ANALYSIS REPORT", generated_at)?;

    sheet.row([
        "Course ID",
        "Total Reviews",
        "Avg Satisfaction",
        "Avg Difficulty",
        "Difficulty Level",
        "Instructors",
        "Semesters Offered",
        "Performance Grade",
    ])?;
    for c in agg.course_profiles() {
        let level = DifficultyCategory::from_level(c.avg_difficulty.round() as u8);
        sheet.row([
            c.course_id.clone(),
            c.reviews.to_string(),
            format!("{:.2}", c.avg_satisfaction),
            format!("{:.2}", c.avg_difficulty),
            level.to_string(),
            c.instructors.to_string(),
            c.semesters_offered.to_string(),
            grade(c.avg_satisfaction).label().to_string(),
        ])?;
    }

    sheet.finish()
}

pub fn trend_analysis(
    agg: &Aggregator,
    path: &Path,
    generated_at: DateTime<Local>,
) -> Result<PathBuf> {
    let mut sheet = Sheet::create(path.to_path_buf(), "TREND ANALYSIS REPORT", generated_at)?;

    sheet.row(["SEMESTER TRENDS"])?;
    sheet.row([
        "Semester",
        "Reviews",
        "Avg Satisfaction",
        "Avg Overall Rating",
        "Avg Attendance",
    ])?;
    let overall = agg.group_average(KeyField::Semester, ValueField::OverallRating);
    let attendance = agg.group_average(KeyField::Semester, ValueField::AttendanceRate);
    for stat in agg.group_stats(KeyField::Semester, ValueField::SatisfactionScore) {
        sheet.row([
            stat.key.clone(),
            stat.count.to_string(),
            format!("{:.2}", stat.mean),
            format!("{:.2}", overall.get(&stat.key).copied().unwrap_or_default()),
            format!(
                "{:.1}%",
                attendance.get(&stat.key).copied().unwrap_or_default() * 100.0
            ),
        ])?;
    }
    sheet.blank()?;

    sheet.row(["DIFFICULTY VS SATISFACTION"])?;
    sheet.row(["Difficulty", "Reviews", "Avg Satisfaction"])?;
    let stats = agg.group_stats(KeyField::DifficultyCategory, ValueField::SatisfactionScore);
    for category in DifficultyCategory::ALL {
        if let Some(stat) = stats.iter().find(|s| s.key == category.as_str()) {
            sheet.row([
                stat.key.clone(),
                stat.count.to_string(),
                format!("{:.2}", stat.mean),
            ])?;
        }
    }

    sheet.finish()
}

/// Every processed record, one row each, with the processed CSV's header.
pub fn detailed_data(agg: &Aggregator, path: &Path) -> Result<PathBuf> {
    write_records(path, agg.records())?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testing::record;
    use crate::records::ProcessedRecord;
    use chrono::TimeZone;

    fn sample() -> Vec<ProcessedRecord> {
        vec![
            record(1, "COURSE01", "INST01", "Fall2024", (5, 5, 5, 5), 1),
            record(2, "COURSE01", "INST02", "Spring2024", (3, 3, 3, 3), 3),
            record(3, "COURSE02", "INST02", "Spring2024", (1, 1, 1, 1), 5),
        ]
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 8, 1, 12, 0, 0).unwrap()
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .unwrap()
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_export_all_writes_five_files() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample();
        let paths = export_all(&Aggregator::new(&records), dir.path(), fixed_time()).unwrap();

        assert_eq!(paths.len(), 5);
        for name in [
            EXECUTIVE_SUMMARY,
            INSTRUCTOR_PERFORMANCE,
            COURSE_ANALYSIS,
            TREND_ANALYSIS,
            DETAILED_DATA,
        ] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
    }

    #[test]
    fn test_executive_summary_fills_categories() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample();
        let path = executive_summary(
            &Aggregator::new(&records),
            &dir.path().join(EXECUTIVE_SUMMARY),
            fixed_time(),
        )
        .unwrap();
        let rows = read_rows(&path);

        assert_eq!(rows[1][0], "Generated: 2024-08-01 12:00:00");
        assert!(rows.contains(&vec!["Total Feedback Records".to_string(), "3".to_string()]));
        assert!(rows.contains(&vec![
            "Hard".to_string(),
            "0".to_string(),
            "0.0%".to_string()
        ]));
        assert!(rows.contains(&vec![
            "Excellent".to_string(),
            "1".to_string(),
            "33.3%".to_string()
        ]));
    }

    #[test]
    fn test_instructor_report_sorted_by_satisfaction() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample();
        let path = instructor_performance(
            &Aggregator::new(&records),
            &dir.path().join(INSTRUCTOR_PERFORMANCE),
            fixed_time(),
        )
        .unwrap();
        let rows = read_rows(&path);
        let body: Vec<&Vec<String>> = rows.iter().filter(|r| r[0].starts_with("INST")).collect();

        assert_eq!(body.len(), 2);
        assert_eq!(body[0][0], "INST01");
        assert_eq!(body[0][8], "A - Excellent");
        assert_eq!(body[1][0], "INST02");
        assert_eq!(body[1][3], "2.00");
        // satisfaction 3.0 and 1.0: half the scale apart
        assert_eq!(body[1][7], "50.0%");
    }

    #[test]
    fn test_detailed_export_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample();
        let path = detailed_data(&Aggregator::new(&records), &dir.path().join(DETAILED_DATA))
            .unwrap();

        let back = crate::output::read_records::<ProcessedRecord>(&path).unwrap();
        assert_eq!(back.records, records);
    }
}
