//! Dashboard summary written to `reports/Dashboard_Summary.txt`.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::info;

use crate::analyzers::utility::pct;
use crate::analyzers::{Aggregator, KeyField, ValueField, fill_universe, grade};
use crate::output::write_text;
use crate::records::PerformanceCategory;
use crate::reports::chart::percent_bar;
use crate::reports::{difficulty_universe, performance_universe};

pub const FILE_NAME: &str = "Dashboard_Summary.txt";

const BANNER_TOP: &str =
    "╔══════════════════════════════════════════════════════════════════════════════╗";
const BANNER_BOTTOM: &str =
    "╚══════════════════════════════════════════════════════════════════════════════╝";

fn banner(output: &mut String, title: &str) {
    let _ = writeln!(output, "{BANNER_TOP}");
    let _ = writeln!(output, "║{title:^78}║");
    let _ = writeln!(output, "{BANNER_BOTTOM}\n");
}

fn distribution_bars(output: &mut String, rows: &[(String, usize)], total: usize) {
    for (category, count) in rows {
        let percentage = pct(*count, total);
        let _ = writeln!(
            output,
            "{category:12} │{}│ {count:3} ({percentage:5.1}%)",
            percent_bar(percentage)
        );
    }
}

/// Renders the dashboard text.
///
/// `data_quality_score` comes from the last transformation run, if any.
pub fn render(
    agg: &Aggregator,
    generated_at: DateTime<Local>,
    data_quality_score: Option<f64>,
) -> String {
    let mut output = String::new();
    let timestamp = generated_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let overview = agg.overview();
    let total = overview.total_records;

    banner(&mut output, "ACADEMIC PULSE ETL DASHBOARD");
    let _ = writeln!(output, "Report Generated: {timestamp}");
    let _ = writeln!(output, "Data Coverage: {total} feedback records\n");

    if agg.is_empty() {
        let _ = writeln!(output, "No feedback records to report.");
        return output;
    }

    banner(&mut output, "KEY METRICS");
    let quality = match data_quality_score {
        Some(score) => format!("{score:.1}%"),
        None => "n/a".to_string(),
    };
    let indicators = [
        (
            "Average Satisfaction Score",
            format!("{:.2}/5.0", overview.avg_satisfaction),
        ),
        (
            "Average Overall Rating",
            format!("{:.2}/5.0", overview.avg_overall_rating),
        ),
        (
            "Average Attendance",
            format!("{:.1}%", overview.avg_attendance * 100.0),
        ),
        ("Data Quality Score", quality),
    ];
    let coverage = [
        ("Students Surveyed", overview.unique_students),
        ("Courses Evaluated", overview.unique_courses),
        ("Instructors Assessed", overview.unique_instructors),
        ("Semesters Analyzed", overview.unique_semesters),
    ];

    let _ = writeln!(output, "PERFORMANCE INDICATORS");
    for (label, value) in &indicators {
        let _ = writeln!(output, "  {label:<28}{value}");
    }
    let _ = writeln!(output, "\nCOVERAGE METRICS");
    for (label, value) in &coverage {
        let _ = writeln!(output, "  {label:<28}{value}");
    }
    let _ = writeln!(output);

    banner(&mut output, "PERFORMANCE DISTRIBUTION");
    let performance = fill_universe(
        &agg.distribution(KeyField::PerformanceCategory),
        &performance_universe(),
    );
    distribution_bars(&mut output, &performance, total);
    let _ = writeln!(output);

    banner(&mut output, "DIFFICULTY DISTRIBUTION");
    let difficulty = fill_universe(
        &agg.distribution(KeyField::DifficultyCategory),
        &difficulty_universe(),
    );
    distribution_bars(&mut output, &difficulty, total);
    let _ = writeln!(output);

    banner(&mut output, "TOP PERFORMERS");
    let top = agg.top_n(KeyField::InstructorId, ValueField::SatisfactionScore, 3, 1);
    let _ = writeln!(output, "TOP INSTRUCTORS BY SATISFACTION:");
    let _ = writeln!(
        output,
        "┌──────┬─────────────────┬─────────────────┬─────────────────────────────────┐"
    );
    let _ = writeln!(
        output,
        "│ Rank │ Instructor ID   │ Rating          │ Grade                           │"
    );
    let _ = writeln!(
        output,
        "├──────┼─────────────────┼─────────────────┼─────────────────────────────────┤"
    );
    for (i, stat) in top.iter().enumerate() {
        let _ = writeln!(
            output,
            "│  {:2}  │ {:15} │ {:13.2}/5 │ {:31} │",
            i + 1,
            stat.key,
            stat.mean,
            grade(stat.mean).label()
        );
    }
    let _ = writeln!(
        output,
        "└──────┴─────────────────┴─────────────────┴─────────────────────────────────┘\n"
    );

    banner(&mut output, "KEY INSIGHTS");
    let counts = agg.distribution(KeyField::PerformanceCategory);
    let share = |category: PerformanceCategory| {
        pct(counts.get(category.as_str()).copied().unwrap_or(0), total)
    };
    let excellent_pct = share(PerformanceCategory::Excellent);
    let poor_pct = share(PerformanceCategory::Poor);

    let _ = writeln!(output, "ACTIONABLE RECOMMENDATIONS:");
    if overview.avg_satisfaction >= 4.0 {
        let _ = writeln!(output, "STRENGTH: Outstanding overall satisfaction score!");
    } else if overview.avg_satisfaction >= 3.5 {
        let _ = writeln!(output, "GOOD: Solid satisfaction levels with room for growth.");
    } else {
        let _ = writeln!(output, "FOCUS: Satisfaction needs immediate attention.");
    }
    if excellent_pct > 20.0 {
        let _ = writeln!(
            output,
            "HIGHLIGHT: {excellent_pct:.1}% excellent performance rate exceeds expectations."
        );
    }
    if poor_pct > 20.0 {
        let _ = writeln!(output, "ALERT: {poor_pct:.1}% of courses need urgent improvement.");
    }

    let _ = writeln!(output, "\nSTRATEGIC PRIORITIES:");
    if let Some(best) = top.first() {
        let _ = writeln!(
            output,
            "   1. Share best practices from {} (top performer: {:.2}/5)",
            best.key, best.mean
        );
    }
    let _ = writeln!(
        output,
        "   2. {}",
        if excellent_pct < 25.0 {
            "Focus on excellence programs"
        } else {
            "Maintain excellence standards"
        }
    );
    let _ = writeln!(
        output,
        "   3. {}",
        if poor_pct > 15.0 {
            "Immediate intervention for poor performers"
        } else {
            "Continue quality monitoring"
        }
    );

    let _ = writeln!(output, "\nGenerated by Academic Pulse");
    let _ = writeln!(output, "Last Updated: {timestamp}");
    let _ = writeln!(output, "\nEnd of Report");

    output
}

/// Renders the dashboard and writes it to `path`, replacing any previous file.
pub fn save(
    agg: &Aggregator,
    path: &Path,
    generated_at: DateTime<Local>,
    data_quality_score: Option<f64>,
) -> Result<()> {
    write_text(path, &render(agg, generated_at, data_quality_score))?;
    info!(records = agg.len(), path = %path.display(), "Dashboard report created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testing::record;
    use crate::reports::chart::FULL_BLOCK;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 8, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_render_bars_and_rankings() {
        let records = vec![
            record(1, "COURSE01", "INST01", "Fall2024", (5, 5, 5, 5), 1),
            record(2, "COURSE02", "INST02", "Fall2024", (3, 3, 3, 3), 3),
            record(3, "COURSE03", "INST03", "Fall2024", (1, 1, 1, 1), 5),
            record(4, "COURSE03", "INST03", "Fall2024", (1, 1, 1, 1), 5),
        ];
        let text = render(&Aggregator::new(&records), fixed_time(), Some(99.5));

        assert!(text.contains("Report Generated: 2024-08-01 09:30:00"));
        assert!(text.contains("Data Quality Score          99.5%"));

        // Poor is 50%: 25 blocks
        let poor = text.lines().find(|l| l.starts_with("Poor")).unwrap();
        assert_eq!(poor.chars().filter(|c| *c == FULL_BLOCK).count(), 25);
        assert!(poor.ends_with("  2 ( 50.0%)"));

        let hard = text.lines().find(|l| l.starts_with("Hard ")).unwrap();
        assert!(hard.ends_with("  0 (  0.0%)"));

        assert!(text.contains("INST01"));
        assert!(text.contains("A - Excellent"));
        assert!(text.contains("Share best practices from INST01 (top performer: 5.00/5)"));
        assert!(text.contains("ALERT: 50.0%"));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join(FILE_NAME);
        let records = vec![record(1, "COURSE01", "INST01", "Fall2024", (4, 4, 4, 4), 2)];

        save(&Aggregator::new(&[]), &path, fixed_time(), None).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("No feedback records"));

        save(&Aggregator::new(&records), &path, fixed_time(), None).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Data Quality Score          n/a"));
        assert!(!text.contains("No feedback records"));
    }
}
