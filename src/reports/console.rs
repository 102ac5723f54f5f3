//! Plain-text reports printed to stdout.

use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::analyzers::utility::{pct, round_to};
use crate::analyzers::{Aggregator, KeyField, ValueField, fill_universe, grade};
use crate::records::{DifficultyCategory, PerformanceCategory};
use crate::reports::chart::bar_chart;
use crate::reports::{difficulty_universe, performance_universe};

/// Reviews an instructor needs to appear in the charts' top list.
pub const CHART_MIN_INSTRUCTOR_REVIEWS: usize = 5;
/// Reviews a course needs to appear in the charts' top list.
pub const CHART_MIN_COURSE_REVIEWS: usize = 3;
/// Instructors below this mean are listed as needing support.
pub const SUPPORT_THRESHOLD: f64 = 2.5;

const RULE: &str = "==================================================";

fn empty_notice(output: &mut String) {
    let _ = writeln!(output, "No feedback records to report.");
}

/// Category counts with percentages, one line each.
fn write_distribution(output: &mut String, rows: &[(String, usize)], total: usize) {
    for (category, count) in rows {
        let _ = writeln!(
            output,
            "  {category}: {count} ({:.1}%)",
            pct(*count, total)
        );
    }
}

/// Quick overview of the processed data: averages, coverage and distributions.
pub fn summary(agg: &Aggregator) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "ACADEMIC PULSE DATA SUMMARY");
    let _ = writeln!(output, "{RULE}");

    if agg.is_empty() {
        empty_notice(&mut output);
        return output;
    }

    let overview = agg.overview();
    let total = overview.total_records;
    let _ = writeln!(output, "Total Feedback Records: {total}");

    let _ = writeln!(output, "\nAverage Scores:");
    let _ = writeln!(output, "  Satisfaction: {:.2}/5", overview.avg_satisfaction);
    let _ = writeln!(output, "  Overall Rating: {:.2}/5", overview.avg_overall_rating);
    let _ = writeln!(output, "  Attendance: {:.1}%", overview.avg_attendance * 100.0);

    let _ = writeln!(output, "\nData Coverage:");
    let _ = writeln!(output, "  Students: {}", overview.unique_students);
    let _ = writeln!(output, "  Courses: {}", overview.unique_courses);
    let _ = writeln!(output, "  Instructors: {}", overview.unique_instructors);
    let _ = writeln!(output, "  Semesters: {}", overview.unique_semesters);

    let present = |rows: Vec<(String, usize)>| -> Vec<(String, usize)> {
        rows.into_iter().filter(|(_, count)| *count > 0).collect()
    };

    let _ = writeln!(output, "\nPerformance Distribution:");
    let performance = fill_universe(
        &agg.distribution(KeyField::PerformanceCategory),
        &performance_universe(),
    );
    write_distribution(&mut output, &present(performance), total);

    let _ = writeln!(output, "\nDifficulty Distribution:");
    let difficulty = fill_universe(
        &agg.distribution(KeyField::DifficultyCategory),
        &difficulty_universe(),
    );
    write_distribution(&mut output, &present(difficulty), total);

    output
}

/// Short analysis: mean satisfaction, distributions and the top five instructors.
pub fn analysis(agg: &Aggregator) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "ACADEMIC PULSE ANALYSIS");
    let _ = writeln!(output, "{}", &RULE[..40]);

    if agg.is_empty() {
        empty_notice(&mut output);
        return output;
    }

    let total = agg.len();
    let _ = writeln!(output, "Total Records: {total}");
    let _ = writeln!(
        output,
        "Average Satisfaction: {:.2}/5",
        agg.average(ValueField::SatisfactionScore)
    );

    let _ = writeln!(output, "\nPerformance Distribution:");
    let performance: Vec<(String, usize)> = agg
        .distribution(KeyField::PerformanceCategory)
        .into_iter()
        .collect();
    write_distribution(&mut output, &performance, total);

    let _ = writeln!(output, "\nDifficulty Distribution:");
    let difficulty: Vec<(String, usize)> = agg
        .distribution(KeyField::DifficultyCategory)
        .into_iter()
        .collect();
    write_distribution(&mut output, &difficulty, total);

    let _ = writeln!(output, "\nTop Instructors:");
    for (i, stat) in agg
        .top_n(KeyField::InstructorId, ValueField::SatisfactionScore, 5, 1)
        .iter()
        .enumerate()
    {
        let _ = writeln!(
            output,
            "  {}. {}: {:.2}/5 (n={})",
            i + 1,
            stat.key,
            stat.mean,
            stat.count
        );
    }

    output
}

/// Statistics printed by the analysis step of the complete pipeline.
pub fn pipeline_analysis(agg: &Aggregator) -> String {
    let mut output = String::new();

    if agg.is_empty() {
        empty_notice(&mut output);
        return output;
    }

    let total = agg.len();
    let _ = writeln!(output, "OVERALL STATISTICS:");
    let _ = writeln!(
        output,
        "   Average Satisfaction Score: {:.2}/5",
        agg.average(ValueField::SatisfactionScore)
    );
    let _ = writeln!(
        output,
        "   Average Overall Rating: {:.2}/5",
        agg.average(ValueField::OverallRating)
    );
    let _ = writeln!(
        output,
        "   Average Attendance: {:.1}%",
        agg.average(ValueField::AttendanceRate) * 100.0
    );

    let _ = writeln!(output, "\nPERFORMANCE DISTRIBUTION:");
    let performance = fill_universe(
        &agg.distribution(KeyField::PerformanceCategory),
        &performance_universe(),
    );
    write_distribution(&mut output, &performance, total);

    for (title, key) in [
        ("TOP 5 INSTRUCTORS", KeyField::InstructorId),
        ("TOP 5 COURSES", KeyField::CourseId),
    ] {
        let _ = writeln!(output, "\n{title}:");
        for (i, stat) in agg
            .top_n(key, ValueField::SatisfactionScore, 5, 1)
            .iter()
            .enumerate()
        {
            let _ = writeln!(output, "   {}. {}: {:.2}/5", i + 1, stat.key, stat.mean);
        }
    }

    let _ = writeln!(output, "\nDIFFICULTY DISTRIBUTION:");
    let difficulty = fill_universe(
        &agg.distribution(KeyField::DifficultyCategory),
        &difficulty_universe(),
    );
    write_distribution(&mut output, &difficulty, total);

    let _ = writeln!(output, "\nSEMESTER PERFORMANCE:");
    for stat in agg.group_stats(KeyField::Semester, ValueField::SatisfactionScore) {
        let _ = writeln!(
            output,
            "   {}: {:.2}/5 (n={})",
            stat.key, stat.mean, stat.count
        );
    }

    output
}

/// Text charts: distributions, semester averages, top performers and the
/// difficulty/satisfaction comparison.
pub fn charts(agg: &Aggregator, max_width: usize) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "ACADEMIC PULSE - DATA VISUALIZATION");
    let _ = writeln!(output, "{}", &RULE[..45]);

    if agg.is_empty() {
        empty_notice(&mut output);
        return output;
    }

    let _ = writeln!(output, "Analyzing {} feedback records...", agg.len());

    let as_f64 = |rows: Vec<(String, usize)>| -> Vec<(String, f64)> {
        rows.into_iter().map(|(k, v)| (k, v as f64)).collect()
    };

    let performance = fill_universe(
        &agg.distribution(KeyField::PerformanceCategory),
        &performance_universe(),
    );
    output.push_str(&bar_chart(
        "Performance Distribution",
        &as_f64(performance),
        max_width,
    ));

    let difficulty = fill_universe(
        &agg.distribution(KeyField::DifficultyCategory),
        &difficulty_universe(),
    );
    output.push_str(&bar_chart(
        "Difficulty Distribution",
        &as_f64(difficulty),
        max_width,
    ));

    let semesters: Vec<(String, f64)> = agg
        .group_average(KeyField::Semester, ValueField::SatisfactionScore)
        .into_iter()
        .map(|(k, v)| (k, round_to(v, 2)))
        .collect();
    output.push_str(&bar_chart(
        "Average Satisfaction by Semester",
        &semesters,
        max_width,
    ));

    let top = |key: KeyField, min_count: usize| -> Vec<(String, f64)> {
        agg.top_n(key, ValueField::SatisfactionScore, 8, min_count)
            .into_iter()
            .map(|s| (s.key, round_to(s.mean, 2)))
            .collect()
    };
    output.push_str(&bar_chart(
        &format!("Top Instructors (>={CHART_MIN_INSTRUCTOR_REVIEWS} reviews)"),
        &top(KeyField::InstructorId, CHART_MIN_INSTRUCTOR_REVIEWS),
        max_width,
    ));
    output.push_str(&bar_chart(
        &format!("Top Courses (>={CHART_MIN_COURSE_REVIEWS} reviews)"),
        &top(KeyField::CourseId, CHART_MIN_COURSE_REVIEWS),
        max_width,
    ));

    let _ = writeln!(output, "\nDIFFICULTY VS SATISFACTION");
    let _ = writeln!(output, "{}", &RULE[..26]);
    let by_difficulty =
        agg.group_stats(KeyField::DifficultyCategory, ValueField::SatisfactionScore);
    let find = |category: DifficultyCategory| {
        by_difficulty
            .iter()
            .find(|s| s.key == category.as_str())
            .cloned()
    };
    match (find(DifficultyCategory::Easy), find(DifficultyCategory::VeryHard)) {
        (Some(easy), Some(hard)) => {
            let _ = writeln!(
                output,
                "Easy courses satisfaction: {:.2}/5 (n={})",
                easy.mean, easy.count
            );
            let _ = writeln!(
                output,
                "Very hard courses satisfaction: {:.2}/5 (n={})",
                hard.mean, hard.count
            );
            let _ = writeln!(output, "Difference: {:.2} points", easy.mean - hard.mean);
        }
        _ => {
            let _ = writeln!(output, "Not enough Easy and Very Hard feedback to compare.");
        }
    }

    output
}

/// Comprehensive report: executive summary, instructor and course tables,
/// trends and recommendations.
pub fn comprehensive(agg: &Aggregator, generated_at: DateTime<Local>) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "ACADEMIC PULSE COMPREHENSIVE REPORT");
    let _ = writeln!(output, "{RULE}==========");

    if agg.is_empty() {
        empty_notice(&mut output);
        return output;
    }

    executive_summary(&mut output, agg, generated_at);
    instructor_section(&mut output, agg);
    course_section(&mut output, agg);
    trends_section(&mut output, agg);
    recommendations(&mut output, agg);

    output
}

fn executive_summary(output: &mut String, agg: &Aggregator, generated_at: DateTime<Local>) {
    let overview = agg.overview();

    let _ = writeln!(output, "\nEXECUTIVE SUMMARY");
    let _ = writeln!(output, "{RULE}");
    let _ = writeln!(
        output,
        "Report Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(output, "\nDataset Overview:");
    let _ = writeln!(output, "  • Total Feedback Records: {}", overview.total_records);
    let _ = writeln!(output, "  • Students Surveyed: {}", overview.unique_students);
    let _ = writeln!(output, "  • Courses Evaluated: {}", overview.unique_courses);
    let _ = writeln!(output, "  • Instructors Assessed: {}", overview.unique_instructors);
    let _ = writeln!(output, "\nKey Performance Indicators:");
    let _ = writeln!(
        output,
        "  • Overall Satisfaction Score: {:.2}/5.0",
        overview.avg_satisfaction
    );
    let _ = writeln!(
        output,
        "  • Performance Grade: {}",
        grade(overview.avg_satisfaction)
    );
}

fn instructor_section(output: &mut String, agg: &Aggregator) {
    let profiles = agg.instructor_profiles();

    let _ = writeln!(output, "\nINSTRUCTOR PERFORMANCE ANALYSIS");
    let _ = writeln!(output, "{RULE}");
    let _ = writeln!(output, "Top Performing Instructors:");
    let _ = writeln!(output, "┌────────────┬─────────┬─────────┬─────────┬─────────────┐");
    let _ = writeln!(output, "│ Instructor │ Rating  │ Reviews │ Courses │ Consistency │");
    let _ = writeln!(output, "├────────────┼─────────┼─────────┼─────────┼─────────────┤");
    for p in profiles.iter().take(5) {
        let _ = writeln!(
            output,
            "│ {:<10} │ {:5.2}   │ {:7} │ {:7} │ {:8.1}%   │",
            p.instructor_id,
            p.avg_satisfaction,
            p.reviews,
            p.courses_taught,
            p.consistency * 100.0
        );
    }
    let _ = writeln!(output, "└────────────┴─────────┴─────────┴─────────┴─────────────┘");

    let low: Vec<_> = profiles
        .iter()
        .filter(|p| p.avg_satisfaction < SUPPORT_THRESHOLD)
        .collect();
    if !low.is_empty() {
        let _ = writeln!(output, "\nInstructors Needing Support ({} total):", low.len());
        for p in low {
            let _ = writeln!(
                output,
                "  • {}: {:.2}/5 ({} reviews)",
                p.instructor_id, p.avg_satisfaction, p.reviews
            );
        }
    }
}

fn course_section(output: &mut String, agg: &Aggregator) {
    let _ = writeln!(output, "\nCOURSE PERFORMANCE ANALYSIS");
    let _ = writeln!(output, "{RULE}");
    let _ = writeln!(output, "Top Performing Courses:");
    let _ = writeln!(output, "┌───────────┬──────────────┬────────────┬─────────┬─────────────┐");
    let _ = writeln!(output, "│ Course    │ Satisfaction │ Difficulty │ Reviews │ Instructors │");
    let _ = writeln!(output, "├───────────┼──────────────┼────────────┼─────────┼─────────────┤");
    for c in agg.course_profiles().iter().take(5) {
        let difficulty = DifficultyCategory::from_level(c.avg_difficulty.round() as u8);
        let _ = writeln!(
            output,
            "│ {:<9} │ {:12.2} │ {:<10} │ {:7} │ {:11} │",
            c.course_id,
            c.avg_satisfaction,
            difficulty.as_str(),
            c.reviews,
            c.instructors
        );
    }
    let _ = writeln!(output, "└───────────┴──────────────┴────────────┴─────────┴─────────────┘");
}

fn trends_section(output: &mut String, agg: &Aggregator) {
    let _ = writeln!(output, "\nTRENDS & PATTERNS ANALYSIS");
    let _ = writeln!(output, "{RULE}");
    let _ = writeln!(output, "Semester Performance:");
    for stat in agg.group_stats(KeyField::Semester, ValueField::SatisfactionScore) {
        let _ = writeln!(
            output,
            "  • {}: {:.2}/5 ({} reviews)",
            stat.key, stat.mean, stat.count
        );
    }

    let _ = writeln!(output, "\nDifficulty vs Satisfaction:");
    let stats = agg.group_stats(KeyField::DifficultyCategory, ValueField::SatisfactionScore);
    for category in DifficultyCategory::ALL {
        if let Some(stat) = stats.iter().find(|s| s.key == category.as_str()) {
            let _ = writeln!(
                output,
                "  • {} courses: {:.2}/5 ({} reviews)",
                stat.key, stat.mean, stat.count
            );
        }
    }
}

fn recommendations(output: &mut String, agg: &Aggregator) {
    let avg = agg.average(ValueField::SatisfactionScore);

    let _ = writeln!(output, "\nSTRATEGIC RECOMMENDATIONS");
    let _ = writeln!(output, "{RULE}");
    let _ = writeln!(output, "Priority Actions:");
    if avg < 3.0 {
        let _ = writeln!(output, "  1. URGENT: Overall satisfaction below acceptable threshold");
        let _ = writeln!(output, "     → Implement immediate instructor training programs");
        let _ = writeln!(output, "     → Review course content and delivery methods");
    } else if avg < 3.5 {
        let _ = writeln!(output, "  1. Moderate improvement needed in overall satisfaction");
        let _ = writeln!(output, "     → Focus on instructor development initiatives");
        let _ = writeln!(output, "     → Enhance student support services");
    } else {
        let _ = writeln!(output, "  1. Overall satisfaction is good, focus on excellence");
        let _ = writeln!(output, "     → Share best practices from top performers");
        let _ = writeln!(output, "     → Implement advanced teaching methodologies");
    }

    let poor = agg
        .distribution(KeyField::PerformanceCategory)
        .get(PerformanceCategory::Poor.as_str())
        .copied()
        .unwrap_or(0);
    let poor_pct = pct(poor, agg.len());
    if poor_pct > 30.0 {
        let _ = writeln!(output, "  2. High percentage of poor-performing courses detected");
        let _ = writeln!(output, "     → {poor_pct:.1}% of feedback rated as 'Poor'");
        let _ = writeln!(output, "     → Implement targeted intervention programs");
    }

    let _ = writeln!(output, "\nMetrics to Monitor:");
    let _ = writeln!(output, "  • Instructor satisfaction scores (target: >3.5)");
    let _ = writeln!(output, "  • Attendance rates");
    let _ = writeln!(output, "  • Semester-over-semester improvement trends");
}
