//! Self-contained HTML report with embedded CSS.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::info;

use crate::analyzers::utility::pct;
use crate::analyzers::{Aggregator, KeyField, ValueField, fill_universe, grade};
use crate::output::write_text;
use crate::records::PerformanceCategory;
use crate::reports::difficulty_universe;

pub const FILE_NAME: &str = "Academic_Pulse_Report.html";

const STYLE: &str = r#"
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 20px; background: #f5f7fa; color: #333; }
        .container { max-width: 1200px; margin: 0 auto; background: white; border-radius: 10px; box-shadow: 0 4px 6px rgba(0,0,0,0.1); overflow: hidden; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; text-align: center; }
        .header h1 { margin: 0; font-size: 2.5em; }
        .section { padding: 30px; border-bottom: 1px solid #eee; }
        .section h2 { color: #667eea; margin-top: 0; }
        .kpi-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; }
        .kpi-card { background: #f8f9ff; border-left: 4px solid #667eea; padding: 20px; border-radius: 5px; }
        .kpi-value { font-size: 2em; font-weight: bold; color: #667eea; }
        .kpi-label { color: #666; margin-top: 5px; }
        .table { width: 100%; border-collapse: collapse; margin-top: 15px; }
        .table th, .table td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
        .table th { background: #667eea; color: white; }
        .grade-excellent { color: #28a745; font-weight: bold; }
        .grade-good { color: #17a2b8; font-weight: bold; }
        .grade-poor { color: #dc3545; font-weight: bold; }
        .bar-item { display: flex; align-items: center; margin: 10px 0; }
        .bar-label { width: 120px; font-weight: bold; }
        .bar-fill { background: linear-gradient(90deg, #667eea, #764ba2); color: white; padding: 8px 12px; border-radius: 4px; }
        .insights { background: #fff8e1; border-left: 4px solid #ffc107; padding: 20px 30px; }
        .footer { text-align: center; padding: 20px; color: #999; font-size: 0.9em; }
"#;

/// Escapes text for use in HTML element content and attribute values.
///
/// `&` is replaced first so the entities added afterwards are not escaped again.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn kpi_card(output: &mut String, value: &str, label: &str) {
    let _ = writeln!(output, "                <div class=\"kpi-card\">");
    let _ = writeln!(
        output,
        "                    <div class=\"kpi-value\">{}</div>",
        escape(value)
    );
    let _ = writeln!(
        output,
        "                    <div class=\"kpi-label\">{}</div>",
        escape(label)
    );
    let _ = writeln!(output, "                </div>");
}

/// Ranking table of `(key, mean satisfaction)` rows with a grade column.
fn ranking_table(output: &mut String, heading: &str, rows: &[(String, f64)]) {
    let _ = writeln!(output, "            <table class=\"table\">");
    let _ = writeln!(
        output,
        "                <thead><tr><th>Rank</th><th>{}</th><th>Satisfaction</th><th>Grade</th></tr></thead>",
        escape(heading)
    );
    let _ = writeln!(output, "                <tbody>");
    for (i, (key, score)) in rows.iter().enumerate() {
        let g = grade(*score);
        let _ = writeln!(
            output,
            "                    <tr><td>{}</td><td>{}</td><td>{score:.2}/5</td><td class=\"{}\">{}</td></tr>",
            i + 1,
            escape(key),
            g.css_class(),
            escape(g.label())
        );
    }
    let _ = writeln!(output, "                </tbody>");
    let _ = writeln!(output, "            </table>");
}

/// Renders the full HTML document.
pub fn render(
    agg: &Aggregator,
    generated_at: DateTime<Local>,
    data_quality_score: Option<f64>,
) -> String {
    let overview = agg.overview();
    let total = overview.total_records;
    let mut output = String::new();

    let _ = writeln!(output, "<!DOCTYPE html>");
    let _ = writeln!(output, "<html lang=\"en\">");
    let _ = writeln!(output, "<head>");
    let _ = writeln!(output, "    <meta charset=\"UTF-8\">");
    let _ = writeln!(output, "    <title>Academic Pulse Report</title>");
    let _ = writeln!(output, "    <style>{STYLE}    </style>");
    let _ = writeln!(output, "</head>");
    let _ = writeln!(output, "<body>");
    let _ = writeln!(output, "    <div class=\"container\">");
    let _ = writeln!(output, "        <div class=\"header\">");
    let _ = writeln!(output, "            <h1>Academic Pulse Report</h1>");
    let _ = writeln!(
        output,
        "            <p>Generated on {}</p>",
        generated_at.format("%B %d, %Y at %I:%M %p")
    );
    let _ = writeln!(output, "        </div>");

    if agg.is_empty() {
        let _ = writeln!(
            output,
            "        <div class=\"section\"><p>No feedback records to report.</p></div>"
        );
        footer(&mut output);
        return output;
    }

    let _ = writeln!(output, "        <div class=\"section\">");
    let _ = writeln!(output, "            <h2>Key Performance Indicators</h2>");
    let _ = writeln!(output, "            <div class=\"kpi-grid\">");
    kpi_card(&mut output, &total.to_string(), "Total Feedback Records");
    kpi_card(
        &mut output,
        &format!("{:.2}", overview.avg_satisfaction),
        "Average Satisfaction",
    );
    kpi_card(
        &mut output,
        &overview.unique_courses.to_string(),
        "Courses Evaluated",
    );
    kpi_card(
        &mut output,
        &overview.unique_instructors.to_string(),
        "Instructors Assessed",
    );
    let _ = writeln!(output, "            </div>");
    let _ = writeln!(output, "        </div>");

    let top_instructors: Vec<(String, f64)> = agg
        .top_n(KeyField::InstructorId, ValueField::SatisfactionScore, 5, 1)
        .into_iter()
        .map(|s| (s.key, s.mean))
        .collect();
    let top_courses: Vec<(String, f64)> = agg
        .top_n(KeyField::CourseId, ValueField::SatisfactionScore, 5, 1)
        .into_iter()
        .map(|s| (s.key, s.mean))
        .collect();

    let _ = writeln!(output, "        <div class=\"section\">");
    let _ = writeln!(output, "            <h2>Top Performing Instructors</h2>");
    ranking_table(&mut output, "Instructor", &top_instructors);
    let _ = writeln!(output, "        </div>");

    let _ = writeln!(output, "        <div class=\"section\">");
    let _ = writeln!(output, "            <h2>Top Performing Courses</h2>");
    ranking_table(&mut output, "Course", &top_courses);
    let _ = writeln!(output, "        </div>");

    let _ = writeln!(output, "        <div class=\"section\">");
    let _ = writeln!(output, "            <h2>Course Difficulty Analysis</h2>");
    let difficulty = fill_universe(
        &agg.distribution(KeyField::DifficultyCategory),
        &difficulty_universe(),
    );
    for (category, count) in &difficulty {
        let percentage = pct(*count, total);
        let width = (percentage * 3.0).max(60.0) as usize;
        let _ = writeln!(output, "            <div class=\"bar-item\">");
        let _ = writeln!(
            output,
            "                <div class=\"bar-label\">{}</div>",
            escape(category)
        );
        let _ = writeln!(
            output,
            "                <div class=\"bar-fill\" style=\"width: {width}px;\">{count} ({percentage:.1}%)</div>"
        );
        let _ = writeln!(output, "            </div>");
    }
    let _ = writeln!(output, "        </div>");

    let counts = agg.distribution(KeyField::PerformanceCategory);
    let share = |category: PerformanceCategory| {
        pct(counts.get(category.as_str()).copied().unwrap_or(0), total)
    };
    let excellent_pct = share(PerformanceCategory::Excellent);
    let poor_pct = share(PerformanceCategory::Poor);
    let avg = overview.avg_satisfaction;

    let level = if avg >= 4.0 {
        "excellent"
    } else if avg >= 3.5 {
        "good"
    } else {
        "moderate"
    };
    let benchmark = if excellent_pct > 20.0 {
        "exceeding"
    } else if excellent_pct > 10.0 {
        "meeting"
    } else {
        "below"
    };

    let _ = writeln!(output, "        <div class=\"insights\">");
    let _ = writeln!(output, "            <h3>Key Insights &amp; Recommendations</h3>");
    let _ = writeln!(output, "            <ul>");
    let _ = writeln!(
        output,
        "                <li><strong>Overall Performance:</strong> Average satisfaction score of {avg:.2}/5 indicates {level} performance across the institution.</li>"
    );
    let _ = writeln!(
        output,
        "                <li><strong>Excellence Rate:</strong> {excellent_pct:.1}% of feedback is rated excellent, {benchmark} benchmarks.</li>"
    );
    let _ = writeln!(
        output,
        "                <li><strong>Improvement Opportunities:</strong> {poor_pct:.1}% of feedback needs immediate attention and support.</li>"
    );
    if let Some((instructor, score)) = top_instructors.first() {
        let _ = writeln!(
            output,
            "                <li><strong>Top Performers:</strong> {} leads with {score:.2}/5.</li>",
            escape(instructor)
        );
    }
    if let Some((course, score)) = top_courses.first() {
        let _ = writeln!(
            output,
            "                <li><strong>Course Quality:</strong> {} is the highest-rated course with {score:.2}/5 satisfaction.</li>",
            escape(course)
        );
    }
    let _ = writeln!(output, "            </ul>");
    let _ = writeln!(output, "        </div>");

    let _ = writeln!(output, "        <div class=\"section\">");
    let _ = writeln!(output, "            <h2>Data Quality Metrics</h2>");
    let _ = writeln!(output, "            <div class=\"kpi-grid\">");
    kpi_card(
        &mut output,
        &overview.unique_students.to_string(),
        "Students Surveyed",
    );
    kpi_card(
        &mut output,
        &overview.unique_semesters.to_string(),
        "Semesters Covered",
    );
    let quality = match data_quality_score {
        Some(score) => format!("{score:.1}%"),
        None => "n/a".to_string(),
    };
    kpi_card(&mut output, &quality, "Data Quality Score");
    let _ = writeln!(output, "            </div>");
    let _ = writeln!(output, "        </div>");

    footer(&mut output);
    output
}

fn footer(output: &mut String) {
    let _ = writeln!(output, "        <div class=\"footer\">");
    let _ = writeln!(output, "            <p>Generated by Academic Pulse</p>");
    let _ = writeln!(output, "        </div>");
    let _ = writeln!(output, "    </div>");
    let _ = writeln!(output, "</body>");
    let _ = writeln!(output, "</html>");
}

/// Renders the report and writes it to `path`.
pub fn save(
    agg: &Aggregator,
    path: &Path,
    generated_at: DateTime<Local>,
    data_quality_score: Option<f64>,
) -> Result<()> {
    write_text(path, &render(agg, generated_at, data_quality_score))?;
    info!(path = %path.display(), "HTML report created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testing::record;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 8, 1, 15, 5, 0).unwrap()
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<b>\"R&D\" 'x'</b>"),
            "&lt;b&gt;&quot;R&amp;D&quot; &#39;x&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("INST01"), "INST01");
        assert_eq!(escape("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_render_escapes_ids() {
        let records = vec![
            record(1, "C<script>", "INST&01", "Fall2024", (5, 5, 5, 5), 1),
            record(2, "COURSE02", "INST02", "Fall2024", (2, 2, 2, 2), 4),
        ];
        let html = render(&Aggregator::new(&records), fixed_time(), Some(100.0));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("C&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("INST&amp;01 leads with 5.00/5"));
        assert!(html.contains("class=\"grade-excellent\">A - Excellent"));
        assert!(html.contains("class=\"grade-poor\">D - Needs Improvement"));
        assert!(html.contains("100.0%"));
        assert!(html.contains("Generated on August 01, 2024 at 03:05 PM"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_difficulty_bars_have_minimum_width() {
        let records = vec![record(1, "COURSE01", "INST01", "Fall2024", (3, 3, 3, 3), 3)];
        let html = render(&Aggregator::new(&records), fixed_time(), None);

        // Moderate is 100% -> 300px, the rest fall back to 60px
        assert!(html.contains("width: 300px;\">1 (100.0%)"));
        assert_eq!(html.matches("width: 60px;\">0 (0.0%)").count(), 3);
    }

    #[test]
    fn test_save_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        save(&Aggregator::new(&[]), &path, fixed_time(), None).unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("No feedback records"));
        assert!(html.contains("</html>"));
    }
}
