//! Extract, transform and analyze in one run.

use std::fmt::Write;

use anyhow::Result;
use rand::Rng;
use serde::Serialize;
use tracing::{error, info};

use crate::analyzers::{Aggregator, GroupStat, KeyField, Overview, ValueField};
use crate::config::Paths;
use crate::extract::{ExtractOptions, extract};
use crate::output::write_json;
use crate::transform::{Transformed, transform};

/// Default record count for a complete run.
pub const DEFAULT_RUN_COUNT: u32 = 500;
/// Entries kept in each ranking of `aggregations.json`.
pub const AGGREGATION_TOP_N: usize = 5;

/// Satisfaction aggregates of a complete run, saved next to the processed data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregations {
    pub overview: Overview,
    pub semesters: Vec<GroupStat>,
    pub difficulty: Vec<GroupStat>,
    pub top_instructors: Vec<GroupStat>,
    pub top_courses: Vec<GroupStat>,
}

impl Aggregations {
    pub fn compute(agg: &Aggregator) -> Self {
        let satisfaction = ValueField::SatisfactionScore;
        Self {
            overview: agg.overview(),
            semesters: agg.group_stats(KeyField::Semester, satisfaction),
            difficulty: agg.group_stats(KeyField::DifficultyCategory, satisfaction),
            top_instructors: agg.top_n(
                KeyField::InstructorId,
                satisfaction,
                AGGREGATION_TOP_N,
                1,
            ),
            top_courses: agg.top_n(KeyField::CourseId, satisfaction, AGGREGATION_TOP_N, 1),
        }
    }
}

#[derive(Debug)]
pub struct PipelineRun {
    pub extracted: usize,
    pub transformed: Transformed,
}

/// Generates fresh raw data and transforms it.
///
/// Returns `Ok(None)` if the transformation step found no input, which only
/// happens when the raw file disappears between the two steps.
#[tracing::instrument(skip(rng, paths, options), fields(count = options.count))]
pub fn run_complete<R: Rng>(
    rng: &mut R,
    paths: &Paths,
    options: &ExtractOptions,
) -> Result<Option<PipelineRun>> {
    info!("Step 1: extraction");
    let extracted = extract(rng, options, &paths.raw_csv(), &paths.raw_metadata())?;

    info!("Step 2: transformation");
    let Some(transformed) = transform(
        &paths.raw_csv(),
        &paths.processed_csv(),
        &paths.quality_report(),
    )?
    else {
        error!("Pipeline failed at transformation step");
        return Ok(None);
    };

    info!("Step 3: aggregation");
    let aggregations = Aggregations::compute(&Aggregator::new(&transformed.records));
    write_json(&paths.aggregations(), &aggregations)?;

    info!(
        extracted = extracted.records.len(),
        cleaned = transformed.quality.records_cleaned,
        "Pipeline completed"
    );
    Ok(Some(PipelineRun {
        extracted: extracted.records.len(),
        transformed,
    }))
}

/// Closing summary of a complete run: counts, files and top performers.
pub fn final_summary(run: &PipelineRun, paths: &Paths) -> String {
    let agg = Aggregator::new(&run.transformed.records);
    let quality = &run.transformed.quality;
    let mut output = String::new();

    let _ = writeln!(output, "\n{}", "=".repeat(60));
    let _ = writeln!(output, "ETL PIPELINE COMPLETED SUCCESSFULLY!");
    let _ = writeln!(output, "{}", "=".repeat(60));

    let _ = writeln!(output, "\nFINAL SUMMARY:");
    let _ = writeln!(output, "   Raw records extracted: {}", run.extracted);
    let _ = writeln!(output, "   Records processed: {}", quality.records_cleaned);
    let _ = writeln!(output, "   Records skipped: {}", quality.records_skipped);
    let _ = writeln!(output, "   Data quality score: {:.1}%", quality.data_quality_score);
    let _ = writeln!(
        output,
        "   Average satisfaction: {:.2}/5",
        agg.average(ValueField::SatisfactionScore)
    );

    let _ = writeln!(output, "\nFILES CREATED:");
    let _ = writeln!(output, "   - Raw data: {}", paths.raw_csv().display());
    let _ = writeln!(output, "   - Processed data: {}", paths.processed_csv().display());
    let _ = writeln!(output, "   - Metadata: {}", paths.raw_metadata().display());
    let _ = writeln!(output, "   - Quality report: {}", paths.quality_report().display());
    let _ = writeln!(output, "   - Aggregations: {}", paths.aggregations().display());

    let _ = writeln!(output, "\nTOP PERFORMERS:");
    for (i, stat) in agg
        .top_n(KeyField::InstructorId, ValueField::SatisfactionScore, 3, 1)
        .iter()
        .enumerate()
    {
        let _ = writeln!(
            output,
            "   {}. Instructor {}: {:.2}/5",
            i + 1,
            stat.key,
            stat.mean
        );
    }

    let _ = writeln!(output, "\nTOP COURSES:");
    for (i, stat) in agg
        .top_n(KeyField::CourseId, ValueField::SatisfactionScore, 3, 1)
        .iter()
        .enumerate()
    {
        let _ = writeln!(output, "   {}. {}: {:.2}/5", i + 1, stat.key, stat.mean);
    }

    output
}
