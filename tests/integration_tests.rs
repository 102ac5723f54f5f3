use academic_pulse::analyzers::{Aggregator, KeyField, ValueField};
use academic_pulse::config::Paths;
use academic_pulse::extract::{ExtractOptions, extract};
use academic_pulse::output::{load_processed, read_records, write_records};
use academic_pulse::records::{PerformanceCategory, ProcessedRecord, RawRecord};
use academic_pulse::reports::{dashboard, export, html};
use academic_pulse::transform::{QualityReport, transform};
use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn raw(id: u32, ratings: (u8, u8, u8, u8)) -> RawRecord {
    RawRecord {
        feedback_id: id,
        student_id: format!("STU{id:03}"),
        course_id: "COURSE01".to_string(),
        instructor_id: "INST01".to_string(),
        semester: "Fall2024".to_string(),
        overall_rating: ratings.0,
        course_content_rating: ratings.1,
        instructor_effectiveness: ratings.2,
        difficulty_level: 3,
        workload_rating: 3,
        recommendation_score: ratings.3,
        attendance_rate: 0.75,
        assignment_quality: 3,
        feedback_date: NaiveDate::from_ymd_opt(2024, 7, 13).unwrap(),
        created_at: "2024-07-13 10:00:00".to_string(),
    }
}

fn transform_paths(paths: &Paths) -> Option<academic_pulse::transform::Transformed> {
    transform(
        &paths.raw_csv(),
        &paths.processed_csv(),
        &paths.quality_report(),
    )
    .expect("transform failed")
}

#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths::new(dir.path());
    let mut rng = StdRng::seed_from_u64(2024);

    let extracted = extract(
        &mut rng,
        &ExtractOptions::new(120),
        &paths.raw_csv(),
        &paths.raw_metadata(),
    )
    .unwrap();
    assert_eq!(extracted.records.len(), 120);

    let transformed = transform_paths(&paths).unwrap();
    assert_eq!(transformed.records.len(), 120);

    let loaded = load_processed(&paths.processed_csv()).unwrap().unwrap();
    assert_eq!(loaded, transformed.records);
    for (raw, processed) in extracted.records.iter().zip(&loaded) {
        assert_eq!(raw, &processed.to_raw());
    }

    let agg = Aggregator::new(&loaded);
    for stat in agg.top_n(KeyField::InstructorId, ValueField::SatisfactionScore, 10, 5) {
        assert!(stat.count >= 5);
    }

    let now = Local::now();
    let quality = QualityReport::load(&paths.quality_report())
        .unwrap()
        .map(|q| q.data_quality_score);
    assert_eq!(quality, Some(100.0));

    dashboard::save(&agg, &paths.report(dashboard::FILE_NAME), now, quality).unwrap();
    export::export_all(&agg, &paths.reports_dir(), now).unwrap();
    html::save(&agg, &paths.report(html::FILE_NAME), now, quality).unwrap();

    for name in [
        dashboard::FILE_NAME,
        html::FILE_NAME,
        export::EXECUTIVE_SUMMARY,
        export::INSTRUCTOR_PERFORMANCE,
        export::COURSE_ANALYSIS,
        export::TREND_ANALYSIS,
        export::DETAILED_DATA,
    ] {
        assert!(paths.report(name).exists(), "{name} missing");
    }
}

#[test]
fn test_three_record_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths::new(dir.path());
    let rows = vec![
        raw(1, (5, 5, 5, 5)),
        raw(2, (3, 3, 3, 3)),
        raw(3, (1, 1, 1, 1)),
    ];
    write_records(&paths.raw_csv(), &rows).unwrap();

    let transformed = transform_paths(&paths).unwrap();
    let scores: Vec<f64> = transformed
        .records
        .iter()
        .map(|r| r.satisfaction_score)
        .collect();
    let categories: Vec<PerformanceCategory> = transformed
        .records
        .iter()
        .map(|r| r.performance_category)
        .collect();

    assert_eq!(scores, vec![5.0, 3.0, 1.0]);
    assert_eq!(
        categories,
        vec![
            PerformanceCategory::Excellent,
            PerformanceCategory::Good,
            PerformanceCategory::Poor
        ]
    );

    let header = std::fs::read_to_string(paths.processed_csv()).unwrap();
    let header = header.lines().next().unwrap();
    assert!(header.starts_with("feedback_id,student_id,course_id"));
    assert!(header.ends_with("satisfaction_score,difficulty_category,performance_category"));
}

#[test]
fn test_malformed_row_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths::new(dir.path());
    let rows: Vec<RawRecord> = (1..=4).map(|i| raw(i, (4, 4, 4, 4))).collect();
    write_records(&paths.raw_csv(), &rows).unwrap();

    let mut content = std::fs::read_to_string(paths.raw_csv()).unwrap();
    content.push_str("5,STU005,COURSE01,INST01,Fall2024,4,4\n");
    std::fs::write(paths.raw_csv(), content).unwrap();

    let transformed = transform_paths(&paths).unwrap();
    assert_eq!(transformed.records.len(), 4);
    assert_eq!(transformed.quality.records_processed, 5);
    assert_eq!(transformed.quality.records_skipped, 1);
    assert_eq!(transformed.quality.data_quality_score, 80.0);

    let processed = read_records::<ProcessedRecord>(&paths.processed_csv()).unwrap();
    assert_eq!(processed.records.len(), 4);
    assert!(processed.skipped.is_empty());
}

#[test]
fn test_reports_without_processed_data() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths::new(dir.path());

    assert!(transform_paths(&paths).is_none());
    assert!(load_processed(&paths.processed_csv()).unwrap().is_none());
}
