use std::collections::{BTreeMap, BTreeSet};

use crate::analyzers::types::{
    CourseProfile, GroupStat, InstructorProfile, KeyField, Overview, SearchQuery, SearchResult,
    ValueField,
};
use crate::analyzers::utility::{mean, stddev};
use crate::records::ProcessedRecord;

/// Read-only aggregation over a set of processed records.
///
/// Every grouping iterates keys in ascending order so output is reproducible.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    records: &'a [ProcessedRecord],
}

impl<'a> Aggregator<'a> {
    pub fn new(records: &'a [ProcessedRecord]) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &'a [ProcessedRecord] {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of `value` collected per distinct `key`.
    pub fn group(&self, key: KeyField, value: ValueField) -> BTreeMap<String, Vec<f64>> {
        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for record in self.records {
            groups
                .entry(key.of(record).to_string())
                .or_default()
                .push(value.of(record));
        }
        groups
    }

    /// Mean of `value` per distinct `key`.
    pub fn group_average(&self, key: KeyField, value: ValueField) -> BTreeMap<String, f64> {
        self.group(key, value)
            .into_iter()
            .map(|(k, series)| (k, mean(&series)))
            .collect()
    }

    /// Every group as a [`GroupStat`], ascending by key.
    pub fn group_stats(&self, key: KeyField, value: ValueField) -> Vec<GroupStat> {
        self.group(key, value)
            .into_iter()
            .map(|(key, series)| GroupStat {
                mean: mean(&series),
                count: series.len(),
                key,
            })
            .collect()
    }

    /// The `n` groups with the highest mean `value`.
    ///
    /// Groups with fewer than `min_count` records are dropped. Ties on the
    /// mean are broken by ascending key.
    pub fn top_n(
        &self,
        key: KeyField,
        value: ValueField,
        n: usize,
        min_count: usize,
    ) -> Vec<GroupStat> {
        let mut stats: Vec<GroupStat> = self
            .group_stats(key, value)
            .into_iter()
            .filter(|s| s.count >= min_count)
            .collect();

        stats.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| a.key.cmp(&b.key)));
        stats.truncate(n);
        stats
    }

    /// Number of records per category value present in the input.
    pub fn distribution(&self, category: KeyField) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in self.records {
            *counts.entry(category.of(record).to_string()).or_default() += 1;
        }
        counts
    }

    /// Mean of `value` over all records.
    pub fn average(&self, value: ValueField) -> f64 {
        let series: Vec<f64> = self.records.iter().map(|r| value.of(r)).collect();
        mean(&series)
    }

    /// Number of distinct values of `key`.
    pub fn unique(&self, key: KeyField) -> usize {
        self.records
            .iter()
            .map(|r| key.of(r))
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn overview(&self) -> Overview {
        Overview {
            total_records: self.len(),
            avg_satisfaction: self.average(ValueField::SatisfactionScore),
            avg_overall_rating: self.average(ValueField::OverallRating),
            avg_attendance: self.average(ValueField::AttendanceRate),
            unique_students: self.unique(KeyField::StudentId),
            unique_courses: self.unique(KeyField::CourseId),
            unique_instructors: self.unique(KeyField::InstructorId),
            unique_semesters: self.unique(KeyField::Semester),
        }
    }

    /// Per-instructor metrics, best mean satisfaction first.
    pub fn instructor_profiles(&self) -> Vec<InstructorProfile> {
        let mut profiles: Vec<InstructorProfile> = self
            .partition(KeyField::InstructorId)
            .into_iter()
            .map(|(instructor_id, records)| {
                let satisfaction: Vec<f64> =
                    records.iter().map(|r| r.satisfaction_score).collect();
                let ratings: Vec<f64> =
                    records.iter().map(|r| f64::from(r.overall_rating)).collect();

                let max = satisfaction.iter().copied().fold(f64::MIN, f64::max);
                let min = satisfaction.iter().copied().fold(f64::MAX, f64::min);
                let avg_overall_rating = mean(&ratings);

                InstructorProfile {
                    instructor_id,
                    reviews: records.len(),
                    avg_overall_rating,
                    avg_satisfaction: mean(&satisfaction),
                    courses_taught: distinct(&records, KeyField::CourseId),
                    semesters_active: distinct(&records, KeyField::Semester),
                    consistency: 1.0 - (max - min) / 4.0,
                    rating_stddev: stddev(&ratings, avg_overall_rating),
                }
            })
            .collect();

        profiles.sort_by(|a, b| {
            b.avg_satisfaction
                .total_cmp(&a.avg_satisfaction)
                .then_with(|| a.instructor_id.cmp(&b.instructor_id))
        });
        profiles
    }

    /// Per-course metrics, best mean satisfaction first.
    pub fn course_profiles(&self) -> Vec<CourseProfile> {
        let mut profiles: Vec<CourseProfile> = self
            .partition(KeyField::CourseId)
            .into_iter()
            .map(|(course_id, records)| {
                let satisfaction: Vec<f64> =
                    records.iter().map(|r| r.satisfaction_score).collect();
                let difficulty: Vec<f64> =
                    records.iter().map(|r| f64::from(r.difficulty_level)).collect();

                CourseProfile {
                    course_id,
                    reviews: records.len(),
                    avg_satisfaction: mean(&satisfaction),
                    avg_difficulty: mean(&difficulty),
                    instructors: distinct(&records, KeyField::InstructorId),
                    semesters_offered: distinct(&records, KeyField::Semester),
                }
            })
            .collect();

        profiles.sort_by(|a, b| {
            b.avg_satisfaction
                .total_cmp(&a.avg_satisfaction)
                .then_with(|| a.course_id.cmp(&b.course_id))
        });
        profiles
    }

    /// Records matching `query`, or `None` when nothing matches.
    pub fn search(&self, query: &SearchQuery) -> Option<SearchResult> {
        let matching: Vec<&ProcessedRecord> = self
            .records
            .iter()
            .filter(|r| match query {
                SearchQuery::Instructor(id) => r.instructor_id.eq_ignore_ascii_case(id.trim()),
                SearchQuery::Course(id) => r.course_id.eq_ignore_ascii_case(id.trim()),
                SearchQuery::Semester(term) => r
                    .semester
                    .to_lowercase()
                    .contains(&term.trim().to_lowercase()),
            })
            .collect();

        if matching.is_empty() {
            return None;
        }

        let satisfaction: Vec<f64> = matching.iter().map(|r| r.satisfaction_score).collect();
        let difficulty: Vec<f64> = matching
            .iter()
            .map(|r| f64::from(r.difficulty_level))
            .collect();

        Some(SearchResult {
            reviews: matching.len(),
            avg_satisfaction: mean(&satisfaction),
            avg_difficulty: mean(&difficulty),
            courses: sorted_distinct(&matching, KeyField::CourseId),
            instructors: sorted_distinct(&matching, KeyField::InstructorId),
        })
    }

    fn partition(&self, key: KeyField) -> BTreeMap<String, Vec<&'a ProcessedRecord>> {
        let mut groups: BTreeMap<String, Vec<&'a ProcessedRecord>> = BTreeMap::new();
        for record in self.records {
            groups
                .entry(key.of(record).to_string())
                .or_default()
                .push(record);
        }
        groups
    }
}

/// Expands a distribution to a fixed category universe, in universe order.
///
/// Categories missing from `counts` are reported as 0; categories outside the
/// universe are dropped.
pub fn fill_universe(counts: &BTreeMap<String, usize>, universe: &[&str]) -> Vec<(String, usize)> {
    universe
        .iter()
        .map(|category| {
            (
                category.to_string(),
                counts.get(*category).copied().unwrap_or(0),
            )
        })
        .collect()
}

fn distinct(records: &[&ProcessedRecord], key: KeyField) -> usize {
    records
        .iter()
        .map(|r| key.of(r))
        .collect::<BTreeSet<_>>()
        .len()
}

fn sorted_distinct(records: &[&ProcessedRecord], key: KeyField) -> Vec<String> {
    records
        .iter()
        .map(|r| key.of(r))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testing::record;

    fn sample() -> Vec<ProcessedRecord> {
        vec![
            record(1, "COURSE01", "INST02", "Fall2024", (5, 5, 5, 5), 1),
            record(2, "COURSE01", "INST01", "Fall2024", (3, 3, 3, 3), 3),
            record(3, "COURSE02", "INST01", "Spring2024", (1, 1, 1, 1), 5),
            record(4, "COURSE02", "INST02", "Spring2024", (4, 4, 4, 4), 4),
            record(5, "COURSE03", "INST03", "Summer2024", (2, 2, 2, 2), 2),
        ]
    }

    #[test]
    fn test_group_average_sorted_by_key() {
        let records = sample();
        let agg = Aggregator::new(&records);
        let avg = agg.group_average(KeyField::InstructorId, ValueField::SatisfactionScore);

        let keys: Vec<&str> = avg.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["INST01", "INST02", "INST03"]);
        assert_eq!(avg["INST01"], 2.0);
        assert_eq!(avg["INST02"], 4.5);
        assert_eq!(avg["INST03"], 2.0);
    }

    #[test]
    fn test_group_average_idempotent() {
        let records = sample();
        let agg = Aggregator::new(&records);
        let first = agg.group_average(KeyField::CourseId, ValueField::DifficultyLevel);
        let second = agg.group_average(KeyField::CourseId, ValueField::DifficultyLevel);
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_n_orders_and_breaks_ties_by_key() {
        let records = sample();
        let agg = Aggregator::new(&records);
        let top = agg.top_n(KeyField::InstructorId, ValueField::SatisfactionScore, 3, 1);

        let keys: Vec<&str> = top.iter().map(|s| s.key.as_str()).collect();
        // INST01 and INST03 tie at 2.0
        assert_eq!(keys, vec!["INST02", "INST01", "INST03"]);
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn test_top_n_respects_min_count_and_n() {
        let records = sample();
        let agg = Aggregator::new(&records);

        let top = agg.top_n(KeyField::CourseId, ValueField::SatisfactionScore, 10, 2);
        assert!(top.iter().all(|s| s.count >= 2));
        assert_eq!(top.len(), 2);

        let top_one = agg.top_n(KeyField::CourseId, ValueField::SatisfactionScore, 1, 1);
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0].key, "COURSE01");
    }

    #[test]
    fn test_top_n_min_count_five_on_generated_data() {
        use crate::extract::{ExtractOptions, generate};
        use crate::transform::enhance;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(99);
        let records: Vec<ProcessedRecord> = generate(&mut rng, &ExtractOptions::new(40))
            .into_iter()
            .map(enhance)
            .collect();
        let agg = Aggregator::new(&records);

        for key in [KeyField::CourseId, KeyField::InstructorId, KeyField::Semester] {
            for stat in agg.top_n(key, ValueField::SatisfactionScore, 100, 5) {
                assert!(stat.count >= 5, "{} has {}", stat.key, stat.count);
            }
        }
    }

    #[test]
    fn test_distribution_omits_absent_categories() {
        let records = sample();
        let agg = Aggregator::new(&records);
        let dist = agg.distribution(KeyField::PerformanceCategory);

        assert_eq!(dist.get("Excellent"), Some(&2));
        assert_eq!(dist.get("Good"), Some(&1));
        assert_eq!(dist.get("Poor"), Some(&2));

        let difficulty = Aggregator::new(&records[..2]).distribution(KeyField::DifficultyCategory);
        assert_eq!(difficulty.len(), 2);
        assert!(!difficulty.contains_key("Hard"));
    }

    #[test]
    fn test_fill_universe_defaults_to_zero() {
        let records = sample();
        let agg = Aggregator::new(&records[..2]);
        let filled = fill_universe(
            &agg.distribution(KeyField::DifficultyCategory),
            &["Easy", "Moderate", "Hard", "Very Hard"],
        );
        assert_eq!(
            filled,
            vec![
                ("Easy".to_string(), 1),
                ("Moderate".to_string(), 1),
                ("Hard".to_string(), 0),
                ("Very Hard".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_overview() {
        let records = sample();
        let overview = Aggregator::new(&records).overview();

        assert_eq!(overview.total_records, 5);
        assert_eq!(overview.avg_satisfaction, 3.0);
        assert_eq!(overview.unique_students, 5);
        assert_eq!(overview.unique_courses, 3);
        assert_eq!(overview.unique_instructors, 3);
        assert_eq!(overview.unique_semesters, 3);
    }

    #[test]
    fn test_overview_empty() {
        let overview = Aggregator::new(&[]).overview();
        assert_eq!(overview.total_records, 0);
        assert_eq!(overview.avg_satisfaction, 0.0);
    }

    #[test]
    fn test_instructor_profiles() {
        let records = sample();
        let profiles = Aggregator::new(&records).instructor_profiles();

        assert_eq!(profiles[0].instructor_id, "INST02");
        assert_eq!(profiles[0].reviews, 2);
        assert_eq!(profiles[0].courses_taught, 2);
        assert_eq!(profiles[0].semesters_active, 2);
        assert_eq!(profiles[0].consistency, 0.75);
        assert_eq!(profiles[0].rating_stddev, 0.5);

        let inst01 = profiles.iter().find(|p| p.instructor_id == "INST01").unwrap();
        assert_eq!(inst01.consistency, 0.5);
    }

    #[test]
    fn test_course_profiles() {
        let records = sample();
        let profiles = Aggregator::new(&records).course_profiles();

        assert_eq!(profiles[0].course_id, "COURSE01");
        assert_eq!(profiles[0].avg_satisfaction, 4.0);
        assert_eq!(profiles[0].avg_difficulty, 2.0);
        assert_eq!(profiles[0].instructors, 2);
    }

    #[test]
    fn test_search() {
        let records = sample();
        let agg = Aggregator::new(&records);

        let by_instructor = agg
            .search(&SearchQuery::Instructor("inst01".to_string()))
            .unwrap();
        assert_eq!(by_instructor.reviews, 2);
        assert_eq!(by_instructor.courses, vec!["COURSE01", "COURSE02"]);

        let by_semester = agg.search(&SearchQuery::Semester("spring".to_string())).unwrap();
        assert_eq!(by_semester.reviews, 2);
        assert_eq!(by_semester.instructors, vec!["INST01", "INST02"]);

        assert!(agg.search(&SearchQuery::Course("COURSE99".to_string())).is_none());
    }
}
