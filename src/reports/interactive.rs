//! Interactive menu over the processed records.
//!
//! The session reads choices line by line from any `BufRead` and writes to any
//! `Write`, so the binary drives it with stdin/stdout and tests with buffers.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use crate::analyzers::utility::pct;
use crate::analyzers::{Aggregator, KeyField, SearchQuery, ValueField};
use crate::records::DifficultyCategory;
use crate::reports::chart::stars;

/// One menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Overview,
    InstructorRankings,
    CourseAnalysis,
    SemesterTrends,
    Search,
    Exit,
}

impl MenuChoice {
    /// Parses a trimmed menu entry; anything outside 0 to 5 is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::Overview),
            "2" => Some(MenuChoice::InstructorRankings),
            "3" => Some(MenuChoice::CourseAnalysis),
            "4" => Some(MenuChoice::SemesterTrends),
            "5" => Some(MenuChoice::Search),
            "0" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

pub struct Dashboard<'a, R, W> {
    agg: Aggregator<'a>,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Dashboard<'a, R, W> {
    pub fn new(agg: Aggregator<'a>, input: R, output: W) -> Self {
        Dashboard { agg, input, output }
    }

    /// Runs the menu loop until the user picks 0 or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.menu()?;
            let Some(line) = self.prompt("Select option (0-5): ")? else {
                break;
            };
            debug!(choice = %line, "Dashboard selection");

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Exit) => break,
                Some(MenuChoice::Overview) => self.overview()?,
                Some(MenuChoice::InstructorRankings) => self.instructor_rankings()?,
                Some(MenuChoice::CourseAnalysis) => self.course_analysis()?,
                Some(MenuChoice::SemesterTrends) => self.semester_trends()?,
                Some(MenuChoice::Search) => self.search()?,
                None => writeln!(self.output, "Invalid option. Please try again.")?,
            }
        }
        writeln!(self.output, "Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    /// Consumes the session and returns the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    fn menu(&mut self) -> Result<()> {
        writeln!(self.output, "\nACADEMIC PULSE DASHBOARD")?;
        writeln!(self.output, "{}", "=".repeat(40))?;
        writeln!(self.output, "1. Quick Overview")?;
        writeln!(self.output, "2. Instructor Rankings")?;
        writeln!(self.output, "3. Course Analysis")?;
        writeln!(self.output, "4. Semester Trends")?;
        writeln!(self.output, "5. Custom Search")?;
        writeln!(self.output, "0. Exit")?;
        writeln!(self.output, "{}", "-".repeat(40))?;
        Ok(())
    }

    /// Writes `message` and reads one trimmed line. `None` at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn overview(&mut self) -> Result<()> {
        let total = self.agg.len();
        writeln!(self.output, "\nQUICK OVERVIEW")?;
        writeln!(self.output, "{}", "-".repeat(30))?;
        writeln!(self.output, "Total Records: {total}")?;
        writeln!(
            self.output,
            "Average Satisfaction: {:.2}/5",
            self.agg.average(ValueField::SatisfactionScore)
        )?;

        // most common first
        let mut distribution: Vec<(String, usize)> = self
            .agg
            .distribution(KeyField::PerformanceCategory)
            .into_iter()
            .collect();
        distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        writeln!(self.output, "\nPerformance Distribution:")?;
        for (category, count) in distribution {
            let share = pct(count, total);
            let bar = "█".repeat((share / 5.0) as usize);
            writeln!(self.output, "  {category:<10}: {bar:<20} {share:5.1}%")?;
        }
        Ok(())
    }

    fn instructor_rankings(&mut self) -> Result<()> {
        writeln!(self.output, "\nINSTRUCTOR RANKINGS")?;
        writeln!(self.output, "{}", "-".repeat(35))?;
        writeln!(self.output, "Rank │ Instructor │ Rating │ Reviews │ Stars")?;
        writeln!(self.output, "─────┼────────────┼────────┼─────────┼──────")?;

        let rankings = self.agg.top_n(
            KeyField::InstructorId,
            ValueField::SatisfactionScore,
            usize::MAX,
            1,
        );
        for (i, stat) in rankings.iter().enumerate() {
            writeln!(
                self.output,
                "{:4} │ {:<10} │ {:6.2} │ {:7} │ {}",
                i + 1,
                stat.key,
                stat.mean,
                stat.count,
                stars(stat.mean)
            )?;
        }
        Ok(())
    }

    fn course_analysis(&mut self) -> Result<()> {
        writeln!(self.output, "\nCOURSE ANALYSIS")?;
        writeln!(self.output, "{}", "-".repeat(35))?;
        writeln!(self.output, "Course     │ Satisfaction │ Difficulty │ Reviews")?;
        writeln!(self.output, "───────────┼──────────────┼────────────┼────────")?;
        for course in self.agg.course_profiles() {
            writeln!(
                self.output,
                "{:<10} │ {:12.2} │ {:10.1} │ {:7}",
                course.course_id, course.avg_satisfaction, course.avg_difficulty, course.reviews
            )?;
        }
        Ok(())
    }

    fn semester_trends(&mut self) -> Result<()> {
        writeln!(self.output, "\nSEMESTER TRENDS")?;
        writeln!(self.output, "{}", "-".repeat(35))?;
        for stat in self
            .agg
            .group_stats(KeyField::Semester, ValueField::SatisfactionScore)
        {
            writeln!(
                self.output,
                "  {:<12} {:.2}/5 ({} reviews)",
                stat.key, stat.mean, stat.count
            )?;
        }

        writeln!(self.output, "\nSatisfaction by Difficulty:")?;
        let stats = self
            .agg
            .group_stats(KeyField::DifficultyCategory, ValueField::SatisfactionScore);
        for category in DifficultyCategory::ALL {
            if let Some(stat) = stats.iter().find(|s| s.key == category.as_str()) {
                writeln!(
                    self.output,
                    "  {:<12} {:.2}/5 ({} reviews)",
                    stat.key, stat.mean, stat.count
                )?;
            }
        }
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        writeln!(self.output, "\nCUSTOM SEARCH")?;
        writeln!(self.output, "{}", "-".repeat(25))?;
        writeln!(self.output, "1. Search by Instructor")?;
        writeln!(self.output, "2. Search by Course")?;
        writeln!(self.output, "3. Search by Semester")?;

        let Some(kind) = self.prompt("Select search type (1-3): ")? else {
            return Ok(());
        };
        let label = match kind.as_str() {
            "1" => "Enter instructor ID (e.g., INST01): ",
            "2" => "Enter course ID (e.g., COURSE01): ",
            "3" => "Enter semester (e.g., Fall2024): ",
            _ => {
                writeln!(self.output, "Invalid search type.")?;
                return Ok(());
            }
        };
        let Some(term) = self.prompt(label)? else {
            return Ok(());
        };

        let query = match kind.as_str() {
            "1" => SearchQuery::Instructor(term.to_uppercase()),
            "2" => SearchQuery::Course(term.to_uppercase()),
            _ => SearchQuery::Semester(term),
        };
        let display = match &query {
            SearchQuery::Instructor(s) | SearchQuery::Course(s) | SearchQuery::Semester(s) => {
                s.clone()
            }
        };

        let Some(result) = self.agg.search(&query) else {
            writeln!(self.output, "No records found for {display}")?;
            return Ok(());
        };

        writeln!(self.output, "\n{display} Results:")?;
        writeln!(self.output, "  Reviews: {}", result.reviews)?;
        writeln!(
            self.output,
            "  Average Satisfaction: {:.2}/5",
            result.avg_satisfaction
        )?;
        match query {
            SearchQuery::Instructor(_) => {
                writeln!(self.output, "  Courses Taught: {}", result.courses.join(", "))?;
            }
            SearchQuery::Course(_) => {
                writeln!(
                    self.output,
                    "  Average Difficulty: {:.1}/5",
                    result.avg_difficulty
                )?;
                writeln!(self.output, "  Instructors: {}", result.instructors.join(", "))?;
            }
            SearchQuery::Semester(_) => {
                writeln!(self.output, "  Courses Offered: {}", result.courses.len())?;
                writeln!(
                    self.output,
                    "  Active Instructors: {}",
                    result.instructors.len()
                )?;
            }
        }
        Ok(())
    }
}
