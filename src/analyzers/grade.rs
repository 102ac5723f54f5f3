use std::fmt;

/// Letter grade for a mean satisfaction score on the 1–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Short label used in tables and CSV exports.
    pub fn label(self) -> &'static str {
        match self {
            Grade::A => "A - Excellent",
            Grade::B => "B - Good",
            Grade::C => "C - Fair",
            Grade::D => "D - Needs Improvement",
        }
    }

    /// CSS class used by the HTML report.
    pub fn css_class(self) -> &'static str {
        match self {
            Grade::A => "grade-excellent",
            Grade::B => "grade-good",
            Grade::C | Grade::D => "grade-poor",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        f.write_str(letter)
    }
}

/// Converts a mean satisfaction score into a letter grade.
///
/// | Range       | Grade |
/// |-------------|-------|
/// | >= 4.0      | A     |
/// | >= 3.5      | B     |
/// | >= 3.0      | C     |
/// | < 3.0       | D     |
pub fn grade(score: f64) -> Grade {
    match score {
        s if s >= 4.0 => Grade::A,
        s if s >= 3.5 => Grade::B,
        s if s >= 3.0 => Grade::C,
        _ => Grade::D,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(grade(5.00), Grade::A);
        assert_eq!(grade(4.00), Grade::A);
        assert_eq!(grade(3.99), Grade::B);
        assert_eq!(grade(3.50), Grade::B);
        assert_eq!(grade(3.49), Grade::C);
        assert_eq!(grade(3.00), Grade::C);
        assert_eq!(grade(2.99), Grade::D);
        assert_eq!(grade(1.00), Grade::D);
    }

    #[test]
    fn test_grade_display() {
        assert_eq!(grade(4.2).to_string(), "A");
        assert_eq!(grade(3.2).label(), "C - Fair");
    }
}
