//! Text bar charts.

use std::fmt::Write;

pub const FULL_BLOCK: char = '█';
pub const LIGHT_SHADE: char = '░';

/// Renders `data` as horizontal bars scaled so the largest value spans `max_width`.
///
/// Rows keep the order of `data`. Non-positive maxima draw empty bars.
pub fn bar_chart(title: &str, data: &[(String, f64)], max_width: usize) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "\n{title}");
    let _ = writeln!(output, "{}", "=".repeat(title.chars().count()));

    if data.is_empty() {
        return output;
    }

    let max_value = data.iter().map(|(_, v)| *v).fold(f64::MIN, f64::max);

    for (label, value) in data {
        let bar_length = scaled_width(*value, max_value, max_width);
        let bar: String = std::iter::repeat_n(FULL_BLOCK, bar_length).collect();
        let _ = writeln!(
            output,
            "{label:15} │{bar:<max_width$} │ {}",
            format_value(*value)
        );
    }

    output
}

/// Width of a bar for `value` when `max_value` maps to `max_width`.
pub fn scaled_width(value: f64, max_value: f64, max_width: usize) -> usize {
    if max_value <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max_value) * max_width as f64).floor() as usize
}

/// A fixed 50-column bar with one block per two percent, padded with shade.
pub fn percent_bar(percentage: f64) -> String {
    const WIDTH: usize = 50;
    let filled = ((percentage / 2.0).floor().max(0.0) as usize).min(WIDTH);
    let mut bar: String = std::iter::repeat_n(FULL_BLOCK, filled).collect();
    bar.extend(std::iter::repeat_n(LIGHT_SHADE, WIDTH - filled));
    bar
}

/// Five-star rendering of a 1–5 mean.
pub fn stars(score: f64) -> String {
    let full = (score.floor().max(0.0) as usize).min(5);
    let mut out: String = std::iter::repeat_n('★', full).collect();
    out.extend(std::iter::repeat_n('☆', 5 - full));
    out
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
