use std::fmt::Write as _;

use super::{ReportError, ReportFormat, ReportRenderer};
use crate::analytics::models::{ViewingReport, MONTH_NAMES};

const BAR_WIDTH: usize = 30;

/// プレーンテキスト形式レポート
pub struct TextRenderer {
    heading: String,
    include_charts: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self {
            heading: "Netflix Analysis".to_string(),
            include_charts: true,
        }
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    pub fn with_charts(mut self, include_charts: bool) -> Self {
        self.include_charts = include_charts;
        self
    }

    /// 文字列としてレポートを作成
    pub fn render_string(&self, report: &ViewingReport) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.heading);
        let _ = writeln!(out, "{}", "=".repeat(self.heading.chars().count()));
        let _ = writeln!(out);

        for line in summary_lines(report) {
            let _ = writeln!(out, "• {}", line);
        }

        if self.include_charts {
            let _ = writeln!(out);
            self.write_weekdays(&mut out, report);
            let _ = writeln!(out);
            self.write_share(&mut out, report);
            let _ = writeln!(out);
            self.write_top_shows(&mut out, report);
            let _ = writeln!(out);
            self.write_monthly(&mut out, report);
        }

        out
    }

    fn write_weekdays(&self, out: &mut String, report: &ViewingReport) {
        let _ = writeln!(out, "Total Views By Day");
        let max = report.views_by_weekday.iter().copied().max().unwrap_or(0);
        for (day, count) in report.labeled_weekdays() {
            let _ = writeln!(out, "  {:<10} {:>6} {}", day, count, bar(count, max));
        }
    }

    fn write_share(&self, out: &mut String, report: &ViewingReport) {
        let total = report.total_records();
        let _ = writeln!(out, "Series vs Movies");
        for (label, count) in [
            ("Series", report.series_record_count),
            ("Movies", report.movie_count),
        ] {
            let _ = writeln!(
                out,
                "  {:<10} {:>6} ({:.1}%)",
                label,
                count,
                percentage(count, total)
            );
        }
    }

    fn write_top_shows(&self, out: &mut String, report: &ViewingReport) {
        let _ = writeln!(out, "Top Shows");
        if report.top_shows.is_empty() {
            let _ = writeln!(out, "  (none)");
            return;
        }

        let width = report
            .top_shows
            .iter()
            .map(|s| s.show_name.chars().count())
            .max()
            .unwrap_or(0);
        for (rank, show) in report.top_shows.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>2}. {:<width$} {:>6}",
                rank + 1,
                show.show_name,
                show.episode_count,
                width = width
            );
        }
    }

    fn write_monthly(&self, out: &mut String, report: &ViewingReport) {
        let yoy = &report.year_over_year;
        let _ = writeln!(
            out,
            "This Year VS Last Year ({} / {})",
            yoy.current.year, yoy.previous.year
        );
        for (idx, month) in MONTH_NAMES.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:<10} {:>6} {:>6}",
                month, yoy.current.counts[idx], yoy.previous.counts[idx]
            );
        }
    }
}

/// 箇条書きの要約文
pub fn summary_lines(report: &ViewingReport) -> Vec<String> {
    vec![
        format!("You have been on Netflix for {} days.", report.tenure_days),
        format!("You have seen {} movies.", report.movie_count),
        format!(
            "The most amount of episodes you saw in one day is {} episodes.",
            report.max_episodes_in_one_day
        ),
        format!(
            "You see on average {:.2} episodes per day.",
            report.mean_episodes_per_day
        ),
        format!("You have ditched {} shows.", report.abandoned_show_count),
    ]
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    "█".repeat(count * BAR_WIDTH / max)
}

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &ViewingReport) -> Result<Vec<u8>, ReportError> {
        Ok(self.render_string(report).into_bytes())
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::report::test_support::sample_report;

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&sample_report());
        assert_eq!(lines[0], "You have been on Netflix for 365 days.");
        assert_eq!(lines[1], "You have seen 12 movies.");
        assert_eq!(
            lines[2],
            "The most amount of episodes you saw in one day is 9 episodes."
        );
        assert_eq!(lines[3], "You see on average 2.35 episodes per day.");
        assert_eq!(lines[4], "You have ditched 7 shows.");
    }

    #[test]
    fn test_text_render_sections() {
        let text = TextRenderer::new().render_string(&sample_report());
        assert!(text.starts_with("Netflix Analysis\n"));
        assert!(text.contains("Total Views By Day"));
        assert!(text.contains("Sunday"));
        assert!(text.contains("1. The Long Show"));
        assert!(text.contains("(95.2%)"));
        assert!(text.contains("This Year VS Last Year (2021 / 2020)"));
    }

    #[test]
    fn test_text_render_without_charts() {
        let text = TextRenderer::new()
            .with_heading("Summary")
            .with_charts(false)
            .render_string(&sample_report());
        assert!(text.starts_with("Summary\n=======\n"));
        assert!(!text.contains("Total Views By Day"));
        assert_eq!(text.lines().filter(|l| l.starts_with('•')).count(), 5);
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 0), "");
        assert_eq!(bar(10, 10).chars().count(), BAR_WIDTH);
        assert_eq!(bar(5, 10).chars().count(), BAR_WIDTH / 2);
    }
}
