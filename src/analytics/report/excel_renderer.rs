use rust_xlsxwriter::{
    Chart, ChartSolidFill, ChartType, Color, Format, FormatBorder, Workbook, Worksheet, XlsxError,
};

use super::text_renderer::summary_lines;
use super::{ReportError, ReportFormat, ReportRenderer};
use crate::analytics::models::{ViewingReport, MONTH_NAMES};

const SERIES_COLOR: u32 = 0x444444;
const ACCENT_COLOR: u32 = 0xA61919;
const PREVIOUS_YEAR_COLOR: u32 = 0x444444;
const CURRENT_YEAR_COLOR: u32 = 0x5A7D9A;

const SUMMARY_SHEET: &str = "Summary";
const WEEKDAYS_SHEET: &str = "Weekdays";
const SHARE_SHEET: &str = "Series vs Movies";
const TOP_SHOWS_SHEET: &str = "Top Shows";
const MONTHLY_SHEET: &str = "Monthly";

/// Excel形式レポート（グラフ付き）
pub struct ExcelRenderer {
    include_charts: bool,
    cell_formatting: bool,
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self {
            include_charts: true,
            cell_formatting: true,
        }
    }

    pub fn with_charts(mut self, include_charts: bool) -> Self {
        self.include_charts = include_charts;
        self
    }

    pub fn with_cell_formatting(mut self, cell_formatting: bool) -> Self {
        self.cell_formatting = cell_formatting;
        self
    }

    /// 全シートを持つワークブックを組み立てる
    fn build_workbook(&self, report: &ViewingReport) -> Result<Workbook, ReportError> {
        let mut workbook = Workbook::new();

        self.create_summary_sheet(&mut workbook, report)?;
        self.create_weekday_sheet(&mut workbook, report)?;
        self.create_share_sheet(&mut workbook, report)?;
        self.create_top_shows_sheet(&mut workbook, report)?;
        self.create_monthly_sheet(&mut workbook, report)?;

        Ok(workbook)
    }

    /// ワークブックを作成してバイト列を返す
    fn create_workbook(&self, report: &ViewingReport) -> Result<Vec<u8>, ReportError> {
        let mut workbook = self.build_workbook(report)?;

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| ReportError::Serialization(format!("Excel generation failed: {}", e)))?;

        Ok(buffer)
    }

    fn header_format(&self, background: u32) -> Option<Format> {
        if self.cell_formatting {
            Some(
                Format::new()
                    .set_bold()
                    .set_background_color(Color::RGB(background))
                    .set_font_color(Color::White)
                    .set_border(FormatBorder::Thin),
            )
        } else {
            None
        }
    }

    /// ヘッダー行を書き込み
    fn write_headers(
        &self,
        worksheet: &mut Worksheet,
        headers: &[&str],
        format: Option<&Format>,
    ) -> Result<(), XlsxError> {
        for (col, header) in headers.iter().enumerate() {
            if let Some(format) = format {
                worksheet.write_string_with_format(0, col as u16, *header, format)?;
            } else {
                worksheet.write_string(0, col as u16, *header)?;
            }
        }
        Ok(())
    }

    /// 要約シート（箇条書きの各項目）
    fn create_summary_sheet(
        &self,
        workbook: &mut Workbook,
        report: &ViewingReport,
    ) -> Result<(), ReportError> {
        let worksheet = workbook.add_worksheet().set_name(SUMMARY_SHEET)?;
        let header_format = self.header_format(ACCENT_COLOR);
        self.write_headers(worksheet, &["Netflix Analysis"], header_format.as_ref())?;

        for (row, line) in summary_lines(report).iter().enumerate() {
            worksheet.write_string((row + 1) as u32, 0, line)?;
        }

        let facts_start = 8u32;
        let facts: [(&str, f64); 7] = [
            ("Tenure (days)", report.tenure_days as f64),
            ("Movies", report.movie_count as f64),
            ("Series episodes", report.series_record_count as f64),
            ("Max episodes in one day", report.max_episodes_in_one_day as f64),
            ("Mean episodes per day", report.mean_episodes_per_day),
            ("Ditched shows", report.abandoned_show_count as f64),
            ("Total records", report.total_records() as f64),
        ];
        for (idx, (label, value)) in facts.iter().enumerate() {
            let row = facts_start + idx as u32;
            worksheet.write_string(row, 0, *label)?;
            worksheet.write_number(row, 1, *value)?;
        }

        let range_row = facts_start + facts.len() as u32 + 1;
        worksheet.write_string(range_row, 0, "First watched")?;
        worksheet.write_string(
            range_row,
            1,
            report.first_watched.format("%Y-%m-%d").to_string(),
        )?;
        worksheet.write_string(range_row + 1, 0, "Last watched")?;
        worksheet.write_string(
            range_row + 1,
            1,
            report.last_watched.format("%Y-%m-%d").to_string(),
        )?;

        worksheet.set_column_width(0, 70.0)?;
        worksheet.set_column_width(1, 14.0)?;
        Ok(())
    }

    /// 曜日別シート
    fn create_weekday_sheet(
        &self,
        workbook: &mut Workbook,
        report: &ViewingReport,
    ) -> Result<(), ReportError> {
        let worksheet = workbook.add_worksheet().set_name(WEEKDAYS_SHEET)?;
        let header_format = self.header_format(ACCENT_COLOR);
        self.write_headers(worksheet, &["Day", "Views"], header_format.as_ref())?;

        for (idx, (day, count)) in report.labeled_weekdays().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_string(row, 0, day)?;
            worksheet.write_number(row, 1, count as f64)?;
        }
        worksheet.set_column_width(0, 14.0)?;

        if self.include_charts {
            let mut chart = Chart::new(ChartType::Column);
            chart
                .add_series()
                .set_name("Views")
                .set_categories((WEEKDAYS_SHEET, 1, 0, 7, 0))
                .set_values((WEEKDAYS_SHEET, 1, 1, 7, 1))
                .set_format(ChartSolidFill::new().set_color(Color::RGB(ACCENT_COLOR)));
            chart.title().set_name("Total Views By Day");
            chart.y_axis().set_name("Views");
            chart.legend().set_hidden();
            worksheet.insert_chart(1, 3, &chart)?;
        }

        Ok(())
    }

    /// シリーズ・映画の比率シート
    fn create_share_sheet(
        &self,
        workbook: &mut Workbook,
        report: &ViewingReport,
    ) -> Result<(), ReportError> {
        let worksheet = workbook.add_worksheet().set_name(SHARE_SHEET)?;
        let header_format = self.header_format(SERIES_COLOR);
        self.write_headers(worksheet, &["Kind", "Records"], header_format.as_ref())?;

        worksheet.write_string(1, 0, "Series")?;
        worksheet.write_number(1, 1, report.series_record_count as f64)?;
        worksheet.write_string(2, 0, "Movies")?;
        worksheet.write_number(2, 1, report.movie_count as f64)?;

        if self.include_charts {
            let mut chart = Chart::new(ChartType::Pie);
            chart
                .add_series()
                .set_name("Series vs Movies")
                .set_categories((SHARE_SHEET, 1, 0, 2, 0))
                .set_values((SHARE_SHEET, 1, 1, 2, 1));
            chart.title().set_name("Series vs Movies");
            worksheet.insert_chart(1, 3, &chart)?;
        }

        Ok(())
    }

    /// 上位番組シート
    fn create_top_shows_sheet(
        &self,
        workbook: &mut Workbook,
        report: &ViewingReport,
    ) -> Result<(), ReportError> {
        let worksheet = workbook.add_worksheet().set_name(TOP_SHOWS_SHEET)?;
        let header_format = self.header_format(SERIES_COLOR);
        self.write_headers(worksheet, &["Show", "Episodes"], header_format.as_ref())?;

        for (idx, show) in report.top_shows.iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_string(row, 0, &show.show_name)?;
            worksheet.write_number(row, 1, show.episode_count as f64)?;
        }
        worksheet.set_column_width(0, 40.0)?;

        if self.include_charts && !report.top_shows.is_empty() {
            let last_row = report.top_shows.len() as u32;
            let mut chart = Chart::new(ChartType::Bar);
            chart
                .add_series()
                .set_name("Episodes")
                .set_categories((TOP_SHOWS_SHEET, 1, 0, last_row, 0))
                .set_values((TOP_SHOWS_SHEET, 1, 1, last_row, 1))
                .set_format(ChartSolidFill::new().set_color(Color::RGB(ACCENT_COLOR)));
            chart.title().set_name("Most Watched Shows");
            chart.legend().set_hidden();
            worksheet.insert_chart(1, 3, &chart)?;
        }

        Ok(())
    }

    /// 月別（前年比較）シート
    fn create_monthly_sheet(
        &self,
        workbook: &mut Workbook,
        report: &ViewingReport,
    ) -> Result<(), ReportError> {
        let yoy = &report.year_over_year;
        let worksheet = workbook.add_worksheet().set_name(MONTHLY_SHEET)?;
        let header_format = self.header_format(CURRENT_YEAR_COLOR);
        let previous_label = yoy.previous.year.to_string();
        let current_label = yoy.current.year.to_string();
        self.write_headers(
            worksheet,
            &["Month", previous_label.as_str(), current_label.as_str()],
            header_format.as_ref(),
        )?;

        for (idx, month) in MONTH_NAMES.iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_string(row, 0, *month)?;
            worksheet.write_number(row, 1, yoy.previous.counts[idx] as f64)?;
            worksheet.write_number(row, 2, yoy.current.counts[idx] as f64)?;
        }
        worksheet.set_column_width(0, 14.0)?;

        if self.include_charts {
            let mut chart = Chart::new(ChartType::Column);
            chart
                .add_series()
                .set_name(previous_label.as_str())
                .set_categories((MONTHLY_SHEET, 1, 0, 12, 0))
                .set_values((MONTHLY_SHEET, 1, 1, 12, 1))
                .set_format(ChartSolidFill::new().set_color(Color::RGB(PREVIOUS_YEAR_COLOR)));
            chart
                .add_series()
                .set_name(current_label.as_str())
                .set_categories((MONTHLY_SHEET, 1, 0, 12, 0))
                .set_values((MONTHLY_SHEET, 1, 2, 12, 2))
                .set_format(ChartSolidFill::new().set_color(Color::RGB(CURRENT_YEAR_COLOR)));
            chart.title().set_name("This Year VS Last Year");
            chart.x_axis().set_name("Months");
            chart.y_axis().set_name("Show Count");
            worksheet.insert_chart(1, 4, &chart)?;
        }

        Ok(())
    }
}

impl ReportRenderer for ExcelRenderer {
    fn render(&self, report: &ViewingReport) -> Result<Vec<u8>, ReportError> {
        self.create_workbook(report)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Excel
    }
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// XlsxErrorをReportErrorに変換
impl From<XlsxError> for ReportError {
    fn from(error: XlsxError) -> Self {
        ReportError::Serialization(format!("Excel error: {}", error))
    }
}
