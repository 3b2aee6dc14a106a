use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use super::models::ViewingReport;

pub mod excel_renderer;
pub mod json_renderer;
pub mod text_renderer;

pub use excel_renderer::ExcelRenderer;
pub use json_renderer::JsonRenderer;
pub use text_renderer::TextRenderer;

/// レポート形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
    Excel,
}

impl ReportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Excel => "xlsx",
        }
    }
}

/// レポート出力エラー
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported format: {format:?}")]
    UnsupportedFormat { format: ReportFormat },
}

/// レポート描画トレイト
pub trait ReportRenderer: Send + Sync {
    fn render(&self, report: &ViewingReport) -> Result<Vec<u8>, ReportError>;
    fn format(&self) -> ReportFormat;
}

/// レポートマネージャー
pub struct ReportManager {
    renderers: HashMap<ReportFormat, Box<dyn ReportRenderer>>,
}

impl ReportManager {
    /// 既定の描画器をすべて登録したマネージャーを作成
    pub fn new() -> Self {
        let mut manager = Self::empty();

        manager.register_renderer(Box::new(TextRenderer::new()));
        manager.register_renderer(Box::new(JsonRenderer::new()));
        manager.register_renderer(Box::new(ExcelRenderer::new()));

        manager
    }

    /// 描画器なしのマネージャー
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// 描画器を登録（同じ形式は上書き）
    pub fn register_renderer(&mut self, renderer: Box<dyn ReportRenderer>) {
        self.renderers.insert(renderer.format(), renderer);
    }

    /// レポートを指定形式で描画
    pub fn render(
        &self,
        format: ReportFormat,
        report: &ViewingReport,
    ) -> Result<Vec<u8>, ReportError> {
        let renderer = self
            .renderers
            .get(&format)
            .ok_or(ReportError::UnsupportedFormat { format })?;

        renderer.render(report)
    }

    /// サポートされている形式を取得
    pub fn supported_formats(&self) -> Vec<ReportFormat> {
        self.renderers.keys().copied().collect()
    }

    /// 形式ごとに `<dir>/<stem>.<ext>` を書き出し、書き出したパスを返す
    pub fn write_reports(
        &self,
        report: &ViewingReport,
        formats: &[ReportFormat],
        dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, ReportError> {
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(formats.len());
        for &format in formats {
            let bytes = self.render(format, report)?;
            let path = dir.join(format!("{}.{}", stem, format.file_extension()));
            fs::write(&path, &bytes)?;

            info!(
                format = ?format,
                path = %path.display(),
                bytes = bytes.len(),
                "💾 Report written"
            );
            written.push(path);
        }

        Ok(written)
    }
}

impl Default for ReportManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::analytics::models::{MonthlyViews, ShowCount, ViewingReport, YearOverYear};
    use chrono::NaiveDate;

    pub fn sample_report() -> ViewingReport {
        ViewingReport {
            tenure_days: 365,
            first_watched: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
            last_watched: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            movie_count: 12,
            series_record_count: 240,
            max_episodes_in_one_day: 9,
            mean_episodes_per_day: 2.35,
            abandoned_show_count: 7,
            views_by_weekday: [50, 20, 25, 30, 35, 40, 40],
            top_shows: vec![
                ShowCount {
                    show_name: "The Long Show".to_string(),
                    episode_count: 80,
                },
                ShowCount {
                    show_name: "Anthology".to_string(),
                    episode_count: 40,
                },
            ],
            year_over_year: YearOverYear {
                previous: MonthlyViews {
                    year: 2020,
                    counts: [0, 0, 20, 20, 20, 20, 20, 20, 20, 20, 20, 20],
                },
                current: MonthlyViews {
                    year: 2021,
                    counts: [15, 15, 10, 0, 0, 0, 0, 0, 0, 0, 0, 0],
                },
            },
        }
    }
}
