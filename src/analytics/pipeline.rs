//! 読み込み → 正規化 → 分類 → 集計 を1回で実行するパイプライン

use std::path::Path;
use tracing::info;

use super::classifier::{classify_records, ClassifiedTable};
use super::metrics::MetricsEngine;
use super::models::{ViewingRecord, ViewingReport};
use super::title_normalizer::normalize_records;
use crate::error::{ViewstatsError, ViewstatsResult};
use crate::io::load_history_file;

/// 正規化と分類までを実行
pub fn classify_history(records: &[ViewingRecord]) -> ViewstatsResult<ClassifiedTable> {
    if records.is_empty() {
        return Err(ViewstatsError::empty_dataset("no viewing records to analyse"));
    }

    let normalized = normalize_records(records);
    Ok(classify_records(&normalized))
}

/// 視聴レコードからレポートを作成
///
/// 入力が空、またはシリーズ扱いのエントリが1件もない場合は `EmptyDataset`。
pub fn analyze(records: &[ViewingRecord], top_n: usize) -> ViewstatsResult<ViewingReport> {
    let table = classify_history(records)?;
    build_report(&table, top_n)
}

/// 分類済みテーブルからレポートを作成
pub fn build_report(table: &ClassifiedTable, top_n: usize) -> ViewstatsResult<ViewingReport> {
    let metrics = MetricsEngine::new(table);

    let (first_watched, last_watched) = metrics.date_range()?;
    let daily = metrics.daily_episode_stats()?;

    let report = ViewingReport {
        tenure_days: metrics.tenure_days()?,
        first_watched,
        last_watched,
        movie_count: table.counts.movie_count,
        series_record_count: table.counts.series_count,
        max_episodes_in_one_day: daily.max,
        mean_episodes_per_day: daily.mean,
        abandoned_show_count: metrics.abandoned_count(),
        views_by_weekday: metrics.views_by_weekday(),
        top_shows: metrics.top_shows(top_n),
        year_over_year: metrics.year_over_year()?,
    };

    info!(
        tenure_days = report.tenure_days,
        series = report.series_record_count,
        movies = report.movie_count,
        abandoned = report.abandoned_show_count,
        "📊 Viewing report computed"
    );

    Ok(report)
}

/// ファイルを読み込んでレポートを作成
pub fn analyze_file(path: impl AsRef<Path>, top_n: usize) -> ViewstatsResult<ViewingReport> {
    let records = load_history_file(path)?;
    analyze(&records, top_n)
}
