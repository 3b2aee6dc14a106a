use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

use super::classifier::ClassifiedTable;
use super::models::{DailyEpisodeStats, MonthlyViews, ShowCount, YearOverYear};
use crate::error::{ViewstatsError, ViewstatsResult};

/// 上位番組の既定件数
pub const DEFAULT_TOP_SHOWS: usize = 10;

/// 小数点以下2桁に丸め
fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// シリーズ表に対する読み取り専用の集計
///
/// 映画はシリーズ/映画の件数以外のどの指標にも含まれない。
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine<'a> {
    table: &'a ClassifiedTable,
}

impl<'a> MetricsEngine<'a> {
    pub fn new(table: &'a ClassifiedTable) -> Self {
        Self { table }
    }

    fn require_entries(&self, context: &str) -> ViewstatsResult<()> {
        if self.table.series.is_empty() {
            Err(ViewstatsError::empty_dataset(format!(
                "{} needs at least one series entry",
                context
            )))
        } else {
            Ok(())
        }
    }

    /// 最初と最後の視聴日
    pub fn date_range(&self) -> ViewstatsResult<(NaiveDate, NaiveDate)> {
        self.require_entries("date range")?;
        let dates = || self.table.series.iter().map(|e| e.watched_on);
        match (dates().min(), dates().max()) {
            (Some(first), Some(last)) => Ok((first, last)),
            _ => Err(ViewstatsError::empty_dataset("date range")),
        }
    }

    /// 視聴期間（日数）
    pub fn tenure_days(&self) -> ViewstatsResult<i64> {
        let (first, last) = self.date_range()?;
        Ok((last - first).num_days())
    }

    /// 曜日別視聴数（日曜始まり、該当なしの曜日は0）
    pub fn views_by_weekday(&self) -> [usize; 7] {
        let mut counts = [0usize; 7];
        for entry in &self.table.series {
            counts[entry.weekday_index()] += 1;
        }
        counts
    }

    /// エピソード数の多い番組上位n件
    ///
    /// 同数の場合は最初に出現した番組が先。タイトル欠損のエントリは番組を持たない。
    pub fn top_shows(&self, n: usize) -> Vec<ShowCount> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut grouped: Vec<ShowCount> = Vec::new();

        for name in self.table.series.iter().filter_map(|e| e.show_name.as_deref()) {
            match positions.get(name) {
                Some(&idx) => grouped[idx].episode_count += 1,
                None => {
                    positions.insert(name, grouped.len());
                    grouped.push(ShowCount {
                        show_name: name.to_string(),
                        episode_count: 1,
                    });
                }
            }
        }

        // sort_byは安定ソートなので出現順が保たれる
        grouped.sort_by(|a, b| b.episode_count.cmp(&a.episode_count));
        grouped.truncate(n);
        grouped
    }

    /// 一度しか視聴されなかった番組数（映画を含む全レコードの番組キー単位）
    pub fn abandoned_count(&self) -> usize {
        self.table.occurrences.single_occurrence_count()
    }

    /// 1日あたりのエピソード数の最大値と平均値
    pub fn daily_episode_stats(&self) -> ViewstatsResult<DailyEpisodeStats> {
        self.require_entries("daily episode statistics")?;

        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for entry in &self.table.series {
            *per_day.entry(entry.watched_on).or_insert(0) += 1;
        }

        let max = per_day.values().copied().max().unwrap_or(0);
        let mean = self.table.series.len() as f64 / per_day.len() as f64;

        Ok(DailyEpisodeStats {
            max,
            mean: round_2dp(mean),
        })
    }

    /// 指定年の月別視聴数（該当なしの月は0）
    pub fn views_by_month(&self, year: i32) -> MonthlyViews {
        let mut counts = [0usize; 12];
        for entry in self.table.series.iter().filter(|e| e.year == year) {
            counts[entry.month_index()] += 1;
        }
        MonthlyViews { year, counts }
    }

    /// データ中の最新年とその前年の月別比較
    pub fn year_over_year(&self) -> ViewstatsResult<YearOverYear> {
        let (_, last) = self.date_range()?;
        let current_year = last.year();
        Ok(YearOverYear {
            previous: self.views_by_month(current_year - 1),
            current: self.views_by_month(current_year),
        })
    }
}
