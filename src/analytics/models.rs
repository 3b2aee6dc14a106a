use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// 曜日ラベル（日曜始まり）
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// 月ラベル（1月始まり）
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// 視聴履歴の1行（生データ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingRecord {
    /// エクスポートされたままのタイトル（欠損時はNone）
    pub title: Option<String>,
    /// 視聴日
    pub watched_on: NaiveDate,
}

impl ViewingRecord {
    pub fn new(title: Option<String>, watched_on: NaiveDate) -> Self {
        Self { title, watched_on }
    }

    pub fn titled(title: impl Into<String>, watched_on: NaiveDate) -> Self {
        Self::new(Some(title.into()), watched_on)
    }
}

/// エントリ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Series,
    Movie,
}

/// 分類済みエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEntry {
    pub kind: EntryKind,
    /// 正規化後のタイトル
    pub title: Option<String>,
    /// 番組名（最初のコロンより前）
    pub show_name: Option<String>,
    /// エピソード説明（最後のコロンより後）
    pub description: Option<String>,
    pub watched_on: NaiveDate,
    pub day_of_week: String,
    pub month: String,
    pub year: i32,
}

impl ClassifiedEntry {
    /// 曜日インデックス（日曜=0）
    pub fn weekday_index(&self) -> usize {
        weekday_index(self.watched_on.weekday())
    }

    /// 月インデックス（1月=0）
    pub fn month_index(&self) -> usize {
        self.watched_on.month0() as usize
    }
}

/// 日曜始まりの曜日インデックス
pub fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_sunday() as usize
}

/// 曜日の英語フルネーム
pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[weekday_index(date.weekday())]
}

/// 月の英語フルネーム
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// シリーズ・映画の件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCounts {
    pub series_count: usize,
    pub movie_count: usize,
}

impl ClassificationCounts {
    pub fn total(&self) -> usize {
        self.series_count + self.movie_count
    }
}

/// 番組ごとのエピソード数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowCount {
    pub show_name: String,
    pub episode_count: usize,
}

/// 1日あたりのエピソード統計
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyEpisodeStats {
    /// 1日の最大エピソード数
    pub max: usize,
    /// 1日の平均エピソード数（小数点以下2桁に丸め）
    pub mean: f64,
}

/// 1年分の月別視聴数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyViews {
    pub year: i32,
    /// 1月始まりの12要素
    pub counts: [usize; 12],
}

/// 前年と最新年の月別比較
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearOverYear {
    pub previous: MonthlyViews,
    pub current: MonthlyViews,
}

/// 1回の分析実行の結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewingReport {
    /// 最初の視聴から最後の視聴までの日数
    pub tenure_days: i64,
    pub first_watched: NaiveDate,
    pub last_watched: NaiveDate,
    pub movie_count: usize,
    pub series_record_count: usize,
    pub max_episodes_in_one_day: usize,
    pub mean_episodes_per_day: f64,
    pub abandoned_show_count: usize,
    /// 日曜始まりの曜日別視聴数
    pub views_by_weekday: [usize; 7],
    pub top_shows: Vec<ShowCount>,
    pub year_over_year: YearOverYear,
}

impl ViewingReport {
    /// 曜日ラベルと視聴数の組
    pub fn labeled_weekdays(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        WEEKDAY_NAMES
            .iter()
            .copied()
            .zip(self.views_by_weekday.iter().copied())
    }

    pub fn total_records(&self) -> usize {
        self.movie_count + self.series_record_count
    }
}
