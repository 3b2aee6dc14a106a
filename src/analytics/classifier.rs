use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, trace};

use super::models::{
    month_name, weekday_name, ClassificationCounts, ClassifiedEntry, EntryKind, ViewingRecord,
};

/// タイトル階層の区切り文字
pub const SEGMENT_SEPARATOR: char = ':';

/// この回数未満しか出現しない番組名は映画・特番の候補になる
pub const MOVIE_OCCURRENCE_THRESHOLD: usize = 3;

/// シーズンマーカー: "Season" + 空白 + 1〜9の1桁
///
/// 2桁のシーズン番号（"Season 10" 以降）はマッチしない。
fn season_marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Season\s[1-9](?:[^0-9]|$)").expect("static regex is valid"))
}

/// セグメントにシーズンマーカーが含まれるか
pub fn has_season_marker(segment: &str) -> bool {
    season_marker_pattern().is_match(segment)
}

/// タイトルから番組キー（最初のコロンより前、前後の空白もそのまま）を取り出す
pub fn show_key(title: &str) -> &str {
    title.split(SEGMENT_SEPARATOR).next().unwrap_or(title)
}

/// タイトルの説明部分（最後のコロンより後）
pub fn description_of(title: &str) -> &str {
    title
        .rsplit(SEGMENT_SEPARATOR)
        .next()
        .unwrap_or(title)
        .trim()
}

/// 番組キーごとの出現回数（フィルタ前の全レコードから一度だけ計算）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowOccurrenceCount {
    counts: HashMap<String, usize>,
}

impl ShowOccurrenceCount {
    /// 正規化済みレコードから出現回数を集計（タイトル欠損は数えない）
    pub fn from_records(records: &[ViewingRecord]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for title in records.iter().filter_map(|r| r.title.as_deref()) {
            *counts.entry(show_key(title).to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// 番組キーの出現回数（未知のキーは0）
    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// 一度しか出現しない番組キーの数
    pub fn single_occurrence_count(&self) -> usize {
        self.counts.values().filter(|&&count| count == 1).count()
    }

    pub fn distinct_shows(&self) -> usize {
        self.counts.len()
    }
}

/// タイトル単位の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleClassification {
    /// タイトルがあり種別を判定できた
    Classifiable(EntryKind),
    /// タイトル欠損。映画判定から除外され、シリーズ表に残る
    Unclassifiable,
}

impl TitleClassification {
    /// 最終的なエントリ種別
    pub fn kind(&self) -> EntryKind {
        match self {
            TitleClassification::Classifiable(kind) => *kind,
            TitleClassification::Unclassifiable => EntryKind::Series,
        }
    }
}

/// シリーズ表と件数（メトリクス計算の唯一の入力）
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTable {
    /// シリーズ扱いのエントリ（入力順）
    pub series: Vec<ClassifiedEntry>,
    /// 映画・特番扱いのエントリ（入力順）
    pub movies: Vec<ClassifiedEntry>,
    pub counts: ClassificationCounts,
    /// 分類に使った出現回数
    pub occurrences: ShowOccurrenceCount,
}

/// シリーズ/映画の分類器
#[derive(Debug, Clone)]
pub struct EntryClassifier {
    occurrences: ShowOccurrenceCount,
}

impl EntryClassifier {
    pub fn new(occurrences: ShowOccurrenceCount) -> Self {
        Self { occurrences }
    }

    /// 正規化済みレコード全体から出現回数を計算して分類器を作成
    pub fn from_records(records: &[ViewingRecord]) -> Self {
        Self::new(ShowOccurrenceCount::from_records(records))
    }

    /// タイトルを判定
    ///
    /// 映画になるのは次の両方を満たす場合:
    /// - セグメントが3未満、または2番目以降のどのセグメントにもシーズンマーカーがない
    /// - 番組キーの出現回数が3未満
    pub fn classify_title(&self, title: Option<&str>) -> TitleClassification {
        let Some(title) = title else {
            return TitleClassification::Unclassifiable;
        };

        let segments: Vec<&str> = title.split(SEGMENT_SEPARATOR).collect();
        let lacks_season = segments.len() < 3
            || !segments.iter().skip(1).any(|s| has_season_marker(s));
        let rare = self.occurrences.get(show_key(title)) < MOVIE_OCCURRENCE_THRESHOLD;

        if lacks_season && rare {
            TitleClassification::Classifiable(EntryKind::Movie)
        } else {
            TitleClassification::Classifiable(EntryKind::Series)
        }
    }

    /// 1レコードを分類
    pub fn classify(&self, record: &ViewingRecord) -> ClassifiedEntry {
        let classification = self.classify_title(record.title.as_deref());
        let kind = classification.kind();
        let title = record.title.clone();

        let (show_name, description) = match (&title, kind) {
            (Some(t), EntryKind::Series) => (
                Some(show_key(t).to_string()),
                Some(description_of(t).to_string()),
            ),
            (Some(t), EntryKind::Movie) => {
                (Some(t.clone()), Some(description_of(t).to_string()))
            }
            (None, _) => (None, None),
        };

        trace!(
            title = ?title,
            classification = ?classification,
            "🏷️ Entry classified"
        );

        ClassifiedEntry {
            kind,
            title,
            show_name,
            description,
            watched_on: record.watched_on,
            day_of_week: weekday_name(record.watched_on).to_string(),
            month: month_name(record.watched_on).to_string(),
            year: record.watched_on.year(),
        }
    }

    /// 全レコードを分類してシリーズ表を作成
    pub fn classify_all(&self, records: &[ViewingRecord]) -> ClassifiedTable {
        let mut series = Vec::new();
        let mut movies = Vec::new();

        for record in records {
            let entry = self.classify(record);
            match entry.kind {
                EntryKind::Series => series.push(entry),
                EntryKind::Movie => movies.push(entry),
            }
        }

        let counts = ClassificationCounts {
            series_count: series.len(),
            movie_count: movies.len(),
        };

        debug!(
            series = counts.series_count,
            movies = counts.movie_count,
            distinct_shows = self.occurrences.distinct_shows(),
            "🎬 Viewing records classified"
        );

        ClassifiedTable {
            series,
            movies,
            counts,
            occurrences: self.occurrences.clone(),
        }
    }
}

/// 正規化済みレコードを分類（出現回数の計算を含む）
pub fn classify_records(records: &[ViewingRecord]) -> ClassifiedTable {
    EntryClassifier::from_records(records).classify_all(records)
}
