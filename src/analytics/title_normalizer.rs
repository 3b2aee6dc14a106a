use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

use super::models::ViewingRecord;

/// シーズン表記の統一先
pub const CANONICAL_SEASON_TOKEN: &str = "Season";

/// "Part" / "Volume" の素朴な部分一致（単語境界なし・大文字小文字区別あり）
fn alternate_season_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Part|Volume").expect("static regex is valid"))
}

/// タイトル中の "Part" / "Volume" をすべて "Season" に置換
///
/// 単語の一部であっても置換される（例: "Partners" → "Seasonners"）。
pub fn normalize_title(title: &str) -> Cow<'_, str> {
    alternate_season_pattern().replace_all(title, CANONICAL_SEASON_TOKEN)
}

/// レコードのタイトルを正規化（タイトル欠損時はそのまま）
pub fn normalize_record(record: &ViewingRecord) -> ViewingRecord {
    ViewingRecord {
        title: record
            .title
            .as_deref()
            .map(|t| normalize_title(t).into_owned()),
        watched_on: record.watched_on,
    }
}

/// 全レコードを正規化
pub fn normalize_records(records: &[ViewingRecord]) -> Vec<ViewingRecord> {
    records.iter().map(normalize_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_part_and_volume_become_season() {
        assert_eq!(
            normalize_title("Show A: Part 2: Episode 5"),
            "Show A: Season 2: Episode 5"
        );
        assert_eq!(
            normalize_title("Anthology: Volume 3: Chapter One"),
            "Anthology: Season 3: Chapter One"
        );
    }

    #[test]
    fn test_substring_inside_words_is_replaced() {
        assert_eq!(normalize_title("Partners in Crime"), "Seasonners in Crime");
        assert_eq!(normalize_title("Counterpart"), "Counterpart");
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(normalize_title("part 2 / VOLUME 3"), "part 2 / VOLUME 3");
    }

    #[test]
    fn test_untouched_title_is_borrowed() {
        assert!(matches!(
            normalize_title("Show: Season 1: Pilot"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_idempotent() {
        let titles = [
            "Show A: Part 2: Episode 5",
            "Volume Volume Part",
            "Random Special",
        ];
        for title in titles {
            let once = normalize_title(title).into_owned();
            let twice = normalize_title(&once).into_owned();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_normalize_record_keeps_missing_title() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let records = vec![
            ViewingRecord::new(None, date),
            ViewingRecord::titled("Show: Part 1: A", date),
        ];

        let normalized = normalize_records(&records);
        assert_eq!(normalized[0].title, None);
        assert_eq!(normalized[1].title.as_deref(), Some("Show: Season 1: A"));
        assert_eq!(normalized[1].watched_on, date);
    }
}
