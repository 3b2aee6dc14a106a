use anyhow::Context;
use chrono::{Duration, NaiveDate};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use viewstats::io::DATE_FORMAT;

/// Write a synthetic viewing history export for demos and manual testing
#[derive(Debug, Parser)]
#[command(name = "generate_sample_history")]
struct Args {
    /// Output CSV path
    #[arg(short, long, default_value = "NetflixViewingHistory.csv")]
    output: PathBuf,

    /// Number of days of history to generate
    #[arg(short, long, default_value_t = 400)]
    days: i64,

    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

/// シーズン表記の揺れを含む番組（名前, シーズン表記, シーズン数, 1シーズンの話数）
const SHOWS: &[(&str, &str, u32, u32)] = &[
    ("The Crown", "Season", 4, 10),
    ("Money Heist", "Part", 5, 8),
    ("Love, Death & Robots", "Volume", 3, 9),
    ("Dark", "Season", 3, 10),
    ("Kingdom", "Season", 2, 6),
];

/// 一度だけ見て止めた番組
const DROPPED: &[&str] = &[
    "Outer Banks: Season 1: Pilot",
    "Emily in Paris: Season 1: Emily in Paris",
    "Cursed: Season 1: The Girl from the Lake",
];

const MOVIES: &[&str] = &[
    "The Irishman",
    "Roma",
    "Marriage Story",
    "Enola Holmes",
    "Bird Box",
    "Klaus",
];

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let start = NaiveDate::from_ymd_opt(2020, 1, 1).context("invalid start date")?;
    let mut rows: Vec<(String, NaiveDate)> = Vec::new();

    // 番組ごとの進捗（シーズン, 話数）
    let mut progress: Vec<(u32, u32)> = vec![(1, 1); SHOWS.len()];

    for offset in 0..args.days {
        let day = start + Duration::days(offset);
        if !rng.gen_bool(0.6) {
            continue;
        }

        let show_idx = rng.gen_range(0..SHOWS.len());
        let (name, label, seasons, episodes) = SHOWS[show_idx];
        let binge = rng.gen_range(1..=5);
        for _ in 0..binge {
            let (season, episode) = progress[show_idx];
            if season > seasons {
                break;
            }
            rows.push((
                format!("{}: {} {}: Episode {}", name, label, season, episode),
                day,
            ));
            progress[show_idx] = if episode >= episodes {
                (season + 1, 1)
            } else {
                (season, episode + 1)
            };
        }

        if rng.gen_bool(0.05) {
            let movie = MOVIES[rng.gen_range(0..MOVIES.len())];
            rows.push((movie.to_string(), day));
        }
    }

    for (idx, title) in DROPPED.iter().enumerate() {
        rows.push((title.to_string(), start + Duration::days(idx as i64 * 30)));
    }

    // エクスポートは新しい順
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create '{}'", args.output.display()))?;
    writer.write_record(["Title", "Date"])?;
    for (title, date) in &rows {
        let date_text = date.format(DATE_FORMAT).to_string();
        writer.write_record([title.as_str(), date_text.as_str()])?;
    }
    writer.flush()?;

    println!(
        "Generated {} rows into {}",
        rows.len(),
        args.output.display()
    );

    Ok(())
}
