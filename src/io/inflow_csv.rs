use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct DailyRow {
    day: usize,
    count: i64,
}

#[derive(Debug, Deserialize)]
struct BacklogRow {
    age: usize,
    count: i64,
}

fn contiguous<R>(rows: Vec<R>, index: impl Fn(&R) -> usize, what: &str) -> anyhow::Result<Vec<R>> {
    for (expected, row) in rows.iter().enumerate() {
        let got = index(row);
        anyhow::ensure!(
            got == expected,
            "{} must be contiguous from 0: expected {} at row {}, found {}",
            what,
            expected,
            expected + 1,
            got
        );
    }
    Ok(rows)
}

/// Load a daily detection series from a CSV file with columns: `day,count`.
/// Days must start at 0 with no gaps. Values are returned as read; sign
/// checks happen in the cohort model.
pub fn load_daily_series_csv(path: impl AsRef<Path>) -> anyhow::Result<Vec<i64>> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open daily series CSV: {}", path.display()))?;
    let rows = rdr
        .deserialize::<DailyRow>()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse daily series CSV: {}", path.display()))?;
    let rows = contiguous(rows, |r| r.day, "days")?;
    Ok(rows.into_iter().map(|r| r.count).collect())
}

/// Load an initial age backlog from a CSV file with columns: `age,count`
/// (age 0 = most recently detected).
pub fn load_backlog_csv(path: impl AsRef<Path>) -> anyhow::Result<Vec<i64>> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open backlog CSV: {}", path.display()))?;
    let rows = rdr
        .deserialize::<BacklogRow>()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse backlog CSV: {}", path.display()))?;
    let rows = contiguous(rows, |r| r.age, "ages")?;
    Ok(rows.into_iter().map(|r| r.count).collect())
}
