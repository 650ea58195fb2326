use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::DividendRecord;

/// Month buckets averaged by [`monthly_average`] unless configured otherwise.
pub const DEFAULT_MONTHS_TO_CONSIDER: usize = 12;

/// Buckets kept by [`group_by_month`].
pub const CHART_MONTHS: usize = 12;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Dividends received in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    /// Abbreviated month and two-digit year, e.g. `"Fev/24"`.
    pub label: String,
    pub amount: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTotal {
    pub asset: String,
    pub amount: f64,
    pub count: usize,
}

pub fn month_label(year: i32, month: u32) -> String {
    let name = MONTH_ABBREVIATIONS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("???");
    format!("{name}/{:02}", year.rem_euclid(100))
}

pub fn total_dividends(records: &[DividendRecord]) -> f64 {
    records.iter().map(|r| r.value).sum()
}

fn monthly_totals(records: &[DividendRecord]) -> BTreeMap<(i32, u32), (f64, usize)> {
    let mut months: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for record in records {
        let Some(key) = record.year_month() else {
            continue;
        };
        let entry = months.entry(key).or_insert((0.0, 0));
        entry.0 += record.value;
        entry.1 += 1;
    }
    months
}

/// Average monthly income over the most recent `months_to_consider` months
/// that have payments. The divisor is the number of months actually present,
/// so a short history is not diluted by empty months.
pub fn monthly_average(records: &[DividendRecord], months_to_consider: usize) -> f64 {
    let months = monthly_totals(records);
    let recent: Vec<f64> = months
        .values()
        .rev()
        .take(months_to_consider)
        .map(|(amount, _)| *amount)
        .collect();
    if recent.is_empty() {
        return 0.0;
    }
    recent.iter().sum::<f64>() / recent.len() as f64
}

/// Sum of payments whose leading year component equals `year`. Records
/// without a readable year are excluded.
pub fn annual_total(records: &[DividendRecord], year: i32) -> f64 {
    records
        .iter()
        .filter(|r| r.payment_year() == Some(year))
        .map(|r| r.value)
        .sum()
}

/// One bucket per month present, chronological, limited to the most recent
/// [`CHART_MONTHS`].
pub fn group_by_month(records: &[DividendRecord]) -> Vec<MonthBucket> {
    let months = monthly_totals(records);
    let skip = months.len().saturating_sub(CHART_MONTHS);
    months
        .into_iter()
        .skip(skip)
        .map(|((year, month), (amount, count))| MonthBucket {
            year,
            month,
            label: month_label(year, month),
            amount,
            count,
        })
        .collect()
}

/// Records paid on or after `cutoff`. Records whose date cannot be parsed
/// are always kept.
pub fn filter_since(records: &[DividendRecord], cutoff: NaiveDate) -> Vec<DividendRecord> {
    records
        .iter()
        .filter(|r| r.date().map_or(true, |d| d >= cutoff))
        .cloned()
        .collect()
}

/// Per-asset totals, largest first.
pub fn total_by_asset(records: &[DividendRecord]) -> Vec<AssetTotal> {
    let mut by_asset: HashMap<&str, (f64, usize)> = HashMap::new();
    for record in records {
        let entry = by_asset.entry(record.asset.as_str()).or_insert((0.0, 0));
        entry.0 += record.value;
        entry.1 += 1;
    }
    let mut totals: Vec<AssetTotal> = by_asset
        .into_iter()
        .map(|(asset, (amount, count))| AssetTotal {
            asset: asset.to_string(),
            amount,
            count,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.asset.cmp(&b.asset))
    });
    totals
}

/// The most recent payments first; undated records sort last.
pub fn most_recent(records: &[DividendRecord], limit: usize) -> Vec<DividendRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.date().cmp(&a.date()));
    sorted.truncate(limit);
    sorted
}

/// Headline dividend figures for one record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendStats {
    pub total: f64,
    pub monthly_average: f64,
    pub year: i32,
    pub annual_total: f64,
    pub record_count: usize,
    pub by_month: Vec<MonthBucket>,
}

impl DividendStats {
    /// Compute stats over already-deduplicated records.
    pub fn compute(records: &[DividendRecord], year: i32, months_to_consider: usize) -> Self {
        Self {
            total: total_dividends(records),
            monthly_average: monthly_average(records, months_to_consider),
            year,
            annual_total: annual_total(records, year),
            record_count: records.len(),
            by_month: group_by_month(records),
        }
    }
}
