use std::fmt::Write;
use std::path::Path;

use chrono::{DateTime, NaiveDate};

use crate::models::{AffiliateRecord, QueryConfig, RankTier, RankedRow, SortState};

pub const EMPTY_STATE: &str = "No affiliate data found for this window.\n\
Possible causes:\n\
- no activity in the selected date range\n\
- the stats API was unreachable or returned an unrecognized payload\n\
- the affiliate code is not known upstream\n";

pub fn build_rows(records: &[AffiliateRecord]) -> Vec<RankedRow> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let rank = index + 1;
            RankedRow {
                rank,
                tier: RankTier::for_rank(rank),
                code: record.code.clone(),
                last_active_display: format_date(record.last_active.as_deref()),
                total_wagered_display: format_usd(record.total_wagered),
                total_earnings_display: format_usd(record.total_earnings),
                users_display: format_count(record.users_registered),
            }
        })
        .collect()
}

// USD with comma grouping, minimum 0 and maximum 2 fraction digits.
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as i64;
    let grouped = group_thousands(cents / 100);
    let fraction = cents % 100;
    let magnitude = if fraction == 0 {
        format!("${grouped}")
    } else if fraction % 10 == 0 {
        format!("${grouped}.{}", fraction / 10)
    } else {
        format!("${grouped}.{fraction:02}")
    };
    if amount < 0.0 {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let grouped = group_thousands(rounded.abs());
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn format_date(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return "Unknown".to_string();
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%m/%d/%Y").to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%m/%d/%Y").to_string();
    }
    raw.to_string()
}

fn row_line(row: &RankedRow) -> String {
    let marker = match row.tier.label() {
        "" => String::new(),
        tier => format!(" [{tier}]"),
    };
    format!(
        "- #{}{} {}: wagered {}, earnings {}, {} users, last active {}",
        row.rank,
        marker,
        row.code,
        row.total_wagered_display,
        row.total_earnings_display,
        row.users_display,
        row.last_active_display
    )
}

pub fn render_text(rows: &[RankedRow]) -> String {
    if rows.is_empty() {
        return EMPTY_STATE.to_string();
    }

    let mut output = String::new();
    for row in rows {
        let _ = writeln!(output, "{}", row_line(row));
    }
    output
}

pub fn build_report(config: &QueryConfig, sort: &SortState, rows: &[RankedRow]) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Wager Leaderboard");
    let _ = writeln!(
        output,
        "Generated for {} ({} to {})",
        config.affiliate_code, config.date_start, config.date_end
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Rankings (by {}, {})", sort.field, sort.order.as_str());

    if rows.is_empty() {
        let _ = writeln!(output, "No affiliate activity recorded for this window.");
    } else {
        for row in rows {
            let _ = writeln!(output, "{}", row_line(row));
        }
    }

    output
}

pub fn write_csv(path: &Path, records: &[AffiliateRecord]) -> anyhow::Result<usize> {
    #[derive(serde::Serialize)]
    struct CsvRow<'a> {
        rank: usize,
        tier: &'a str,
        code: &'a str,
        total_wagered: f64,
        total_earnings: f64,
        users_registered: f64,
        conversion_rate: f64,
        last_active: Option<&'a str>,
        created_at: Option<&'a str>,
    }

    let mut writer = csv::Writer::from_path(path)?;
    for (index, record) in records.iter().enumerate() {
        let rank = index + 1;
        writer.serialize(CsvRow {
            rank,
            tier: RankTier::for_rank(rank).label(),
            code: &record.code,
            total_wagered: record.total_wagered,
            total_earnings: record.total_earnings,
            users_registered: record.users_registered,
            conversion_rate: record.conversion_rate,
            last_active: record.last_active.as_deref(),
            created_at: record.created_at.as_deref(),
        })?;
    }
    writer.flush()?;

    Ok(records.len())
}
