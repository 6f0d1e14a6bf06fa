use std::cmp::Ordering;

use serde_json::Value;

use crate::models::{AffiliateRecord, SortOrder, SortState};

// Comparison key for one record field. Numbers order before strings;
// missing or non-scalar values order after every defined scalar.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
    Missing,
}

impl SortKey {
    fn from_value(value: &Value) -> SortKey {
        match value {
            Value::Number(n) => SortKey::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => SortKey::Text(s.to_lowercase()),
            Value::Bool(b) => SortKey::Text(b.to_string()),
            _ => SortKey::Missing,
        }
    }

    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Greater,
            (_, SortKey::Missing) => Ordering::Less,
        }
    }
}

fn text_or_missing(value: Option<&str>) -> SortKey {
    match value {
        Some(s) => SortKey::Text(s.to_lowercase()),
        None => SortKey::Missing,
    }
}

fn sort_key(record: &AffiliateRecord, field: &str) -> SortKey {
    match field {
        "code" => SortKey::Text(record.code.to_lowercase()),
        "total_wagered" => SortKey::Number(record.total_wagered),
        "total_earnings" => SortKey::Number(record.total_earnings),
        "users_registered" => SortKey::Number(record.users_registered),
        "conversion_rate" => SortKey::Number(record.conversion_rate),
        "last_active" => text_or_missing(record.last_active.as_deref()),
        "created_at" => text_or_missing(record.created_at.as_deref()),
        other => record
            .extra
            .get(other)
            .map(SortKey::from_value)
            .unwrap_or(SortKey::Missing),
    }
}

pub fn sort_records(records: &mut [AffiliateRecord], sort: &SortState) {
    records.sort_by(|a, b| {
        let ordering = sort_key(a, &sort.field).compare(&sort_key(b, &sort.field));
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
