use serde_json::{Map, Value};

use crate::models::AffiliateRecord;

// Output names of the canonical fields. A raw key with one of these names
// is always superseded by the computed canonical value.
const CANONICAL_NAMES: [&str; 7] = [
    "code",
    "total_wagered",
    "total_earnings",
    "users_registered",
    "conversion_rate",
    "last_active",
    "created_at",
];

pub fn parse_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | ',')).collect();
            cleaned.trim().parse().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

fn pick_number(raw: &Map<String, Value>, spellings: [&str; 2]) -> f64 {
    spellings
        .iter()
        .find_map(|name| raw.get(*name))
        .map(parse_number)
        .unwrap_or(0.0)
}

fn pick_string(raw: &Map<String, Value>, spellings: [&str; 2]) -> Option<String> {
    spellings
        .iter()
        .find_map(|name| raw.get(*name).and_then(Value::as_str))
        .map(str::to_string)
}

pub fn normalize_record(raw: &Map<String, Value>) -> AffiliateRecord {
    let mut extra = Map::new();
    for (key, value) in raw {
        if !CANONICAL_NAMES.contains(&key.as_str()) {
            extra.insert(key.clone(), value.clone());
        }
    }

    AffiliateRecord {
        code: pick_string(raw, ["code", "affiliate_code"])
            .unwrap_or_else(|| "Unknown".to_string()),
        total_wagered: pick_number(raw, ["total_wagered", "totalWagered"]),
        total_earnings: pick_number(raw, ["total_earnings", "totalEarnings"]),
        users_registered: pick_number(raw, ["users_registered", "usersRegistered"]),
        conversion_rate: pick_number(raw, ["conversion_rate", "conversionRate"]),
        last_active: pick_string(raw, ["last_active", "lastActive"]),
        created_at: pick_string(raw, ["created_at", "createdAt"]),
        extra,
    }
}

pub fn unwrap_records(body: &Value) -> Vec<Map<String, Value>> {
    match body {
        Value::Array(items) => raw_objects(items),
        Value::Object(envelope) => {
            if let Some(Value::Array(items)) = envelope.get("affiliates") {
                raw_objects(items)
            } else if let Some(Value::Array(items)) = envelope.get("data") {
                raw_objects(items)
            } else {
                vec![envelope.clone()]
            }
        }
        _ => Vec::new(),
    }
}

// Non-object elements degrade to the empty raw record, which normalizes to
// an all-defaults row rather than dropping the entry.
fn raw_objects(items: &[Value]) -> Vec<Map<String, Value>> {
    items
        .iter()
        .map(|item| item.as_object().cloned().unwrap_or_default())
        .collect()
}
