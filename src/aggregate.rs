use std::collections::HashMap;

use crate::models::{DateCount, IndicatorRecord, TypeCount};

/// Count of records per indicator type, keys in first-occurrence order
/// (the order the charts plot them in).
pub fn count_by_type(records: &[IndicatorRecord]) -> Vec<TypeCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for record in records {
        let entry = counts.entry(record.indicator_type.clone()).or_insert(0);
        if *entry == 0 {
            first_seen.push(record.indicator_type.clone());
        }
        *entry += 1;
    }

    first_seen
        .into_iter()
        .map(|indicator_type| {
            let count = counts.get(&indicator_type).copied().unwrap_or(0);
            TypeCount { indicator_type, count }
        })
        .collect()
}

/// Count of records per local calendar date (`YYYY-MM-DD`), keys in
/// first-occurrence order.
pub fn count_by_day(records: &[IndicatorRecord]) -> Vec<DateCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    for record in records {
        let day = record.local_day().to_string();
        let entry = counts.entry(day.clone()).or_insert(0);
        if *entry == 0 {
            first_seen.push(day);
        }
        *entry += 1;
    }

    first_seen
        .into_iter()
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            DateCount { date, count }
        })
        .collect()
}
