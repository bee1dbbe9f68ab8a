use anyhow::{anyhow, Context};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::feed::PulseFeed;
use crate::models::{IndicatorRecord, TypeOption};

pub const NO_DESCRIPTION: &str = "No description";

/// One record per indicator, in source order (pulses first, then each
/// pulse's indicators), with the pulse id/name copied onto every record.
/// Any indicator that breaks the record invariants (empty type, unreadable
/// timestamp) fails the whole feed; callers treat that as a fetch failure.
pub fn flatten(feed: &PulseFeed) -> anyhow::Result<Vec<IndicatorRecord>> {
    let mut records = Vec::new();

    for pulse in &feed.results {
        for indicator in &pulse.indicators {
            if indicator.indicator_type.trim().is_empty() {
                return Err(anyhow!(
                    "indicator {:?} in pulse {} has no type",
                    indicator.indicator,
                    pulse.id
                ));
            }

            let created_at = parse_created(&indicator.created).with_context(|| {
                format!(
                    "indicator {:?} in pulse {} has an unreadable created timestamp",
                    indicator.indicator, pulse.id
                )
            })?;

            let description = match indicator.description.as_deref() {
                Some(text) if !text.trim().is_empty() => text.to_string(),
                _ => NO_DESCRIPTION.to_string(),
            };

            records.push(IndicatorRecord {
                pulse_id: pulse.id.clone(),
                pulse_name: pulse.name.clone(),
                indicator_type: indicator.indicator_type.clone(),
                indicator_value: indicator.indicator.clone(),
                indicator_description: description,
                created_at,
            });
        }
    }

    Ok(records)
}

/// The feed usually emits naive ISO timestamps that are UTC; full RFC 3339
/// offsets and bare dates also appear.
pub fn parse_created(raw: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc().fixed_offset());
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(day.and_time(NaiveTime::MIN).and_utc().fixed_offset());
    }
    Err(anyhow!("unrecognized timestamp {raw:?}"))
}

/// Sorted distinct indicator types, each paired with a display label whose
/// first character is uppercased (the rest is left as-is).
pub fn type_options(records: &[IndicatorRecord]) -> Vec<TypeOption> {
    let mut values: Vec<String> = records
        .iter()
        .map(|record| record.indicator_type.clone())
        .collect();
    values.sort();
    values.dedup();

    values
        .into_iter()
        .map(|value| {
            let label = capitalize(&value);
            TypeOption { value, label }
        })
        .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
