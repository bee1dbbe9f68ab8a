use crate::models::{FilterCriteria, IndicatorRecord};

/// Keeps the records matching every active criterion, in input order.
/// Inactive criteria (empty type set, blank substring, unset date) restrict
/// nothing, so default criteria return the input unchanged.
pub fn apply(records: &[IndicatorRecord], criteria: &FilterCriteria) -> Vec<IndicatorRecord> {
    records
        .iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect()
}

fn matches(record: &IndicatorRecord, criteria: &FilterCriteria) -> bool {
    let matches_type = criteria.selected_types.is_empty()
        || criteria
            .selected_types
            .iter()
            .any(|selected| selected == &record.indicator_type);

    let needle = criteria.value_substring.trim().to_lowercase();
    let matches_value =
        needle.is_empty() || record.indicator_value.to_lowercase().contains(&needle);

    let matches_date = match criteria.exact_date {
        None => true,
        Some(day) => record.local_day() == day,
    };

    matches_type && matches_value && matches_date
}
