use chrono::{DateTime, FixedOffset, Local, NaiveDate};

#[derive(Debug, Clone)]
pub struct IndicatorRecord {
    pub pulse_id: String,
    pub pulse_name: String,
    pub indicator_type: String,
    pub indicator_value: String,
    pub indicator_description: String,
    pub created_at: DateTime<FixedOffset>,
}

impl IndicatorRecord {
    /// Calendar day of `created_at` in the local timezone. Both the date
    /// filter and the over-time aggregate compare at this granularity.
    pub fn local_day(&self) -> NaiveDate {
        self.created_at.with_timezone(&Local).date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub selected_types: Vec<String>,
    pub value_substring: String,
    pub exact_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub indicator_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCount {
    pub date: String,
    pub count: usize,
}
