use std::fmt::Write;

use chrono::Local;

use crate::aggregate;
use crate::models::{FilterCriteria, IndicatorRecord};

const BAR_WIDTH: usize = 40;
const EMPTY_STATE: &str = "No indicators match the current filters.";

pub fn build_dashboard(
    criteria: &FilterCriteria,
    total: usize,
    records: &[IndicatorRecord],
) -> String {
    let by_type = aggregate::count_by_type(records);
    let by_day = aggregate::count_by_day(records);

    let mut output = String::new();

    let _ = writeln!(output, "# Cyber Threat Intelligence Dashboard");
    let _ = writeln!(
        output,
        "Generated {} ({} of {} indicators, {})",
        Local::now().date_naive(),
        records.len(),
        total,
        describe_criteria(criteria)
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Indicators");
    let _ = writeln!(output);

    if records.is_empty() {
        let _ = writeln!(output, "{EMPTY_STATE}");
    } else {
        let _ = writeln!(output, "| Type | Value | Description | Pulse | Created |");
        let _ = writeln!(output, "| --- | --- | --- | --- | --- |");
        for record in records {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                record.indicator_type,
                record.indicator_value,
                record.indicator_description.replace('\n', " "),
                record.pulse_name,
                record.local_day()
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Indicator Type Distribution");
    let _ = writeln!(output);

    if by_type.is_empty() {
        let _ = writeln!(output, "{EMPTY_STATE}");
    } else {
        let max = by_type.iter().map(|c| c.count).max().unwrap_or(1);
        for row in &by_type {
            let _ = writeln!(
                output,
                "- {}: {} {}",
                row.indicator_type,
                row.count,
                bar(row.count, max)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Indicators Over Time");
    let _ = writeln!(output);

    if by_day.is_empty() {
        let _ = writeln!(output, "{EMPTY_STATE}");
    } else {
        let max = by_day.iter().map(|c| c.count).max().unwrap_or(1);
        for row in &by_day {
            let _ = writeln!(output, "- {}: {} {}", row.date, row.count, bar(row.count, max));
        }
    }

    output
}

fn describe_criteria(criteria: &FilterCriteria) -> String {
    let mut parts = Vec::new();

    if !criteria.selected_types.is_empty() {
        parts.push(format!("types {}", criteria.selected_types.join("/")));
    }
    let needle = criteria.value_substring.trim();
    if !needle.is_empty() {
        parts.push(format!("value contains {needle:?}"));
    }
    if let Some(day) = criteria.exact_date {
        parts.push(format!("created on {day}"));
    }

    if parts.is_empty() {
        "no filters".to_string()
    } else {
        parts.join(", ")
    }
}

fn bar(count: usize, max: usize) -> String {
    let width = ((count * BAR_WIDTH) / max.max(1)).max(1);
    "#".repeat(width)
}

/// Fits a cell into `width` characters for the aligned terminal listing.
pub fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(indicator_type: &str, value: &str, ymd: (i32, u32, u32)) -> IndicatorRecord {
        let created_at = Local
            .with_ymd_and_hms(ymd.0, ymd.1, ymd.2, 12, 0, 0)
            .single()
            .expect("unambiguous local time")
            .fixed_offset();
        IndicatorRecord {
            pulse_id: "p1".to_string(),
            pulse_name: "Campaign X".to_string(),
            indicator_type: indicator_type.to_string(),
            indicator_value: value.to_string(),
            indicator_description: "No description".to_string(),
            created_at,
        }
    }

    #[test]
    fn dashboard_has_title_table_and_both_charts() {
        let records = vec![
            record("IPv4", "1.2.3.4", (2024, 1, 5)),
            record("IPv4", "5.6.7.8", (2024, 1, 5)),
            record("domain", "evil.com", (2024, 1, 6)),
        ];
        let dashboard = build_dashboard(&FilterCriteria::default(), 3, &records);

        assert!(dashboard.starts_with("# Cyber Threat Intelligence Dashboard"));
        assert!(dashboard.contains("(3 of 3 indicators, no filters)"));
        assert!(dashboard.contains("## Indicators\n"));
        assert!(dashboard.contains("## Indicator Type Distribution"));
        assert!(dashboard.contains("## Indicators Over Time"));

        assert!(dashboard.contains("| Type | Value | Description | Pulse | Created |"));
        let expected_row = format!(
            "| IPv4 | 1.2.3.4 | No description | Campaign X | {} |",
            records[0].local_day()
        );
        assert!(dashboard.contains(&expected_row));
    }

    #[test]
    fn bars_scale_to_the_largest_count() {
        let records = vec![
            record("IPv4", "1.2.3.4", (2024, 1, 5)),
            record("IPv4", "5.6.7.8", (2024, 1, 5)),
            record("domain", "evil.com", (2024, 1, 6)),
        ];
        let dashboard = build_dashboard(&FilterCriteria::default(), 3, &records);

        let full = "#".repeat(BAR_WIDTH);
        let half = "#".repeat(BAR_WIDTH / 2);
        assert!(dashboard.contains(&format!("- IPv4: 2 {full}")));
        assert!(dashboard.contains(&format!("- domain: 1 {half}\n")));

        let day_full = format!("- {}: 2 {full}", records[0].local_day());
        let day_half = format!("- {}: 1 {half}\n", records[2].local_day());
        assert!(dashboard.contains(&day_full));
        assert!(dashboard.contains(&day_half));
    }

    #[test]
    fn table_rows_follow_the_filtered_order() {
        let records = vec![
            record("domain", "z.example", (2024, 1, 5)),
            record("IPv4", "1.2.3.4", (2024, 1, 5)),
        ];
        let dashboard = build_dashboard(&FilterCriteria::default(), 2, &records);
        let z = dashboard.find("z.example").unwrap();
        let ip = dashboard.find("1.2.3.4").unwrap();
        assert!(z < ip);
    }

    #[test]
    fn empty_set_renders_the_empty_state_everywhere() {
        let dashboard = build_dashboard(&FilterCriteria::default(), 0, &[]);
        assert_eq!(dashboard.matches(EMPTY_STATE).count(), 3);
        assert!(!dashboard.contains("| Type |"));
    }

    #[test]
    fn active_filters_are_described_in_the_header() {
        let criteria = FilterCriteria {
            selected_types: vec!["IPv4".to_string(), "domain".to_string()],
            value_substring: " 1.2 ".to_string(),
            exact_date: Some(chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
        };
        let dashboard = build_dashboard(&criteria, 9, &[]);
        assert!(dashboard.contains("types IPv4/domain"));
        assert!(dashboard.contains("value contains \"1.2\""));
        assert!(dashboard.contains("created on 2024-01-05"));
        assert!(dashboard.contains("(0 of 9 indicators"));
    }

    #[test]
    fn multiline_descriptions_stay_on_one_table_row() {
        let mut noisy = record("IPv4", "1.2.3.4", (2024, 1, 5));
        noisy.indicator_description = "line one\nline two".to_string();
        let dashboard = build_dashboard(&FilterCriteria::default(), 1, &[noisy]);
        assert!(dashboard.contains("| line one line two |"));
    }

    #[test]
    fn clip_keeps_short_text_and_truncates_long_text() {
        assert_eq!(clip("1.2.3.4", 10), "1.2.3.4");
        assert_eq!(clip("abcdefghij", 10), "abcdefghij");
        assert_eq!(clip("abcdefghijk", 10), "abcdefg...");
        assert_eq!(clip("пример-домена", 9), "пример...");
    }
}
