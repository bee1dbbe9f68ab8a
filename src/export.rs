use std::path::Path;

use anyhow::Context;

use crate::models::IndicatorRecord;

pub fn write_csv(path: &Path, records: &[IndicatorRecord]) -> anyhow::Result<usize> {
    #[derive(serde::Serialize)]
    struct CsvRow<'a> {
        indicator_type: &'a str,
        indicator_value: &'a str,
        indicator_description: &'a str,
        pulse_id: &'a str,
        pulse_name: &'a str,
        created_at: String,
    }

    // Header written by hand so an empty export still yields a valid file;
    // serialize would only emit it together with a first row.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record([
        "indicator_type",
        "indicator_value",
        "indicator_description",
        "pulse_id",
        "pulse_name",
        "created_at",
    ])?;

    for record in records {
        writer.serialize(CsvRow {
            indicator_type: &record.indicator_type,
            indicator_value: &record.indicator_value,
            indicator_description: &record.indicator_description,
            pulse_id: &record.pulse_id,
            pulse_name: &record.pulse_name,
            created_at: record.local_day().to_string(),
        })?;
    }

    writer.flush()?;
    Ok(records.len())
}
