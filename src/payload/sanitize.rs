//! Removal of identifiers from sample records before they are re-exported.

use serde_json::Value;

use super::schema::Record;

/// Keys dropped from samples and their `specimen` and `donor` records.
pub const DROPPED_KEYS: &[&str] = &["info", "sampleId", "specimenId", "donorId", "studyId"];

/// Nested records that are cleaned like the sample itself.
const NESTED_RECORDS: &[&str] = &["specimen", "donor"];

fn without_dropped_keys(record: &Record) -> Record {
    record
        .iter()
        .filter(|(key, _)| !DROPPED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn sanitize_sample(sample: &Record) -> Record {
    without_dropped_keys(sample)
        .into_iter()
        .map(|(key, value)| match value {
            Value::Object(nested) if NESTED_RECORDS.contains(&key.as_str()) => {
                (key, Value::Object(without_dropped_keys(&nested)))
            }
            value => (key, value),
        })
        .collect()
}

/// Return cleaned copies of `samples`, order is kept.
pub fn sanitize(samples: &[Record]) -> Vec<Record> {
    samples.iter().map(sanitize_sample).collect()
}
