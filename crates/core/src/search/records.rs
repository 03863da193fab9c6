use serde::Deserialize;
use thiserror::Error;

/// Status values the tally recognizes. Matching is case-sensitive and exact;
/// anything else counts as unrecognized.
pub const PASS_STATUS: &str = "Pass";
pub const FAIL_STATUS: &str = "Fail";

/// One record returned by the execution index, decoded at the boundary into
/// the fields the reporting path reads. Extra fields in the raw record are
/// ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ExecutionRecord {
    #[serde(default)]
    pub suite_description: Option<String>,
    #[serde(default)]
    pub executions_status: Option<String>,
}

#[derive(Debug, Error)]
pub enum RecordDecodeError {
    #[error("search record is not a JSON object")]
    NotAnObject,
    #[error("search record decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ExecutionRecord {
    pub fn from_value(value: &serde_json::Value) -> Result<Self, RecordDecodeError> {
        if !value.is_object() {
            return Err(RecordDecodeError::NotAnObject);
        }
        Ok(serde_json::from_value(value.clone())?)
    }
}

/// Reduction of one search run: pass/fail counters plus every matched
/// record's description, in the order the index returned them. Statuses that
/// are neither "Pass" nor "Fail" are counted separately so callers can log
/// the anomaly, but they never fail the run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionTally {
    pub pass_count: u32,
    pub fail_count: u32,
    pub unrecognized_count: u32,
    pub suite_descriptions: Vec<String>,
}

impl ExecutionTally {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ExecutionRecord>) -> Self {
        let mut tally = ExecutionTally::default();
        for record in records {
            tally.suite_descriptions.push(record.suite_description.clone().unwrap_or_default());
            match record.executions_status.as_deref() {
                Some(PASS_STATUS) => tally.pass_count += 1,
                Some(FAIL_STATUS) => tally.fail_count += 1,
                _ => tally.unrecognized_count += 1,
            }
        }
        tally
    }

    pub fn matched_count(&self) -> usize {
        self.suite_descriptions.len()
    }
}
