use serde::Deserialize;

use crate::domain::query::{Slot, StatusQuery};

/// Intent label the hosted language model emits for status questions.
pub const PROJECT_STATUS_INTENT: &str = "count";

/// Classified purpose of one utterance, as labeled by the recognizer service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    ProjectStatus,
    Other(String),
}

impl Intent {
    pub fn from_label(label: &str) -> Self {
        if label == PROJECT_STATUS_INTENT {
            Intent::ProjectStatus
        } else {
            Intent::Other(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Intent::ProjectStatus => PROJECT_STATUS_INTENT,
            Intent::Other(label) => label,
        }
    }
}

/// Entity strings the recognizer extracted from one utterance. Every field is
/// optional; the flow prompts for whatever is missing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ExtractedEntities {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub suite: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// One recognizer invocation result. Produced once per utterance and consumed
/// immediately to seed a [`StatusQuery`]; never retained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecognizedUtterance {
    pub intent: Intent,
    pub entities: ExtractedEntities,
}

impl RecognizedUtterance {
    pub fn seed_query(&self) -> StatusQuery {
        let mut query = StatusQuery::default();
        seed_slot(&mut query, Slot::Project, &self.entities.project);
        seed_slot(&mut query, Slot::Suite, &self.entities.suite);
        seed_slot(&mut query, Slot::Status, &self.entities.status);
        seed_slot(&mut query, Slot::Category, &self.entities.category);
        seed_slot(&mut query, Slot::Date, &self.entities.date);
        query
    }
}

fn seed_slot(query: &mut StatusQuery, slot: Slot, value: &Option<String>) {
    if let Some(value) = value.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
        query.set(slot, value);
    }
}
