use serde::{Deserialize, Serialize};

/// The slots a status query collects, in the order the flow asks for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    Project,
    Suite,
    Status,
    Category,
    Date,
}

impl Slot {
    pub const ORDER: [Slot; 5] =
        [Slot::Project, Slot::Suite, Slot::Status, Slot::Category, Slot::Date];

    pub fn label(&self) -> &'static str {
        match self {
            Slot::Project => "Project",
            Slot::Suite => "Suite",
            Slot::Status => "Status",
            Slot::Category => "Category",
            Slot::Date => "Date",
        }
    }
}

/// The single mutable entity of a flow instance. Fields start empty (or
/// pre-filled from recognizer entities) and are set at most once each, in
/// `Slot::ORDER`. A filled field is never prompted for again within the same
/// flow instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusQuery {
    pub project: Option<String>,
    pub suite: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl StatusQuery {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Project => self.project.as_deref(),
            Slot::Suite => self.suite.as_deref(),
            Slot::Status => self.status.as_deref(),
            Slot::Category => self.category.as_deref(),
            Slot::Date => self.date.as_deref(),
        }
    }

    pub fn set(&mut self, slot: Slot, value: impl Into<String>) {
        let value = Some(value.into());
        match slot {
            Slot::Project => self.project = value,
            Slot::Suite => self.suite = value,
            Slot::Status => self.status = value,
            Slot::Category => self.category = value,
            Slot::Date => self.date = value,
        }
    }

    /// A slot counts as filled only when it holds a non-blank value.
    pub fn is_filled(&self, slot: Slot) -> bool {
        self.get(slot).map(|value| !value.trim().is_empty()).unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        Slot::ORDER.iter().all(|slot| self.is_filled(*slot))
    }

    pub fn missing_slots(&self) -> Vec<Slot> {
        Slot::ORDER.iter().copied().filter(|slot| !self.is_filled(*slot)).collect()
    }
}
