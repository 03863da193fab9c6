use crate::domain::query::{Slot, StatusQuery};

pub const GREETING: &str = "What can I help you with today?";
pub const RESTART_PROMPT: &str = "What else can I do for you?";

pub const PROJECT_PROMPT: &str = "Which Project Details you want?";
pub const DATE_PROMPT: &str = "What date would you like?";
pub const SPECIFIC_DATE_PROMPT: &str = "Can you give me a more specific date?";

pub fn suite_prompt(query: &StatusQuery) -> String {
    format!("Which Suite in {} Project you are looking for?", filled(query, Slot::Project))
}

pub fn status_prompt(query: &StatusQuery) -> String {
    format!(
        "Which Status in {} Project {} Suite you are looking for?",
        filled(query, Slot::Project),
        filled(query, Slot::Suite)
    )
}

pub fn category_prompt(query: &StatusQuery) -> String {
    format!(
        "Which Catogory in {} Project {} Suite {} Status you are looking for?",
        filled(query, Slot::Project),
        filled(query, Slot::Suite),
        filled(query, Slot::Status)
    )
}

pub fn confirmation_prompt(query: &StatusQuery) -> String {
    format!(
        "Please confirm, you want to get the {} Project {} Suite {} Status {} Category as on {}. \
         Is this correct?",
        filled(query, Slot::Project),
        filled(query, Slot::Suite),
        filled(query, Slot::Status),
        filled(query, Slot::Category),
        filled(query, Slot::Date)
    )
}

fn filled(query: &StatusQuery, slot: Slot) -> &str {
    query.get(slot).unwrap_or_default()
}
