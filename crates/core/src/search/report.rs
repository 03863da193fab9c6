use crate::domain::query::{Slot, StatusQuery};
use crate::search::records::ExecutionTally;

/// The three messages sent back after a confirmed search run, in order:
/// restated parameters, pass/fail tally, matched suite descriptions.
pub fn render(query: &StatusQuery, tally: &ExecutionTally) -> Vec<String> {
    vec![header(query), tally_line(tally), suites_line(tally)]
}

fn header(query: &StatusQuery) -> String {
    format!(
        "The Results shown for {} Project {} Suite {} Status {} Category as on {}",
        field(query, Slot::Project),
        field(query, Slot::Suite),
        field(query, Slot::Status),
        field(query, Slot::Category),
        field(query, Slot::Date)
    )
}

fn tally_line(tally: &ExecutionTally) -> String {
    format!("Pass Count: {},Fail Count: {}", tally.pass_count, tally.fail_count)
}

fn suites_line(tally: &ExecutionTally) -> String {
    let suites = serde_json::to_string(&tally.suite_descriptions)
        .unwrap_or_else(|_| "[]".to_string());
    format!("Suites: {suites}")
}

fn field(query: &StatusQuery, slot: Slot) -> &str {
    query.get(slot).unwrap_or_default()
}
