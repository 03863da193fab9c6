use chrono::NaiveDate;

use crate::dialog::prompts;
use crate::timex::TimexExpression;

/// Nested two-step machine that turns a missing or ambiguous date slot into a
/// canonical timex string. Entered with whatever partial date string exists;
/// exits with the normalized value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateResolver {
    reference: NaiveDate,
}

/// Outcome of entering the resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolverEntry {
    /// The incoming string was already definite; no prompt needed.
    Resolved(String),
    /// Suspended awaiting a reply to the returned prompt.
    Prompt(DateResolver, String),
}

/// Outcome of feeding a reply into a suspended resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolverTurn {
    Resolved(String),
    /// The reply did not parse as a date; ask again.
    Reprompt(String),
}

impl DateResolver {
    pub fn enter(existing: Option<&str>, reference: NaiveDate) -> ResolverEntry {
        let resolver = DateResolver { reference };

        let Some(text) = existing.map(str::trim).filter(|text| !text.is_empty()) else {
            return ResolverEntry::Prompt(resolver, prompts::DATE_PROMPT.to_string());
        };

        if let Some(timex) = TimexExpression::parse(text) {
            if timex.is_definite() {
                if let Some(resolved) = timex.resolve(reference) {
                    return ResolverEntry::Resolved(resolved.normalized());
                }
            }
        }

        ResolverEntry::Prompt(resolver, prompts::SPECIFIC_DATE_PROMPT.to_string())
    }

    pub fn resume(&self, reply: &str) -> ResolverTurn {
        match TimexExpression::parse(reply).and_then(|timex| timex.resolve(self.reference)) {
            Some(resolved) => ResolverTurn::Resolved(resolved.normalized()),
            None => ResolverTurn::Reprompt(prompts::SPECIFIC_DATE_PROMPT.to_string()),
        }
    }
}
