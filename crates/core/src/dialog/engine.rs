use chrono::NaiveDate;
use thiserror::Error;

use crate::dialog::date_resolver::{DateResolver, ResolverEntry, ResolverTurn};
use crate::dialog::prompts;
use crate::domain::query::{Slot, StatusQuery};

/// One state per suspend point of the slot-filling flow. `ResolvingDate`
/// carries the nested date-resolver machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogState {
    AwaitProject,
    AwaitSuite,
    AwaitStatus,
    AwaitCategory,
    ResolvingDate(DateResolver),
    AwaitConfirmation,
    Done,
}

/// What the flow hands back after each step: suspend on a prompt, or finish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogTurn {
    Prompt(String),
    Finished(DialogOutcome),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirmed(StatusQuery),
    /// The user declined the confirmation. Normal termination, not an error.
    Cancelled,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DialogError {
    #[error("dialog already finished; no further replies are expected")]
    AlreadyFinished,
}

/// The slot-filling flow as an explicit state machine. Each empty slot is
/// prompted for exactly once, in `Slot::ORDER`; pre-filled slots advance
/// without prompting. The machine suspends on every `DialogTurn::Prompt` and
/// resumes with the next user reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryDialog {
    state: DialogState,
    query: StatusQuery,
    reference_date: NaiveDate,
}

impl QueryDialog {
    /// Start a flow instance from a (possibly pre-filled) query, advancing
    /// past every already-populated slot to the first prompt or straight to
    /// confirmation.
    pub fn begin(seed: StatusQuery, reference_date: NaiveDate) -> (Self, DialogTurn) {
        let mut dialog = QueryDialog { state: DialogState::Done, query: seed, reference_date };
        let turn = dialog.advance_from(Slot::Project);
        (dialog, turn)
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn query(&self) -> &StatusQuery {
        &self.query
    }

    /// Feed one user reply into the machine. The reply answers whatever the
    /// current state is awaiting; the machine then advances to the next empty
    /// slot, the date resolver, or the confirmation step.
    pub fn resume(&mut self, reply: &str) -> Result<DialogTurn, DialogError> {
        match self.state.clone() {
            DialogState::AwaitProject => {
                self.query.set(Slot::Project, reply.trim());
                Ok(self.advance_from(Slot::Suite))
            }
            DialogState::AwaitSuite => {
                self.query.set(Slot::Suite, reply.trim());
                Ok(self.advance_from(Slot::Status))
            }
            DialogState::AwaitStatus => {
                self.query.set(Slot::Status, reply.trim());
                Ok(self.advance_from(Slot::Category))
            }
            DialogState::AwaitCategory => {
                self.query.set(Slot::Category, reply.trim());
                Ok(self.advance_date())
            }
            DialogState::ResolvingDate(resolver) => match resolver.resume(reply) {
                ResolverTurn::Resolved(date) => {
                    self.query.set(Slot::Date, date);
                    Ok(self.confirm())
                }
                ResolverTurn::Reprompt(prompt) => Ok(DialogTurn::Prompt(prompt)),
            },
            DialogState::AwaitConfirmation => match parse_confirmation(reply) {
                Some(true) => {
                    self.state = DialogState::Done;
                    Ok(DialogTurn::Finished(DialogOutcome::Confirmed(self.query.clone())))
                }
                Some(false) => {
                    self.state = DialogState::Done;
                    Ok(DialogTurn::Finished(DialogOutcome::Cancelled))
                }
                None => Ok(DialogTurn::Prompt(prompts::confirmation_prompt(&self.query))),
            },
            DialogState::Done => Err(DialogError::AlreadyFinished),
        }
    }

    /// Walk the text slots from `from` onward, suspending on the first empty
    /// one. Reaching the date slot hands over to the resolver.
    fn advance_from(&mut self, from: Slot) -> DialogTurn {
        for slot in Slot::ORDER.into_iter().skip_while(|slot| *slot != from) {
            match slot {
                Slot::Project if !self.query.is_filled(Slot::Project) => {
                    self.state = DialogState::AwaitProject;
                    return DialogTurn::Prompt(prompts::PROJECT_PROMPT.to_string());
                }
                Slot::Suite if !self.query.is_filled(Slot::Suite) => {
                    self.state = DialogState::AwaitSuite;
                    return DialogTurn::Prompt(prompts::suite_prompt(&self.query));
                }
                Slot::Status if !self.query.is_filled(Slot::Status) => {
                    self.state = DialogState::AwaitStatus;
                    return DialogTurn::Prompt(prompts::status_prompt(&self.query));
                }
                Slot::Category if !self.query.is_filled(Slot::Category) => {
                    self.state = DialogState::AwaitCategory;
                    return DialogTurn::Prompt(prompts::category_prompt(&self.query));
                }
                Slot::Date => return self.advance_date(),
                _ => {}
            }
        }
        self.advance_date()
    }

    fn advance_date(&mut self) -> DialogTurn {
        match DateResolver::enter(self.query.get(Slot::Date), self.reference_date) {
            ResolverEntry::Resolved(date) => {
                self.query.set(Slot::Date, date);
                self.confirm()
            }
            ResolverEntry::Prompt(resolver, prompt) => {
                self.state = DialogState::ResolvingDate(resolver);
                DialogTurn::Prompt(prompt)
            }
        }
    }

    fn confirm(&mut self) -> DialogTurn {
        self.state = DialogState::AwaitConfirmation;
        DialogTurn::Prompt(prompts::confirmation_prompt(&self.query))
    }
}

fn parse_confirmation(reply: &str) -> Option<bool> {
    let normalized = reply.trim().trim_end_matches(['.', '!', '?']).to_ascii_lowercase();
    match normalized.as_str() {
        "yes" | "y" | "yep" | "yeah" | "sure" | "ok" | "okay" | "correct" | "confirm" | "true" => {
            Some(true)
        }
        "no" | "n" | "nope" | "nah" | "cancel" | "incorrect" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DialogError, DialogOutcome, DialogState, DialogTurn, QueryDialog};
    use crate::domain::query::{Slot, StatusQuery};

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 6).expect("valid reference date")
    }

    fn prompt(turn: DialogTurn) -> String {
        match turn {
            DialogTurn::Prompt(text) => text,
            DialogTurn::Finished(outcome) => panic!("expected a prompt, got {outcome:?}"),
        }
    }

    fn resume_prompt(dialog: &mut QueryDialog, reply: &str) -> String {
        prompt(dialog.resume(reply).expect("dialog should accept the reply"))
    }

    #[test]
    fn empty_query_prompts_for_every_slot_in_order() {
        let (mut dialog, first) = QueryDialog::begin(StatusQuery::default(), reference());
        assert_eq!(prompt(first), "Which Project Details you want?");

        assert_eq!(
            resume_prompt(&mut dialog, "Alpha"),
            "Which Suite in Alpha Project you are looking for?"
        );
        assert_eq!(
            resume_prompt(&mut dialog, "Smoke"),
            "Which Status in Alpha Project Smoke Suite you are looking for?"
        );
        assert_eq!(
            resume_prompt(&mut dialog, "Active"),
            "Which Catogory in Alpha Project Smoke Suite Active Status you are looking for?"
        );
        assert_eq!(resume_prompt(&mut dialog, "Regression"), "What date would you like?");

        let confirmation = resume_prompt(&mut dialog, "2024-03-04");
        assert_eq!(
            confirmation,
            "Please confirm, you want to get the Alpha Project Smoke Suite Active Status \
             Regression Category as on 2024-03-04. Is this correct?"
        );

        let turn = dialog.resume("yes").expect("confirmation should be accepted");
        let DialogTurn::Finished(DialogOutcome::Confirmed(query)) = turn else {
            panic!("affirmative confirmation should complete the flow");
        };
        assert_eq!(query.get(Slot::Project), Some("Alpha"));
        assert_eq!(query.get(Slot::Date), Some("2024-03-04"));
    }

    #[test]
    fn prefilled_slots_are_never_reprompted() {
        let seed = StatusQuery {
            project: Some("Alpha".to_string()),
            suite: Some("Smoke".to_string()),
            ..StatusQuery::default()
        };

        let (mut dialog, first) = QueryDialog::begin(seed, reference());
        let mut prompts = vec![prompt(first)];
        prompts.push(resume_prompt(&mut dialog, "Active"));
        prompts.push(resume_prompt(&mut dialog, "Regression"));

        // Exactly three slot prompts: status, category, date.
        assert_eq!(
            prompts,
            vec![
                "Which Status in Alpha Project Smoke Suite you are looking for?".to_string(),
                "Which Catogory in Alpha Project Smoke Suite Active Status you are looking for?"
                    .to_string(),
                "What date would you like?".to_string(),
            ]
        );
        for text in &prompts {
            assert!(!text.contains("Which Project Details"));
            assert!(!text.contains("Which Suite in"));
        }
    }

    #[test]
    fn fully_seeded_query_with_definite_date_goes_straight_to_confirmation() {
        let seed = StatusQuery {
            project: Some("Alpha".to_string()),
            suite: Some("Smoke".to_string()),
            status: Some("Active".to_string()),
            category: Some("Regression".to_string()),
            date: Some("2024-03-04".to_string()),
        };

        let (dialog, first) = QueryDialog::begin(seed, reference());
        assert!(matches!(dialog.state(), DialogState::AwaitConfirmation));
        assert!(prompt(first).starts_with("Please confirm"));
    }

    #[test]
    fn ambiguous_seeded_date_enters_the_resolver() {
        let seed = StatusQuery {
            project: Some("Alpha".to_string()),
            suite: Some("Smoke".to_string()),
            status: Some("Active".to_string()),
            category: Some("Regression".to_string()),
            date: Some("next friday".to_string()),
        };

        let (mut dialog, first) = QueryDialog::begin(seed, reference());
        assert_eq!(prompt(first), "Can you give me a more specific date?");

        let confirmation = resume_prompt(&mut dialog, "2024-03-08");
        assert!(confirmation.contains("as on 2024-03-08"));
    }

    #[test]
    fn unparseable_date_replies_reprompt_until_resolved() {
        let (mut dialog, _) = QueryDialog::begin(StatusQuery::default(), reference());
        for reply in ["Alpha", "Smoke", "Active", "Regression"] {
            dialog.resume(reply).expect("slot replies should be accepted");
        }

        assert_eq!(resume_prompt(&mut dialog, "whenever"), "Can you give me a more specific date?");
        let confirmation = resume_prompt(&mut dialog, "tomorrow");
        assert!(confirmation.contains("as on 2024-03-07"));
    }

    #[test]
    fn unclear_confirmation_reply_asks_again() {
        let seed = StatusQuery {
            project: Some("Alpha".to_string()),
            suite: Some("Smoke".to_string()),
            status: Some("Active".to_string()),
            category: Some("Regression".to_string()),
            date: Some("2024-03-04".to_string()),
        };

        let (mut dialog, _) = QueryDialog::begin(seed, reference());
        let again = resume_prompt(&mut dialog, "maybe");
        assert!(again.starts_with("Please confirm"));

        let turn = dialog.resume("no").expect("negative confirmation should be accepted");
        assert_eq!(turn, DialogTurn::Finished(DialogOutcome::Cancelled));
    }

    #[test]
    fn finished_dialog_rejects_further_replies() {
        let seed = StatusQuery {
            project: Some("Alpha".to_string()),
            suite: Some("Smoke".to_string()),
            status: Some("Active".to_string()),
            category: Some("Regression".to_string()),
            date: Some("2024-03-04".to_string()),
        };

        let (mut dialog, _) = QueryDialog::begin(seed, reference());
        dialog.resume("yes").expect("confirmation should be accepted");

        assert_eq!(dialog.resume("yes"), Err(DialogError::AlreadyFinished));
    }
}
