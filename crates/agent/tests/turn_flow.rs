use std::sync::Arc;

use statusbot_agent::recognizer::{StaticRecognizer, UnconfiguredRecognizer};
use statusbot_agent::search::StaticSearchIndex;
use statusbot_agent::AgentRuntime;
use statusbot_core::{ExecutionRecord, ExtractedEntities, Intent, RecognizedUtterance};

fn record(description: &str, status: &str) -> ExecutionRecord {
    ExecutionRecord {
        suite_description: Some(description.to_string()),
        executions_status: Some(status.to_string()),
    }
}

async fn say(runtime: &AgentRuntime, conversation: &str, text: &str) -> Vec<String> {
    runtime
        .handle_message(conversation, text, "turn")
        .await
        .unwrap_or_else(|error| panic!("turn `{text}` should succeed: {error}"))
}

#[tokio::test]
async fn unconfigured_recognizer_walks_all_five_prompts_in_order() {
    let search = Arc::new(StaticSearchIndex::new(vec![record("Login", "Pass")]));
    let runtime = AgentRuntime::new(Arc::new(UnconfiguredRecognizer), search.clone());

    let opening = say(&runtime, "conv-1", "what is the status of my project").await;
    assert_eq!(opening.len(), 2, "expected the configuration note plus the first prompt");
    assert!(opening[0].starts_with("NOTE: the language recognizer is not configured"));
    assert_eq!(opening[1], "Which Project Details you want?");

    assert_eq!(
        say(&runtime, "conv-1", "Alpha").await,
        vec!["Which Suite in Alpha Project you are looking for?".to_string()]
    );
    assert_eq!(
        say(&runtime, "conv-1", "Smoke").await,
        vec!["Which Status in Alpha Project Smoke Suite you are looking for?".to_string()]
    );
    assert_eq!(
        say(&runtime, "conv-1", "Active").await,
        vec![
            "Which Catogory in Alpha Project Smoke Suite Active Status you are looking for?"
                .to_string()
        ]
    );
    assert_eq!(say(&runtime, "conv-1", "Regression").await, vec!["What date would you like?".to_string()]);

    let confirmation = say(&runtime, "conv-1", "2024-03-04").await;
    assert_eq!(
        confirmation,
        vec![
            "Please confirm, you want to get the Alpha Project Smoke Suite Active Status \
             Regression Category as on 2024-03-04. Is this correct?"
                .to_string()
        ]
    );

    let report = say(&runtime, "conv-1", "yes").await;
    assert_eq!(report.len(), 4);
    assert_eq!(
        report[0],
        "The Results shown for Alpha Project Smoke Suite Active Status Regression Category \
         as on 2024-03-04"
    );
    assert_eq!(report[1], "Pass Count: 1,Fail Count: 0");
    assert_eq!(report[2], r#"Suites: ["Login"]"#);
    assert_eq!(report[3], "What else can I do for you?");

    // Zero recognizer calls means the query was built purely from prompts.
    assert_eq!(
        search.queries(),
        vec![r#"(project_name:"Alpha")+(suite_description:"Smoke")"#.to_string()]
    );
}

#[tokio::test]
async fn seeded_slots_are_not_reprompted_and_drive_the_query() {
    let recognizer = StaticRecognizer::new(RecognizedUtterance {
        intent: Intent::ProjectStatus,
        entities: ExtractedEntities {
            project: Some("Alpha".to_string()),
            suite: Some("Smoke".to_string()),
            ..ExtractedEntities::default()
        },
    });
    let search = Arc::new(StaticSearchIndex::new(vec![
        record("Login", "Pass"),
        record("Checkout", "Pass"),
        record("Search", "Fail"),
    ]));
    let runtime = AgentRuntime::new(Arc::new(recognizer), search.clone());

    // Only status, category and date are prompted for: three slot prompts.
    let first = say(&runtime, "conv-2", "how is the Alpha smoke suite doing").await;
    assert_eq!(
        first,
        vec!["Which Status in Alpha Project Smoke Suite you are looking for?".to_string()]
    );
    say(&runtime, "conv-2", "Active").await;
    let date_prompt = say(&runtime, "conv-2", "Regression").await;
    assert_eq!(date_prompt, vec!["What date would you like?".to_string()]);

    let confirmation = say(&runtime, "conv-2", "tomorrow").await;
    assert!(confirmation[0].starts_with("Please confirm"));

    let report = say(&runtime, "conv-2", "yes").await;
    assert_eq!(report[1], "Pass Count: 2,Fail Count: 1");
    assert_eq!(report[2], r#"Suites: ["Login","Checkout","Search"]"#);

    assert_eq!(
        search.queries(),
        vec![r#"(project_name:"Alpha")+(suite_description:"Smoke")"#.to_string()]
    );
}

#[tokio::test]
async fn declined_confirmation_runs_no_search() {
    let recognizer = StaticRecognizer::new(RecognizedUtterance {
        intent: Intent::ProjectStatus,
        entities: ExtractedEntities {
            project: Some("Alpha".to_string()),
            suite: Some("Smoke".to_string()),
            status: Some("Active".to_string()),
            category: Some("Regression".to_string()),
            date: Some("2024-03-04".to_string()),
        },
    });
    let search = Arc::new(StaticSearchIndex::new(vec![record("Login", "Pass")]));
    let runtime = AgentRuntime::new(Arc::new(recognizer), search.clone());

    let confirmation = say(&runtime, "conv-3", "status of Alpha smoke").await;
    assert_eq!(confirmation.len(), 1);
    assert!(confirmation[0].starts_with("Please confirm"));

    let replies = say(&runtime, "conv-3", "no").await;
    assert_eq!(replies, vec!["What else can I do for you?".to_string()]);
    assert!(search.queries().is_empty(), "cancellation must not issue a search");

    // The conversation is idle again: the next utterance routes from scratch.
    let fresh = say(&runtime, "conv-3", "status of Alpha smoke").await;
    assert!(fresh[0].starts_with("Please confirm"));
}

#[tokio::test]
async fn unknown_intent_emits_exactly_one_message_and_no_flow() {
    let recognizer = StaticRecognizer::new(RecognizedUtterance {
        intent: Intent::Other("BookFlight".to_string()),
        entities: ExtractedEntities::default(),
    });
    let search = Arc::new(StaticSearchIndex::new(Vec::new()));
    let runtime = AgentRuntime::new(Arc::new(recognizer), search.clone());

    let replies = say(&runtime, "conv-4", "book me a flight").await;
    assert_eq!(
        replies,
        vec![
            "Sorry, I didn't get that. Please try asking in a different way \
             (intent was BookFlight)"
                .to_string()
        ]
    );
    assert!(search.queries().is_empty());
}

#[tokio::test]
async fn ambiguous_recognized_date_is_resolved_before_confirmation() {
    let recognizer = StaticRecognizer::new(RecognizedUtterance {
        intent: Intent::ProjectStatus,
        entities: ExtractedEntities {
            project: Some("Alpha".to_string()),
            suite: Some("Smoke".to_string()),
            status: Some("Active".to_string()),
            category: Some("Regression".to_string()),
            date: Some("next tuesday".to_string()),
        },
    });
    let search = Arc::new(StaticSearchIndex::new(vec![record("Login", "Fail")]));
    let runtime = AgentRuntime::new(Arc::new(recognizer), search);

    let resolver_prompt = say(&runtime, "conv-5", "status of Alpha smoke next tuesday").await;
    assert_eq!(resolver_prompt, vec!["Can you give me a more specific date?".to_string()]);

    let confirmation = say(&runtime, "conv-5", "2024-03-12").await;
    assert!(confirmation[0].contains("as on 2024-03-12"));
}
