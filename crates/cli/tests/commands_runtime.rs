use std::env;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use statusbot_cli::commands::{config, doctor};

#[test]
fn doctor_reports_pass_with_valid_search_env() {
    with_env(
        &[
            ("STATUSBOT_SEARCH_ENDPOINT", "https://index.example.net"),
            ("STATUSBOT_SEARCH_API_KEY", "sk-test"),
        ],
        || {
            let payload = parse_payload(&doctor::run(true));
            assert_eq!(payload["overall_status"], "pass");

            let checks = payload["checks"].as_array().expect("doctor checks should be an array");
            assert_eq!(checks.len(), 3);
            assert_eq!(checks[0]["name"], "config_validation");
            assert_eq!(checks[0]["status"], "pass");
            assert_eq!(checks[1]["name"], "recognizer_mode");
            assert!(checks[1]["details"]
                .as_str()
                .unwrap_or_default()
                .contains("recognizer unconfigured"));
        },
    );
}

#[test]
fn doctor_reports_failure_without_search_config() {
    with_env(&[], || {
        let payload = parse_payload(&doctor::run(true));
        assert_eq!(payload["overall_status"], "fail");

        let checks = payload["checks"].as_array().expect("doctor checks should be an array");
        assert_eq!(checks[0]["status"], "fail");
        assert!(checks[0]["details"].as_str().unwrap_or_default().contains("search.endpoint"));
        assert_eq!(checks[1]["status"], "skipped");
        assert_eq!(checks[2]["status"], "skipped");
    });
}

#[test]
fn config_output_redacts_secrets_and_attributes_sources() {
    with_env(
        &[
            ("STATUSBOT_SEARCH_ENDPOINT", "https://index.example.net"),
            ("STATUSBOT_SEARCH_API_KEY", "sk-secret-value"),
        ],
        || {
            let output = config::run();

            assert!(output.contains("effective config"));
            assert!(!output.contains("sk-secret-value"), "api key must be redacted");
            assert!(output.contains("- search.api_key = sk-***"));
            assert!(output
                .contains("- search.endpoint = https://index.example.net (source: env (STATUSBOT_SEARCH_ENDPOINT))"));
            assert!(output.contains("- search.index_name = executions-index (source: default)"));
        },
    );
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "STATUSBOT_RECOGNIZER_PROJECT_NAME",
        "STATUSBOT_RECOGNIZER_DEPLOYMENT_NAME",
        "STATUSBOT_RECOGNIZER_API_KEY",
        "STATUSBOT_RECOGNIZER_API_HOST",
        "STATUSBOT_RECOGNIZER_TIMEOUT_SECS",
        "STATUSBOT_SEARCH_ENDPOINT",
        "STATUSBOT_SEARCH_API_KEY",
        "STATUSBOT_SEARCH_INDEX_NAME",
        "STATUSBOT_SEARCH_TIMEOUT_SECS",
        "STATUSBOT_SERVER_BIND_ADDRESS",
        "STATUSBOT_SERVER_HEALTH_CHECK_PORT",
        "STATUSBOT_SERVER_GRACEFUL_SHUTDOWN_SECS",
        "STATUSBOT_LOGGING_LEVEL",
        "STATUSBOT_LOGGING_FORMAT",
        "STATUSBOT_LOG_LEVEL",
        "STATUSBOT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
