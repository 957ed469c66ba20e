use budgetree::core::config::{AppConfig, EXAMPLE_CONFIG};
use budgetree::core::{AllocationEngine, ChildUpdates};
use std::fs;
use tracing::info;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), content).expect("Failed to write config file");
    config_file
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

#[test_log::test]
fn test_sample_budget_end_to_end() {
    let table = AppConfig::default().seed_table().unwrap();
    let mut engine = AllocationEngine::new(table, ChildUpdates::Detached);
    let original_total = engine.grand_total();

    let change = engine.redistribute_group("electronics", Some(1650.0)).unwrap();
    info!(?change, "Redistributed electronics");

    let table = engine.table();
    assert_close(table.item("phones").unwrap().value, 880.0);
    assert_close(table.item("laptops").unwrap().value, 770.0);
    assert_close(table.group("electronics").unwrap().variance.unwrap(), 10.0);
    assert_close(engine.grand_total() - original_total, 150.0);
}

#[test_log::test]
fn test_show_with_config_file() {
    let config_file = write_config(
        r#"
        groups:
          - id: travel
            label: "Travel"
            children:
              - id: flights
                label: "Flights"
                value: 600
              - id: hotels
                label: "Hotels"
                value: 300
        display:
          currency: "EUR"
    "#,
    );

    let mut output = Vec::new();
    let result = budgetree::run_command_with_output(
        budgetree::AppCommand::Show { json: false },
        Some(config_file.path().to_str().unwrap()),
        &mut output,
    );
    assert!(result.is_ok(), "Show failed with: {:?}", result.err());

    let text = String::from_utf8(output).expect("Output is not UTF-8");
    let text = console::strip_ansi_codes(&text);
    info!(%text, "Rendered table");
    assert!(text.contains("Value (EUR)"));
    assert!(text.contains("-- Flights"));
    assert!(text.contains("900.00"));
    assert!(text.contains("Grand Total: 900.00"));
}

#[test_log::test]
fn test_apply_with_config_file() {
    let config_file = write_config(
        r#"
        groups:
          - id: travel
            label: "Travel"
            value: 900
            children:
              - { id: flights, label: "Flights", value: 600 }
              - { id: hotels, label: "Hotels", value: 300 }
        allocation:
          child_updates: rollup
    "#,
    );

    let mut output = Vec::new();
    let result = budgetree::run_command_with_output(
        budgetree::AppCommand::Apply {
            actions: vec![
                "travel%=10".to_string(),
                "hotels=abc".to_string(),
                "flights=700".to_string(),
            ],
            json: true,
        },
        Some(config_file.path().to_str().unwrap()),
        &mut output,
    );
    assert!(result.is_ok(), "Apply failed with: {:?}", result.err());

    let snapshot: serde_json::Value =
        serde_json::from_slice(&output).expect("Output is not a JSON snapshot");
    info!(%snapshot, "Snapshot after apply");
    let travel = &snapshot["groups"][0];
    assert_eq!(travel["id"], "travel");
    assert_close(travel["value"].as_f64().unwrap(), 1030.0);
    assert_close(travel["variance"].as_f64().unwrap(), 130.0 / 9.0);
    assert_close(travel["children"][0]["value"].as_f64().unwrap(), 700.0);
    assert_close(travel["children"][1]["value"].as_f64().unwrap(), 330.0);
    assert_close(travel["children"][1]["variance"].as_f64().unwrap(), 10.0);
    assert_close(snapshot["grand_total"].as_f64().unwrap(), 1030.0);
    assert_eq!(snapshot["original_grand_total"], 900.0);
}

#[test_log::test]
fn test_apply_rejects_malformed_action() {
    let config_file = write_config(EXAMPLE_CONFIG);

    let result = budgetree::run_command(
        budgetree::AppCommand::Apply {
            actions: vec!["phones".to_string()],
            json: false,
        },
        Some(config_file.path().to_str().unwrap()),
    );
    assert!(result.is_err());
}

#[test_log::test]
fn test_invalid_config_is_reported() {
    let config_file = write_config(
        r#"
        groups:
          - id: travel
            label: "Travel"
          - id: travel
            label: "Travel again"
    "#,
    );

    let result = budgetree::run_command(
        budgetree::AppCommand::Show { json: true },
        Some(config_file.path().to_str().unwrap()),
    );
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Duplicate row id"));
}

#[test_log::test]
fn test_missing_config_file_is_reported() {
    let result = budgetree::run_command(
        budgetree::AppCommand::Show { json: false },
        Some("/nonexistent/budgetree/config.yaml"),
    );
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
