use std::process::Command;

use anyhow::Result;
use tempfile::TempDir;

fn write_config(temp: &TempDir, body: &str) -> Result<std::path::PathBuf> {
    let config_path = temp.path().join("raiox.toml");
    std::fs::write(&config_path, body)?;
    Ok(config_path)
}

#[test]
fn offline_dashboard_prints_synthetic_view() -> Result<()> {
    let temp = TempDir::new()?;
    let config_path = write_config(&temp, "")?;

    let output = Command::new(env!("CARGO_BIN_EXE_raiox"))
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "dashboard",
            "--client",
            "1002",
            "--offline",
        ])
        .output()?;

    assert!(output.status.success(), "Command failed: {output:?}");

    let stdout = String::from_utf8(output.stdout)?;
    let json: serde_json::Value = serde_json::from_str(&stdout)?;

    assert_eq!(json["client"], 1002);
    assert_eq!(json["financial"]["portfolio"]["data_source"], "synthetic");
    assert_eq!(json["financial"]["total_portfolio_value"]["value"], 850000.0);
    assert_eq!(json["goals"]["goals"]["data_source"], "synthetic");
    assert_eq!(json["insights"]["insights"]["data_source"], "synthetic");

    Ok(())
}

#[test]
fn dashboard_can_write_export_file() -> Result<()> {
    let temp = TempDir::new()?;
    let config_path = write_config(&temp, "")?;
    let export_path = temp.path().join("view.json");

    let output = Command::new(env!("CARGO_BIN_EXE_raiox"))
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "dashboard",
            "--client",
            "5",
            "--offline",
            "--output",
            export_path.to_str().unwrap(),
        ])
        .output()?;

    assert!(output.status.success(), "Command failed: {output:?}");
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&export_path)?)?;
    assert_eq!(json["client"], 5);
    Ok(())
}

#[test]
fn invalid_client_id_is_rejected() -> Result<()> {
    let output = Command::new(env!("CARGO_BIN_EXE_raiox"))
        .args(["dashboard", "--client", "abc", "--offline"])
        .output()?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn dividends_command_normalizes_and_dedupes() -> Result<()> {
    let temp = TempDir::new()?;
    let config_path = write_config(&temp, "[dividends]\nmonths_to_consider = 6\n")?;
    let rows_path = temp.path().join("dividends.json");
    std::fs::write(
        &rows_path,
        r#"[
            { "asset": "PETR4", "payment_date": "2024-01-10", "value": "R$ 100,00" },
            { "asset": "PETR4", "payment_date": "2024-01-10", "value": "R$ 100,00" },
            { "ticker": "VALE3", "data_pagamento": "2024-02-15", "valor": 50 },
            { "value": 999 }
        ]"#,
    )?;

    let output = Command::new(env!("CARGO_BIN_EXE_raiox"))
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "dividends",
            "--file",
            rows_path.to_str().unwrap(),
            "--year",
            "2024",
        ])
        .output()?;

    assert!(output.status.success(), "Command failed: {output:?}");
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["total"], 150.0);
    assert_eq!(json["monthly_average"], 75.0);
    assert_eq!(json["annual_total"], 150.0);
    assert_eq!(json["record_count"], 2);
    assert_eq!(json["by_month"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn config_command_prints_resolved_values() -> Result<()> {
    let temp = TempDir::new()?;
    let config_path = write_config(
        &temp,
        "[backend]\nurl = \"https://example.supabase.co\"\n\n[open_finance]\nenabled = true\n",
    )?;

    let output = Command::new(env!("CARGO_BIN_EXE_raiox"))
        .args(["--config", config_path.to_str().unwrap(), "config"])
        .output()?;

    assert!(output.status.success(), "Command failed: {output:?}");
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("https://example.supabase.co"));
    assert!(stdout.contains("SUPABASE_ANON_KEY"));
    assert!(stdout.contains("months_to_consider = 12"));
    Ok(())
}
