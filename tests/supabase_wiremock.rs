use anyhow::Result;
use raiox::backend::{BackendError, BackendSource, SupabaseClient};
use raiox::config::BackendConfig;
use raiox::models::{ClientId, DataSource, GoalCategory, Priority};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(server.uri(), SecretString::from("anon-key".to_string()))
}

#[tokio::test]
async fn portfolio_summary_parses_brazilian_formatted_values() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/portfolio_summary"))
        .and(query_param("account_id", "eq.1002"))
        .and(query_param("select", "*"))
        .and(header("apikey", "anon-key"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "account_id": 1002,
            "renda_fixa": "R$ 60.000,00",
            "acoes": 30000,
            "fundos": "5000",
            "fiis": null,
            "internacional": "R$ 5.000,00"
        }])))
        .mount(&server)
        .await;

    let summary = client_for(&server)
        .fetch_portfolio_summary(ClientId::new(1002))
        .await?
        .expect("summary row");

    assert_eq!(summary.source, DataSource::Supabase);
    assert_eq!(summary.fixed_income.value, 60_000.0);
    assert_eq!(summary.real_estate.value, 0.0);
    assert_eq!(summary.total_portfolio_value, 100_000.0);
    assert_eq!(summary.fixed_income.percentage, 60.0);
    Ok(())
}

#[tokio::test]
async fn dividends_skip_rows_without_asset() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/dividends"))
        .and(query_param("order", "payment_date.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "ticker": "PETR4",
                "data_pagamento": "2024-01-10",
                "valor": "R$ 100,00",
                "tipo": "JCP"
            },
            { "asset": "VALE3", "payment_date": "2024-02-15T00:00:00", "value": 50 },
            { "payment_date": "2024-02-20", "value": 10 },
            { "asset": "ITSA4", "payment_date": "not-a-date", "value": "abc" }
        ])))
        .mount(&server)
        .await;

    let records = client_for(&server)
        .fetch_dividends(ClientId::new(7))
        .await?;

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].asset, "PETR4");
    assert_eq!(records[0].value, 100.0);
    assert_eq!(records[0].kind, "JCP");
    assert_eq!(records[1].kind, "Dividend");
    assert_eq!(records[2].payment_date, "not-a-date");
    assert_eq!(records[2].value, 0.0);
    assert!(records.iter().all(|r| r.source == DataSource::Supabase));
    Ok(())
}

#[tokio::test]
async fn goals_without_deadline_are_skipped() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/financial_goals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 3,
                "name": "Reserva de emergência",
                "target_amount": "30.000,00",
                "current_amount": 15000,
                "deadline": "2025-12-31",
                "priority": "alta",
                "category": "emergency",
                "monthly_contribution": 1000,
                "achievable": true,
                "required_return": "4,5"
            },
            { "name": "Sem prazo", "target_amount": 100 }
        ])))
        .mount(&server)
        .await;

    let goals = client_for(&server).fetch_goals(ClientId::new(7)).await?;
    assert_eq!(goals.len(), 1);
    let goal = &goals[0];
    assert_eq!(goal.id, "3");
    assert_eq!(goal.target_amount, 30_000.0);
    assert_eq!(goal.priority, Priority::High);
    assert_eq!(goal.category, GoalCategory::Emergency);
    assert_eq!(goal.required_return, 4.5);
    assert_eq!(goal.progress(), 50.0);
    Ok(())
}

#[tokio::test]
async fn error_status_is_reported_with_table() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/portfolio_history"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_portfolio_history(ClientId::new(7))
        .await
        .unwrap_err();
    match err {
        BackendError::Status { table, status } => {
            assert_eq!(table, "portfolio_history");
            assert_eq!(status, 401);
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn empty_table_means_no_profile() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/client_profiles"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let profile = client_for(&server)
        .fetch_profile_summary(ClientId::new(7))
        .await?;
    assert!(profile.is_none());
    Ok(())
}

#[test]
fn from_config_without_url_is_none() -> Result<()> {
    let config = BackendConfig::default();
    assert!(SupabaseClient::from_config(&config)?.is_none());
    Ok(())
}
