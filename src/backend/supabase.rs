//! PostgREST client for the hosted Supabase project.
//!
//! Each entity lives in its own table filtered by `account_id`. Rows are
//! decoded one at a time so a single malformed row is skipped instead of
//! failing the whole fetch.

use anyhow::Result;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::config::{BackendConfig, TablesConfig};
use crate::models::{
    ClientId, DataSource, DividendRecord, FinancialGoal, PortfolioSummary, PortfolioValuePoint,
    ProfileSummary,
};

use super::raw::{RawDividendRow, RawGoalRow, RawHistoryRow, RawPortfolioRow, RawProfileRow};
use super::{BackendError, BackendResult, BackendSource};

pub struct SupabaseClient {
    base_url: String,
    api_key: SecretString,
    tables: TablesConfig,
    source: DataSource,
    client: Client,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self::with_client(base_url, api_key, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, api_key: SecretString, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            tables: TablesConfig::default(),
            source: DataSource::Supabase,
            client,
        }
    }

    /// Build a client from config, reading the key from the environment.
    pub fn from_config(config: &BackendConfig) -> Result<Option<Self>> {
        let Some(url) = config.url.as_deref() else {
            return Ok(None);
        };
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Some(
            Self::with_client(url, config.api_key()?, client).with_tables(config.tables.clone()),
        ))
    }

    pub fn with_tables(mut self, tables: TablesConfig) -> Self {
        self.tables = tables;
        self
    }

    /// Tag rows with another real source (e.g. [`DataSource::Xp`]).
    pub fn with_source(mut self, source: DataSource) -> Self {
        self.source = source;
        self
    }

    async fn fetch_rows<R: DeserializeOwned>(
        &self,
        table: &str,
        client: ClientId,
        order: Option<&str>,
        limit: Option<usize>,
    ) -> BackendResult<Vec<R>> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let mut query = vec![
            ("select".to_string(), "*".to_string()),
            ("account_id".to_string(), format!("eq.{client}")),
        ];
        if let Some(order) = order {
            query.push(("order".to_string(), order.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }

        let key = self.api_key.expose_secret();
        let response = self
            .client
            .get(&url)
            .query(&query)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                table: table.to_string(),
                status: status.as_u16(),
            });
        }

        let rows: Vec<serde_json::Value> =
            response.json().await.map_err(|e| BackendError::Decode {
                table: table.to_string(),
                message: e.to_string(),
            })?;

        let total = rows.len();
        let decoded: Vec<R> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(r) => Some(r),
                Err(err) => {
                    tracing::warn!(
                        table,
                        client = %client,
                        error = %err,
                        "Skipping undecodable row"
                    );
                    None
                }
            })
            .collect();
        tracing::debug!(table, client = %client, total, decoded = decoded.len(), "Fetched rows");
        Ok(decoded)
    }
}

fn keep_valid<T>(table: &str, client: ClientId, rows: Vec<Result<T, String>>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match row {
            Ok(value) => Some(value),
            Err(reason) => {
                tracing::warn!(table, client = %client, %reason, "Skipping invalid row");
                None
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl BackendSource for SupabaseClient {
    async fn fetch_portfolio_summary(
        &self,
        client: ClientId,
    ) -> BackendResult<Option<PortfolioSummary>> {
        let rows: Vec<RawPortfolioRow> = self
            .fetch_rows(&self.tables.portfolio_summary, client, None, Some(1))
            .await?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| row.into_summary(self.source)))
    }

    async fn fetch_dividends(&self, client: ClientId) -> BackendResult<Vec<DividendRecord>> {
        let table = &self.tables.dividends;
        let rows: Vec<RawDividendRow> = self
            .fetch_rows(table, client, Some("payment_date.desc"), None)
            .await?;
        let records = rows
            .into_iter()
            .map(|row| row.into_record(self.source))
            .collect();
        Ok(keep_valid(table, client, records))
    }

    async fn fetch_profile_summary(
        &self,
        client: ClientId,
    ) -> BackendResult<Option<ProfileSummary>> {
        let table = &self.tables.profiles;
        let rows: Vec<RawProfileRow> = self.fetch_rows(table, client, None, Some(1)).await?;
        let profiles = rows
            .into_iter()
            .map(|row| row.into_profile(self.source))
            .collect();
        Ok(keep_valid(table, client, profiles).into_iter().next())
    }

    async fn fetch_portfolio_history(
        &self,
        client: ClientId,
    ) -> BackendResult<Vec<PortfolioValuePoint>> {
        let table = &self.tables.portfolio_history;
        let rows: Vec<RawHistoryRow> = self
            .fetch_rows(table, client, Some("date.asc"), None)
            .await?;
        let points = rows.into_iter().map(RawHistoryRow::into_point).collect();
        Ok(keep_valid(table, client, points))
    }

    async fn fetch_goals(&self, client: ClientId) -> BackendResult<Vec<FinancialGoal>> {
        let table = &self.tables.goals;
        let rows: Vec<RawGoalRow> = self.fetch_rows(table, client, None, None).await?;
        let goals = rows
            .into_iter()
            .map(|row| row.into_goal(self.source))
            .collect();
        Ok(keep_valid(table, client, goals))
    }

    fn name(&self) -> &str {
        "supabase"
    }
}
