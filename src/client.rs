//! PostgREST HTTP client for hosted attendance tables.

use crate::aggregate::unique_employees;
use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::{DailySummary, DateRange, Employee, EmployeeRecord, RecordQuery, WeeklySummary};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::time::Duration;

const DAILY_TABLE: &str = "daily_summary";
const WEEKLY_TABLE: &str = "weekly_summary";
const RECORD_TABLE: &str = "employee_attendance";

/// A `GET /{table}` request expressed as PostgREST query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: &'static str,
    params: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<u64>,
}

impl TableQuery {
    /// Select every column of a table.
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            params: vec![("select".to_string(), "*".to_string())],
            order: Vec::new(),
            limit: None,
        }
    }

    /// Replace the selected column list.
    pub fn select(mut self, columns: &str) -> Self {
        self.params[0].1 = columns.to_string();
        self
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    fn filter(mut self, column: &str, op: &str, value: impl Display) -> Self {
        self.params.push((column.to_string(), format!("{op}.{value}")));
        self
    }

    /// Inclusive date window on one column.
    pub fn between(self, column: &str, range: DateRange) -> Self {
        self.gte(column, range.start).lte(column, range.end)
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order.push(format!("{column}.desc"));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order.push(format!("{column}.asc"));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    /// Query string pairs for a single unpaged request.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = self.params.clone();
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.push_order(&mut params);
        params
    }

    /// Query string pairs for one page of `size` rows starting at `offset`.
    pub fn page_params(&self, offset: u64, size: u64) -> Vec<(String, String)> {
        let mut params = self.params.clone();
        params.push(("limit".to_string(), size.to_string()));
        params.push(("offset".to_string(), offset.to_string()));
        self.push_order(&mut params);
        params
    }

    /// Rows to ask for in the next page, or `None` once the overall limit is reached.
    pub fn next_page_size(&self, fetched: u64, page_size: u64) -> Option<u64> {
        let size = match self.limit {
            Some(limit) => limit.saturating_sub(fetched).min(page_size),
            None => page_size,
        };
        (size > 0).then_some(size)
    }

    fn push_order(&self, params: &mut Vec<(String, String)>) {
        if !self.order.is_empty() {
            params.push(("order".to_string(), self.order.join(",")));
        }
    }
}

/// Daily summaries in a range, newest first.
pub fn daily_query(range: DateRange, limit: u64) -> TableQuery {
    TableQuery::new(DAILY_TABLE)
        .between("date", range)
        .order_desc("date")
        .limit(limit)
}

/// Most recent weekly summaries.
pub fn weekly_query(range: Option<DateRange>, limit: u64) -> TableQuery {
    let query = TableQuery::new(WEEKLY_TABLE);
    let query = match range {
        Some(range) => query.between("week_start", range),
        None => query,
    };
    query.order_desc("week_start").limit(limit)
}

/// Employee records, newest first then by code.
///
/// The order covers the whole primary key so pages never overlap.
pub fn record_query(query: &RecordQuery) -> TableQuery {
    let table = TableQuery::new(RECORD_TABLE).between("date", query.range);
    let table = match &query.emp_code {
        Some(code) => table.eq("emp_code", code),
        None => table,
    };
    table.order_desc("date").order_asc("emp_code")
}

/// Pull the `message` field out of a PostgREST error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Client for a PostgREST gateway.
///
/// Sends the project key both as `apikey` and as bearer token, which is what
/// hosted gateways expect for anonymous reads. Reads are paged so the
/// gateway's `max-rows` cap never truncates a result.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
    schema: String,
    page_size: u64,
}

impl RestClient {
    /// Create a new client instance.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.rest_url(),
            api_key: config.anon_key.clone(),
            schema: config.schema.clone(),
            page_size: config.page_size.max(1),
        })
    }

    /// Run a table query page by page until a short page comes back.
    pub async fn fetch<T: DeserializeOwned>(&self, query: &TableQuery) -> Result<Vec<T>> {
        let mut rows = Vec::new();

        while let Some(size) = query.next_page_size(rows.len() as u64, self.page_size) {
            let page: Vec<T> = self.get(query.table(), &query.page_params(rows.len() as u64, size)).await?;
            let short = (page.len() as u64) < size;
            rows.extend(page);
            if short {
                break;
            }
        }

        tracing::debug!("Fetched {} rows from {}", rows.len(), query.table());
        Ok(rows)
    }

    /// Single GET of a table, decoding the JSON array response.
    async fn get<T: DeserializeOwned>(&self, table: &str, params: &[(String, String)]) -> Result<Vec<T>> {
        let url = format!("{base}/{table}", base = self.base_url);

        let mut request = self
            .client
            .get(&url)
            .query(params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key);

        if self.schema != "public" {
            request = request.header("Accept-Profile", &self.schema);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("GET {} failed with {}", url, status);
            return Err(AppError::api(status.as_u16(), error_message(&body)));
        }

        parse_rows(&body)
    }

    pub async fn daily_summaries(&self, range: DateRange, limit: u64) -> Result<Vec<DailySummary>> {
        self.fetch(&daily_query(range, limit)).await
    }

    pub async fn weekly_summaries(&self, range: Option<DateRange>, limit: u64) -> Result<Vec<WeeklySummary>> {
        self.fetch(&weekly_query(range, limit)).await
    }

    pub async fn records(&self, query: &RecordQuery) -> Result<Vec<EmployeeRecord>> {
        self.fetch(&record_query(query)).await
    }

    /// Distinct employees seen in a date range.
    pub async fn employees(&self, range: DateRange) -> Result<Vec<Employee>> {
        let rows = self.records(&RecordQuery::range(range)).await?;
        Ok(unique_employees(&rows))
    }

    /// Check the gateway answers an authenticated query.
    pub async fn probe(&self) -> Result<String> {
        let query = TableQuery::new(DAILY_TABLE).select("date").limit(1);
        self.get::<serde_json::Value>(query.table(), &query.params()).await?;
        Ok(format!("PostgREST at {}", self.base_url))
    }
}

/// Decode a JSON array of rows.
fn parse_rows<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    serde_json::from_str(body).map_err(|e| AppError::parse(format!("Unexpected response body: {e}")))
}
