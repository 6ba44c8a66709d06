//! Backend-agnostic attendance queries.

use sea_orm::DatabaseConnection;

use crate::client::RestClient;
use crate::config::{AppConfig, SourceKind};
use crate::db;
use crate::error::Result;
use crate::models::{DailySummary, DateRange, Employee, EmployeeRecord, RecordQuery, WeeklySummary};

/// Where attendance rows come from.
///
/// Cheap to clone; both variants share their underlying connection pool.
#[derive(Clone)]
pub enum DataSource {
    Database(DatabaseConnection),
    Rest(RestClient),
}

impl DataSource {
    /// Connect to the backend selected in the configuration.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        match config.source.kind {
            SourceKind::Postgres => {
                let conn = db::connect(&config.database.connection_string()).await?;
                Ok(DataSource::Database(conn))
            }
            SourceKind::Rest => Ok(DataSource::Rest(RestClient::new(&config.api)?)),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            DataSource::Database(_) => SourceKind::Postgres,
            DataSource::Rest(_) => SourceKind::Rest,
        }
    }

    /// Daily summaries within a range, newest first.
    pub async fn daily_summaries(&self, range: DateRange, limit: u64) -> Result<Vec<DailySummary>> {
        match self {
            DataSource::Database(conn) => Ok(db::summary::daily_summaries(conn, range, limit).await?),
            DataSource::Rest(client) => client.daily_summaries(range, limit).await,
        }
    }

    /// Most recent weekly summaries.
    pub async fn weekly_summaries(&self, range: Option<DateRange>, limit: u64) -> Result<Vec<WeeklySummary>> {
        match self {
            DataSource::Database(conn) => Ok(db::summary::weekly_summaries(conn, range, limit).await?),
            DataSource::Rest(client) => client.weekly_summaries(range, limit).await,
        }
    }

    /// Per-employee daily records.
    pub async fn employee_records(&self, query: &RecordQuery) -> Result<Vec<EmployeeRecord>> {
        match self {
            DataSource::Database(conn) => Ok(db::employee::records(conn, query).await?),
            DataSource::Rest(client) => client.records(query).await,
        }
    }

    /// Distinct employees seen in a range.
    pub async fn employees(&self, range: DateRange) -> Result<Vec<Employee>> {
        match self {
            DataSource::Database(conn) => Ok(db::employee::employees(conn, range).await?),
            DataSource::Rest(client) => client.employees(range).await,
        }
    }

    /// Check connectivity and describe the server.
    pub async fn probe(&self) -> Result<String> {
        match self {
            DataSource::Database(conn) => {
                db::test_connection(conn).await?;
                let version = db::get_version(conn).await?;
                if let Ok(counts) = db::get_table_counts(conn).await {
                    tracing::info!(
                        "Tables: {} daily summaries, {} weekly summaries, {} employee records",
                        counts.daily_summaries,
                        counts.weekly_summaries,
                        counts.employee_records
                    );
                }
                Ok(version)
            }
            DataSource::Rest(client) => client.probe().await,
        }
    }
}

/// Connect and require a successful probe.
///
/// Building a REST client never touches the network, so the probe is what
/// proves the source is reachable.
pub async fn connect_verified(config: &AppConfig) -> Result<(DataSource, String)> {
    let source = DataSource::connect(config).await?;
    let server = source.probe().await?;
    Ok((source, server))
}

/// Connect and probe in one step, for connection tests.
pub async fn test_config(config: &AppConfig) -> Result<String> {
    connect_verified(config).await.map(|(_, server)| server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn unreachable_rest_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.source.kind = SourceKind::Rest;
        // Discard port on loopback, nothing listens there
        config.api.url = "http://127.0.0.1:9".to_string();
        config.api.anon_key = "key".to_string();
        config.api.timeout_secs = 5;
        config
    }

    #[tokio::test]
    async fn test_rest_connect_succeeds_without_network() {
        let source = DataSource::connect(&unreachable_rest_config()).await.unwrap();
        assert_eq!(source.kind(), SourceKind::Rest);
    }

    #[tokio::test]
    async fn test_unreachable_rest_source_fails_verification() {
        let result = connect_verified(&unreachable_rest_config()).await;
        assert!(matches!(result, Err(AppError::Http(_))));
    }
}
