#![allow(dead_code)]

use axum::http::{HeaderMap, StatusCode};
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::Serialize;
use std::collections::BTreeMap;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};

pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

pub async fn setup_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
    let db = Database::connect(&db_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Creates a migrated in-memory SQLite database.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn setup_sqlite_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// HTTP response snapshot for testing endpoints.
#[derive(Debug, Serialize)]
pub struct HttpResponseSnapshot {
    test_context: String,
    status: u16,
    headers: BTreeMap<String, String>,
    body: Vec<String>,
}

impl HttpResponseSnapshot {
    pub fn new(body_text: &str, status: StatusCode, headers: &HeaderMap, test_context: &str) -> Self {
        Self {
            test_context: test_context.to_string(),
            status: status.as_u16(),
            headers: filter_variable_headers(headers),
            body: body_text.lines().map(|line| line.to_string()).collect(),
        }
    }
}

/// Snapshot of a JSON API response with the body kept structured.
#[derive(Debug, Serialize)]
pub struct JsonResponseSnapshot {
    test_context: String,
    status: u16,
    headers: BTreeMap<String, String>,
    json_body: serde_json::Value,
}

impl JsonResponseSnapshot {
    pub fn new(body: &[u8], status: StatusCode, headers: &HeaderMap, test_context: &str) -> Self {
        Self {
            test_context: test_context.to_string(),
            status: status.as_u16(),
            headers: filter_variable_headers(headers),
            json_body: serde_json::from_slice(body).unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Filter out variable headers from response headers for snapshot testing.
pub fn filter_variable_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let variable_headers = [
        "date",
        "expires",
        "last-modified",
        "etag",
        "server",
        "x-request-id",
        "x-trace-id",
        "content-length",
        "vary",
    ];

    headers
        .iter()
        .filter_map(|(name, value)| {
            let name_str = name.as_str().to_lowercase();
            if variable_headers.contains(&name_str.as_str()) {
                None
            } else {
                value.to_str().ok().map(|v| (name_str, v.to_string()))
            }
        })
        .collect()
}

/// Reads a response body to a UTF-8 string.
pub async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Reads a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
