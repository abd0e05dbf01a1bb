//! The pipeline client itself.

use crate::wire::{Pipeline, PipelineResponse, ResultEntry, Stmt};
use crate::{Arg, Error, Result, ResultSet, Row};
use serde::Deserialize;
use tracing::debug;

/// Connection settings for the remote database.
///
/// Constructed explicitly by the caller (typically from the config file) —
/// there are no hidden environment lookups inside the client.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// Endpoint URL as configured, usually with the `libsql://` scheme.
    pub url: String,
    /// Bearer token for the pipeline API.
    pub auth_token: String,
}

/// Client for the remote SQL-over-HTTP endpoint.
///
/// Each call opens and closes its own pipeline; there is no shared session,
/// so a `Database` can be cloned and used from concurrent tasks.
#[derive(Debug, Clone)]
pub struct Database {
    client: reqwest::Client,
    config: DbConfig,
}

impl Database {
    /// Create a client, failing fast if the endpoint or credential is missing.
    pub fn new(config: DbConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(Error::NotConfigured("database url"));
        }
        if config.auth_token.is_empty() {
            return Err(Error::NotConfigured("database auth token"));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            config,
        })
    }

    /// The pipeline URL for this request.
    ///
    /// The configured value keeps its raw `libsql://` scheme; the rewrite to
    /// `https://` happens here, on every call.
    fn endpoint(&self) -> String {
        match self.config.url.strip_prefix("libsql://") {
            Some(rest) => format!("https://{rest}/v2/pipeline"),
            None => format!("{}/v2/pipeline", self.config.url),
        }
    }

    /// Execute one statement and return the decoded result set.
    pub async fn execute(&self, sql: &str, args: &[Arg]) -> Result<ResultSet> {
        let payload = Pipeline::single(Stmt::new(sql, args));
        debug!(sql, "pipeline round trip");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.auth_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote(format!("{status}: {body}")));
        }

        let body: PipelineResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        Self::decode(body)
    }

    /// Decode the first pipeline result.
    ///
    /// A response with no discriminant at all decodes to an empty result set
    /// rather than an error, so read paths treat "malformed empty" the same
    /// as "no data".
    fn decode(body: PipelineResponse) -> Result<ResultSet> {
        match body.results.into_iter().next() {
            Some(ResultEntry::Ok { response }) => Ok(response
                .and_then(|r| r.result)
                .map(ResultSet::from_wire)
                .unwrap_or_default()),
            Some(ResultEntry::Error { error }) => Err(Error::Remote(error.message)),
            Some(ResultEntry::Unknown) | None => Ok(ResultSet::default()),
        }
    }

    /// Execute and project every row into a name-to-value mapping.
    pub async fn fetch_all(&self, sql: &str, args: &[Arg]) -> Result<Vec<Row>> {
        Ok(self.execute(sql, args).await?.into_rows())
    }

    /// Execute and return the first row, if any.
    pub async fn fetch_one(&self, sql: &str, args: &[Arg]) -> Result<Option<Row>> {
        Ok(self.fetch_all(sql, args).await?.into_iter().next())
    }

    /// Execute a write and return the affected-row count (0 when absent).
    pub async fn execute_write(&self, sql: &str, args: &[Arg]) -> Result<u64> {
        Ok(self.execute(sql, args).await?.affected_row_count())
    }
}
