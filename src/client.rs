// src/client.rs

//! Grist records client.
//!
//! Talks to a single table:
//! `{base_url}/api/docs/{doc_id}/tables/{table_id}/records`
//!
//! HTTP goes through the [`Transport`] trait so the request/response logic can
//! be exercised without a network.

use crate::config::EnvConfig;
use crate::error::HttpError;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use std::fmt;

/* ---------------- transport ---------------- */

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<JsonValue>,
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Sends one request and returns the raw response, whatever its status.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

impl<T: Transport> Transport for &T {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        (**self).send(request).await
    }
}

/// `reqwest`-backed transport. Uses the client's default timeouts.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .with_context(|| format!("Failed to call Grist {} {}", request.method, request.url))?;

        let status = resp.status();
        let body = resp.text().await.with_context(|| {
            format!(
                "Failed to read Grist response body for {} {}",
                request.method, request.url
            )
        })?;

        Ok(ApiResponse { status, body })
    }
}

/* ---------------- records ---------------- */

/// Opaque Grist row identifier, echoed back verbatim.
///
/// Defaults to JSON `null` when a record comes back without an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub JsonValue);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            JsonValue::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

impl RowId {
    pub fn is_missing(&self) -> bool {
        self.0.is_null()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub id: RowId,

    #[serde(default)]
    pub fields: Map<String, JsonValue>,
}

impl Record {
    /// The remote `component_code`, or `""` when absent or not a string.
    pub fn component_code(&self) -> &str {
        self.fields
            .get("component_code")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
struct RecordsEnvelope<R> {
    records: Option<Vec<R>>,
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    #[serde(default)]
    id: Option<RowId>,
}

/* ---------------- client ---------------- */

pub struct RecordClient<T> {
    transport: T,
    records_url: String,
    api_key: String,
}

impl<T: Transport> RecordClient<T> {
    pub fn new(env: &EnvConfig, transport: T) -> Self {
        let records_url = format!(
            "{}/api/docs/{}/tables/{}/records",
            env.base_url.trim_end_matches('/'),
            env.doc_id,
            env.table_id
        );

        Self {
            transport,
            records_url,
            api_key: env.api_key.clone(),
        }
    }

    pub fn records_url(&self) -> &str {
        &self.records_url
    }

    /// First record whose `template_id` matches, in the order Grist returns.
    ///
    /// Several matches are not an error: a warning is logged and the first wins.
    pub async fn fetch_by_template_id(&self, template_id: &str) -> Result<Option<Record>> {
        let url = Url::parse_with_params(&self.records_url, &[("filter[template_id]", template_id)])
            .with_context(|| format!("Invalid records URL: {}", self.records_url))?;

        let body = self.call(Method::GET, url, None).await?;
        let envelope: RecordsEnvelope<Record> =
            serde_json::from_str(&body).context("Grist GET records returned invalid JSON")?;

        let records = envelope.records.unwrap_or_default();
        if records.len() > 1 {
            tracing::warn!(
                template_id,
                matches = records.len(),
                "multiple records found for template_id, using the first"
            );
        }

        Ok(records.into_iter().next())
    }

    /// Insert a new row. Returns its id when Grist reports one.
    pub async fn create(&self, template_id: &str, code: &str) -> Result<Option<RowId>> {
        let payload = json!({
            "records": [
                { "fields": { "template_id": template_id, "component_code": code } }
            ]
        });

        let body = self
            .call(Method::POST, self.parse_records_url()?, Some(payload))
            .await?;
        let envelope: RecordsEnvelope<CreatedRecord> =
            serde_json::from_str(&body).context("Grist POST records returned invalid JSON")?;

        Ok(envelope
            .records
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|r| r.id))
    }

    /// Overwrite `component_code` of an existing row.
    pub async fn update(&self, row_id: &RowId, code: &str) -> Result<()> {
        let payload = json!({
            "records": [
                { "id": row_id, "fields": { "component_code": code } }
            ]
        });

        self.call(Method::PATCH, self.parse_records_url()?, Some(payload))
            .await?;
        Ok(())
    }

    fn parse_records_url(&self) -> Result<Url> {
        Url::parse(&self.records_url)
            .with_context(|| format!("Invalid records URL: {}", self.records_url))
    }

    fn headers(&self, with_body: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let auth_val = format!("Bearer {}", self.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_val).context("Invalid API key for Authorization header")?,
        );
        if with_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        Ok(headers)
    }

    /// Send a request and return the body of a successful response.
    async fn call(&self, method: Method, url: Url, body: Option<JsonValue>) -> Result<String> {
        tracing::debug!(method = %method, url = %url, "grist request");

        let request = ApiRequest {
            method: method.clone(),
            url: url.clone(),
            headers: self.headers(body.is_some())?,
            body,
        };

        let resp = self.transport.send(request).await?;

        if !resp.status.is_success() {
            return Err(HttpError {
                status: resp.status,
                method,
                url: url.to_string(),
                body: resp.body,
            }
            .into());
        }

        Ok(resp.body)
    }
}
