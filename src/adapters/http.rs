use crate::domain::model::{QueryRequest, QueryResult};
use crate::domain::ports::{AnswerService, ConfigProvider};
use crate::utils::error::{MediqueryError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Talks to the answer backend over `POST {backend_url}/ask`.
pub struct HttpAnswerService {
    client: Client,
    endpoint: String,
}

impl HttpAnswerService {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: ask_endpoint(config.backend_url()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

pub fn ask_endpoint(backend_url: &str) -> String {
    format!("{}/ask", backend_url.trim_end_matches('/'))
}

fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, request: &QueryRequest) -> Result<QueryResult> {
        tracing::debug!("Posting question to: {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        tracing::debug!("Answer service response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            if let Some(detail) = &detail {
                tracing::debug!("Answer service error detail: {}", detail);
            }
            return Err(MediqueryError::StatusError {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await?;
        let result: QueryResult =
            serde_json::from_str(&body).map_err(|e| MediqueryError::MalformedResponseError {
                message: e.to_string(),
            })?;

        tracing::debug!(
            topic = %result.topic,
            citations = result.citations.len(),
            "Answer received"
        );
        Ok(result)
    }
}
