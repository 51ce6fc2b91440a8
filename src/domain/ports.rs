use crate::domain::model::{QueryRequest, QueryResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn backend_url(&self) -> &str;
    fn timeout(&self) -> Option<Duration>;
}

/// The external service that classifies, searches and answers.
#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn ask(&self, request: &QueryRequest) -> Result<QueryResult>;
}
