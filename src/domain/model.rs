use crate::core::citations::{resolve, LinkPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// One answer from the backend. `topic` and `domain_filter` are passed
/// through untouched; `citations[i]` backs the marker `[i+1]` in `answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub domain_filter: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<String>,
}

impl QueryResult {
    pub fn resolved_answer(&self, policy: LinkPolicy) -> String {
        resolve(&self.answer, &self.citations, policy)
    }
}
