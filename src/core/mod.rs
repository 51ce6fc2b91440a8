pub mod citations;
pub mod engine;
pub mod render;
pub mod session;

pub use crate::domain::model::{QueryRequest, QueryResult};
pub use crate::domain::ports::{AnswerService, ConfigProvider};
pub use crate::utils::error::Result;
