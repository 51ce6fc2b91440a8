pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::Settings;

pub use crate::adapters::http::HttpAnswerService;
pub use crate::core::citations::{resolve, resolve_sequential, LinkPolicy};
pub use crate::core::engine::AskEngine;
pub use crate::core::render::{render, OutputFormat, RenderOptions};
pub use crate::core::session::{QueryStatus, Session};
pub use crate::domain::model::{QueryRequest, QueryResult};
pub use crate::utils::error::{MediqueryError, Result};
