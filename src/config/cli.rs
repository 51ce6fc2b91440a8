use crate::config::Settings;
use crate::core::citations::LinkPolicy;
use crate::core::render::OutputFormat;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "mediquery")]
#[command(about = "Ask a medical question and read the cited answer")]
pub struct CliConfig {
    /// Question to ask. Without one, an interactive prompt starts.
    pub question: Vec<String>,

    #[arg(long, env = "MEDIQUERY_BACKEND_URL", help = "Base URL of the answer service")]
    pub backend_url: Option<String>,

    #[arg(long, short, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, short, value_enum, help = "Output format")]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Wrap width for terminal output")]
    pub width: Option<usize>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Link every occurrence of a repeated citation marker")]
    pub link_repeated_markers: bool,

    #[arg(long, short, help = "Keep prompting for questions")]
    pub interactive: bool,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn question_text(&self) -> Option<String> {
        let joined = self.question.join(" ");
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }

    /// Merge the config file (if any) with command-line overrides.
    pub fn to_settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_file(path)?,
            None => Settings::default(),
        };

        if let Some(url) = &self.backend_url {
            settings.backend_url = url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(format) = self.format {
            settings.render.format = format;
        }
        if let Some(width) = self.width {
            settings.render.width = width;
        }
        if self.link_repeated_markers {
            settings.render.link_policy = LinkPolicy::EveryOccurrence;
        }
        if self.no_color {
            settings.color = false;
        }
        settings.log_json |= self.log_json;
        settings.verbose |= self.verbose;

        Ok(settings)
    }
}
