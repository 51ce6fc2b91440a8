//! Turn a resolved answer into something a person can read.

use crate::core::citations::{unreferenced_citations, LinkPolicy};
use crate::domain::model::QueryResult;
use crate::utils::error::{MediqueryError, Result};
use colored::Colorize;
use comrak::{markdown_to_html, Options};
use serde::{Deserialize, Serialize};
use url::Url;

const SECURE_ANCHOR: &str = r#"<a target="_blank" rel="noopener noreferrer" href=""#;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Html,
    Markdown,
    Json,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub width: usize,
    pub link_policy: LinkPolicy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Terminal,
            width: 100,
            link_policy: LinkPolicy::FirstOccurrence,
        }
    }
}

/// The two visible parts of an answer: the cited body and the source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAnswer {
    pub body: String,
    pub sources: String,
}

#[derive(Serialize)]
struct JsonView<'a> {
    #[serde(flatten)]
    result: &'a QueryResult,
    resolved_answer: String,
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render GFM markdown to HTML. Raw HTML in the input is dropped and every
/// link opens in a new context without a referrer or an opener handle.
pub fn render_html(markdown: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.render.unsafe_ = false;

    markdown_to_html(markdown, &options).replace(r#"<a href=""#, SECURE_ANCHOR)
}

fn is_web_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Ordered list of every citation, referenced or not. Only http(s) URLs
/// become links; anything else is shown as text.
pub fn render_sources_html(citations: &[String]) -> String {
    if citations.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ol class=\"sources\">\n");
    for citation in citations {
        let text = escape_html(citation);
        if is_web_url(citation) {
            html.push_str(&format!("<li>{}{}\">{}</a></li>\n", SECURE_ANCHOR, text, text));
        } else {
            tracing::debug!("Citation is not a web URL, rendering as text: {}", citation);
            html.push_str(&format!("<li>{}</li>\n", text));
        }
    }
    html.push_str("</ol>\n");
    html
}

/// Wrapped plain text; link targets are kept as numbered references.
pub fn render_terminal(markdown: &str, width: usize) -> Result<String> {
    let html = render_html(markdown);
    html2text::from_read(html.as_bytes(), width).map_err(|e| MediqueryError::RenderError {
        message: e.to_string(),
    })
}

pub fn render_sources_terminal(answer: &str, citations: &[String]) -> String {
    let uncited = unreferenced_citations(answer, citations);
    citations
        .iter()
        .enumerate()
        .map(|(i, url)| {
            if uncited.contains(&(i + 1)) {
                format!("{:>3}. {} {}\n", i + 1, url, "(not cited in answer)".dimmed())
            } else {
                format!("{:>3}. {}\n", i + 1, url)
            }
        })
        .collect()
}

pub fn render_sources_markdown(citations: &[String]) -> String {
    citations
        .iter()
        .enumerate()
        .map(|(i, url)| format!("{}. <{}>\n", i + 1, url))
        .collect()
}

/// Resolve the result's markers and render body and sources separately.
pub fn render_parts(result: &QueryResult, options: &RenderOptions) -> Result<RenderedAnswer> {
    let resolved = result.resolved_answer(options.link_policy);
    let parts = match options.format {
        OutputFormat::Terminal => RenderedAnswer {
            body: render_terminal(&resolved, options.width)?,
            sources: render_sources_terminal(&result.answer, &result.citations),
        },
        OutputFormat::Html => RenderedAnswer {
            body: render_html(&resolved),
            sources: render_sources_html(&result.citations),
        },
        OutputFormat::Markdown | OutputFormat::Json => RenderedAnswer {
            body: resolved,
            sources: render_sources_markdown(&result.citations),
        },
    };
    Ok(parts)
}

/// Full output for one settled result in the requested format.
pub fn render(result: &QueryResult, options: &RenderOptions) -> Result<String> {
    let parts = render_parts(result, options)?;
    let mut out = String::new();

    match options.format {
        OutputFormat::Terminal => {
            if !result.topic.is_empty() {
                out.push_str(&format!("{} {}", "Topic:".cyan().bold(), result.topic));
                if !result.domain_filter.is_empty() {
                    out.push_str(&format!(" ({})", result.domain_filter.join(", ")));
                }
                out.push_str("\n\n");
            }
            out.push_str(parts.body.trim_end());
            out.push('\n');
            if !parts.sources.is_empty() {
                out.push_str(&format!("\n{}\n", "Sources".cyan().bold()));
                out.push_str(&parts.sources);
            }
        }
        OutputFormat::Html => {
            out.push_str("<article class=\"answer\">\n");
            if !result.topic.is_empty() {
                out.push_str(&format!(
                    "<header><span class=\"topic\">{}</span></header>\n",
                    escape_html(&result.topic)
                ));
            }
            out.push_str(&parts.body);
            if !parts.sources.is_empty() {
                out.push_str("<section>\n<h2>Sources</h2>\n");
                out.push_str(&parts.sources);
                out.push_str("</section>\n");
            }
            out.push_str("</article>\n");
        }
        OutputFormat::Markdown => {
            out.push_str(parts.body.trim_end());
            out.push('\n');
            if !parts.sources.is_empty() {
                out.push_str("\n## Sources\n\n");
                out.push_str(&parts.sources);
            }
        }
        OutputFormat::Json => {
            let view = JsonView {
                result,
                resolved_answer: parts.body,
            };
            out = serde_json::to_string_pretty(&view)?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryResult {
        QueryResult {
            topic: "drug_info".to_string(),
            domain_filter: vec!["drugs.com".to_string(), "rxlist.com".to_string()],
            answer: "## Dosage\n\nUse ibuprofen cautiously [1].\n\n- adults\n- children\n"
                .to_string(),
            citations: vec![
                "https://drugs.com/ibuprofen".to_string(),
                "https://rxlist.com/advil".to_string(),
            ],
        }
    }

    fn options(format: OutputFormat) -> RenderOptions {
        RenderOptions {
            format,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_html_links_are_secure() {
        let html = render_html("See [[1]](https://a.com).");
        assert!(html.contains(
            r#"<a target="_blank" rel="noopener noreferrer" href="https://a.com">[1]</a>"#
        ));
        assert!(!html.contains(r#"<a href="#));
    }

    #[test]
    fn test_html_supports_headings_lists_and_tables() {
        let markdown = "# Title\n\n1. one\n2. two\n\n- a\n- b\n\n| Drug | Dose |\n|---|---|\n| ibuprofen | 200mg |\n";
        let html = render_html(markdown);
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<ol>"));
        assert!(html.contains("<ul>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>ibuprofen</td>"));
    }

    #[test]
    fn test_raw_html_is_not_passed_through() {
        let html = render_html("Hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_sources_html_lists_every_citation_escaped() {
        let citations = vec![
            "https://a.com/?q=1&r=2".to_string(),
            "https://b.com".to_string(),
        ];
        let html = render_sources_html(&citations);
        assert_eq!(html.matches("<li>").count(), 2);
        assert!(html.contains("https://a.com/?q=1&amp;r=2"));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(render_sources_html(&[]).is_empty());
    }

    #[test]
    fn test_sources_html_only_links_web_urls() {
        let citations = vec![
            "javascript:alert(1)".to_string(),
            "data:text/html,<b>x</b>".to_string(),
            "https://cdc.gov/flu".to_string(),
        ];
        let html = render_sources_html(&citations);

        assert!(!html.contains(r#"href="javascript:"#));
        assert!(!html.contains(r#"href="data:"#));
        assert!(html.contains("<li>javascript:alert(1)</li>"));
        assert!(html.contains("<li>data:text/html,&lt;b&gt;x&lt;/b&gt;</li>"));
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains(r#"href="https://cdc.gov/flu""#));
    }

    #[test]
    fn test_body_drops_script_link_targets() {
        let html = render_html("[[1]](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_narrow_width_render_failure_is_a_value() {
        let mut nested = String::new();
        for depth in 0..11 {
            nested.push_str(&"  ".repeat(depth));
            nested.push_str("- level\n");
        }

        let err = render_terminal(&nested, 20).unwrap_err();
        assert!(matches!(err, MediqueryError::RenderError { .. }));
        assert!(!err.user_friendly_message().is_empty());
        assert!(render_terminal(&nested, 100).is_ok());

        let result = QueryResult {
            topic: "symptoms".to_string(),
            domain_filter: vec![],
            answer: nested,
            citations: vec![],
        };
        let narrow = RenderOptions {
            width: 20,
            ..RenderOptions::default()
        };
        assert!(render(&result, &narrow).is_err());
    }

    #[test]
    fn test_parts_include_unreferenced_sources() {
        let parts = render_parts(&sample(), &options(OutputFormat::Markdown)).unwrap();
        assert!(parts.body.contains("[[1]](https://drugs.com/ibuprofen)"));
        assert_eq!(
            parts.sources,
            "1. <https://drugs.com/ibuprofen>\n2. <https://rxlist.com/advil>\n"
        );
    }

    #[test]
    fn test_terminal_output_keeps_text_and_urls() {
        let out = render(&sample(), &options(OutputFormat::Terminal)).unwrap();
        assert!(out.contains("drug_info"));
        assert!(out.contains("Use ibuprofen cautiously"));
        assert!(out.contains("Sources"));
        assert!(out.contains("https://rxlist.com/advil"));
        assert!(out.contains("not cited in answer"));
    }

    #[test]
    fn test_html_document_has_topic_body_and_sources() {
        let out = render(&sample(), &options(OutputFormat::Html)).unwrap();
        assert!(out.starts_with("<article class=\"answer\">"));
        assert!(out.contains("<span class=\"topic\">drug_info</span>"));
        assert!(out.contains("<h2>Dosage</h2>"));
        assert!(out.contains("<h2>Sources</h2>"));
    }

    #[test]
    fn test_json_output_carries_resolved_answer() {
        let out = render(&sample(), &options(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["topic"], "drug_info");
        assert_eq!(value["citations"].as_array().unwrap().len(), 2);
        assert!(value["resolved_answer"]
            .as_str()
            .unwrap()
            .contains("[[1]](https://drugs.com/ibuprofen)"));
    }

    #[test]
    fn test_answer_without_citations_renders_without_sources() {
        let result = QueryResult {
            topic: String::new(),
            domain_filter: vec![],
            answer: "No sources here.".to_string(),
            citations: vec![],
        };
        let out = render(&result, &options(OutputFormat::Markdown)).unwrap();
        assert_eq!(out, "No sources here.\n");
    }
}
