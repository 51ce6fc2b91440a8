//! Citation marker resolution.
//!
//! Answers reference their sources with bracketed numbers (`[1]`, `[2]`, ...)
//! where `[k]` points at `citations[k - 1]`. Resolution rewrites a marker as
//! the markdown link `[[k]](url)` so the renderer can make it clickable.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;
use std::ops::Range;

/// `[k]` with `k` a positive decimal literal without leading zeros.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([1-9][0-9]*)\]").unwrap());

/// What to do when the same marker shows up more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkPolicy {
    /// Link only the first plain occurrence of each marker.
    #[default]
    FirstOccurrence,
    /// Link every plain occurrence.
    EveryOccurrence,
}

/// A marker token found in an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// The 1-based citation number.
    pub number: usize,
    /// Byte range of `[k]` in the scanned text.
    pub span: Range<usize>,
    /// True when the token is already the label of a markdown link, as in `[[k]](url)`.
    pub linked: bool,
}

impl Marker {
    pub fn citation_index(&self) -> usize {
        self.number - 1
    }
}

/// Scan `answer` once and return every marker token in order of appearance.
pub fn find_markers(answer: &str) -> Vec<Marker> {
    MARKER_RE
        .captures_iter(answer)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps[1].parse::<usize>().ok()?;
            let linked = answer[..whole.start()].ends_with('[')
                && answer[whole.end()..].starts_with("](");
            Some(Marker {
                number,
                span: whole.range(),
                linked,
            })
        })
        .collect()
}

/// Rewrite citation markers in `answer` as markdown links.
///
/// Markers are located in the original text in a single pass, so a URL
/// inserted for one marker is never searched for another. Markers without a
/// matching citation and markers that are already link labels stay as they
/// are. With [`LinkPolicy::FirstOccurrence`] repeated markers after the first
/// are left as plain text, which also means a second pass can link the next
/// occurrence: the function is only idempotent under
/// [`LinkPolicy::EveryOccurrence`].
pub fn resolve(answer: &str, citations: &[String], policy: LinkPolicy) -> String {
    if citations.is_empty() {
        return answer.to_string();
    }

    let mut linked = vec![false; citations.len()];
    let mut out = String::with_capacity(answer.len() + citations.len() * 32);
    let mut cursor = 0;

    for marker in find_markers(answer) {
        if marker.linked {
            continue;
        }
        let Some(url) = citations.get(marker.citation_index()) else {
            continue;
        };
        let seen = &mut linked[marker.citation_index()];
        if *seen && policy == LinkPolicy::FirstOccurrence {
            continue;
        }
        *seen = true;

        out.push_str(&answer[cursor..marker.span.start]);
        let _ = write!(out, "[[{}]]({})", marker.number, url);
        cursor = marker.span.end;
    }

    out.push_str(&answer[cursor..]);
    out
}

/// Splice markers in ascending citation order, one first-match replacement
/// per citation, each search running over the already-modified text.
///
/// This is the behaviour existing clients show, including its sharp edges:
/// a URL containing `[k]`-shaped text can capture a later marker, and running
/// it twice nests links.
pub fn resolve_sequential(answer: &str, citations: &[String]) -> String {
    let mut text = answer.to_string();
    for (i, url) in citations.iter().enumerate() {
        let marker = format!("[{}]", i + 1);
        let link = format!("[{}]({})", marker, url);
        text = text.replacen(&marker, &link, 1);
    }
    text
}

/// 1-based numbers of citations that no marker in `answer` points at.
pub fn unreferenced_citations(answer: &str, citations: &[String]) -> Vec<usize> {
    let mut referenced = vec![false; citations.len()];
    for marker in find_markers(answer) {
        if let Some(slot) = referenced.get_mut(marker.citation_index()) {
            *slot = true;
        }
    }
    referenced
        .iter()
        .enumerate()
        .filter(|(_, hit)| !**hit)
        .map(|(i, _)| i + 1)
        .collect()
}
