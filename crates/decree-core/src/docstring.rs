//! Docstring parsing
//!
//! Docstrings follow the numpy layout:
//!
//! ```text
//! Copy a file.
//!
//! Longer explanation that only shows up in long help.
//!
//! Parameters
//! ----------
//! src
//!     file to read
//! dst : str
//!     file to write
//! ```
//!
//! Everything extracted here is advisory. A missing or malformed docstring
//! degrades to empty help, never to an error.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Header token of the trailing parameter section
pub const PARAMETERS_HEADER: &str = "Parameters";

/// Help text extracted from one docstring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocInfo {
    /// One-paragraph summary
    pub short: Option<String>,
    /// Summary plus extended description
    pub long: Option<String>,
    /// Parameter name to help text
    pub params: BTreeMap<String, String>,
}

impl DocInfo {
    #[must_use]
    pub fn parse(doc: Option<&str>) -> Self {
        Self {
            short: short_description(doc),
            long: long_description(doc),
            params: parameter_docs(doc),
        }
    }
}

/// First paragraph of the docstring, after dropping a trailing `Parameters` paragraph
#[must_use]
pub fn short_description(doc: Option<&str>) -> Option<String> {
    let mut paragraphs = paragraphs(doc?);
    if paragraphs
        .last()
        .is_some_and(|p| p.first().is_some_and(|line| line.starts_with(PARAMETERS_HEADER)))
    {
        paragraphs.pop();
    }
    paragraphs.first().map(|p| p.join(" "))
}

/// Every descriptive paragraph before the first section header
#[must_use]
pub fn long_description(doc: Option<&str>) -> Option<String> {
    let text = paragraphs(doc?)
        .into_iter()
        .take_while(|p| !starts_section(p))
        .map(|p| p.join(" "))
        .collect::<Vec<_>>()
        .join("\n\n");
    (!text.is_empty()).then_some(text)
}

/// Parameter help from the section following the first dash rule
#[must_use]
pub fn parameter_docs(doc: Option<&str>) -> BTreeMap<String, String> {
    let mut docs = BTreeMap::new();
    let Some(doc) = doc else {
        return docs;
    };

    let lines: Vec<&str> = doc.lines().collect();
    let Some(section) = lines.split(|l| is_dash_rule(l)).nth(1) else {
        return docs;
    };

    let mut i = 0;
    while i < section.len() {
        let line = section[i];
        let Some(name) = parameter_name(line) else {
            i += 1;
            continue;
        };
        let name_indent = indentation(line);
        let Some(first) = section
            .get(i + 1)
            .filter(|next| !next.trim().is_empty() && indentation(next) > name_indent)
        else {
            i += 1;
            continue;
        };

        let desc_indent = indentation(first);
        let mut text = vec![first.trim()];
        i += 2;
        while let Some(cont) = section
            .get(i)
            .filter(|l| !l.trim().is_empty() && indentation(l) >= desc_indent)
        {
            text.push(cont.trim());
            i += 1;
        }
        docs.insert(name.to_string(), text.join(" "));
    }
    docs
}

/// Groups of trimmed, non-blank lines separated by blank lines
fn paragraphs(doc: &str) -> Vec<Vec<&str>> {
    let mut out: Vec<Vec<&str>> = Vec::new();
    let mut current = Vec::new();
    for line in doc.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(trimmed);
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn starts_section(paragraph: &[&str]) -> bool {
    paragraph.len() >= 2 && !is_dash_rule(paragraph[0]) && is_dash_rule(paragraph[1])
}

fn is_dash_rule(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '-')
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn parameter_name(line: &str) -> Option<&str> {
    static NAME_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = NAME_RE
        .get_or_init(|| Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?::.*)?$").ok())
        .as_ref()?;
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
