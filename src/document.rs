/*!
 * Lightweight document parsing for directory ingestion
 *
 * Reads an optional `---` front matter block of `key: value` lines, collects
 * ATX headings into a tree and estimates reading time. Failures are returned
 * as data so that one bad document never aborts a directory walk.
 */

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use strum::Display;

/// Words read per minute for the reading time estimate
pub const WORDS_PER_MINUTE: usize = 200;

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#{1,6})[ \t]+(.+?)[ \t#]*$").expect("heading pattern is valid")
});

static FRONT_MATTER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_-]*)[ \t]*:[ \t]*(.*)$")
        .expect("front matter pattern is valid")
});

/// A heading and the headings nested below it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingNode {
    pub level: u8,
    pub id: String,
    pub text: String,
    pub children: Vec<HeadingNode>,
}

/// A successfully parsed document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub front_matter: BTreeMap<String, String>,
    /// `title` from the front matter, else the first level-one heading
    pub title: Option<String>,
    pub headings: Vec<HeadingNode>,
    pub lines: usize,
    pub words: usize,
    pub reading_minutes: usize,
}

/// Kind of document failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum DocumentErrorKind {
    #[strum(to_string = "unterminated front matter")]
    UnterminatedFrontMatter,
    #[strum(to_string = "malformed front matter")]
    MalformedFrontMatter,
}

/// Why a document could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentError {
    pub kind: DocumentErrorKind,
    /// 1-based line of the offending input
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}: {}", self.kind, self.line, self.message)
    }
}

impl std::error::Error for DocumentError {}

/// Parse outcome stored as file map data
pub type DocumentParseResult = Result<Document, DocumentError>;

/// Parse a document's source text
pub fn parse_document(source: &str) -> DocumentParseResult {
    let lines: Vec<&str> = source.lines().collect();
    let (front_matter, body_start) = parse_front_matter(&lines)?;

    let mut flat_headings = Vec::new();
    let mut in_fence = false;
    let mut words = 0;
    for line in &lines[body_start..] {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        words += line
            .split_whitespace()
            .filter(|w| w.chars().any(char::is_alphanumeric))
            .count();
        if in_fence {
            continue;
        }
        if let Some(caps) = HEADING.captures(line) {
            let level = caps[1].len() as u8;
            let text = caps[2].trim().to_string();
            flat_headings.push((level, text));
        }
    }

    let title = front_matter.get("title").cloned().or_else(|| {
        flat_headings
            .iter()
            .find(|(level, _)| *level == 1)
            .map(|(_, text)| text.clone())
    });

    Ok(Document {
        front_matter,
        title,
        headings: nest_headings(flat_headings),
        lines: lines.len(),
        words,
        reading_minutes: words.div_ceil(WORDS_PER_MINUTE),
    })
}

/// Front matter pairs and the index of the first body line
fn parse_front_matter(
    lines: &[&str],
) -> Result<(BTreeMap<String, String>, usize), DocumentError> {
    let mut front_matter = BTreeMap::new();
    if lines.first().map(|l| l.trim_end()) != Some("---") {
        return Ok((front_matter, 0));
    }

    for (offset, line) in lines.iter().enumerate().skip(1) {
        if line.trim_end() == "---" {
            return Ok((front_matter, offset + 1));
        }
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let caps = FRONT_MATTER_LINE.captures(line).ok_or_else(|| DocumentError {
            kind: DocumentErrorKind::MalformedFrontMatter,
            line: offset + 1,
            message: format!("expected 'key: value', found '{}'", line.trim()),
        })?;
        let value = caps[2].trim().trim_matches('"').to_string();
        front_matter.insert(caps[1].to_string(), value);
    }

    Err(DocumentError {
        kind: DocumentErrorKind::UnterminatedFrontMatter,
        line: 1,
        message: "front matter opened with '---' is never closed".to_string(),
    })
}

/// Build the heading tree; a heading nests under the closest shallower one
fn nest_headings(flat: Vec<(u8, String)>) -> Vec<HeadingNode> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut roots: Vec<HeadingNode> = Vec::new();
    // Open headings from shallow to deep; each is attached to its parent when closed
    let mut stack: Vec<HeadingNode> = Vec::new();

    for (level, text) in flat {
        let mut id = slug::slugify(&text);
        let count = seen.entry(id.clone()).or_insert(0);
        if *count > 0 {
            id = format!("{}-{}", id, count);
        }
        *count += 1;

        while stack.last().is_some_and(|open| open.level >= level) {
            close_heading(&mut stack, &mut roots);
        }
        stack.push(HeadingNode {
            level,
            id,
            text,
            children: Vec::new(),
        });
    }
    while !stack.is_empty() {
        close_heading(&mut stack, &mut roots);
    }
    roots
}

fn close_heading(stack: &mut Vec<HeadingNode>, roots: &mut Vec<HeadingNode>) {
    if let Some(node) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}
