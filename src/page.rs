use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::transcript::CaptionSource;

pub const DEFAULT_CONTAINER_CLASS: &str = "captions-text";
pub const DEFAULT_SEGMENT_CLASS: &str = "ytp-caption-segment";

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap()
});

static COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static BR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\b[^>]*>").unwrap());

static CLASS_ATTR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)class\s*=\s*("([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap());

static ENTITY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[xX]?[0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

// Elements that never take a closing tag and must not affect nesting depth.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Structural pattern locating caption segments on the player page: segment
/// elements nested inside a captions container. This mirrors the player UI's
/// markup and is an external contract that can change upstream, so both
/// classes are configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub container_class: String,
    pub segment_class: String,
}

impl Selector {
    pub fn new(container_class: impl Into<String>, segment_class: impl Into<String>) -> Self {
        Self {
            container_class: container_class.into(),
            segment_class: segment_class.into(),
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_CLASS, DEFAULT_SEGMENT_CLASS)
    }
}

/// A player page held as raw HTML. Read-only: extraction never mutates the
/// document.
#[derive(Debug)]
pub struct HtmlPage {
    html: String,
    selector: Selector,
}

impl HtmlPage {
    pub fn new(html: String, selector: Selector) -> Self {
        Self { html, selector }
    }

    pub fn from_path(path: &Path, selector: Selector) -> Result<Self> {
        let html = fs::read_to_string(path)
            .with_context(|| format!("Failed to read page: {}", path.display()))?;
        Ok(Self::new(html, selector))
    }

    pub fn from_reader(mut reader: impl Read, selector: Selector) -> Result<Self> {
        let mut html = String::new();
        reader
            .read_to_string(&mut html)
            .context("Failed to read page from input")?;
        Ok(Self::new(html, selector))
    }
}

impl CaptionSource for HtmlPage {
    fn segments(&self) -> Result<Vec<String>> {
        Ok(extract_segments(&self.html, &self.selector))
    }
}

/// Extract the rendered text of every caption segment in document order.
///
/// A page with no matching container is treated as "no captions", not as an
/// error, but it gets a warning: an empty match set usually means the player
/// UI changed its markup rather than that the video has no captions.
pub fn extract_segments(html: &str, selector: &Selector) -> Vec<String> {
    let html = COMMENT_REGEX.replace_all(html, "");

    let containers = class_blocks(&html, &selector.container_class);
    if containers.is_empty() {
        warn!(
            container_class = %selector.container_class,
            "no caption container matched; caption source may be unavailable"
        );
        return Vec::new();
    }

    let mut segments = Vec::new();
    for container in &containers {
        for inner in class_blocks(container, &selector.segment_class) {
            segments.push(rendered_text(inner));
        }
    }

    debug!(segment_count = segments.len(), "extracted caption segments");
    segments
}

struct Block {
    inner_start: usize,
    inner_end: usize,
    resume: usize,
}

/// Inner markup of every element carrying `class`, in document order.
/// Scanning resumes past each matched block, so nested carriers of the same
/// class are not reported twice.
fn class_blocks<'a>(html: &'a str, class: &str) -> Vec<&'a str> {
    let mut blocks = Vec::new();
    let mut pos = 0;
    while pos < html.len() {
        match find_class_block(&html[pos..], class) {
            Some(block) => {
                blocks.push(&html[pos + block.inner_start..pos + block.inner_end]);
                pos += block.resume;
            }
            None => break,
        }
    }
    blocks
}

/// Locate the first element with `class` and its matching close by tracking
/// the nesting depth of that tag name. Tag and attribute matching is
/// case-insensitive and tolerant of attribute order and quoting style.
fn find_class_block(html: &str, class: &str) -> Option<Block> {
    let mut open: Option<(String, usize)> = None;
    let mut depth = 0usize;

    for caps in TAG_REGEX.captures_iter(html) {
        let whole = caps.get(0).unwrap();
        let closing = !caps[1].is_empty();
        let name = caps[2].to_ascii_lowercase();
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        let self_contained = VOID_ELEMENTS.contains(&name.as_str())
            || attrs.trim_end().ends_with('/');

        match &open {
            None => {
                if !closing && !self_contained && has_class(attrs, class) {
                    open = Some((name, whole.end()));
                    depth = 1;
                }
            }
            Some((open_name, inner_start)) => {
                if name == *open_name && !self_contained {
                    if closing {
                        depth -= 1;
                        if depth == 0 {
                            return Some(Block {
                                inner_start: *inner_start,
                                inner_end: whole.start(),
                                resume: whole.end(),
                            });
                        }
                    } else {
                        depth += 1;
                    }
                }
            }
        }
    }

    // Unclosed element: its content runs to the end of the document.
    open.map(|(_, inner_start)| Block {
        inner_start,
        inner_end: html.len(),
        resume: html.len(),
    })
}

fn has_class(attrs: &str, class: &str) -> bool {
    CLASS_ATTR_REGEX.captures(attrs).is_some_and(|caps| {
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        value.split_whitespace().any(|c| c == class)
    })
}

/// Rendered text of a segment's inner markup: `<br>` becomes a newline, other
/// tags are stripped, entities are decoded, outer whitespace is trimmed.
/// Whitespace inside the text is left exactly as written.
fn rendered_text(markup: &str) -> String {
    let with_breaks = BR_REGEX.replace_all(markup, "\n");
    let stripped = TAG_REGEX.replace_all(&with_breaks, "");
    decode_entities(&stripped).trim().to_string()
}

fn decode_entities(text: &str) -> String {
    ENTITY_REGEX
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            match body {
                "amp" => "&".to_string(),
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                "nbsp" => " ".to_string(),
                _ => {
                    let parsed = if let Some(hex) = body
                        .strip_prefix("#x")
                        .or_else(|| body.strip_prefix("#X"))
                    {
                        u32::from_str_radix(hex, 16).ok()
                    } else if let Some(dec) = body.strip_prefix('#') {
                        dec.parse::<u32>().ok()
                    } else {
                        None
                    };
                    parsed
                        .and_then(char::from_u32)
                        .map(String::from)
                        .unwrap_or_else(|| caps[0].to_string())
                }
            }
        })
        .into_owned()
}
