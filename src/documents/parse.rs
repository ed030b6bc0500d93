//! Attribute-block parsing and document assembly.
//!
//! A workspace document is a leading key-value attribute block delimited by
//! `---` marker lines, followed by a free-text markdown body. Documents
//! without an opening marker are all body. The recognized attributes (`id`,
//! `title`, `owner`, `status`) are lifted into [`Document`] fields; everything
//! else passes through opaquely in the attribute map.

use chrono::Utc;
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

use crate::documents::types::{Document, EntityType};

/// Marker line delimiting the attribute block on both sides.
pub const ATTRIBUTE_MARKER: &str = "---";

/// Errors from splitting or decoding the attribute block.
///
/// These are the recoverable per-document failures: bulk passes log them and
/// move on, leaving any previously indexed state for the path in place.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("attribute block opened with '{ATTRIBUTE_MARKER}' but never closed")]
    UnterminatedAttributes,

    #[error("malformed attribute block: {0}")]
    Attributes(#[from] serde_yaml::Error),
}

/// A document source split into its attribute block and free-text body.
#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    /// Decoded attribute block. Empty when the document has none.
    pub attributes: Map<String, Value>,

    /// Everything after the closing marker line, or the whole content when
    /// there is no attribute block.
    pub body: String,
}

impl ParsedSource {
    /// String-valued attribute, if present with a string value.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// First `# ` heading in the body, trimmed. The marker must sit at
    /// column zero; indented headings do not count.
    pub fn first_heading(&self) -> Option<&str> {
        self.body
            .lines()
            .find_map(|line| line.strip_prefix("# "))
            .map(str::trim)
    }
}

/// Split `content` into attribute block and body.
///
/// Content that does not open with a marker line has no attributes and is
/// returned whole as the body. An opening marker without a closing one is an
/// error rather than a guess at where the block ends.
pub fn parse_source(content: &str) -> Result<ParsedSource, ParseError> {
    let Some(rest) = strip_opening_marker(content) else {
        return Ok(ParsedSource {
            attributes: Map::new(),
            body: content.to_string(),
        });
    };

    let mut block_len = None;
    let mut body_start = 0;
    for line in rest.split_inclusive('\n') {
        if is_marker_line(line) {
            block_len = Some(body_start);
            body_start += line.len();
            break;
        }
        body_start += line.len();
    }
    let Some(block_len) = block_len else {
        return Err(ParseError::UnterminatedAttributes);
    };

    Ok(ParsedSource {
        attributes: decode_attribute_block(&rest[..block_len])?,
        body: rest[body_start..].to_string(),
    })
}

/// Assemble a [`Document`] from a path's current content.
///
/// Derivation rules: id is the `id` attribute when non-empty, else
/// `{type}:{filename-stem}`; title is the `title` attribute, else the first
/// `# ` heading, else the stem. Both timestamps are set to now; the indexer
/// carries the first-index timestamp forward when the path was seen before.
pub fn compose_document(path: &Path, root: &Path, content: String) -> Result<Document, ParseError> {
    let parsed = parse_source(&content)?;
    let entity_type = EntityType::classify(path, root);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let id = parsed
        .attribute_str("id")
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}:{stem}", entity_type.as_str()));

    let title = parsed
        .attribute_str("title")
        .filter(|value| !value.is_empty())
        .or_else(|| parsed.first_heading().filter(|h| !h.is_empty()))
        .unwrap_or(stem)
        .to_string();

    let owner = parsed.attribute_str("owner").map(str::to_string);
    let status = parsed.attribute_str("status").map(str::to_string);

    let now = Utc::now();
    Ok(Document {
        id,
        path: path.to_path_buf(),
        entity_type,
        title,
        owner,
        status,
        content,
        attributes: parsed.attributes,
        indexed_at: now,
        updated_at: now,
    })
}

fn is_marker_line(line: &str) -> bool {
    line.trim_end() == ATTRIBUTE_MARKER
}

fn strip_opening_marker(content: &str) -> Option<&str> {
    let first_line_end = content.find('\n')?;
    is_marker_line(&content[..first_line_end]).then(|| &content[first_line_end + 1..])
}

fn decode_attribute_block(block: &str) -> Result<Map<String, Value>, ParseError> {
    if block.trim().is_empty() {
        return Ok(Map::new());
    }
    Ok(serde_yaml::from_str(block)?)
}
