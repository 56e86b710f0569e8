//! Turns generated synopsis text into structured blocks.
//!
//! The model is prompted to answer in a light Markdown dialect: `#` and
//! `##` headings plus `-` bullets. This module classifies the synopsis
//! line by line so the export layer never has to look at raw Markdown.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One classified line of the synopsis.
///
/// Classification never drops a line; blank lines become empty
/// paragraphs so vertical spacing survives into the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Bullet { text: String },
    Paragraph { text: String },
}

impl Block {
    /// Text carried by the block, regardless of kind.
    pub fn text(&self) -> &str {
        match self {
            Block::Heading { text, .. } => text,
            Block::Bullet { text } => text,
            Block::Paragraph { text } => text,
        }
    }
}

/// Classifies a synopsis into blocks, one per line.
///
/// Prefixes are matched against the raw line, so an indented `  - item`
/// is a paragraph, not a bullet. Block content is trimmed after the
/// prefix is removed.
pub fn format_synopsis(synopsis: &str) -> Vec<Block> {
    let blocks: Vec<Block> = synopsis.lines().map(classify_line).collect();
    debug!(lines = blocks.len(), "Classified synopsis into blocks");
    blocks
}

fn classify_line(line: &str) -> Block {
    if let Some(rest) = line.strip_prefix("## ") {
        Block::Heading {
            level: 2,
            text: rest.trim().to_string(),
        }
    } else if let Some(rest) = line.strip_prefix("# ") {
        Block::Heading {
            level: 1,
            text: rest.trim().to_string(),
        }
    } else if let Some(rest) = line.strip_prefix("- ") {
        Block::Bullet {
            text: rest.trim().to_string(),
        }
    } else {
        Block::Paragraph {
            text: line.trim().to_string(),
        }
    }
}
