//! Config parser for Uncrustify configuration files.
//!
//! Each physical line is classified into a [`ConfigLine`], then the lines are
//! folded through an immutable [`ParseState`]: comment lines accumulate, blank
//! lines close sections, and directive lines become [`FieldDescriptor`] rows.
//! The parser is total: lines it does not understand pass through as
//! [`ConfigLine::Other`] and never reach the form.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::types::{FieldDescriptor, ParsedConfig, Section};
use crate::version::detect_format_version;

/// `# text` at the very start of the line
static COMMENT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*(.*)").expect("Invalid comment regex"));

/// `name = value [# comment]`; quoted values may contain whitespace
static DIRECTIVE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z0-9_]+)\s*=\s*("[^"]*"|\S+)(?:\s*#\s*(.*))?"#)
        .expect("Invalid directive regex")
});

// ─────────────────────────────────────────────────────────────────────────────
// Line Classification
// ─────────────────────────────────────────────────────────────────────────────

/// One physical line of a configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLine {
    /// `# text`, with the marker and following whitespace removed
    Comment(String),
    /// An empty line: section boundary
    Blank,
    /// `name = value [# comment]`
    Directive {
        name: String,
        value: String,
        comment: Option<String>,
    },
    /// Single stray character (historically a lone carriage return)
    Insignificant,
    /// Anything else; ignored by the form, kept verbatim by the merger
    Other(String),
}

impl ConfigLine {
    /// Classify a single line (without its line terminator)
    pub fn classify(line: &str) -> Self {
        if line.is_empty() {
            return ConfigLine::Blank;
        }

        if line.chars().count() == 1 {
            return ConfigLine::Insignificant;
        }

        if let Some(caps) = COMMENT_LINE.captures(line) {
            let text = caps.get(1).map_or("", |m| m.as_str());
            return ConfigLine::Comment(text.to_string());
        }

        if let Some(caps) = DIRECTIVE_LINE.captures(line) {
            let comment = caps
                .get(3)
                .map(|m| m.as_str().trim_end().to_string())
                .filter(|c| !c.is_empty());

            return ConfigLine::Directive {
                name: caps[1].to_string(),
                value: caps[2].to_string(),
                comment,
            };
        }

        ConfigLine::Other(line.to_string())
    }
}

/// Split text into lines, dropping one trailing `\r` per line
pub fn normalized_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}

// ─────────────────────────────────────────────────────────────────────────────
// Fold State
// ─────────────────────────────────────────────────────────────────────────────

/// Accumulator threaded through the line fold
#[derive(Debug, Clone, Default)]
struct ParseState {
    /// Comment lines seen since the last directive or section boundary
    pending_comment: Vec<String>,

    /// Directive parsed from the current line, not yet placed in a section
    pending_field: Option<FieldDescriptor>,

    /// Closed, non-empty sections
    sections: Vec<Section>,

    /// Section receiving new rows
    current: Section,

    /// Directive names already placed, to keep names unique
    seen: HashSet<String>,
}

impl ParseState {
    fn step(self, line: ConfigLine) -> Self {
        match line {
            ConfigLine::Insignificant | ConfigLine::Other(_) => self,
            ConfigLine::Blank => self.close_section(),
            ConfigLine::Comment(text) => self.push_comment(text),
            ConfigLine::Directive {
                name,
                value,
                comment,
            } => self.with_directive(name, value, comment).flush_pending(),
        }
    }

    fn push_comment(self, text: String) -> Self {
        let mut pending_comment = self.pending_comment;
        pending_comment.push(text);
        Self {
            pending_comment,
            ..self
        }
    }

    /// Blank line: a pending comment block becomes the next section title
    fn close_section(self) -> Self {
        if self.pending_comment.is_empty() || self.pending_field.is_some() {
            return self;
        }

        let title = self.pending_comment.join("\n");
        let mut sections = self.sections;
        if self.current.is_empty() {
            if let Some(dropped) = &self.current.title {
                trace!("dropping empty section {:?}", dropped);
            }
        } else {
            sections.push(self.current);
        }

        Self {
            pending_comment: Vec::new(),
            sections,
            current: Section::titled(title),
            ..self
        }
    }

    fn with_directive(self, name: String, value: String, comment: Option<String>) -> Self {
        let help_text = self.pending_comment.join("\n");
        Self {
            pending_field: Some(FieldDescriptor::new(name, value, comment, help_text)),
            ..self
        }
    }

    /// Move the pending directive into the current section as one row
    fn flush_pending(mut self) -> Self {
        let Some(field) = self.pending_field.take() else {
            return self;
        };

        let mut seen = self.seen;
        let mut current = self.current;
        if seen.insert(field.name.clone()) {
            current.fields.push(field);
        } else {
            debug!("ignoring duplicate directive {}", field.name);
        }

        Self {
            pending_comment: Vec::new(),
            pending_field: None,
            current,
            seen,
            ..self
        }
    }

    fn finish(self) -> Vec<Section> {
        let state = self.flush_pending();
        let mut sections = state.sections;
        if !state.current.is_empty() {
            sections.push(state.current);
        }
        sections
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Point
// ─────────────────────────────────────────────────────────────────────────────

/// Parse configuration text into titled sections of typed fields
///
/// Never fails; malformed lines are skipped. The version status is left
/// `Unknown` until [`ParsedConfig::with_installed_version`] is called.
pub fn parse(text: &str) -> ParsedConfig {
    debug!("parsing config ({} bytes)", text.len());

    let sections = normalized_lines(text)
        .map(ConfigLine::classify)
        .fold(ParseState::default(), ParseState::step)
        .finish();

    let config = ParsedConfig {
        sections,
        format_version: detect_format_version(text),
        ..Default::default()
    };

    debug!(
        "parsed {} sections, {} fields, format version {:?}",
        config.sections.len(),
        config.field_count(),
        config.format_version
    );

    config
}
