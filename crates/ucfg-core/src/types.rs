//! Domain types for parsed Uncrustify configuration files
//!
//! Defines:
//! - [`TypeHint`] - Closed set of value types inferred from inline comments
//! - [`FieldDescriptor`] - One `name = value` directive with its form state
//! - [`Section`] - A titled run of directives
//! - [`ParsedConfig`] - The full parse result plus format-version status

use std::sync::LazyLock;

use regex::Regex;

use crate::version::VersionStatus;

static NUMBER_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("Invalid number value regex"));

static QUOTED_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"(.*)"$"#).expect("Invalid quoted value regex"));

// ─────────────────────────────────────────────────────────────────────────────
// Type Hints
// ─────────────────────────────────────────────────────────────────────────────

/// Value type of a directive, inferred from its trailing `# comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// Quoted string (`# string`), or free text when no keyword matched
    String,
    /// Unsigned integer (`# number`, `# unsigned number`)
    Number,
    /// `# false/true`
    Boolean,
    /// `# a/b/c` - one of the listed options
    Enumerated(Vec<String>),
}

impl TypeHint {
    /// Infer the type from an inline comment
    ///
    /// Keyword matches are exact; anything containing at least two
    /// `/`-separated alternatives is an enumeration; everything else is a
    /// string.
    pub fn infer(comment: Option<&str>) -> Self {
        let Some(comment) = comment else {
            return TypeHint::String;
        };

        match comment {
            "string" => TypeHint::String,
            "number" | "unsigned number" => TypeHint::Number,
            "false/true" => TypeHint::Boolean,
            _ => {
                let options: Vec<String> = comment.split('/').map(str::to_string).collect();
                if options.len() > 1 {
                    TypeHint::Enumerated(options)
                } else {
                    TypeHint::String
                }
            }
        }
    }

    /// Whether a raw value token fits this type's expected pattern
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            TypeHint::String => QUOTED_VALUE.is_match(raw),
            TypeHint::Number => NUMBER_VALUE.is_match(raw),
            TypeHint::Boolean => raw == "true" || raw == "false",
            TypeHint::Enumerated(options) => options.iter().any(|o| o == raw),
        }
    }

    /// Name of the form control used for this type
    pub fn control_type(&self) -> &'static str {
        match self {
            TypeHint::String => "text",
            TypeHint::Number => "number",
            TypeHint::Boolean => "checkbox",
            TypeHint::Enumerated(_) => "select",
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TypeHint::String => "string",
            TypeHint::Number => "number",
            TypeHint::Boolean => "boolean",
            TypeHint::Enumerated(_) => "enumerated",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field Descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// One configuration directive, ready to be shown as a form row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Directive name, unique across the file
    pub name: String,

    /// Value token exactly as written (quotes included)
    pub raw_value: String,

    /// Type inferred from the inline comment
    pub type_hint: TypeHint,

    /// The inline comment itself, used as placeholder for free text
    pub inline_comment: Option<String>,

    /// Comment lines immediately preceding the directive
    pub help_text: String,

    /// Value the primary control starts with, when the raw value fits the type
    ///
    /// Strings are unquoted here. Booleans never carry one; see [`Self::checked`].
    pub control_value: Option<String>,

    /// Raw value to pre-fill the free-text override control with
    ///
    /// Set whenever the raw value does not fit the type, so nothing is lost.
    pub override_value: Option<String>,
}

impl FieldDescriptor {
    /// Build a descriptor from the pieces of a directive line
    pub fn new(
        name: impl Into<String>,
        raw_value: impl Into<String>,
        inline_comment: Option<String>,
        help_text: impl Into<String>,
    ) -> Self {
        let raw_value = raw_value.into();
        let type_hint = TypeHint::infer(inline_comment.as_deref());
        let fits = type_hint.accepts(&raw_value);

        let quoted = is_string_keyword(inline_comment.as_deref());
        let control_value = match &type_hint {
            TypeHint::Boolean => None,
            TypeHint::String if fits && quoted => Some(unquote(&raw_value).to_string()),
            TypeHint::String if fits => Some(raw_value.clone()),
            TypeHint::Number | TypeHint::Enumerated(_) if fits => Some(raw_value.clone()),
            _ => None,
        };

        // A recognized enum option clears the override, same as any other
        // value that fits its type.
        let override_value = if fits { None } else { Some(raw_value.clone()) };

        Self {
            name: name.into(),
            raw_value,
            type_hint,
            inline_comment,
            help_text: help_text.into(),
            control_value,
            override_value,
        }
    }

    /// Whether the value is written back in double quotes (`# string`)
    ///
    /// Other string fields are free text and keep whatever the user typed.
    pub fn is_quoted_string(&self) -> bool {
        self.type_hint == TypeHint::String && is_string_keyword(self.inline_comment.as_deref())
    }

    /// Checkbox state for boolean fields
    pub fn checked(&self) -> bool {
        self.type_hint == TypeHint::Boolean && self.raw_value == "true"
    }

    /// Selected option for enumerated fields, if the raw value is one of them
    pub fn selected(&self) -> Option<&str> {
        match &self.type_hint {
            TypeHint::Enumerated(_) => self.control_value.as_deref(),
            _ => None,
        }
    }

    /// Whether the primary control cannot represent the raw value
    pub fn needs_override(&self) -> bool {
        self.override_value.is_some()
    }

    /// Value used for change detection in the rendered form
    pub fn initial_value(&self) -> &str {
        self.control_value.as_deref().unwrap_or(&self.raw_value)
    }
}

fn is_string_keyword(comment: Option<&str>) -> bool {
    comment == Some("string")
}

/// Strip one pair of surrounding double quotes
pub fn unquote(raw: &str) -> &str {
    QUOTED_VALUE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw)
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections and Parse Result
// ─────────────────────────────────────────────────────────────────────────────

/// A titled run of directives bounded by blank lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Comment block that opened the section; `None` for leading directives
    pub title: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl Section {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            fields: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Result of parsing a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedConfig {
    /// Non-empty sections in file order
    pub sections: Vec<Section>,

    /// Version token from the leading `# Uncrustify-x.y.z` comment
    pub format_version: Option<String>,

    /// Comparison against the installed formatter (Unknown until checked)
    pub version_status: VersionStatus,
}

impl ParsedConfig {
    /// Compare the file's format version against the installed formatter
    pub fn with_installed_version(mut self, installed: Option<&str>) -> Self {
        self.version_status =
            crate::version::check_version(self.format_version.as_deref(), installed);
        self
    }

    /// Whether the file was written by the installed formatter version
    pub fn is_current_version(&self) -> bool {
        self.version_status == VersionStatus::Current
    }

    /// All fields across sections, in file order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    /// Look up a field by directive name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|f| f.name == name)
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }
}
