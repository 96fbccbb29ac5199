//! Config renderer: projects a [`ParsedConfig`] into a [`MarkupNode`] form
//!
//! Each section becomes an optional `h2` heading followed by a `table`; each
//! field becomes one row:
//!
//! | NEW marker (preset only) | label | primary control | override | help |
//!
//! The full document wraps the form with the action bar (search, save, save
//! preset, and the upgrade action when the file's format version is stale).

use crate::markup::MarkupNode;
use crate::merge::EditPatch;
use crate::types::{FieldDescriptor, ParsedConfig, Section, TypeHint};

/// Hint shown on the override control
const OVERRIDE_TITLE: &str = "This raw value will override the normal one in the file";

/// Where the form's stylesheet and script are served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub resource_dir: String,
    pub stylesheet: String,
    pub script: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            resource_dir: "editor".to_string(),
            stylesheet: "uncrustify.css".to_string(),
            script: "uncrustify.js".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_resource_dir(resource_dir: impl Into<String>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            ..Default::default()
        }
    }

    fn resource(&self, file: &str) -> String {
        if self.resource_dir.is_empty() {
            file.to_string()
        } else {
            format!("{}/{}", self.resource_dir.trim_end_matches('/'), file)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// Render the complete editor document
///
/// `prior` is the preset used to flag fields that are new since it was saved.
pub fn render(parsed: &ParsedConfig, prior: Option<&EditPatch>, options: &RenderOptions) -> MarkupNode {
    tracing::debug!("rendering form for {} fields", parsed.field_count());

    let head = MarkupNode::new("head").child(
        MarkupNode::new("link")
            .attr("rel", "stylesheet")
            .attr("href", options.resource(&options.stylesheet)),
    );

    let body = MarkupNode::new("body")
        .child(action_bar(parsed))
        .child(
            MarkupNode::new("form")
                .attr("id", "config")
                .children(render_sections(parsed, prior)),
        )
        .child(MarkupNode::new("a").attr("id", "a").attr("display", "none"))
        .child(MarkupNode::new("script").attr("src", options.resource(&options.script)));

    MarkupNode::new("html").child(head).child(body)
}

fn action_bar(parsed: &ParsedConfig) -> MarkupNode {
    let search = MarkupNode::new("form").attr("id", "searchForm").child(
        MarkupNode::new("input")
            .attr("id", "search")
            .attr("type", "text")
            .attr("placeholder", "Search..."),
    );

    let mut actions = MarkupNode::new("div")
        .attr("id", "actions")
        .child(search)
        .child(action_header("SAVE", "save"))
        .child(action_header("SAVE PRESET", "savePreset"));

    if parsed.version_status.upgrade_available() {
        actions = actions.child(action_header("UPGRADE CONFIG", "upgrade"));
    }

    actions
}

fn action_header(label: &str, action: &str) -> MarkupNode {
    MarkupNode::new("h3")
        .attr("onclick", format!("action('{}')", action))
        .text(label)
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections and Rows
// ─────────────────────────────────────────────────────────────────────────────

/// Render only the form content: headings and tables, in file order
pub fn render_sections(parsed: &ParsedConfig, prior: Option<&EditPatch>) -> Vec<MarkupNode> {
    parsed
        .sections
        .iter()
        .filter(|s| !s.is_empty())
        .flat_map(|s| section_nodes(s, prior))
        .collect()
}

fn section_nodes(section: &Section, prior: Option<&EditPatch>) -> Vec<MarkupNode> {
    let mut nodes = Vec::with_capacity(2);

    if let Some(title) = &section.title {
        nodes.push(
            MarkupNode::new("h2")
                .attr("onclick", "toggle(event)")
                .text(title.clone()),
        );
    }

    nodes.push(
        MarkupNode::new("table").children(section.fields.iter().map(|f| field_row(f, prior))),
    );

    nodes
}

/// One table row for a field
pub fn field_row(field: &FieldDescriptor, prior: Option<&EditPatch>) -> MarkupNode {
    let mut row = MarkupNode::new("tr");

    if let Some(prior) = prior {
        let marker = if prior.contains_key(&field.name) {
            ""
        } else {
            "NEW"
        };
        row = row.child(MarkupNode::new("td").attr("class", "new-item").text(marker));
    }

    row.child(MarkupNode::new("td").child(MarkupNode::new("p").text(field.name.clone())))
        .child(MarkupNode::new("td").child(primary_control(field)))
        .child(MarkupNode::new("td").child(override_control(field)))
        .child(MarkupNode::new("td").text(field.help_text.clone()))
}

/// The control matching the field's type, pre-populated with its value
pub fn primary_control(field: &FieldDescriptor) -> MarkupNode {
    let control = match &field.type_hint {
        TypeHint::String | TypeHint::Number => MarkupNode::new("input")
            .attr("type", field.type_hint.control_type())
            .attr("name", field.name.clone())
            .attr_opt("placeholder", field.inline_comment.clone())
            .attr_opt("value", field.control_value.clone()),
        TypeHint::Boolean => {
            let input = MarkupNode::new("input")
                .attr("type", "checkbox")
                .attr("name", field.name.clone())
                .attr_opt("placeholder", field.inline_comment.clone());
            if field.checked() {
                input.flag("checked")
            } else {
                input
            }
        }
        TypeHint::Enumerated(options) => {
            MarkupNode::new("select")
                .attr("name", field.name.clone())
                .children(options.iter().map(|option| {
                    let node = MarkupNode::new("option").attr("value", option.clone());
                    let node = if field.selected() == Some(option.as_str()) {
                        node.flag("selected")
                    } else {
                        node
                    };
                    node.text(option.clone())
                }))
        }
    };

    control
        .attr("data-initial-value", field.initial_value())
        .attr("onchange", "inputChanged(this)")
        .attr("title", format!("Current saved value: {}", field.initial_value()))
}

/// Free-text override, filled only when the primary control cannot hold the value
pub fn override_control(field: &FieldDescriptor) -> MarkupNode {
    MarkupNode::new("input")
        .attr("type", "text")
        .attr("class", "override")
        .attr("name", field.name.clone())
        .attr("placeholder", "custom value")
        .attr("title", OVERRIDE_TITLE)
        .attr_opt("value", field.override_value.clone())
}
