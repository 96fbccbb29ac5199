//! Form actions posted back by the editor page
//!
//! The page's script turns a click on SAVE / SAVE PRESET / UPGRADE CONFIG
//! into a link of the form
//!
//! ```text
//! command:uncrustify.<action>?<JSON object>
//! ```
//!
//! with the whole string passed through `encodeURI`. `#` is not escaped by
//! `encodeURI`, so a value containing one ends up in the URL fragment; the
//! decoder stitches query and fragment back together.
//!
//! The page posts a [`FormSubmission`] (`{"fields": {...}}`), serialized
//! against the parsed config once the session handles it. A flat object of
//! ready values (`{"indent_columns": 4}`) is accepted too, as typed on the
//! command line.

use std::fmt;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use serde_json::Value;
use url::Url;

use ucfg_core::prelude::*;
use ucfg_core::{EditPatch, FormSubmission, ParsedConfig, PatchValue};

/// URI scheme of editor commands
pub const COMMAND_SCHEME: &str = "command";

/// Prefix of every command this editor handles
pub const COMMAND_PREFIX: &str = "uncrustify.";

/// What the user asked the page to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Merge the values into the config file
    Save,
    /// Store the values as a named preset
    SavePreset,
    /// Rewrite the config file in the installed formatter's format
    Upgrade,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Save => "save",
            Action::SavePreset => "savePreset",
            Action::Upgrade => "upgrade",
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "save" => Ok(Action::Save),
            "savePreset" => Ok(Action::SavePreset),
            "upgrade" => Ok(Action::Upgrade),
            other => Err(Error::protocol(format!("Unknown action: {}", other))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values carried by a command link
#[derive(Debug, Clone, PartialEq)]
pub enum CommandPayload {
    /// Ready-to-merge values
    Values(EditPatch),
    /// Raw control state posted by the page
    Form(FormSubmission),
}

impl CommandPayload {
    /// Serialize against the config the page was rendered from
    pub fn into_patch(self, parsed: &ParsedConfig) -> EditPatch {
        match self {
            CommandPayload::Values(values) => values,
            CommandPayload::Form(form) => form.to_patch(parsed),
        }
    }
}

/// A decoded command link
#[derive(Debug, Clone, PartialEq)]
pub struct EditorCommand {
    pub action: Action,
    pub payload: CommandPayload,
}

/// Decode a `command:uncrustify.<action>?<json>` link
pub fn decode_command_uri(uri: &str) -> Result<EditorCommand> {
    let url = Url::parse(uri.trim())
        .map_err(|e| Error::protocol(format!("Malformed command URI: {}", e)))?;

    if url.scheme() != COMMAND_SCHEME {
        return Err(Error::protocol(format!(
            "Unexpected URI scheme: {}",
            url.scheme()
        )));
    }

    let command = percent_decode_str(url.path())
        .decode_utf8()
        .map_err(|e| Error::protocol(format!("Command name is not UTF-8: {}", e)))?;
    let action: Action = command
        .strip_prefix(COMMAND_PREFIX)
        .ok_or_else(|| Error::protocol(format!("Not an editor command: {}", command)))?
        .parse()?;

    let raw = match (url.query(), url.fragment()) {
        (Some(query), Some(fragment)) => format!("{}#{}", query, fragment),
        (Some(query), None) => query.to_string(),
        (None, _) => String::new(),
    };
    let json = percent_decode_str(&raw)
        .decode_utf8()
        .map_err(|e| Error::protocol(format!("Command payload is not UTF-8: {}", e)))?;

    let payload = decode_payload(&json)?;
    debug!("Decoded {} command", action);
    Ok(EditorCommand { action, payload })
}

fn decode_payload(json: &str) -> Result<CommandPayload> {
    if json.trim().is_empty() {
        return Ok(CommandPayload::Values(EditPatch::new()));
    }

    match serde_json::from_str::<FormSubmission>(json) {
        Ok(form) => {
            debug!("Form payload with {} fields", form.fields.len());
            Ok(CommandPayload::Form(form))
        }
        Err(_) => decode_values(json).map(CommandPayload::Values),
    }
}

/// Parse a JSON object of field values
///
/// `null` entries (a number box left empty) and unnamed controls are dropped.
pub fn decode_values(json: &str) -> Result<EditPatch> {
    let object: serde_json::Map<String, Value> = serde_json::from_str(json)
        .map_err(|e| Error::protocol(format!("Command payload is not a JSON object: {}", e)))?;

    let mut values = EditPatch::new();
    for (name, value) in object {
        if name.is_empty() || value.is_null() {
            continue;
        }
        match serde_json::from_value::<PatchValue>(value) {
            Ok(value) => {
                values.insert(name, value);
            }
            Err(e) => warn!("Ignoring unsupported value for {}: {}", name, e),
        }
    }
    Ok(values)
}
