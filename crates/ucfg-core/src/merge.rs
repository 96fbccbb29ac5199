//! Config merger: writes form edits back into the original file text
//!
//! Only directive lines named in the patch are touched. The key, the spacing
//! around `=` and everything after the value token (usually the `# type`
//! comment) are kept verbatim; comments, blank lines, ordering and
//! unrecognized lines are never modified. Keys missing from the file are
//! ignored: the merger replaces, it never inserts.

use std::collections::BTreeMap;
use std::fmt;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Field name → new value, as submitted by the form
pub type EditPatch = BTreeMap<String, PatchValue>;

/// A single submitted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// Written exactly as given (quotes included, if any)
    Text(String),
}

impl PatchValue {
    /// Token written into the file
    ///
    /// An empty string becomes `""` so the directive stays well-formed.
    pub fn serialize(&self) -> String {
        match self {
            PatchValue::Bool(b) => b.to_string(),
            PatchValue::Integer(n) => n.to_string(),
            PatchValue::Float(f) => f.to_string(),
            PatchValue::Text(s) if s.is_empty() => "\"\"".to_string(),
            PatchValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for PatchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl From<&str> for PatchValue {
    fn from(s: &str) -> Self {
        PatchValue::Text(s.to_string())
    }
}

impl From<String> for PatchValue {
    fn from(s: String) -> Self {
        PatchValue::Text(s)
    }
}

impl From<bool> for PatchValue {
    fn from(b: bool) -> Self {
        PatchValue::Bool(b)
    }
}

impl From<i64> for PatchValue {
    fn from(n: i64) -> Self {
        PatchValue::Integer(n)
    }
}

/// Apply a patch to configuration text
///
/// Deterministic and total: an empty patch returns the input byte for byte.
pub fn merge(original: &str, patch: &EditPatch) -> String {
    let mut text = original.to_string();
    let mut replaced = 0usize;

    for (key, value) in patch {
        match replace_directive(&text, key, value) {
            Some(updated) => {
                text = updated;
                replaced += 1;
            }
            None => debug!("patch key {} not present in config, ignoring", key),
        }
    }

    debug!("merged {} of {} patch entries", replaced, patch.len());
    text
}

/// Replace the value of the first directive named `key`
///
/// Returns `None` when there is no such directive or the value cannot be
/// written on a single line.
pub fn replace_directive(text: &str, key: &str, value: &PatchValue) -> Option<String> {
    let token = value.serialize();
    if token.contains(['\n', '\r']) {
        warn!("refusing multi-line value for {}", key);
        return None;
    }

    let pattern = directive_pattern(key)?;
    if !pattern.is_match(text) {
        return None;
    }

    let updated = pattern.replacen(text, 1, |caps: &Captures| {
        format!("{}{}{}", &caps["lead"], token, &caps["rest"])
    });
    Some(updated.into_owned())
}

/// `^key\s*=\s*<value>(rest)$` in multi-line mode
fn directive_pattern(key: &str) -> Option<Regex> {
    let source = format!(
        r#"(?m)^(?P<lead>{}[ \t]*=[ \t]*)(?:"[^"\n]*"|[^\s]+)(?P<rest>[^\n]*)$"#,
        regex::escape(key)
    );
    Regex::new(&source)
        .inspect_err(|e| warn!("cannot build pattern for key {:?}: {}", key, e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(entries: &[(&str, PatchValue)]) -> EditPatch {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    const SAMPLE: &str = "foo = 1 # some int\nbar = \"x\" # a string\n";

    #[test]
    fn test_empty_patch_is_identity() {
        assert_eq!(merge(SAMPLE, &EditPatch::new()), SAMPLE);
    }

    #[test]
    fn test_targeted_replacement() {
        let result = merge(SAMPLE, &patch(&[("foo", PatchValue::Integer(2))]));
        assert_eq!(result, "foo = 2 # some int\nbar = \"x\" # a string\n");
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let result = merge(SAMPLE, &patch(&[("baz", PatchValue::Integer(9))]));
        assert_eq!(result, SAMPLE);
    }

    #[test]
    fn test_multiple_keys() {
        let result = merge(
            SAMPLE,
            &patch(&[
                ("bar", PatchValue::Text("\"y\"".into())),
                ("foo", PatchValue::Integer(3)),
            ]),
        );
        assert_eq!(result, "foo = 3 # some int\nbar = \"y\" # a string\n");
    }

    #[test]
    fn test_key_prefix_does_not_match_longer_name() {
        let text = "sp_arith_additive = add\nsp_arith = add\n";
        let result = merge(text, &patch(&[("sp_arith", PatchValue::Text("remove".into()))]));
        assert_eq!(result, "sp_arith_additive = add\nsp_arith = remove\n");
    }

    #[test]
    fn test_comments_mentioning_key_are_untouched() {
        let text = "# foo = 1 is the default\nfoo = 1 # number\n";
        let result = merge(text, &patch(&[("foo", PatchValue::Integer(5))]));
        assert_eq!(result, "# foo = 1 is the default\nfoo = 5 # number\n");
    }

    #[test]
    fn test_only_first_occurrence_replaced() {
        let text = "foo = 1\nfoo = 1\n";
        let result = merge(text, &patch(&[("foo", PatchValue::Integer(2))]));
        assert_eq!(result, "foo = 2\nfoo = 1\n");
    }

    #[test]
    fn test_empty_string_becomes_quoted() {
        let result = merge(SAMPLE, &patch(&[("bar", PatchValue::Text(String::new()))]));
        assert_eq!(result, "foo = 1 # some int\nbar = \"\" # a string\n");
    }

    #[test]
    fn test_boolean_value() {
        let text = "nl_end_of_file = false # false/true\n";
        let result = merge(text, &patch(&[("nl_end_of_file", PatchValue::Bool(true))]));
        assert_eq!(result, "nl_end_of_file = true # false/true\n");
    }

    #[test]
    fn test_spacing_is_preserved() {
        let text = "indent_columns=4\nsp_arith   =   add   # ignore/add\n";
        let result = merge(
            text,
            &patch(&[
                ("indent_columns", PatchValue::Integer(8)),
                ("sp_arith", PatchValue::Text("force".into())),
            ]),
        );
        assert_eq!(result, "indent_columns=8\nsp_arith   =   force   # ignore/add\n");
    }

    #[test]
    fn test_crlf_line_endings_are_preserved() {
        let text = "foo = 1 # number\r\nbar = 2 # number\r\n";
        let result = merge(text, &patch(&[("foo", PatchValue::Integer(7))]));
        assert_eq!(result, "foo = 7 # number\r\nbar = 2 # number\r\n");
    }

    #[test]
    fn test_quoted_value_with_spaces_replaced_whole() {
        let text = "cmt_insert_file_header = \"my header.txt\" # string\n";
        let result = merge(
            text,
            &patch(&[("cmt_insert_file_header", PatchValue::Text("\"h.txt\"".into()))]),
        );
        assert_eq!(result, "cmt_insert_file_header = \"h.txt\" # string\n");
    }

    #[test]
    fn test_dollar_in_value_is_literal() {
        let result = merge(SAMPLE, &patch(&[("bar", PatchValue::Text("\"$1\"".into()))]));
        assert_eq!(result, "foo = 1 # some int\nbar = \"$1\" # a string\n");
    }

    #[test]
    fn test_multiline_value_is_rejected() {
        let result = merge(SAMPLE, &patch(&[("foo", PatchValue::Text("1\nbar = 9".into()))]));
        assert_eq!(result, SAMPLE);
    }

    #[test]
    fn test_patch_value_deserialize_untagged() {
        let patch: EditPatch =
            serde_json::from_str(r#"{"a": true, "b": 4, "c": "left", "d": 1.5}"#).unwrap();
        assert_eq!(patch["a"], PatchValue::Bool(true));
        assert_eq!(patch["b"], PatchValue::Integer(4));
        assert_eq!(patch["c"], PatchValue::Text("left".into()));
        assert_eq!(patch["d"], PatchValue::Float(1.5));
    }
}
