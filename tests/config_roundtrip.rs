//! Parse, render and merge a real-world config file

use ucfg_core::markup::to_document;
use ucfg_core::{
    merge, parse, render, EditPatch, FormSubmission, PatchValue, RenderOptions, TypeHint,
    VersionStatus,
};

const FIXTURE: &str = include_str!("fixtures/uncrustify.cfg");
const OUTDATED: &str = include_str!("fixtures/outdated.cfg");

#[test]
fn test_fixture_sections() {
    let parsed = parse(FIXTURE);
    let titles: Vec<_> = parsed
        .sections
        .iter()
        .map(|s| s.title.as_deref().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["General options", "Spacing options", "Comment modifications"]
    );
    assert_eq!(parsed.field_count(), 8);
    assert_eq!(parsed.format_version.as_deref(), Some("0.78.1_f"));
}

#[test]
fn test_fixture_field_types() {
    let parsed = parse(FIXTURE);
    assert!(matches!(
        parsed.field("newlines").unwrap().type_hint,
        TypeHint::Enumerated(_)
    ));
    assert_eq!(parsed.field("input_tab_size").unwrap().type_hint, TypeHint::Number);
    assert_eq!(parsed.field("utf8_force").unwrap().type_hint, TypeHint::Boolean);

    let header = parsed.field("cmt_insert_file_header").unwrap();
    assert_eq!(header.type_hint, TypeHint::String);
    assert_eq!(header.control_value.as_deref(), Some("my header.txt"));
}

#[test]
fn test_fixture_help_text_skips_lone_markers() {
    let parsed = parse(FIXTURE);
    assert_eq!(
        parsed.field("newlines").unwrap().help_text,
        "The type of line endings.\nDefault: auto"
    );
    assert_eq!(
        parsed.field("sp_arith").unwrap().help_text,
        "Add or remove space around non-assignment symbolic operators ('+', '/', '%',\n'<<', and so forth)."
    );
}

#[test]
fn test_fixture_escape_hatch_values() {
    let parsed = parse(FIXTURE);
    assert_eq!(
        parsed
            .field("cmt_insert_before_ctor_dtor")
            .unwrap()
            .override_value
            .as_deref(),
        Some("sometimes")
    );
    assert_eq!(
        parsed.field("set_unknown").unwrap().override_value.as_deref(),
        Some("keep")
    );
}

#[test]
fn test_untouched_form_preserves_file() {
    let parsed = parse(FIXTURE);
    let patch = FormSubmission::from_parsed(&parsed).to_patch(&parsed);
    assert_eq!(patch.len(), 8);
    assert_eq!(merge(FIXTURE, &patch), FIXTURE);
}

#[test]
fn test_edit_touches_only_submitted_lines() {
    let mut patch = EditPatch::new();
    patch.insert("sp_arith".into(), PatchValue::Text("add".into()));
    patch.insert("utf8_force".into(), PatchValue::Bool(true));

    let merged = merge(FIXTURE, &patch);

    let changed: Vec<_> = FIXTURE
        .lines()
        .zip(merged.lines())
        .filter(|(a, b)| a != b)
        .map(|(_, b)| b)
        .collect();
    assert_eq!(
        changed,
        vec![
            "utf8_force                      = true    # false/true",
            "sp_arith                        = add   # ignore/add/remove/force",
        ]
    );
    assert_eq!(FIXTURE.lines().count(), merged.lines().count());
}

#[test]
fn test_rendered_fixture_has_no_upgrade_when_current() {
    let parsed = parse(FIXTURE).with_installed_version(Some("0.78.1_f"));
    assert_eq!(parsed.version_status, VersionStatus::Current);

    let html = to_document(&render(&parsed, None, &RenderOptions::default()));
    assert_eq!(html.matches("<h2 ").count(), 3);
    assert_eq!(html.matches("<tr>").count(), 8);
    assert!(!html.contains("UPGRADE CONFIG"));
    assert!(html.contains("value=\"my header.txt\""));
}

#[test]
fn test_outdated_fixture_offers_upgrade() {
    let parsed = parse(OUTDATED).with_installed_version(Some("0.78.1_f"));
    assert!(parsed.version_status.upgrade_available());

    let html = to_document(&render(&parsed, None, &RenderOptions::default()));
    assert!(html.contains("<h3 onclick=\"action('upgrade')\">UPGRADE CONFIG</h3>"));
}
