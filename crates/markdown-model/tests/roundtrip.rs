use std::fs;

use markdown_model::{Document, DocumentContext, Position, WriteSettings};
use markdown_model_test_support::{copy_fixture, files_identical, fixture_path, test_config};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const FIXTURES: &[&str] = &[
    "empty.md",
    "lorem.md",
    "empty_section.md",
    "metadata.md",
    "start_with_no_section.md",
];

#[test]
fn read_then_write_reproduces_every_fixture() {
    let source_root = fixture_path(env!("CARGO_MANIFEST_DIR"), "");
    let reader = DocumentContext::with_root(&source_root);
    let out = tempdir().unwrap();
    let writer = DocumentContext::with_root(out.path());

    for name in FIXTURES {
        let doc = reader.load(name).unwrap();
        writer.save_as(&doc, name).unwrap();

        assert!(
            files_identical(&source_root.join(name), &out.path().join(name)).unwrap(),
            "{name} changed on round trip"
        );
    }
}

#[test]
fn save_writes_back_to_original_path() {
    let (dir, path) = copy_fixture(env!("CARGO_MANIFEST_DIR"), "lorem.md").unwrap();
    let context = DocumentContext::with_root(dir.path());

    let mut doc = context.load("lorem.md").unwrap();
    doc.add_line(0, "New Line", Position::End).unwrap();
    context.save(&doc).unwrap();

    let reloaded = context.load("lorem.md").unwrap();
    assert_eq!(reloaded.section(0).unwrap().line(3).unwrap().text(), "New Line");
    assert!(fs::read_to_string(&path)
        .unwrap()
        .starts_with("# Lorem Ipsum\n\nLorem ipsum dolor sit amet, consectetur adipiscing elit.\n\nNew Line\n## Etiam\n"));
}

#[test]
fn inserted_section_lands_between_neighbours() {
    let context = DocumentContext::with_root(fixture_path(env!("CARGO_MANIFEST_DIR"), ""));
    let mut doc = context.load("lorem.md").unwrap();

    doc.add_section("## New Section", Position::At(1)).unwrap();
    assert_eq!(doc.len(), 6);
    assert_eq!(doc.section(1).unwrap().heading(), "New Section");
    assert_eq!(doc.section(2).unwrap().heading(), "Etiam");

    let rendered = doc.to_markdown().unwrap();
    assert!(rendered.contains("elit.\n\n## New Section\n## Etiam\n"));
}

#[test]
fn line_inserted_at_index_shifts_the_rest() {
    let context = DocumentContext::with_root(fixture_path(env!("CARGO_MANIFEST_DIR"), ""));
    let mut doc = context.load("lorem.md").unwrap();

    doc.add_line(0, "New Line", Position::At(1)).unwrap();
    let texts: Vec<_> = doc
        .section(0)
        .unwrap()
        .lines()
        .iter()
        .map(|line| line.text())
        .collect();
    assert_eq!(
        texts,
        vec![
            "",
            "New Line",
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
            ""
        ]
    );
}

#[test]
fn building_from_empty_document() {
    let context = DocumentContext::with_root(fixture_path(env!("CARGO_MANIFEST_DIR"), ""));
    let mut doc = context.load("empty.md").unwrap();

    doc.add_section("# New Section", Position::End).unwrap();
    doc.add_section("## New Sub Section", Position::End).unwrap();
    doc.add_line(0, "New Line", Position::End).unwrap();

    assert_eq!(doc.len(), 2);
    assert_eq!(doc.section(0).unwrap().heading(), "New Section");
    assert_eq!(
        doc.to_markdown().unwrap(),
        "# New Section\nNew Line\n## New Sub Section\n"
    );
}

#[test]
fn atomic_save_with_backup_keeps_previous_version() {
    let (dir, path) = copy_fixture(env!("CARGO_MANIFEST_DIR"), "metadata.md").unwrap();
    let config = test_config(dir.path()).with_write(WriteSettings {
        atomic: true,
        backup: true,
    });
    let context = DocumentContext::new(config);

    let original = fs::read_to_string(&path).unwrap();
    let mut doc = context.load("metadata.md").unwrap();
    doc.add_line(0, "- appended", Position::End).unwrap();
    context.save(&doc).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("metadata.md.bak")).unwrap(),
        original
    );
    assert!(fs::read_to_string(&path).unwrap().ends_with("- appended\n"));
}

#[test]
fn preview_reports_pending_changes_only() {
    let (dir, _path) = copy_fixture(env!("CARGO_MANIFEST_DIR"), "empty_section.md").unwrap();
    let context = DocumentContext::with_root(dir.path());

    let mut doc = context.load("empty_section.md").unwrap();
    assert_eq!(context.preview(&doc).unwrap(), None);

    doc.add_line(1, "Now filled.", Position::End).unwrap();
    let diff = context.preview(&doc).unwrap().unwrap();
    assert!(diff.contains("+Now filled."));
}

#[test]
fn round_trip_check_flags_normalised_input() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("clean.md"), "# Clean\n\nbody\n").unwrap();
    fs::write(dir.path().join("lossy.md"), "\n# Leading blank\n").unwrap();
    let context = DocumentContext::with_root(dir.path());

    assert_eq!(context.check_round_trip("clean.md").unwrap(), None);
    let diff = context.check_round_trip("lossy.md").unwrap().unwrap();
    assert!(diff.contains("\n-\n"));
}

#[test]
fn parse_str_and_load_agree() {
    let root = fixture_path(env!("CARGO_MANIFEST_DIR"), "");
    let content = fs::read_to_string(root.join("lorem.md")).unwrap();
    let parsed = Document::parse_str("lorem.md", &content).unwrap();
    let loaded = DocumentContext::with_root(&root).load("lorem.md").unwrap();
    assert_eq!(parsed, loaded);
}
