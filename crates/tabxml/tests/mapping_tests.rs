use std::fs;

use indexmap::IndexMap;
use tabxml::mapping::{LoadError, MappingError};
use tabxml::{ErrorKind, MappingTable, NamespaceBindings};

fn raw(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn bindings_with(declarations: &[&str]) -> NamespaceBindings {
    NamespaceBindings {
        namespaces: IndexMap::new(),
        declarations: declarations.iter().map(|d| d.to_string()).collect(),
    }
}

#[test]
fn test_namespace_wrapping_roundtrip() {
    // Property 5: a bare qualified name is wrapped with the declaration
    // tag and the result parses.
    let bindings = bindings_with(&["<ns:Data xmlns:ns=\"urn:x\">"]);
    let table = MappingTable::validate(raw(&[("Field", "ns:field")]), &bindings)
        .unwrap_or_default();
    assert_eq!(
        table.fragment("Field"),
        Some("<ns:Data xmlns:ns=\"urn:x\"><ns:field>?</ns:field></ns:Data>")
    );
}

#[test]
fn test_wrapping_is_innermost_to_outermost() {
    // The last declaration found becomes the outermost wrapper.
    let bindings = bindings_with(&[
        "<outer:Data xmlns:outer=\"urn:o\">",
        "<inner:Meta xmlns:inner=\"urn:i\">",
    ]);
    let table =
        MappingTable::validate(raw(&[("F", "<x>?</x>")]), &bindings).unwrap_or_default();
    assert_eq!(
        table.fragment("F"),
        Some(
            "<outer:Data xmlns:outer=\"urn:o\"><inner:Meta xmlns:inner=\"urn:i\"><x>?</x></inner:Meta></outer:Data>"
        )
    );
}

#[test]
fn test_none_entries_are_excluded() {
    // Property 6: any-case `none` never reaches the validated table.
    let table = MappingTable::validate(
        raw(&[("A", "title"), ("B", "NONE"), ("C", " None ")]),
        &NamespaceBindings::default(),
    )
    .unwrap_or_default();
    assert_eq!(table.len(), 1);
    assert!(table.fragment("A").is_some());
    assert!(table.fragment("B").is_none());
    assert!(table.fragment("C").is_none());
}

#[test]
fn test_all_malformed_entries_are_reported() {
    // Property 9: validation is batched, both problems surface.
    let result = MappingTable::validate(
        raw(&[
            ("Good", "title"),
            ("BadOne", "<a>?"),
            ("BadTwo", "<b>?</c>"),
        ]),
        &NamespaceBindings::default(),
    );
    let errors = result.err().unwrap_or_default();
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        errors.first(),
        Some(MappingError::Malformed { column: 2, .. })
    ));
    assert!(matches!(
        errors.get(1),
        Some(MappingError::Malformed { column: 3, .. })
    ));
}

#[test]
fn test_empty_header_and_value_are_reported_together() {
    let result = MappingTable::validate(
        raw(&[("", "title"), ("Date", "  ")]),
        &NamespaceBindings::default(),
    );
    let errors = result.err().unwrap_or_default();
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        errors.first(),
        Some(MappingError::EmptyHeader { column: 1 })
    ));
    assert!(matches!(
        errors.get(1),
        Some(MappingError::EmptyFragment { column: 2, .. })
    ));
}

#[test]
fn test_malformed_report_names_header_and_fragment() {
    let result = MappingTable::validate(
        raw(&[("Creator", "<author>?")]),
        &NamespaceBindings::default(),
    );
    let errors = result.err().unwrap_or_default();
    let message = errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_default();
    assert!(message.contains("Creator"));
    assert!(message.contains("<author>?"));
}

#[test]
fn test_headers_only_file_is_rejected() -> std::io::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mapping.csv");
    fs::write(&path, "Cote;Title;Authors\n")?;

    let result = MappingTable::load(&path, &NamespaceBindings::default());
    match result {
        Err(LoadError::Read(error)) => {
            assert!(matches!(error.kind(), ErrorKind::MissingRow { .. }));
            assert!(error.to_string().contains("no data row"));
        }
        other => panic!("expected a missing-row failure, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_nested_fragment_passes_validation() {
    let table = MappingTable::validate(
        raw(&[(
            "Creator",
            "<fileDesc><titleStmt><author key=\"\">?</author></titleStmt></fileDesc>",
        )]),
        &NamespaceBindings::default(),
    )
    .unwrap_or_default();
    assert_eq!(table.len(), 1);
}
