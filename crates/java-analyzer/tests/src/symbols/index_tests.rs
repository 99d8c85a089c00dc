use super::*;

use rowan::{TextRange, TextSize};

use crate::source::SourceId;
use crate::symbols::DeclKind;

fn entry(
    index: &SymbolIndex,
    path: &str,
    name: &str,
    qualified: &str,
) -> SymbolEntry {
    SymbolEntry {
        owner: SourceId::Disk(PathBuf::from(path)),
        name: name.to_string(),
        qualified_name: qualified.to_string(),
        name_range: TextRange::empty(TextSize::from(0)),
        kind: DeclKind::Class,
        generation: index.generation(Path::new(path)),
    }
}

#[test]
fn fresh_paths_start_at_generation_zero() {
    let index = SymbolIndex::new();
    assert_eq!(index.generation(Path::new("/w/A.java")), 0);
}

#[test]
fn purge_bumps_the_generation_per_path() {
    let index = SymbolIndex::new();
    assert_eq!(index.purge_path(Path::new("/w/A.java")), 1);
    assert_eq!(index.purge_path(Path::new("/w/A.java")), 2);
    assert_eq!(index.generation(Path::new("/w/A.java")), 2);
    assert_eq!(index.generation(Path::new("/w/B.java")), 0);
    assert_eq!(index.purge_path(Path::new("/w/B.java")), 1);
}

#[test]
fn insert_then_lookup_returns_the_row() {
    let index = SymbolIndex::new();
    index.insert(entry(&index, "/w/List.java", "List", "com.app.List"));

    let rows = index.lookup("List");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].qualified_name, "com.app.List");
    assert!(index.lookup("Missing").is_empty());
}

#[test]
fn purge_physically_removes_owned_rows() {
    let index = SymbolIndex::new();
    index.insert(entry(&index, "/w/A.java", "A", "p.A"));
    index.purge_path(Path::new("/w/A.java"));

    assert!(index.lookup("A").is_empty());
    assert!(index.rows_for_path(Path::new("/w/A.java")).is_empty());
}

#[test]
fn rows_from_a_superseded_generation_are_filtered() {
    let index = SymbolIndex::new();
    index.purge_path(Path::new("/w/A.java"));

    // A late writer still holding the old generation number.
    let mut stale = entry(&index, "/w/A.java", "A", "p.A");
    stale.generation = 0;
    index.insert(stale);

    assert!(index.lookup("A").is_empty());
    assert!(index.names_with_prefix("A").is_empty());
    // The row is physically present; only the lookups hide it.
    assert_eq!(index.rows_for_path(Path::new("/w/A.java")).len(), 1);
}

#[test]
fn lookup_qualified_filters_on_the_full_name() {
    let index = SymbolIndex::new();
    index.insert(entry(&index, "/dep/List.java", "List", "java.util.List"));
    index.insert(entry(&index, "/w/List.java", "List", "com.app.List"));

    assert_eq!(index.lookup("List").len(), 2);
    let rows = index.lookup_qualified("java.util.List");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].owner.path(), Path::new("/dep/List.java"));
    // The two homonyms collapse to one name in prefix search.
    assert_eq!(index.names_with_prefix("List"), ["List"]);
}

#[test]
fn rows_for_path_sorts_by_qualified_name() {
    let index = SymbolIndex::new();
    index.insert(entry(&index, "/w/Pair.java", "Zeta", "p.Zeta"));
    index.insert(entry(&index, "/w/Pair.java", "Alpha", "p.Alpha"));

    let rows = index.rows_for_path(Path::new("/w/Pair.java"));
    let qualified: Vec<&str> = rows.iter().map(|row| row.qualified_name.as_str()).collect();
    assert_eq!(qualified, ["p.Alpha", "p.Zeta"]);
}

#[test]
fn names_with_prefix_is_sorted_and_case_sensitive() {
    let index = SymbolIndex::new();
    index.insert(entry(&index, "/w/Listener.java", "Listener", "p.Listener"));
    index.insert(entry(&index, "/dep/List.java", "List", "java.util.List"));
    index.insert(entry(&index, "/w/Lint.java", "lint", "p.lint"));

    assert_eq!(index.names_with_prefix("Li"), ["List", "Listener"]);
    assert!(index.names_with_prefix("li").contains(&"lint".to_string()));
}

#[test]
fn generations_are_independent_per_path() {
    let index = SymbolIndex::new();
    index.insert(entry(&index, "/w/A.java", "A", "p.A"));
    index.purge_path(Path::new("/w/B.java"));

    assert_eq!(index.lookup("A").len(), 1);
}
