#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use java_analyzer::protocol::Position;
use java_analyzer::{AnalysisSession, AnalyzerConfig, RequestHandler};

/// A fresh directory under the system temp root, wiped from any earlier
/// run of the same test.
pub fn scratch_workspace(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("java-analyzer-it-{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch workspace");
    dir
}

pub fn write_source(
    root: &Path,
    relative: &str,
    text: &str,
) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create source dir");
    }
    std::fs::write(&path, text).expect("write source file");
    path
}

pub fn config_over(roots: Vec<PathBuf>) -> Arc<AnalyzerConfig> {
    Arc::new(AnalyzerConfig {
        source_roots: roots,
        ..Default::default()
    })
}

pub fn handler_over(roots: Vec<PathBuf>) -> RequestHandler {
    RequestHandler::new(config_over(roots))
}

/// A handler whose lookup roots resolve nothing.
pub fn isolated_handler() -> RequestHandler {
    handler_over(vec![PathBuf::from("/nonexistent")])
}

pub fn session_over(roots: Vec<PathBuf>) -> AnalysisSession {
    AnalysisSession::new(config_over(roots))
}

pub fn isolated_session() -> AnalysisSession {
    session_over(vec![PathBuf::from("/nonexistent")])
}

pub fn wire_position(
    source: &str,
    offset: usize,
) -> Position {
    let before = &source[..offset];
    let line = before.bytes().filter(|&b| b == b'\n').count() as u32;
    let tail = before.rsplit_once('\n').map(|(_, tail)| tail).unwrap_or(before);
    Position::new(line, tail.encode_utf16().count() as u32)
}

pub fn position_of(
    source: &str,
    needle: &str,
) -> Position {
    position_of_nth(source, needle, 0)
}

pub fn position_of_nth(
    source: &str,
    needle: &str,
    nth: usize,
) -> Position {
    assert!(!needle.is_empty(), "needle must not be empty");
    let mut from = 0usize;
    for _ in 0..nth {
        let idx = source[from..].find(needle).unwrap_or_else(|| panic!("needle not found: {needle}"));
        from += idx + needle.len();
    }
    let idx = source[from..].find(needle).unwrap_or_else(|| panic!("needle not found: {needle}"));
    wire_position(source, from + idx)
}

/// Wire position just past the first occurrence of `needle`.
pub fn position_after(
    source: &str,
    needle: &str,
) -> Position {
    let offset = source.find(needle).unwrap_or_else(|| panic!("needle not found: {needle}")) + needle.len();
    wire_position(source, offset)
}
