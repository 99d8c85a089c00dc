//! Turns pipeline reports into wire diagnostics.
//!
//! The pipeline speaks in one-based lines and columns with optional byte
//! offsets into the snapshot it analyzed. The wire speaks in zero-based
//! positions. Conversion happens the moment a report arrives, because the
//! snapshot a report points into can be replaced before the request
//! finishes.

use std::path::PathBuf;
use std::sync::Arc;

use crate::protocol::{Diagnostic, FileDiagnostics, Position, Range, Severity};
use crate::source::SourceId;

/// One problem exactly as a pipeline phase reported it.
#[derive(Debug, Clone)]
pub struct RawDiagnostic {
    pub source: SourceId,
    pub snapshot: Arc<str>,
    /// One-based; zero means the phase had no position.
    pub line: u32,
    /// One-based; zero means the phase had no position.
    pub column: u32,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub message: String,
    pub severity: Severity,
}

/// Accumulates converted diagnostics for one request.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    entries: Vec<(SourceId, Diagnostic)>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(
        &mut self,
        raw: RawDiagnostic,
    ) {
        let range = derive_range(&raw);
        let diagnostic = Diagnostic {
            range,
            message: raw.message,
            severity: raw.severity,
        };
        self.entries.push((raw.source, diagnostic));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Group by file path, files and entries both in arrival order.
    pub fn finalize(self) -> Vec<FileDiagnostics> {
        let mut groups: Vec<(PathBuf, Vec<Diagnostic>)> = Vec::new();
        for (source, diagnostic) in self.entries {
            let path = source.path().to_path_buf();
            match groups.iter_mut().find(|(existing, _)| *existing == path) {
                Some((_, list)) => list.push(diagnostic),
                None => groups.push((path, vec![diagnostic])),
            }
        }
        groups
            .into_iter()
            .map(|(path, diagnostics)| FileDiagnostics { path, diagnostics })
            .collect()
    }
}

fn derive_range(raw: &RawDiagnostic) -> Range {
    if raw.line == 0 || raw.column == 0 {
        return Range::NONE;
    }
    let start = Position::new(raw.line - 1, raw.column - 1);
    let end = match (raw.start, raw.end) {
        (Some(begin), Some(finish)) if finish > begin => {
            match raw.snapshot.get(begin..finish) {
                // Walk the covered text so the end position lands on the
                // right line even when the span crosses newlines.
                Some(span) => {
                    let mut line = start.line;
                    let mut character = start.character;
                    for ch in span.chars() {
                        if ch == '\n' {
                            line += 1;
                            character = 0;
                        } else {
                            character += ch.len_utf16() as u32;
                        }
                    }
                    Position::new(line, character)
                },
                None => start,
            }
        },
        _ => start,
    };
    Range { start, end }
}

/// Per-run report channel with the counters the pipeline consults between
/// phases.
#[derive(Debug, Default)]
pub struct RunLog {
    pub nerrors: u32,
    pub nwarnings: u32,
    collector: Option<DiagnosticCollector>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh collector for the next run, replacing any previous
    /// one wholesale.
    pub fn install_collector(&mut self) {
        self.collector = Some(DiagnosticCollector::new());
    }

    pub fn take_collector(&mut self) -> Option<DiagnosticCollector> {
        self.collector.take()
    }

    pub fn report(
        &mut self,
        raw: RawDiagnostic,
    ) {
        match raw.severity {
            Severity::Error => self.nerrors += 1,
            Severity::Warning => self.nwarnings += 1,
            Severity::Note => {},
        }
        if let Some(collector) = &mut self.collector {
            collector.collect(raw);
        }
    }

    pub fn reset_counts(&mut self) {
        self.nerrors = 0;
        self.nwarnings = 0;
    }
}

#[cfg(test)]
#[path = "../tests/src/diagnostics_tests.rs"]
mod tests;
