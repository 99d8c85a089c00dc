pub mod attr;
pub mod builtins;
pub mod enter;
pub mod flow;
pub mod symbol;

use rowan::TextRange;

use crate::diagnostics::RawDiagnostic;
use crate::protocol::Severity;
use crate::source::SourceId;
use crate::text_pos::LineIndex;

/// Build a pipeline report for a span. Phases speak in byte offsets; the
/// report carries the one-based line and column the collector expects,
/// both derived from the same snapshot the offsets index into.
pub(crate) fn error_at(
    source: &SourceId,
    index: &LineIndex,
    range: TextRange,
    message: String,
    severity: Severity,
) -> RawDiagnostic {
    let start: usize = range.start().into();
    let end: usize = range.end().into();
    let position = index.position_of(start);
    RawDiagnostic {
        source: source.clone(),
        snapshot: index.text().clone(),
        line: position.line + 1,
        column: position.character + 1,
        start: Some(start),
        end: Some(end),
        message,
        severity,
    }
}
