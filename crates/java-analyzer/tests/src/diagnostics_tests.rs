use super::*;

fn raw(
    source: SourceId,
    snapshot: &str,
    line: u32,
    column: u32,
    span: Option<(usize, usize)>,
    message: &str,
    severity: Severity,
) -> RawDiagnostic {
    RawDiagnostic {
        source,
        snapshot: Arc::from(snapshot),
        line,
        column,
        start: span.map(|(start, _)| start),
        end: span.map(|(_, end)| end),
        message: message.to_string(),
        severity,
    }
}

fn buffer(path: &str) -> SourceId {
    SourceId::Buffer(PathBuf::from(path))
}

#[test]
fn converts_one_based_reports_to_zero_based_ranges() {
    let snapshot = "class A {\n    int x = ;\n}\n";
    let mut collector = DiagnosticCollector::new();
    collector.collect(raw(
        buffer("/w/A.java"),
        snapshot,
        2,
        13,
        Some((22, 23)),
        "expected expression",
        Severity::Error,
    ));

    let groups = collector.finalize();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].path, PathBuf::from("/w/A.java"));
    let diagnostic = &groups[0].diagnostics[0];
    assert_eq!(diagnostic.range, Range::new(Position::new(1, 12), Position::new(1, 13)));
    assert_eq!(diagnostic.message, "expected expression");
    assert_eq!(diagnostic.severity, Severity::Error);
}

#[test]
fn report_without_position_gets_the_none_range() {
    let mut collector = DiagnosticCollector::new();
    collector.collect(raw(buffer("/w/A.java"), "", 0, 0, None, "no position", Severity::Error));
    collector.collect(raw(buffer("/w/A.java"), "", 1, 0, None, "no column", Severity::Warning));

    let groups = collector.finalize();
    assert_eq!(groups[0].diagnostics[0].range, Range::NONE);
    assert_eq!(groups[0].diagnostics[1].range, Range::NONE);
}

#[test]
fn span_end_walks_across_newlines() {
    let mut collector = DiagnosticCollector::new();
    collector.collect(raw(buffer("/w/A.java"), "ab\ncd", 1, 1, Some((0, 4)), "multi", Severity::Error));

    let groups = collector.finalize();
    assert_eq!(groups[0].diagnostics[0].range, Range::new(Position::new(0, 0), Position::new(1, 1)));
}

#[test]
fn bad_spans_collapse_to_the_start_position() {
    let mut collector = DiagnosticCollector::new();
    // Span past the snapshot.
    collector.collect(raw(buffer("/w/A.java"), "ab", 1, 2, Some((0, 10)), "oob", Severity::Error));
    // Inverted span.
    collector.collect(raw(buffer("/w/A.java"), "ab", 1, 2, Some((5, 3)), "inverted", Severity::Error));

    let groups = collector.finalize();
    let start = Position::new(0, 1);
    assert_eq!(groups[0].diagnostics[0].range, Range::new(start, start));
    assert_eq!(groups[0].diagnostics[1].range, Range::new(start, start));
}

#[test]
fn finalize_groups_by_path_in_arrival_order() {
    let mut collector = DiagnosticCollector::new();
    collector.collect(raw(
        SourceId::Disk(PathBuf::from("/w/B.java")),
        "",
        0,
        0,
        None,
        "first",
        Severity::Error,
    ));
    collector.collect(raw(buffer("/w/A.java"), "", 0, 0, None, "second", Severity::Error));
    // Buffer and disk origins for the same path share one group.
    collector.collect(raw(buffer("/w/B.java"), "", 0, 0, None, "third", Severity::Warning));
    assert_eq!(collector.len(), 3);

    let groups = collector.finalize();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].path, PathBuf::from("/w/B.java"));
    assert_eq!(groups[1].path, PathBuf::from("/w/A.java"));
    let messages: Vec<&str> = groups[0].diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, ["first", "third"]);
}

#[test]
fn run_log_counts_errors_and_warnings_only() {
    let mut log = RunLog::new();
    log.report(raw(buffer("/w/A.java"), "", 0, 0, None, "e1", Severity::Error));
    log.report(raw(buffer("/w/A.java"), "", 0, 0, None, "w1", Severity::Warning));
    log.report(raw(buffer("/w/A.java"), "", 0, 0, None, "n1", Severity::Note));
    log.report(raw(buffer("/w/A.java"), "", 0, 0, None, "e2", Severity::Error));

    assert_eq!(log.nerrors, 2);
    assert_eq!(log.nwarnings, 1);
}

#[test]
fn run_log_feeds_the_installed_collector() {
    let mut log = RunLog::new();
    // Reporting without a collector only counts.
    log.report(raw(buffer("/w/A.java"), "", 0, 0, None, "dropped", Severity::Error));

    log.install_collector();
    log.report(raw(buffer("/w/A.java"), "", 0, 0, None, "kept", Severity::Error));

    let collector = log.take_collector().expect("collector was installed");
    assert_eq!(collector.len(), 1);
    assert!(log.take_collector().is_none());
}

#[test]
fn reset_counts_leaves_the_collector_alone() {
    let mut log = RunLog::new();
    log.install_collector();
    log.report(raw(buffer("/w/A.java"), "", 0, 0, None, "kept", Severity::Error));

    log.reset_counts();
    assert_eq!(log.nerrors, 0);
    assert_eq!(log.nwarnings, 0);

    let collector = log.take_collector().expect("collector survives a counter reset");
    assert!(!collector.is_empty());
}
