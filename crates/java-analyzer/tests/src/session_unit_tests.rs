use super::*;

use std::sync::Mutex;

use crate::protocol::{Position, Range};

fn session_with_roots(roots: Vec<PathBuf>) -> AnalysisSession {
    let config = AnalyzerConfig {
        source_roots: roots,
        ..Default::default()
    };
    AnalysisSession::new(Arc::new(config))
}

fn isolated_session() -> AnalysisSession {
    session_with_roots(vec![PathBuf::from("/nonexistent")])
}

fn lint(
    session: &mut AnalysisSession,
    source: SourceId,
    text: &str,
) -> Vec<FileDiagnostics> {
    session.begin_request();
    session.submit_and_analyze(source, Arc::from(text));
    session.finish_request()
}

fn messages(groups: &[FileDiagnostics]) -> Vec<String> {
    groups
        .iter()
        .flat_map(|group| group.diagnostics.iter().map(|d| d.message.clone()))
        .collect()
}

fn buffer(path: &str) -> SourceId {
    SourceId::Buffer(PathBuf::from(path))
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("java-analyzer-session-{name}"));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn clean_file_produces_no_diagnostics() {
    let mut session = isolated_session();
    let source = buffer("/w/A.java");
    let groups = lint(&mut session, source.clone(), "class A { int x; }");

    assert!(groups.is_empty(), "{groups:?}");
    assert_eq!(session.nerrors(), 0);
    assert!(session.unit(&source).is_some());
    assert_eq!(session.class_table().by_simple_name("A").len(), 1);
    assert_eq!(session.symbol_index().lookup("A").len(), 1);
}

#[test]
fn parse_errors_carry_positions() {
    let mut session = isolated_session();
    let groups = lint(&mut session, buffer("/w/A.java"), "class A {");

    assert_eq!(messages(&groups), ["expected '}'"]);
    let range = groups[0].diagnostics[0].range;
    assert_eq!(range, Range::new(Position::new(0, 9), Position::new(0, 9)));
}

#[test]
fn unresolved_names_are_reported() {
    let mut session = isolated_session();
    let groups = lint(&mut session, buffer("/w/A.java"), "class A { B b; }");

    assert_eq!(messages(&groups), ["cannot find symbol: B"]);
    assert_eq!(session.nerrors(), 1);
}

#[test]
fn attribution_errors_suppress_flow_analysis() {
    let mut session = isolated_session();
    let groups = lint(
        &mut session,
        buffer("/w/A.java"),
        "class A { void f() { int y; int z = y + missing; } }",
    );

    // `y` is read before assignment, but the unresolved name already
    // failed the run; flow must stay quiet.
    assert_eq!(messages(&groups), ["cannot find symbol: missing"]);
}

#[test]
fn flow_reports_uninitialized_reads() {
    let mut session = isolated_session();
    let groups = lint(
        &mut session,
        buffer("/w/A.java"),
        "class A { void f() { int y; int z = y + 1; } }",
    );

    assert_eq!(messages(&groups), ["variable y might not have been initialized"]);
}

#[test]
fn flow_reports_unreachable_statements() {
    let mut session = isolated_session();
    let groups = lint(
        &mut session,
        buffer("/w/A.java"),
        "class A { int f() { return 1; int x = 2; } }",
    );

    assert_eq!(messages(&groups), ["unreachable statement"]);
}

#[test]
fn duplicate_classes_across_files_are_reported() {
    let mut session = isolated_session();
    let first = lint(&mut session, buffer("/w/One.java"), "class Dup {}");
    assert!(first.is_empty());

    let second = lint(&mut session, buffer("/w/Two.java"), "class Dup {}");
    assert_eq!(messages(&second), ["duplicate class: Dup"]);
    assert_eq!(second[0].path, PathBuf::from("/w/Two.java"));
}

#[test]
fn resubmitting_the_same_text_is_idempotent() {
    let mut session = isolated_session();
    let source = buffer("/w/A.java");
    let text = "class A { void f() { int y; int z = y + 1; } }";

    let first = lint(&mut session, source.clone(), text);
    let second = lint(&mut session, source, text);

    assert_eq!(first, second);
    assert_eq!(session.class_table().by_simple_name("A").len(), 1);
    assert_eq!(session.symbol_index().lookup("A").len(), 1);
}

#[test]
fn buffer_and_disk_units_share_one_identity() {
    let mut session = isolated_session();
    let path = PathBuf::from("/w/A.java");
    lint(&mut session, SourceId::Buffer(path.clone()), "class A { int x; }");
    assert!(session.unit(&SourceId::Buffer(path.clone())).is_some());

    lint(&mut session, SourceId::Disk(path.clone()), "class A { int y; }");

    // Submitting the disk origin drops the buffer unit for the same path.
    assert!(session.unit(&SourceId::Buffer(path.clone())).is_none());
    assert!(session.unit(&SourceId::Disk(path)).is_some());
}

#[test]
fn error_counters_restart_on_invalidation() {
    let mut session = isolated_session();
    let source = buffer("/w/A.java");
    lint(&mut session, source.clone(), "class A { B b; }");
    assert_eq!(session.nerrors(), 1);

    lint(&mut session, source, "class A { int b; }");
    assert_eq!(session.nerrors(), 0);
}

#[test]
fn renamed_dependency_is_purged_across_files() {
    let dir = scratch_dir("renamed-dep");
    fs::write(dir.join("B.java"), "class B { int value; }").unwrap();

    let mut session = session_with_roots(vec![dir.clone()]);
    let a_source = SourceId::Buffer(dir.join("A.java"));

    // Resolving `B` pulls the file in from the source root.
    let groups = lint(&mut session, a_source.clone(), "class A { B b; }");
    assert!(groups.is_empty(), "{groups:?}");
    let b_disk = SourceId::Disk(dir.join("B.java"));
    assert!(session.unit(&b_disk).is_some());
    assert_eq!(session.symbol_index().lookup("B").len(), 1);

    // The class disappears from B.java; its old row must not linger.
    fs::write(dir.join("B.java"), "class Renamed {}").unwrap();
    let groups = lint(&mut session, b_disk, "class Renamed {}");
    assert!(groups.is_empty(), "{groups:?}");
    assert!(session.symbol_index().lookup("B").is_empty());
    assert_eq!(session.symbol_index().lookup("Renamed").len(), 1);

    let groups = lint(&mut session, a_source, "class A { B b; }");
    assert_eq!(messages(&groups), ["cannot find symbol: B"]);
    assert_eq!(groups[0].path, dir.join("A.java"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn reset_run_state_drops_the_collector() {
    let mut session = isolated_session();
    session.begin_request();
    session.submit_and_analyze(buffer("/w/A.java"), Arc::from("class A {"));
    session.reset_run_state();

    assert!(session.finish_request().is_empty());
    assert_eq!(session.nerrors(), 0);
}

struct Recorder {
    phase: Phase,
    seen: Arc<Mutex<Vec<(String, bool)>>>,
}

impl Recorder {
    fn install(phase: Phase) -> (Box<dyn PhaseHook>, Arc<Mutex<Vec<(String, bool)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let hook = Box::new(Recorder {
            phase,
            seen: Arc::clone(&seen),
        });
        (hook, seen)
    }
}

impl PhaseHook for Recorder {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn visit(
        &mut self,
        unit: &UnitView<'_>,
    ) {
        self.seen.lock().unwrap().push((
            unit.source.path().display().to_string(),
            unit.resolutions.is_some(),
        ));
    }
}

#[test]
fn hooks_fire_per_phase_and_see_resolutions_only_at_analyze() {
    let mut session = isolated_session();
    let (parse_hook, parse_seen) = Recorder::install(Phase::Parse);
    let (enter_hook, enter_seen) = Recorder::install(Phase::Enter);
    let (analyze_hook, analyze_seen) = Recorder::install(Phase::Analyze);
    session.set_hooks(vec![parse_hook, enter_hook, analyze_hook]);

    lint(&mut session, buffer("/w/A.java"), "class A { int x; }");

    assert_eq!(*parse_seen.lock().unwrap(), [("/w/A.java".to_string(), false)]);
    assert_eq!(*enter_seen.lock().unwrap(), [("/w/A.java".to_string(), false)]);
    assert_eq!(*analyze_seen.lock().unwrap(), [("/w/A.java".to_string(), true)]);

    // The request dropped its hooks; another run records nothing.
    lint(&mut session, buffer("/w/A.java"), "class A { int x; }");
    assert_eq!(analyze_seen.lock().unwrap().len(), 1);
}

#[test]
fn set_hooks_replaces_the_registry_wholesale() {
    let mut session = isolated_session();
    let (stale_hook, stale_seen) = Recorder::install(Phase::Analyze);
    session.set_hooks(vec![stale_hook]);
    let (live_hook, live_seen) = Recorder::install(Phase::Analyze);
    session.set_hooks(vec![live_hook]);

    lint(&mut session, buffer("/w/A.java"), "class A {}");

    assert!(stale_seen.lock().unwrap().is_empty());
    assert_eq!(live_seen.lock().unwrap().len(), 1);
}
