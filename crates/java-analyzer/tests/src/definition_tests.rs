use super::*;

use std::path::PathBuf;
use std::sync::Arc;

use rowan::TextRange;

use crate::config::AnalyzerConfig;
use crate::sema::symbol::SymbolRef;
use crate::session::AnalysisSession;
use crate::source::SourceId;

fn source() -> SourceId {
    SourceId::Buffer(PathBuf::from("/w/A.java"))
}

/// Runs the pipeline over `text` with the definition hook anchored right
/// after the first occurrence of `needle`.
fn definitions_after(
    text: &str,
    needle: &str,
) -> Vec<SymbolRef> {
    let offset = text.find(needle).expect("needle not in text") + needle.len();
    let config = AnalyzerConfig {
        source_roots: vec![PathBuf::from("/nonexistent")],
        ..Default::default()
    };
    let mut session = AnalysisSession::new(Arc::new(config));
    let (visitor, results) = DefinitionVisitor::new(source(), offset);
    session.set_hooks(vec![Box::new(visitor)]);
    session.begin_request();
    session.submit_and_analyze(source(), Arc::from(text));
    session.finish_request();

    let collected = results.lock().unwrap().clone();
    collected
}

/// The range of `ident` directly behind the first `prefix` in `text`.
fn span_after(
    text: &str,
    prefix: &str,
    ident: &str,
) -> TextRange {
    let start = text.find(prefix).expect("prefix not in text") + prefix.len();
    assert_eq!(&text[start..start + ident.len()], ident);
    TextRange::new((start as u32).into(), ((start + ident.len()) as u32).into())
}

fn decl_ref(range: TextRange) -> SymbolRef {
    SymbolRef {
        target: source(),
        name_range: range,
    }
}

#[test]
fn local_use_jumps_to_its_declarator() {
    let text = "class A { void f() { int total = 1; int twice = total + 1; } }";
    assert_eq!(
        definitions_after(text, "= tot"),
        [decl_ref(span_after(text, "int ", "total"))],
    );
}

#[test]
fn field_use_jumps_to_the_field_name() {
    let text = "class A { int count; int f() { return count; } }";
    assert_eq!(
        definitions_after(text, "return cou"),
        [decl_ref(span_after(text, "int ", "count"))],
    );
}

#[test]
fn parameter_use_jumps_to_the_parameter() {
    let text = "class A { int dbl(int seed) { return seed + seed; } }";
    assert_eq!(
        definitions_after(text, "return see"),
        [decl_ref(span_after(text, "dbl(int ", "seed"))],
    );
}

#[test]
fn overloaded_call_returns_every_declaration() {
    let text = "class A { void go() {} void go(int x) {} void f() { go(1); } }";
    assert_eq!(
        definitions_after(text, "{ go"),
        [
            decl_ref(span_after(text, "A { void ", "go")),
            decl_ref(span_after(text, "{} void ", "go")),
        ],
    );
}

#[test]
fn type_reference_jumps_to_the_class_name() {
    let text = "class B {} class A { B b; }";
    assert_eq!(
        definitions_after(text, "A { B"),
        [decl_ref(span_after(text, "class ", "B"))],
    );
}

#[test]
fn class_name_locates_itself() {
    let text = "class Account { }";
    assert_eq!(
        definitions_after(text, "class Acc"),
        [decl_ref(span_after(text, "class ", "Account"))],
    );
}

#[test]
fn method_name_locates_itself() {
    let text = "class A { void act() {} }";
    assert_eq!(
        definitions_after(text, "void ac"),
        [decl_ref(span_after(text, "void ", "act"))],
    );
}

#[test]
fn parameter_name_locates_itself() {
    let text = "class A { void f(int seed) { } }";
    assert_eq!(
        definitions_after(text, "int see"),
        [decl_ref(span_after(text, "int ", "seed"))],
    );
}

#[test]
fn local_declarator_locates_itself() {
    let text = "class A { void f() { int item = 1; } }";
    assert_eq!(
        definitions_after(text, "int ite"),
        [decl_ref(span_after(text, "int ", "item"))],
    );
}

#[test]
fn keywords_and_punctuation_locate_nothing() {
    let text = "class A { int x; }";
    assert!(definitions_after(text, "{ in").is_empty());
    assert!(definitions_after(text, "x;").is_empty());
}
