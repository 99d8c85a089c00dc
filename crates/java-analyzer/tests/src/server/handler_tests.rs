use super::*;

use serde_json::json;

fn handler() -> RequestHandler {
    let config = AnalyzerConfig {
        source_roots: vec![PathBuf::from("/nonexistent")],
        ..Default::default()
    };
    RequestHandler::new(Arc::new(config))
}

#[tokio::test]
async fn echo_round_trips_the_payload() {
    let response = handler()
        .handle_line(r#"{"requestId":1,"kind":"echo","payload":{"ping":true}}"#)
        .await;
    assert_eq!(response, r#"{"requestId":1,"echo":{"ping":true}}"#);
}

#[tokio::test]
async fn malformed_request_keeps_the_request_id() {
    let response = handler().handle_line(r#"{"requestId":9,"kind":"nope"}"#).await;
    let value: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(value["requestId"], 9);
    let message = value["errorMessage"].as_str().unwrap();
    assert!(message.starts_with("malformed request"), "{message}");
}

#[tokio::test]
async fn malformed_request_without_id_still_answers() {
    let response = handler().handle_line("not json").await;
    let value: Value = serde_json::from_str(&response).unwrap();
    assert!(value.get("requestId").is_none());
    let message = value["errorMessage"].as_str().unwrap();
    assert!(message.starts_with("malformed request"), "{message}");
}

#[tokio::test]
async fn lint_reports_wire_positions() {
    let line = json!({
        "requestId": 3,
        "kind": "lint",
        "path": "/w/A.java",
        "text": "class A {\n    int x = ;\n}\n",
    })
    .to_string();

    let response = handler().handle_line(&line).await;
    let value: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(value["requestId"], 3);
    assert_eq!(value["diagnostics"][0]["path"], "/w/A.java");
    let diagnostic = &value["diagnostics"][0]["diagnostics"][0];
    assert_eq!(diagnostic["message"], "expected expression");
    assert_eq!(diagnostic["severity"], "error");
    assert_eq!(diagnostic["range"]["start"], json!({"line": 1, "character": 12}));
    assert_eq!(diagnostic["range"]["end"], json!({"line": 1, "character": 13}));
}

#[tokio::test]
async fn clean_lint_answers_with_an_empty_group_list() {
    let line = json!({
        "requestId": 4,
        "kind": "lint",
        "path": "/w/A.java",
        "text": "class A { int x; }",
    })
    .to_string();

    let response = handler().handle_line(&line).await;
    let value: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(value["diagnostics"], json!([]));
    assert!(value.get("errorMessage").is_none());
}

#[tokio::test]
async fn lint_without_text_needs_a_readable_file() {
    let line = json!({
        "requestId": 5,
        "kind": "lint",
        "path": "/nonexistent/Zero.java",
    })
    .to_string();

    let response = handler().handle_line(&line).await;
    let value: Value = serde_json::from_str(&response).unwrap();
    let message = value["errorMessage"].as_str().unwrap();
    assert!(message.starts_with("cannot read"), "{message}");
}

#[tokio::test]
async fn complete_over_the_wire() {
    let text = "class A { int foo; void run() { this.f } }";
    let character = (text.find("this.f").unwrap() + 6) as u32;
    let line = json!({
        "requestId": 6,
        "kind": "complete",
        "path": "/w/A.java",
        "text": text,
        "cursor": {"line": 0, "character": character},
    })
    .to_string();

    let response = handler().handle_line(&line).await;
    let value: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(value["completions"], json!([{"name": "foo", "kind": "field"}]));
}

#[tokio::test]
async fn definition_over_the_wire() {
    let text = "class A { int count; int f() { return count; } }";
    let character = (text.find("return count").unwrap() + "return cou".len()) as u32;
    let line = json!({
        "requestId": 7,
        "kind": "definition",
        "path": "/w/A.java",
        "text": text,
        "cursor": {"line": 0, "character": character},
    })
    .to_string();

    let response = handler().handle_line(&line).await;
    let value: Value = serde_json::from_str(&response).unwrap();
    let location = &value["definitionLocations"][0];
    assert_eq!(location["uri"], "file:///w/A.java");
    let declaration = (text.find("int count").unwrap() + 4) as u32;
    assert_eq!(location["range"]["start"], json!({"line": 0, "character": declaration}));
    assert_eq!(location["range"]["end"], json!({"line": 0, "character": declaration + 5}));
}

#[test]
fn panic_messages_for_common_payloads() {
    let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
    assert_eq!(panic_message(boxed.as_ref()), "boom");
    let boxed: Box<dyn std::any::Any + Send> = Box::new("kaput".to_string());
    assert_eq!(panic_message(boxed.as_ref()), "kaput");
    let boxed: Box<dyn std::any::Any + Send> = Box::new(7_i32);
    assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
}

#[test]
fn preview_truncates_on_char_boundaries() {
    assert_eq!(preview("hello"), "hello");

    let long = "x".repeat(LOG_PREVIEW_LEN + 50);
    let cut = preview(&long);
    assert_eq!(cut.len(), LOG_PREVIEW_LEN + 3);
    assert!(cut.ends_with("..."));

    // A multibyte char straddling the limit moves the cut backwards.
    let mut tricky = "x".repeat(LOG_PREVIEW_LEN - 1);
    tricky.push('é');
    tricky.push_str("tail");
    let cut = preview(&tricky);
    assert!(cut.len() < LOG_PREVIEW_LEN + 3, "{}", cut.len());
    assert!(cut.ends_with("..."));
}

#[test]
fn request_id_recovery_from_broken_lines() {
    assert_eq!(recover_request_id(r#"{"requestId":5,"kind":"nope"}"#), Some(5));
    assert_eq!(recover_request_id("not json"), None);
    assert_eq!(recover_request_id(r#"{"requestId":"five"}"#), None);
}

#[test]
fn file_uris_are_absolute() {
    assert_eq!(file_uri(Path::new("/tmp/Foo.java")), "file:///tmp/Foo.java");
}
