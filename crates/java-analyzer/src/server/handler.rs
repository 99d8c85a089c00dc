use std::fs;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::completion::CompletionVisitor;
use crate::config::{self, AnalyzerConfig};
use crate::definition::DefinitionVisitor;
use crate::protocol::{Location, Position, Range, Request, RequestPayload, Response};
use crate::sema::symbol::SymbolRef;
use crate::session::AnalysisSession;
use crate::source::SourceId;
use crate::text_pos::LineIndex;

const LOG_PREVIEW_LEN: usize = 200;

/// Owns the analysis session and answers one request at a time. The
/// session is globally stateful and non-re-entrant, so every request
/// takes the lock for its whole pipeline run.
pub struct RequestHandler {
    session: Mutex<AnalysisSession>,
}

impl RequestHandler {
    pub fn new(config: Arc<AnalyzerConfig>) -> Self {
        if let Some(output_root) = config.output_root.clone() {
            let cleared = config::reset_output_artifacts(&output_root);
            info!(root = %output_root.display(), cleared, "reset stale build artifacts");
        }
        Self {
            session: Mutex::new(AnalysisSession::new(config)),
        }
    }

    /// One request line in, one response line out. A panic anywhere in
    /// the pipeline becomes an error response and the session is left
    /// purged, never a dead process.
    pub async fn handle_line(
        &self,
        line: &str,
    ) -> String {
        debug!(request = %preview(line), "request");
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(error) => {
                let request_id = recover_request_id(line);
                let response = Response::error(request_id, format!("malformed request: {error}"));
                return serialize(&response);
            },
        };
        let request_id = request.request_id;
        let outcome = AssertUnwindSafe(self.dispatch(request)).catch_unwind().await;
        let response = match outcome {
            Ok(response) => response,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(%message, "request panicked");
                self.session.lock().await.reset_run_state();
                Response::error(request_id, format!("internal error: {message}"))
            },
        };
        let json = serialize(&response);
        debug!(response = %preview(&json), "response");
        json
    }

    async fn dispatch(
        &self,
        request: Request,
    ) -> Response {
        let request_id = request.request_id;
        match request.payload {
            RequestPayload::Echo {
                payload,
            } => Response::echo(request_id, payload),
            RequestPayload::Lint {
                path,
                text,
            } => self.lint(request_id, path, text).await,
            RequestPayload::Complete {
                path,
                text,
                cursor,
            } => self.complete(request_id, path, text, cursor).await,
            RequestPayload::Definition {
                path,
                text,
                cursor,
            } => self.definition(request_id, path, text, cursor).await,
        }
    }

    async fn lint(
        &self,
        request_id: Option<i64>,
        path: PathBuf,
        text: Option<String>,
    ) -> Response {
        let (source, text) = match text {
            Some(text) => (SourceId::Buffer(path), Arc::<str>::from(text)),
            None => match fs::read_to_string(&path) {
                Ok(content) => {
                    let text = Arc::<str>::from(content);
                    (SourceId::Disk(path), text)
                },
                Err(error) => {
                    let message = format!("cannot read {}: {error}", path.display());
                    return Response::error(request_id, message);
                },
            },
        };
        let mut session = self.session.lock().await;
        session.begin_request();
        session.submit_and_analyze(source, text);
        Response::diagnostics(request_id, session.finish_request())
    }

    async fn complete(
        &self,
        request_id: Option<i64>,
        path: PathBuf,
        text: String,
        cursor: Position,
    ) -> Response {
        let text = Arc::<str>::from(text);
        let source = SourceId::Buffer(path);
        let offset = LineIndex::new(text.clone()).offset_of(cursor);
        let (visitor, results) = CompletionVisitor::new(source.clone(), offset);

        let mut session = self.session.lock().await;
        session.begin_request();
        session.set_hooks(vec![Box::new(visitor)]);
        session.submit_and_analyze(source, text);
        session.finish_request();
        drop(session);

        let candidates = results.lock().map(|found| found.clone()).unwrap_or_default();
        Response::completions(request_id, candidates)
    }

    async fn definition(
        &self,
        request_id: Option<i64>,
        path: PathBuf,
        text: String,
        cursor: Position,
    ) -> Response {
        let text = Arc::<str>::from(text);
        let source = SourceId::Buffer(path);
        let offset = LineIndex::new(text.clone()).offset_of(cursor);
        let (visitor, results) = DefinitionVisitor::new(source.clone(), offset);

        let mut session = self.session.lock().await;
        session.begin_request();
        session.set_hooks(vec![Box::new(visitor)]);
        session.submit_and_analyze(source.clone(), text.clone());
        session.finish_request();
        drop(session);

        let references = results.lock().map(|found| found.clone()).unwrap_or_default();
        let mut locations = Vec::with_capacity(references.len());
        for reference in &references {
            match location_of(reference, &source, &text) {
                Ok(location) => locations.push(location),
                Err(message) => return Response::error(request_id, message),
            }
        }
        Response::definitions(request_id, locations)
    }
}

/// Map a resolved reference to a wire location. Offsets are interpreted
/// against the request text when the target is the submitted buffer,
/// otherwise against the target file's on-disk content.
fn location_of(
    reference: &SymbolRef,
    submitted: &SourceId,
    submitted_text: &Arc<str>,
) -> Result<Location, String> {
    let index = if reference.target == *submitted {
        LineIndex::new(submitted_text.clone())
    } else {
        let path = reference.target.path();
        let content = fs::read_to_string(path)
            .map_err(|error| format!("cannot read {}: {error}", path.display()))?;
        LineIndex::from_str(&content)
    };
    let start = index.position_of(reference.name_range.start().into());
    let end = index.position_of(reference.name_range.end().into());
    Ok(Location {
        uri: file_uri(reference.target.path()),
        range: Range::new(start, end),
    })
}

fn file_uri(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    Url::from_file_path(&absolute)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("file://{}", absolute.display()))
}

fn serialize(response: &Response) -> String {
    match serde_json::to_string(response) {
        Ok(json) => json,
        Err(error) => serde_json::json!({
            "errorMessage": format!("response serialization failed: {error}"),
        })
        .to_string(),
    }
}

/// Pull `requestId` out of a line that failed full deserialization so
/// the error response can still be matched by the client.
fn recover_request_id(line: &str) -> Option<i64> {
    serde_json::from_str::<Value>(line)
        .ok()
        .and_then(|value| value.get("requestId").and_then(Value::as_i64))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Compact single-line form for request/response logging.
fn preview(text: &str) -> String {
    if text.len() <= LOG_PREVIEW_LEN {
        return text.to_string();
    }
    let mut end = LOG_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

#[cfg(test)]
#[path = "../../tests/src/server/handler_tests.rs"]
mod tests;
