//! Wire types for the newline-delimited JSON protocol.
//!
//! One request object per line on the way in, one response object per line
//! on the way out. Every request carries a `requestId` that is echoed in
//! the response; the payload is selected by `kind`. Positions are
//! zero-based `{line, character}` with UTF-16 columns.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(
        line: u32,
        character: u32,
    ) -> Self {
        Self {
            line,
            character,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Sentinel for diagnostics the pipeline reported without a position.
    pub const NONE: Range = Range {
        start: Position {
            line: 0,
            character: 0,
        },
        end: Position {
            line: 0,
            character: 0,
        },
    };

    pub fn new(
        start: Position,
        end: Position,
    ) -> Self {
        Self {
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    pub severity: Severity,
}

/// Diagnostics for one file, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiagnostics {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Local,
    Parameter,
    Field,
    Method,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCandidate {
    pub name: String,
    pub kind: CandidateKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default)]
    pub request_id: Option<i64>,
    #[serde(flatten)]
    pub payload: RequestPayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RequestPayload {
    /// Analyze one file and report its diagnostics. When `text` is absent
    /// the file content is read from disk.
    Lint {
        path: PathBuf,
        #[serde(default)]
        text: Option<String>,
    },
    Complete {
        path: PathBuf,
        text: String,
        cursor: Position,
    },
    Definition {
        path: PathBuf,
        text: String,
        cursor: Position,
    },
    /// Liveness probe; the payload comes back unchanged.
    Echo {
        payload: Value,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Vec<FileDiagnostics>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completions: Option<Vec<CompletionCandidate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_locations: Option<Vec<Location>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Response {
    pub fn diagnostics(
        request_id: Option<i64>,
        groups: Vec<FileDiagnostics>,
    ) -> Self {
        Self {
            request_id,
            diagnostics: Some(groups),
            ..Self::default()
        }
    }

    pub fn completions(
        request_id: Option<i64>,
        candidates: Vec<CompletionCandidate>,
    ) -> Self {
        Self {
            request_id,
            completions: Some(candidates),
            ..Self::default()
        }
    }

    pub fn definitions(
        request_id: Option<i64>,
        locations: Vec<Location>,
    ) -> Self {
        Self {
            request_id,
            definition_locations: Some(locations),
            ..Self::default()
        }
    }

    pub fn echo(
        request_id: Option<i64>,
        payload: Value,
    ) -> Self {
        Self {
            request_id,
            echo: Some(payload),
            ..Self::default()
        }
    }

    pub fn error(
        request_id: Option<i64>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            request_id,
            error_message: Some(message.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[path = "../tests/src/protocol_tests.rs"]
mod tests;
