//! Wire types for the `/v2/pipeline` protocol.

use crate::Arg;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Request Side
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct Pipeline {
    pub requests: Vec<Request>,
}

impl Pipeline {
    /// A single-statement pipeline: execute the statement, then close.
    pub fn single(stmt: Stmt) -> Self {
        Self {
            requests: vec![Request::Execute { stmt }, Request::Close],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum Request {
    Execute { stmt: Stmt },
    Close,
}

#[derive(Debug, Serialize)]
pub(crate) struct Stmt {
    pub sql: String,
    /// Omitted entirely (not an empty list) for parameterless statements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<WireArg>>,
}

impl Stmt {
    pub fn new(sql: &str, args: &[Arg]) -> Self {
        Self {
            sql: sql.to_string(),
            args: if args.is_empty() {
                None
            } else {
                Some(args.iter().map(WireArg::from).collect())
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum WireArg {
    Null,
    Integer { value: i64 },
    Float { value: f64 },
    Text { value: String },
}

impl From<&Arg> for WireArg {
    fn from(arg: &Arg) -> Self {
        match arg {
            Arg::Null => Self::Null,
            Arg::Bool(b) => Self::Integer {
                value: i64::from(*b),
            },
            Arg::Int(n) => Self::Integer { value: *n },
            Arg::Float(x) => Self::Float { value: *x },
            Arg::Text(s) => Self::Text { value: s.clone() },
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Response Side
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct PipelineResponse {
    #[serde(default)]
    pub results: Vec<ResultEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum ResultEntry {
    Ok {
        #[serde(default)]
        response: Option<ExecuteResponse>,
    },
    Error {
        error: RemoteError,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecuteResponse {
    #[serde(default)]
    pub result: Option<StmtResult>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StmtResult {
    #[serde(default)]
    pub cols: Vec<Col>,
    #[serde(default)]
    pub rows: Vec<Vec<Option<Cell>>>,
    #[serde(default)]
    pub affected_row_count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Col {
    #[serde(default)]
    pub name: Option<String>,
}

/// A typed cell envelope. Only the value matters to callers; a cell with no
/// value key (e.g. `{"type":"null"}`) decodes to JSON null.
#[derive(Debug, Deserialize)]
pub(crate) struct Cell {
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoteError {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn marshal_covers_every_variant() {
        let cases = [
            (Arg::Null, json!({"type": "null"})),
            (Arg::Bool(true), json!({"type": "integer", "value": 1})),
            (Arg::Bool(false), json!({"type": "integer", "value": 0})),
            (Arg::Int(42), json!({"type": "integer", "value": 42})),
            (Arg::Float(2.5), json!({"type": "float", "value": 2.5})),
            (Arg::Text("fest".into()), json!({"type": "text", "value": "fest"})),
        ];
        for (arg, expected) in cases {
            let wire = serde_json::to_value(WireArg::from(&arg)).unwrap();
            assert_eq!(wire, expected, "marshaling {arg:?}");
        }
    }

    #[test]
    fn bool_marshals_as_integer_not_text() {
        let wire = serde_json::to_value(WireArg::from(&Arg::Bool(true))).unwrap();
        assert_eq!(wire["type"], "integer");
        assert_eq!(wire["value"], 1);
    }

    #[test]
    fn args_key_omitted_when_empty() {
        let stmt = serde_json::to_value(Stmt::new("SELECT 1", &[])).unwrap();
        assert_eq!(stmt, json!({"sql": "SELECT 1"}));
    }

    #[test]
    fn single_statement_pipeline_shape() {
        let pipeline = Pipeline::single(Stmt::new("SELECT id FROM users WHERE id = ?", &[Arg::Int(3)]));
        let wire = serde_json::to_value(&pipeline).unwrap();
        assert_eq!(
            wire,
            json!({
                "requests": [
                    {
                        "type": "execute",
                        "stmt": {
                            "sql": "SELECT id FROM users WHERE id = ?",
                            "args": [{"type": "integer", "value": 3}],
                        },
                    },
                    {"type": "close"},
                ]
            })
        );
    }

    #[test]
    fn response_ok_decodes() {
        let body = json!({
            "results": [{
                "type": "ok",
                "response": {
                    "type": "execute",
                    "result": {
                        "cols": [{"name": "id"}],
                        "rows": [[{"type": "integer", "value": 1}]],
                        "affected_row_count": 0,
                    },
                },
            }]
        });
        let parsed: PipelineResponse = serde_json::from_value(body).unwrap();
        match &parsed.results[0] {
            ResultEntry::Ok { response } => {
                let result = response.as_ref().unwrap().result.as_ref().unwrap();
                assert_eq!(result.cols[0].name.as_deref(), Some("id"));
                assert_eq!(result.rows.len(), 1);
            }
            other => panic!("expected ok, got {other:?}"),
        }
    }

    #[test]
    fn response_error_decodes() {
        let body = json!({
            "results": [{
                "type": "error",
                "error": {"message": "no such table: nope"},
            }]
        });
        let parsed: PipelineResponse = serde_json::from_value(body).unwrap();
        match &parsed.results[0] {
            ResultEntry::Error { error } => assert_eq!(error.message, "no such table: nope"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_result_type_tolerated() {
        let body = json!({"results": [{"type": "batch"}]});
        let parsed: PipelineResponse = serde_json::from_value(body).unwrap();
        assert!(matches!(parsed.results[0], ResultEntry::Unknown));
    }
}
