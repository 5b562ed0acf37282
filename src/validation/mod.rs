//! Pluggable response-body validation.
//!
//! The engine consumes validators through a minimal capability: a single
//! (possibly asynchronous) `validate` operation that returns either a
//! success value or a list of issues. Any schema library can participate by
//! implementing [`SchemaValidator`]; a ready-made JSON Schema adapter ships
//! in [`schema`].

pub mod schema;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

pub use self::schema::JsonSchema;

/// Boxed error used for validator crashes.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One step of an issue's field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A plain object key.
    Key(String),
    /// An array index.
    Index(usize),
    /// Anything else. A path containing one cannot be rendered as a
    /// dot-path, and its issue is dropped rather than partially rendered.
    Unrepresentable,
}

/// A single validation issue reported by a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaIssue {
    pub message: String,
    pub path: Option<Vec<PathSegment>>,
}

impl SchemaIssue {
    pub fn new<M: Into<String>>(message: M) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    pub fn at<M: Into<String>>(message: M, path: Vec<PathSegment>) -> Self {
        Self {
            message: message.into(),
            path: Some(path),
        }
    }
}

/// Raw result of a schema's `validate` operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValidation {
    /// The (possibly transformed) output value.
    Value(Value),
    /// The schema reported issues. An empty list still counts as failure:
    /// the schema explicitly produced no success value.
    Issues(Vec<SchemaIssue>),
}

/// The minimal validator contract the engine depends on.
#[async_trait]
pub trait SchemaValidator: Send + Sync {
    async fn validate(&self, input: &Value) -> Result<RawValidation, BoxError>;
}

/// Normalized validation result, keyed by dot-path on failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Success { data: Value },
    Failure { issues: HashMap<String, Vec<String>> },
}

pub(crate) const UNKNOWN_ISSUE_KEY: &str = "UNKNOWN";
pub(crate) const UNKNOWN_ISSUE_MESSAGE: &str = "UNKNOWN ISSUE OCCURED";

/// Render an issue's path as a single dot-joined string.
///
/// Missing or empty paths yield `None`, as does any path containing an
/// unrepresentable segment. Issues without a dot-path are dropped from the
/// grouped map; this silent drop is a documented contract.
pub fn dot_path(issue: &SchemaIssue) -> Option<String> {
    let path = issue.path.as_ref()?;
    if path.is_empty() {
        return None;
    }
    let mut rendered = String::new();
    for segment in path {
        let part = match segment {
            PathSegment::Key(key) => key.clone(),
            PathSegment::Index(index) => index.to_string(),
            PathSegment::Unrepresentable => return None,
        };
        if !rendered.is_empty() {
            rendered.push('.');
        }
        rendered.push_str(&part);
    }
    Some(rendered)
}

/// Group issue messages by dot-path.
pub fn group_issues(issues: &[SchemaIssue]) -> HashMap<String, Vec<String>> {
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();
    for issue in issues {
        if let Some(path) = dot_path(issue) {
            fields.entry(path).or_default().push(issue.message.clone());
        }
    }
    fields
}

/// Run a validator and normalize its result.
///
/// Validator crashes are logged and collapsed into a sentinel failure; they
/// never propagate as errors from this layer.
pub async fn standard_validate(schema: &dyn SchemaValidator, input: &Value) -> ValidationOutcome {
    match schema.validate(input).await {
        Ok(RawValidation::Value(value)) => ValidationOutcome::Success { data: value },
        Ok(RawValidation::Issues(issues)) => ValidationOutcome::Failure {
            issues: group_issues(&issues),
        },
        Err(error) => {
            tracing::error!(error = %error, "schema validator failed");
            let mut issues = HashMap::new();
            issues.insert(
                UNKNOWN_ISSUE_KEY.to_string(),
                vec![UNKNOWN_ISSUE_MESSAGE.to_string()],
            );
            ValidationOutcome::Failure { issues }
        }
    }
}
