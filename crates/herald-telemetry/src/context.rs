//! Request context for correlating the log events of one evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Correlation data carried through one policy evaluation.
///
/// Its [`span`](Self::span) tags every event emitted while the evaluation
/// runs, so log lines from the policy and listing crates can be grouped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Unique request identifier.
    pub request_id: Uuid,
    /// Correlation ID shared by related requests.
    pub correlation_id: Uuid,
    /// Parent request ID if this is a sub-request.
    pub parent_id: Option<Uuid>,
    /// Alertmanager the request is evaluated against.
    pub alertmanager: Option<String>,
    /// When the request started.
    pub started_at: DateTime<Utc>,
    /// Component that created this context.
    pub source: String,
    /// Operation being performed.
    pub operation: Option<String>,
    /// Additional metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl RequestContext {
    /// Create a new request context.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        Self {
            request_id: id,
            correlation_id: id,
            parent_id: None,
            alertmanager: None,
            started_at: Utc::now(),
            source: source.into(),
            operation: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Create a child context that inherits correlation info.
    #[must_use]
    pub fn child(&self, source: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            correlation_id: self.correlation_id,
            parent_id: Some(self.request_id),
            alertmanager: self.alertmanager.clone(),
            started_at: Utc::now(),
            source: source.into(),
            operation: None,
            metadata: self.metadata.clone(),
        }
    }

    /// Set the correlation ID.
    #[must_use]
    pub fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = id;
        self
    }

    /// Set the Alertmanager being evaluated.
    #[must_use]
    pub fn with_alertmanager(mut self, name: impl Into<String>) -> Self {
        self.alertmanager = Some(name.into());
        self
    }

    /// Set the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Add metadata.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Time since the request started, zero if the clock went backwards.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now()
            .signed_duration_since(self.started_at)
            .max(chrono::Duration::zero())
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed().num_milliseconds()
    }

    /// Create a tracing span with this context.
    #[must_use]
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "request",
            request_id = %self.short_id(),
            correlation_id = %self.correlation_id,
            source = %self.source,
            alertmanager = self.alertmanager.as_deref(),
            operation = self.operation.as_deref(),
        )
    }

    /// First eight characters of the request ID.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.request_id.simple().to_string().chars().take(8).collect()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("unknown")
    }
}

/// Guard that keeps the request span entered and logs when it completes.
pub struct RequestGuard {
    context: RequestContext,
    _span: tracing::span::EnteredSpan,
}

impl RequestGuard {
    /// Enter the context's span.
    #[must_use]
    pub fn new(context: RequestContext) -> Self {
        let span = context.span().entered();
        tracing::debug!("request started");
        Self {
            context,
            _span: span,
        }
    }

    /// Get the request context.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        tracing::debug!(elapsed_ms = self.context.elapsed_ms(), "request completed");
    }
}
