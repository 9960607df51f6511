use serde::{Deserialize, Serialize};

/// A single audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: uuid::Uuid,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub event_type: AuditEventType,
    pub source: AuditSource,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionRecord>,
}

impl AuditEntry {
    /// Create a new `AuditEntry` with an auto-generated UUID v4 and the current
    /// UTC timestamp. `rejection` defaults to `None`.
    pub fn new(
        event_type: AuditEventType,
        source: AuditSource,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            event_type,
            source,
            details,
            rejection: None,
        }
    }

    /// Build a [`AuditEventType::UriRejected`] entry for `candidate`, which
    /// failed the rule called `rule`.
    pub fn rejection(
        source: AuditSource,
        candidate: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self::new(AuditEventType::UriRejected, source, serde_json::Value::Null)
            .with_rejection(RejectionRecord {
                candidate: candidate.into(),
                rule: rule.into(),
            })
    }

    /// Attach a rejection record to this entry, consuming and returning
    /// `self` for builder-style usage.
    pub fn with_rejection(mut self, rejection: RejectionRecord) -> Self {
        self.rejection = Some(rejection);
        self
    }
}

/// The category of audit event being recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    UriRejected,
    ProcessStarted,
    ProcessStopped,
}

/// Identifies the component that produced the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSource {
    pub component: String,
    /// Where the candidate came from (e.g. `argv`, `stdin:12`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

impl AuditSource {
    /// Convenience constructor that only requires the component name.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            input: None,
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

/// The rejected candidate and the rule it failed.
///
/// The candidate is stored verbatim as a JSON string; it is data for
/// operators, never a value to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub candidate: String,
    pub rule: String,
}
