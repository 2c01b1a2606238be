use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

// Why an admin request was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateEventKind {
    RateLimited,
    Unauthorized,
}

impl GateEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GateEventKind::RateLimited => "rate_limited",
            GateEventKind::Unauthorized => "unauthorized",
        }
    }
}

impl fmt::Display for GateEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GateEvent {
    pub at: DateTime<Utc>,
    pub kind: GateEventKind,
    pub client_id: String,
    pub route: String,
}

impl GateEvent {
    pub fn now(kind: GateEventKind, client_id: &str, route: &str) -> Self {
        Self {
            at: Utc::now(),
            kind,
            client_id: client_id.to_string(),
            route: route.to_string(),
        }
    }
}

/// Destination for rejected admin attempts.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &GateEvent);
}

// Default sink: one structured tracing event per rejection
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &GateEvent) {
        tracing::warn!(
            target: "admin_gate",
            at = %event.at.to_rfc3339(),
            kind = %event.kind,
            client = %event.client_id,
            route = %event.route,
            "admin request rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_snake_case() {
        let event = GateEvent::now(GateEventKind::RateLimited, "1.2.3.4", "/admin/lessons/sync");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "rate_limited");
        assert_eq!(json["client_id"], "1.2.3.4");
        assert_eq!(json["route"], "/admin/lessons/sync");
        assert!(json["at"].is_string());
    }
}
