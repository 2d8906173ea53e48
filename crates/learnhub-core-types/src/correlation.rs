//! Correlation types for tying log events to one administrative request
//!
//! A CLI invocation (or any other caller) creates one `RequestContext` and
//! records its ids on the tracing span that wraps the work.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a single request, a UUIDv7 so ids sort by creation time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an id received from elsewhere (e.g. an `X-Request-Id` header)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Context carried through an administrative operation
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    /// Who asked for the operation (username, or "cli" for local admin use)
    pub actor: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            actor: None,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Actor name for log fields, `"anonymous"` when unset
    pub fn actor_or_anonymous(&self) -> &str {
        self.actor.as_deref().unwrap_or("anonymous")
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();
        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_request_id_display_matches_str() {
        let id = RequestId::from_string("req-1".to_string());
        assert_eq!(id.to_string(), "req-1");
    }

    #[test]
    fn test_context_actor() {
        let ctx = RequestContext::new();
        assert_eq!(ctx.actor_or_anonymous(), "anonymous");

        let ctx = ctx.with_actor("admin");
        assert_eq!(ctx.actor_or_anonymous(), "admin");
    }

    #[test]
    fn test_request_id_serde() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
