use chrono::{DateTime, Utc};

/// The kind of block a [`HistoryRecord`] was emitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Ip,
    Username,
    IpUsername,
}

impl HistoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryKind::Ip => "ip",
            HistoryKind::Username => "username",
            HistoryKind::IpUsername => "ip:username",
        }
    }
}

/// A fire-and-forget audit record emitted whenever a filter lands a new
/// block or extends one via escalation. Delivery is best-effort: a sink
/// that fails must not affect the gate decision (callers run it outside
/// the fallback-wrapped critical path, or swallow its own errors).
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub kind: HistoryKind,
    /// For `Ip`/`IpUsername` this is the address; for `Username` it is
    /// the truncated `addr(count), addr(count), ...` payload.
    pub subject: String,
    pub account: String,
    pub attempts: u32,
    pub occurred_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn new(kind: HistoryKind, subject: impl Into<String>, account: impl Into<String>, attempts: u32) -> Self {
        Self {
            kind,
            subject: subject.into(),
            account: account.into(),
            attempts,
            occurred_at: Utc::now(),
        }
    }
}
