//! Operator audit channel.
//!
//! Every command and scheduled completion emits one pre-formatted line,
//! `[HH:MM:SS] KEYWORD: text`, timestamped from the virtual clock. Consumers
//! color-code by substring match on the keyword; nothing downstream parses
//! these lines.

use crate::clock::format_hms;

/// Severity keyword embedded in each audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Operator actions.
    Audit,
    /// Detected faults.
    Critical,
    /// Engine lifecycle messages.
    System,
}

impl Severity {
    /// Upper-case keyword as it appears in the formatted line.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Audit => "AUDIT",
            Self::Critical => "CRITICAL",
            Self::System => "SYSTEM",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// One audit line plus the command that produced it.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Name of the command or completion that emitted this line.
    pub source: &'static str,
    /// Severity, also embedded in `message` as its keyword.
    pub severity: Severity,
    /// Pre-formatted line: `[HH:MM:SS] KEYWORD: text`.
    pub message: String,
}

impl AuditEvent {
    /// Build an event timestamped at `now` simulated milliseconds.
    pub fn new(now: u64, source: &'static str, severity: Severity, text: &str) -> Self {
        let message = format!("[{}] {}: {}", format_hms(now), severity.keyword(), text);
        Self {
            source,
            severity,
            message,
        }
    }
}
