use crate::error::{DashboardError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSource {
    Poll,
    Toggle,
}

/// A failure that was swallowed instead of shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source: DiagnosticSource,
    pub kind: ErrorKind,
    pub message: String,
}

impl Diagnostic {
    pub fn from_error(source: DiagnosticSource, err: &DashboardError) -> Self {
        Self {
            source,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    SnapshotApplied {
        sequence: u64,
    },
    StaleSnapshotDiscarded {
        sequence: u64,
        latest_applied: u64,
    },
    ToggleSent {
        running: bool,
    },
    ToggleAcknowledged {
        running: bool,
        server_status: Option<String>,
    },
    ToggleReverted {
        running: bool,
    },
    Diagnostic(Diagnostic),
}
