/// Export session state machine
///
/// States: Idle -> Loading -> {Success, Error}, and back to Loading on the
/// next submission. The session is the only writer of the current status
/// and result; everything else reads through `&self`.
///
/// Submissions may finish out of order. Each `begin` hands out a ticket
/// with a sequence number and only the outcome of the most recent ticket
/// is applied, so a slow earlier response never replaces a newer one.
use crate::error::ExportError;
use crate::tabular::TabularResult;
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Success,
    Error,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Loading => "loading",
            SessionStatus::Success => "success",
            SessionStatus::Error => "error",
        }
    }
}

/// Handle for one submission, returned by `begin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    seq: u64,
    display_name: String,
}

impl SubmissionTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// A successful export and the name it was requested under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedExport {
    pub display_name: String,
    pub result: TabularResult,
}

#[derive(Debug)]
pub struct ExportSession {
    status: SessionStatus,
    error_message: Option<String>,
    result: Option<CompletedExport>,
    last_seq: u64,
}

impl Default for ExportSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportSession {
    pub fn new() -> Self {
        Self { status: SessionStatus::Idle, error_message: None, result: None, last_seq: 0 }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether the submit action is enabled
    pub fn can_submit(&self) -> bool {
        self.status != SessionStatus::Loading
    }

    /// The result to show.
    ///
    /// A new submission does not tear down the previous preview: it stays
    /// visible through Loading until that submission succeeds. An error
    /// hides it.
    pub fn visible_result(&self) -> Option<&CompletedExport> {
        match self.status {
            SessionStatus::Success | SessionStatus::Loading => self.result.as_ref(),
            SessionStatus::Idle | SessionStatus::Error => None,
        }
    }

    /// Most recent successful result, even while loading or after an error
    pub fn last_result(&self) -> Option<&CompletedExport> {
        self.result.as_ref()
    }

    /// Enter Loading for a new submission.
    ///
    /// Clears the error message. The previous result stays in place until
    /// this submission succeeds.
    pub fn begin(&mut self, display_name: &str) -> SubmissionTicket {
        self.last_seq += 1;
        self.status = SessionStatus::Loading;
        self.error_message = None;
        debug!("submission #{} started for '{}'", self.last_seq, display_name);
        SubmissionTicket { seq: self.last_seq, display_name: display_name.to_string() }
    }

    /// Apply the outcome of a submission.
    ///
    /// Returns false, leaving the session untouched, when a newer submission
    /// has been started since `ticket` was issued.
    pub fn complete(&mut self, ticket: SubmissionTicket, outcome: Result<TabularResult, ExportError>) -> bool {
        if ticket.seq != self.last_seq || self.status != SessionStatus::Loading {
            debug!("ignoring stale outcome of submission #{} (latest is #{})", ticket.seq, self.last_seq);
            return false;
        }

        match outcome {
            Ok(result) => {
                info!("export '{}' ready: {} rows", ticket.display_name, result.row_count());
                self.result = Some(CompletedExport { display_name: ticket.display_name, result });
                self.status = SessionStatus::Success;
            }
            Err(e) => {
                info!("export '{}' failed: {}", ticket.display_name, e);
                self.error_message = Some(e.user_message());
                self.status = SessionStatus::Error;
            }
        }
        true
    }

    /// Back to Idle, dropping any result. Outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.last_seq += 1;
        self.status = SessionStatus::Idle;
        self.error_message = None;
        self.result = None;
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
