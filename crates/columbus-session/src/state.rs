// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session identifier, selected mode, and the busy flag.

use columbus_config::DEFAULT_MODE_ID;

use crate::orchestrator::Rejection;

/// Per-session state that outlives individual submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    session_id: Option<String>,
    mode: String,
    busy: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_MODE_ID)
    }
}

impl SessionState {
    /// Fresh state: no session identifier, idle, with `mode` selected.
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            session_id: None,
            mode: mode.into(),
            busy: false,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Marks a submission as in flight. The only concurrency guard there is.
    pub fn begin_submission(&mut self) -> Result<(), Rejection> {
        if self.busy {
            return Err(Rejection::AlreadyBusy);
        }
        self.busy = true;
        Ok(())
    }

    /// Clears `busy` and adopts `new_session_id` when it is present and non-empty.
    pub fn complete_submission(&mut self, new_session_id: Option<&str>) {
        self.busy = false;
        if let Some(id) = new_session_id.filter(|id| !id.is_empty()) {
            self.session_id = Some(id.to_string());
        }
    }

    /// Selects a mode. Always succeeds, busy or not.
    pub fn set_mode(&mut self, mode: impl Into<String>) {
        self.mode = mode.into();
    }

    /// Mode to put on the wire: `None` for the default sentinel.
    pub fn request_mode(&self) -> Option<String> {
        (self.mode != DEFAULT_MODE_ID).then(|| self.mode.clone())
    }

    /// Forgets the server-side session context.
    pub fn reset_session(&mut self) {
        self.session_id = None;
    }
}
