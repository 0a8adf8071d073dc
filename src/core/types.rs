//! Shared types used across Folio modules
//!
//! Contains the outcomes exchanged between the session loop and its handlers.

/// Outcome of one command handler execution
///
/// Consumed immediately by the session loop to decide whether to keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The command finished; read the next command
    Success,
    /// The command hit a condition that ends the session
    Failure,
}

impl RunStatus {
    /// Check if the session should keep going
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// How a session that returned normally came to an end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// A terminal token (`q` / `quit`) was read
    Quit,
    /// A handler reported failure; any remaining input was left unread
    HandlerFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status() {
        assert!(RunStatus::Success.is_success());
        assert!(!RunStatus::Failure.is_success());
    }
}
