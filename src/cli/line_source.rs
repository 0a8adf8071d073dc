//! Line source - the shared input cursor
//!
//! The session loop and every command handler read from the same
//! [`LineSource`]. There is no lookahead and no pushback: whoever reads a
//! line consumes it, so each reader must take exactly the lines it owns.

use std::io::{BufRead, Cursor};

use crate::core::{FolioError, Result};

/// Message used when input runs out before a terminal token
pub const EXHAUSTED_MESSAGE: &str = "input must end with a quit token (q or quit)";

/// Sequential reader of trimmed input lines
pub struct LineSource {
    reader: Box<dyn BufRead>,
    consumed: usize,
}

impl LineSource {
    /// Wrap any buffered reader (stdin, a file, an in-memory cursor)
    pub fn new(reader: impl BufRead + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            consumed: 0,
        }
    }

    /// Line source over a fixed block of text
    pub fn from_text(text: &str) -> Self {
        Self::new(Cursor::new(text.to_string()))
    }

    /// Read the next line, trimmed.
    ///
    /// Fails with `InvalidState` once the input is exhausted.
    pub fn next_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(FolioError::invalid_state(EXHAUSTED_MESSAGE));
        }
        self.consumed += 1;
        Ok(line.trim().to_string())
    }

    /// Number of lines consumed so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl std::fmt::Debug for LineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSource")
            .field("consumed", &self.consumed)
            .finish()
    }
}
