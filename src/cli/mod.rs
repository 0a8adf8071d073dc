//! CLI module - the interactive command session
//!
//! Contains the input cursor, the reporter, the command vocabulary and the
//! session loop that ties them together.

pub mod commands;
pub mod line_source;
pub mod reporter;
pub mod session;

pub use commands::{is_quit_token, CommandKind, CommandRegistry};
pub use line_source::LineSource;
pub use reporter::{ConsoleReporter, MemoryReporter, Report, Reporter};
pub use session::{Session, SessionBuilder};
