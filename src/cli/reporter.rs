//! Session reporter - everything the user sees
//!
//! Reporters are fire-and-forget sinks: none of their methods can fail.

use std::cell::RefCell;
use std::io::{self, Write};

/// Renders session feedback to the user
pub trait Reporter {
    /// Notice shown while something slow is happening
    fn waiting(&self, message: &str);

    /// General informational output
    fn write(&self, message: &str);

    /// Errors and the closing notice
    fn error_or_quit(&self, message: &str);

    /// Enumerated listing of the known commands
    fn list_commands(&self, commands: &[&str]);

    /// Ask for the next argument line
    fn prompt(&self, label: &str);
}

/// Reporter writing to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    fn emit(&self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", text);
        let _ = stdout.flush();
    }
}

impl Reporter for ConsoleReporter {
    fn waiting(&self, message: &str) {
        self.emit(&format!("⏳ {}", message));
    }

    fn write(&self, message: &str) {
        self.emit(message);
    }

    fn error_or_quit(&self, message: &str) {
        self.emit(&format!("\n{}\n", message));
    }

    fn list_commands(&self, commands: &[&str]) {
        let mut listing = String::from("\nCommands:\n");
        for (i, name) in commands.iter().enumerate() {
            listing.push_str(&format!("  {:>2}. {}\n", i + 1, name));
        }
        listing.push_str("  Type q or quit to exit");
        self.emit(&listing);
    }

    fn prompt(&self, label: &str) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}: ", label);
        let _ = stdout.flush();
    }
}

/// What a [`MemoryReporter`] was asked to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Waiting(String),
    Write(String),
    ErrorOrQuit(String),
    Commands(Vec<String>),
    Prompt(String),
}

/// Reporter that records every message in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    reports: RefCell<Vec<Report>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far
    pub fn reports(&self) -> Vec<Report> {
        self.reports.borrow().clone()
    }

    /// Text of every non-listing report, in order
    pub fn messages(&self) -> Vec<String> {
        self.reports
            .borrow()
            .iter()
            .filter_map(|report| match report {
                Report::Waiting(m) | Report::Write(m) | Report::ErrorOrQuit(m) => Some(m.clone()),
                Report::Commands(_) | Report::Prompt(_) => None,
            })
            .collect()
    }

    /// Check if any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }

    /// How many times the command listing was shown
    pub fn listings(&self) -> usize {
        self.reports
            .borrow()
            .iter()
            .filter(|report| matches!(report, Report::Commands(_)))
            .count()
    }

    fn push(&self, report: Report) {
        self.reports.borrow_mut().push(report);
    }
}

impl Reporter for MemoryReporter {
    fn waiting(&self, message: &str) {
        self.push(Report::Waiting(message.to_string()));
    }

    fn write(&self, message: &str) {
        self.push(Report::Write(message.to_string()));
    }

    fn error_or_quit(&self, message: &str) {
        self.push(Report::ErrorOrQuit(message.to_string()));
    }

    fn list_commands(&self, commands: &[&str]) {
        self.push(Report::Commands(
            commands.iter().map(|c| c.to_string()).collect(),
        ));
    }

    fn prompt(&self, label: &str) {
        self.push(Report::Prompt(label.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_records_in_order() {
        let reporter = MemoryReporter::new();
        reporter.waiting("Loading");
        reporter.list_commands(&["BUY_STOCK"]);
        reporter.prompt("Portfolio name");
        reporter.error_or_quit("Bye");

        assert_eq!(reporter.messages(), vec!["Loading", "Bye"]);
        assert_eq!(reporter.listings(), 1);
        assert!(reporter.contains("By"));
        assert_eq!(reporter.reports()[2], Report::Prompt("Portfolio name".to_string()));
    }
}
