//! The in-game operator console: a bounded scrollback of command echoes
//! and status lines that the UI renders under the server bank.

use std::collections::VecDeque;

const DEFAULT_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Banner,
    Info,
    Command,
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLine {
    pub kind: MessageKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct TerminalFeed {
    lines: VecDeque<FeedLine>,
    capacity: usize,
}

impl Default for TerminalFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TerminalFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push<S: Into<String>>(&mut self, kind: MessageKind, text: S) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(FeedLine {
            kind,
            text: text.into(),
        });
    }

    /// Echoes what the player typed, prompt-prefixed.
    pub fn push_command(&mut self, command: &str) {
        self.push(MessageKind::Command, format!("> {}", command));
    }

    pub fn lines(&self) -> impl Iterator<Item = &FeedLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The boot banner shown while the countdown runs.
    pub fn push_boot_banner(&mut self) {
        self.push(MessageKind::Banner, "SERVER HYPERVISION INTERFACE v9.26");
        self.push(MessageKind::Info, "All rights reserved.");
        self.push(MessageKind::Info, "Booting up...");
        self.push(MessageKind::Info, "Reticulating splines...");
        self.push(MessageKind::Info, "Assessing server temperatures...");
        self.push(
            MessageKind::Warning,
            "WARNING: Rising server temperatures detected.",
        );
        self.push(
            MessageKind::Error,
            "ALERT: Server temperatures exceeding safety threshold!",
        );
        self.push(MessageKind::Error, "SAVE THE SERVERS!");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_order() {
        let mut feed = TerminalFeed::new(10);
        feed.push(MessageKind::Info, "one");
        feed.push(MessageKind::Error, "two");

        let texts: Vec<&str> = feed.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut feed = TerminalFeed::new(3);
        for i in 0..5 {
            feed.push(MessageKind::Info, format!("line {}", i));
        }

        assert_eq!(feed.len(), 3);
        let texts: Vec<&str> = feed.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_push_command_prefix() {
        let mut feed = TerminalFeed::default();
        feed.push_command("bark");

        let line = feed.lines().next().unwrap();
        assert_eq!(line.kind, MessageKind::Command);
        assert_eq!(line.text, "> bark");
    }

    #[test]
    fn test_boot_banner_ends_with_call_to_action() {
        let mut feed = TerminalFeed::default();
        feed.push_boot_banner();
        let last = feed.lines().last().unwrap();
        assert_eq!(last.text, "SAVE THE SERVERS!");
        assert_eq!(last.kind, MessageKind::Error);
    }
}
