use std::cell::RefCell;

/// Transient user-facing messages (the "toasts"). Separate from tracing logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

pub trait Notifier {
    fn notify(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn info(&self, message: &str) {
        self.notify(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Prints notifications to stderr so they never mix with table output.
pub struct ConsoleNotifier {
    pub quiet: bool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Error => eprintln!("error: {}", message),
            Level::Success | Level::Info if !self.quiet => eprintln!("{}", message),
            _ => {}
        }
    }
}

/// Keeps notifications in memory; the browse view drains it into its status line.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.borrow_mut())
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.borrow().last().cloned()
    }

    pub fn errors(&self) -> Vec<String> {
        self.seen
            .borrow()
            .iter()
            .filter(|n| n.level == Level::Error)
            .map(|n| n.message.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: Level, message: &str) {
        self.seen.borrow_mut().push(Notification {
            level,
            message: message.to_string(),
        });
    }
}
