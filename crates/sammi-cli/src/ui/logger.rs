//! User-facing log output.
//!
//! Every line looks like `<icon> [sammi-next] <message>`. Lines below the
//! configured level are dropped, and consecutive identical lines collapse into
//! one line carrying an `(xN)` counter.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use console::Term;
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use sammi_config::LogLevel;

use crate::ui::format_duration;

pub const LOGGER_PREFIX: &str = "[sammi-next]";

/// An error attached to a log line, compared by identity.
pub type SharedError = Arc<dyn Error + Send + Sync>;

/// Per-call rendering options.
#[derive(Default, Clone)]
pub struct LogOptions {
    /// Clear the screen before printing, when clearing is allowed.
    pub clear: bool,
    /// Prefix the line with the local `HH:MM:SS` time.
    pub timestamp: bool,
    /// Elapsed time of the current stage, appended to the line.
    pub elapsed: Option<Duration>,
    /// Error being reported; remembered for [`Logger::has_error_logged`].
    pub error: Option<SharedError>,
}

impl LogOptions {
    pub fn elapsed(elapsed: Duration) -> Self {
        Self {
            elapsed: Some(elapsed),
            ..Default::default()
        }
    }
}

/// Captured output, for tests and embedding.
#[derive(Debug, Default)]
pub struct LogBuffer {
    pub lines: Vec<String>,
    pub clears: usize,
}

enum Sink {
    Terminal { stdout: Term, stderr: Term },
    Buffer(Arc<Mutex<LogBuffer>>),
}

#[derive(Default)]
struct RepeatState {
    last: Option<(LogLevel, String)>,
    count: usize,
}

pub struct Logger {
    threshold: LogLevel,
    can_clear: bool,
    color: bool,
    sink: Sink,
    repeat: Mutex<RepeatState>,
    warned: Mutex<HashSet<String>>,
    logged_errors: Mutex<Vec<SharedError>>,
    has_warned: AtomicBool,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold)
            .field("can_clear", &self.can_clear)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Logger writing to the terminal.
    ///
    /// Clearing is only enabled when `allow_clear_screen` is set, stdout is a
    /// TTY and no CI environment is detected.
    pub fn terminal(threshold: LogLevel, allow_clear_screen: bool, color: bool) -> Self {
        let stdout = Term::stdout();
        let can_clear = allow_clear_screen && stdout.is_term() && !crate::ui::is_ci();
        Self::with_sink(
            threshold,
            can_clear,
            color,
            Sink::Terminal {
                stdout,
                stderr: Term::stderr(),
            },
        )
    }

    /// Logger writing plain lines into a shared buffer.
    pub fn buffered(threshold: LogLevel, can_clear: bool) -> (Self, Arc<Mutex<LogBuffer>>) {
        let buffer = Arc::new(Mutex::new(LogBuffer::default()));
        let logger = Self::with_sink(threshold, can_clear, false, Sink::Buffer(buffer.clone()));
        (logger, buffer)
    }

    fn with_sink(threshold: LogLevel, can_clear: bool, color: bool, sink: Sink) -> Self {
        Self {
            threshold,
            can_clear,
            color,
            sink,
            repeat: Mutex::new(RepeatState::default()),
            warned: Mutex::new(HashSet::new()),
            logged_errors: Mutex::new(Vec::new()),
            has_warned: AtomicBool::new(false),
        }
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    pub fn info(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Info, msg, LogOptions::default());
    }

    pub fn success(&self, msg: impl fmt::Display) {
        self.log(LogLevel::Success, msg, LogOptions::default());
    }

    pub fn warn(&self, msg: impl fmt::Display) {
        self.has_warned.store(true, Ordering::Relaxed);
        self.log(LogLevel::Warn, msg, LogOptions::default());
    }

    /// Warn unless this exact text was already passed to `warn_once`.
    pub fn warn_once(&self, msg: impl fmt::Display) {
        let msg = msg.to_string();
        if !self.warned.lock().insert(msg.clone()) {
            return;
        }
        self.has_warned.store(true, Ordering::Relaxed);
        self.log(LogLevel::Warn, msg, LogOptions::default());
    }

    pub fn error(&self, msg: impl fmt::Display, options: LogOptions) {
        self.has_warned.store(true, Ordering::Relaxed);
        self.log(LogLevel::Error, msg, options);
    }

    /// Sticky flag set by any warning or error.
    pub fn has_warned(&self) -> bool {
        self.has_warned.load(Ordering::Relaxed)
    }

    /// Whether this exact error value was attached to an earlier log line.
    pub fn has_error_logged(&self, error: &SharedError) -> bool {
        let target = Arc::as_ptr(error) as *const ();
        self.logged_errors
            .lock()
            .iter()
            .any(|logged| Arc::as_ptr(logged) as *const () == target)
    }

    /// Clear the screen if lines at `level` would be shown.
    pub fn clear_screen(&self, level: LogLevel) {
        if level >= self.threshold && level != LogLevel::Silent {
            self.clear();
        }
    }

    pub fn log(&self, level: LogLevel, msg: impl fmt::Display, options: LogOptions) {
        if let Some(error) = &options.error {
            self.logged_errors.lock().push(error.clone());
        }
        if level == LogLevel::Silent || level < self.threshold {
            return;
        }

        let msg = msg.to_string();
        let line = self.format(level, &msg, &options);

        let mut repeat = self.repeat.lock();
        let is_repeat = repeat
            .last
            .as_ref()
            .is_some_and(|(last_level, last_msg)| *last_level == level && *last_msg == msg);

        if is_repeat {
            repeat.count += 1;
            let counter = format!("(x{})", repeat.count + 1);
            let counter = if self.color {
                counter.yellow().to_string()
            } else {
                counter
            };
            self.rewrite(level, &format!("{line} {counter}"));
            return;
        }

        repeat.last = Some((level, msg));
        repeat.count = 0;
        drop(repeat);

        if options.clear {
            self.clear();
        }
        self.write(level, &line);
    }

    fn format(&self, level: LogLevel, msg: &str, options: &LogOptions) -> String {
        let icon = match level {
            LogLevel::Info => "ℹ",
            LogLevel::Success => "✔",
            LogLevel::Warn => "⚠",
            LogLevel::Error | LogLevel::Silent => "✗",
        };
        let tag = format!("{icon} {LOGGER_PREFIX}");
        let tag = if self.color {
            match level {
                LogLevel::Info => tag.cyan().to_string(),
                LogLevel::Success => tag.green().to_string(),
                LogLevel::Warn => tag.yellow().to_string(),
                LogLevel::Error | LogLevel::Silent => tag.red().to_string(),
            }
        } else {
            tag
        };

        let mut line = format!("{tag} {msg}");
        if let Some(elapsed) = options.elapsed {
            let elapsed = format!("({})", format_duration(elapsed));
            if self.color {
                line = format!("{line} {}", elapsed.dimmed());
            } else {
                line = format!("{line} {elapsed}");
            }
        }
        if options.timestamp {
            let time = chrono::Local::now().format("%H:%M:%S").to_string();
            if self.color {
                line = format!("{} {line}", time.dimmed());
            } else {
                line = format!("{time} {line}");
            }
        }
        line
    }

    fn clear(&self) {
        if !self.can_clear {
            return;
        }
        match &self.sink {
            Sink::Terminal { stdout, .. } => {
                let _ = stdout.clear_screen();
            }
            Sink::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.lines.clear();
                buffer.clears += 1;
            }
        }
    }

    fn write(&self, level: LogLevel, line: &str) {
        match &self.sink {
            Sink::Terminal { stdout, stderr } => {
                let term = if level >= LogLevel::Warn { stderr } else { stdout };
                let _ = term.write_line(line);
            }
            Sink::Buffer(buffer) => buffer.lock().lines.push(line.to_string()),
        }
    }

    /// Replace the previous line, or append when the terminal cannot redraw.
    fn rewrite(&self, level: LogLevel, line: &str) {
        match &self.sink {
            Sink::Terminal { stdout, stderr } => {
                let term = if level >= LogLevel::Warn { stderr } else { stdout };
                if self.can_clear {
                    let _ = term.clear_last_lines(1);
                }
                let _ = term.write_line(line);
            }
            Sink::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.lines.pop();
                buffer.lines.push(line.to_string());
            }
        }
    }
}
