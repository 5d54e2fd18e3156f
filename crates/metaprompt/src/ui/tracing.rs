//! Tracing layer that captures log events into a [`LogBuffer`] for the
//! frontend's log pane.
//!
//! The buffer has its own mutex, separate from [`UiState`](super::UiState),
//! so a generation task logging from a tokio worker never waits on the
//! render thread. The frontend drains the buffer once per frame.

use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::Layer;
use tracing_subscriber::registry::LookupSpan;

use super::{LOG_TRIM_TO, LogLevel, LogLine, MAX_LOG_LINES, UiState};

/// Pending log lines waiting to be merged into `UiState::logs`.
#[derive(Clone)]
pub struct LogBuffer(Arc<Mutex<Vec<LogLine>>>);

impl LogBuffer {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::with_capacity(128))))
    }

    /// Take every pending line.
    pub fn drain(&self) -> Vec<LogLine> {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *buf)
    }

    /// Move pending lines into `UiState::logs`, respecting the trim limits.
    ///
    /// Takes the `UiState` lock only when there is something to move.
    pub fn flush_into(&self, state: &Arc<Mutex<UiState>>) {
        let lines = self.drain();
        if lines.is_empty() {
            return;
        }
        if let Ok(mut s) = state.lock() {
            s.logs.extend(lines);
            cap(&mut s.logs);
        }
    }

    fn push(&self, line: LogLine) {
        if let Ok(mut buf) = self.0.lock() {
            buf.push(line);
            cap(&mut buf);
        }
    }
}

fn cap(lines: &mut Vec<LogLine>) {
    if lines.len() > MAX_LOG_LINES {
        let trim = lines.len() - LOG_TRIM_TO;
        lines.drain(..trim);
    }
}

/// A [`tracing_subscriber::Layer`] feeding a [`LogBuffer`].
pub struct UiTracingLayer {
    buffer: LogBuffer,
    max_level: Level,
}

impl UiTracingLayer {
    /// Create a layer capturing `INFO` and above, plus the buffer the
    /// frontend drains.
    pub fn new() -> (Self, LogBuffer) {
        Self::with_max_level(Level::INFO)
    }

    /// Create a layer capturing events at `max_level` or more severe.
    pub fn with_max_level(max_level: Level) -> (Self, LogBuffer) {
        let buffer = LogBuffer::new();
        (
            Self {
                buffer: buffer.clone(),
                max_level,
            },
            buffer,
        )
    }
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for UiTracingLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let level = *event.metadata().level();
        // More verbose levels compare greater (TRACE > DEBUG > INFO ...).
        if level > self.max_level {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut message = visitor.message;
        if !visitor.fields.is_empty() {
            let extras: Vec<String> = visitor
                .fields
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            if message.is_empty() {
                message = extras.join(" ");
            } else {
                message = format!("{message} {{{}}}", extras.join(", "));
            }
        }

        self.buffer.push(LogLine {
            time: Local::now().format("%H:%M:%S").to_string(),
            level: match level {
                Level::TRACE => LogLevel::Trace,
                Level::DEBUG => LogLevel::Debug,
                Level::INFO => LogLevel::Info,
                Level::WARN => LogLevel::Warn,
                Level::ERROR => LogLevel::Error,
            },
            message,
        });
    }
}

/// Extracts the message and any extra fields from an event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let raw = format!("{value:?}");
        if field.name() == "message" {
            self.message = raw
                .strip_prefix('"')
                .and_then(|r| r.strip_suffix('"'))
                .map(str::to_string)
                .unwrap_or(raw);
        } else {
            self.fields.push((field.name().to_string(), raw));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .push((field.name().to_string(), value.to_string()));
        }
    }
}
