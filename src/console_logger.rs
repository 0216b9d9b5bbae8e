//! The logging facade.
//!
//! Every operation is looked up by name in a handler table and run through
//! [`ConsoleLogger::call`]. The named methods (`log`, `error_file`,
//! `warning_str`, ...) are thin wrappers over `call` so that all of them put
//! the same number of frames between the caller and the trace capture.

use indexmap::IndexMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::LoggerConfig;
use crate::error::{Error, Result};
use crate::file_sink;
use crate::format::{compose, decorate, decorate_all};
use crate::logger::{debug, trace, warn};
use crate::printer::Printer;
use crate::severity::Severity;
use crate::trace::capture_trace;
use crate::value::Value;

pub type Handler<W> = fn(&mut ConsoleLogger<W>, Severity, Value, CallOptions) -> Option<String>;

struct Operation<W: Write> {
    severity: Severity,
    handler: Handler<W>,
}

impl<W: Write> Clone for Operation<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W: Write> Copy for Operation<W> {}

/// Names accepted by [`ConsoleLogger::call`], in registration order.
pub const OPERATIONS: [&str; 16] = [
    "plain",
    "log",
    "warning",
    "error",
    "plain_file",
    "log_file",
    "warning_file",
    "error_file",
    "plain_str",
    "log_str",
    "warning_str",
    "error_str",
    "plain_live",
    "log_live",
    "warning_live",
    "error_live",
];

/// Per-call knobs for [`ConsoleLogger::call`].
#[derive(Debug, Clone, PartialEq)]
pub struct CallOptions {
    /// When false the call is skipped.
    pub condition: bool,
    /// Target file for the `*_file` operations.
    pub path: Option<PathBuf>,
    pub suffix: String,
    /// Prefix to use instead of capturing one from the stack.
    pub trace: Option<String>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            condition: true,
            path: None,
            suffix: String::new(),
            trace: None,
        }
    }
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn when(mut self, condition: bool) -> Self {
        self.condition = condition;
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn trace(mut self, prefix: impl Into<String>) -> Self {
        self.trace = Some(prefix.into());
        self
    }
}

/// Where a formatted line ends up.
#[derive(Debug)]
enum Destination {
    Console,
    /// Formatted like `Console` but handed back to the caller.
    Capture,
    /// Replaces the current console line.
    Overwrite,
    /// Appended to the given file, or the configured default.
    File(Option<PathBuf>),
}

/// One log call, built per invocation and dropped once written.
#[derive(Debug)]
struct LogEvent {
    payload: Value,
    severity: Severity,
    prefix: String,
    suffix: String,
    destination: Destination,
}

impl LogEvent {
    fn new(payload: Value, severity: Severity, destination: Destination) -> Self {
        Self {
            payload,
            severity,
            prefix: String::new(),
            suffix: String::new(),
            destination,
        }
    }

    fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

// Expands in the handler's own frame so the capture depth counts from it.
macro_rules! trace_prefix {
    ($logger:expr, $options:expr) => {
        match $options.trace.take() {
            Some(prefix) => prefix,
            None => capture_trace($logger.config.trace_depth),
        }
    };
}

pub struct ConsoleLogger<W: Write = io::Stdout> {
    config: LoggerConfig,
    printer: Printer<W>,
    handlers: IndexMap<&'static str, Operation<W>>,
}

impl Default for ConsoleLogger<io::Stdout> {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl ConsoleLogger<io::Stdout> {
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_printer(config, Printer::stdout())
    }
}

impl<W: Write> ConsoleLogger<W> {
    pub fn with_printer(config: LoggerConfig, printer: Printer<W>) -> Self {
        Self {
            config,
            printer,
            handlers: handler_table(),
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut LoggerConfig {
        &mut self.config
    }

    pub fn printer(&self) -> &Printer<W> {
        &self.printer
    }

    pub fn into_printer(self) -> Printer<W> {
        self.printer
    }

    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    pub fn has_operation(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Runs the operation registered under `operation`.
    ///
    /// Unknown names fail even when logging is disabled. Known names are
    /// silently skipped when `verbose` is off, the execution context is
    /// rejected, or `options.condition` is false. Only the `*_str` operations
    /// return `Some`.
    #[inline(never)]
    pub fn call(
        &mut self,
        operation: &str,
        payload: impl Into<Value>,
        options: CallOptions,
    ) -> Result<Option<String>> {
        // Checked ahead of the gates: a disabled logger still rejects typos.
        let Some(entry) = self.handlers.get(operation).copied() else {
            warn!("call: operation '{}' not found", operation);
            return Err(Error::OperationNotFound(operation.to_string()));
        };

        if !options.condition {
            trace!("call: '{}' skipped by condition", operation);
            return Ok(None);
        }
        if !self.config.is_enabled() {
            trace!("call: '{}' skipped, logging disabled", operation);
            return Ok(None);
        }

        Ok((entry.handler)(self, entry.severity, payload.into(), options))
    }

    fn emit(&mut self, event: LogEvent) -> Option<String> {
        let severity = event.severity;
        match event.destination {
            Destination::Console => {
                let line = compose(&event.payload, severity, &event.prefix, &event.suffix);
                self.printer.emit(&line);
                None
            }
            Destination::Capture => Some(compose(
                &event.payload,
                severity,
                &event.prefix,
                &event.suffix,
            )),
            Destination::Overwrite => {
                let mut line = decorate_all(&event.payload, severity, &event.prefix);
                line.push_str(&decorate(&event.suffix, severity, false));
                self.printer.emit_overwrite(&line);
                None
            }
            Destination::File(path) => {
                file_sink::append(
                    &mut self.printer,
                    &mut self.config,
                    &event.payload,
                    &event.prefix,
                    &event.suffix,
                    path.as_deref(),
                );
                None
            }
        }
    }
}

#[inline(never)]
fn console_handler<W: Write>(
    logger: &mut ConsoleLogger<W>,
    severity: Severity,
    payload: Value,
    mut options: CallOptions,
) -> Option<String> {
    let prefix = trace_prefix!(logger, options);
    let event = LogEvent::new(payload, severity, Destination::Console)
        .with_prefix(prefix)
        .with_suffix(options.suffix);
    logger.emit(event)
}

#[inline(never)]
fn file_handler<W: Write>(
    logger: &mut ConsoleLogger<W>,
    severity: Severity,
    payload: Value,
    mut options: CallOptions,
) -> Option<String> {
    let prefix = trace_prefix!(logger, options);
    let event = LogEvent::new(payload, severity, Destination::File(options.path))
        .with_prefix(prefix)
        .with_suffix(options.suffix);
    logger.emit(event)
}

#[inline(never)]
fn capture_handler<W: Write>(
    logger: &mut ConsoleLogger<W>,
    severity: Severity,
    payload: Value,
    mut options: CallOptions,
) -> Option<String> {
    let prefix = trace_prefix!(logger, options);
    let event = LogEvent::new(payload, severity, Destination::Capture)
        .with_prefix(prefix)
        .with_suffix(options.suffix);
    logger.emit(event)
}

fn live_handler<W: Write>(
    logger: &mut ConsoleLogger<W>,
    severity: Severity,
    payload: Value,
    options: CallOptions,
) -> Option<String> {
    let mut event = LogEvent::new(payload, severity, Destination::Overwrite)
        .with_suffix(options.suffix);
    if let Some(prefix) = options.trace {
        event = event.with_prefix(prefix);
    }
    logger.emit(event)
}

fn handler_table<W: Write>() -> IndexMap<&'static str, Operation<W>> {
    let families: [(&str, Handler<W>); 4] = [
        ("", console_handler::<W>),
        ("_file", file_handler::<W>),
        ("_str", capture_handler::<W>),
        ("_live", live_handler::<W>),
    ];

    let mut table = IndexMap::with_capacity(OPERATIONS.len());
    for (suffix, handler) in families {
        for severity in Severity::ALL {
            let name = format!("{}{}", severity.name(), suffix);
            let Some(key) = OPERATIONS.iter().copied().find(|op| *op == name) else {
                debug!("handler_table: '{}' has no public name", name);
                continue;
            };
            table.insert(key, Operation { severity, handler });
        }
    }
    table
}

macro_rules! console_ops {
    ($($name:ident => $op:literal),* $(,)?) => {
        $(
            #[inline(never)]
            pub fn $name(&mut self, payload: impl Into<Value>) {
                // registered name, cannot fail
                let _ = self.call($op, payload, CallOptions::default());
            }
        )*
    };
}

macro_rules! file_ops {
    ($($name:ident => $op:literal),* $(,)?) => {
        $(
            /// Appends to `path`, or to the configured log file when `None`.
            #[inline(never)]
            pub fn $name(&mut self, payload: impl Into<Value>, path: Option<&Path>) {
                let mut options = CallOptions::default();
                options.path = path.map(Path::to_path_buf);
                let _ = self.call($op, payload, options);
            }
        )*
    };
}

macro_rules! string_ops {
    ($($name:ident => $op:literal),* $(,)?) => {
        $(
            /// Returns the decorated line instead of printing it; `None` when
            /// logging is disabled.
            #[inline(never)]
            pub fn $name(&mut self, payload: impl Into<Value>) -> Option<String> {
                self.call($op, payload, CallOptions::default()).ok().flatten()
            }
        )*
    };
}

impl<W: Write> ConsoleLogger<W> {
    console_ops! {
        plain => "plain",
        log => "log",
        warning => "warning",
        error => "error",
        plain_live => "plain_live",
        log_live => "log_live",
        warning_live => "warning_live",
        error_live => "error_live",
    }

    file_ops! {
        plain_file => "plain_file",
        log_file => "log_file",
        warning_file => "warning_file",
        error_file => "error_file",
    }

    string_ops! {
        plain_str => "plain_str",
        log_str => "log_str",
        warning_str => "warning_str",
        error_str => "error_str",
    }
}
