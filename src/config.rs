use std::env;
use std::fmt;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use crate::logger::debug;
use crate::trace::DEFAULT_TRACE_DEPTH;

/// Relative location of the log file when no path is configured.
pub const DEFAULT_FILE_PATH: &str = "logs/log.txt";

/// Decides whether the current process is allowed to produce output.
#[derive(Clone, Copy, Default)]
pub enum ContextPolicy {
    /// Log from any process.
    #[default]
    Always,
    /// Log only when stdout is attached to a terminal.
    Interactive,
    /// Defer to a caller supplied check.
    Custom(fn() -> bool),
}

impl ContextPolicy {
    pub fn allows(&self) -> bool {
        match self {
            ContextPolicy::Always => true,
            ContextPolicy::Interactive => io::stdout().is_terminal(),
            ContextPolicy::Custom(check) => check(),
        }
    }
}

impl fmt::Debug for ContextPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextPolicy::Always => f.write_str("Always"),
            ContextPolicy::Interactive => f.write_str("Interactive"),
            ContextPolicy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub trace_depth: usize,
    pub verbose: bool,
    pub context: ContextPolicy,
    default_file_path: PathBuf,
    base_dir: PathBuf,
    file_path: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            trace_depth: DEFAULT_TRACE_DEPTH,
            verbose: true,
            context: ContextPolicy::default(),
            default_file_path: PathBuf::from(DEFAULT_FILE_PATH),
            base_dir: executable_dir(),
            file_path: None,
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_trace_depth(mut self, depth: usize) -> Self {
        self.trace_depth = depth;
        self
    }

    pub fn with_context(mut self, context: ContextPolicy) -> Self {
        self.context = context;
        self
    }

    /// Directory the default relative path is joined to.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn default_file_path(&self) -> &Path {
        &self.default_file_path
    }

    /// The cached log file path, if it has been resolved or set.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
    }

    /// Forget the cached path so the next file write recomputes the default.
    pub fn reset_file_path(&mut self) {
        self.file_path = None;
    }

    /// Returns the log file path, computing and caching the default on first use.
    pub fn resolve_file_path(&mut self) -> &Path {
        if self.file_path.is_none() {
            let resolved = self.base_dir.join(&self.default_file_path);
            debug!("resolve_file_path: defaulting to {}", resolved.display());
            self.file_path = Some(resolved);
        }
        self.file_path.as_deref().unwrap_or(&self.default_file_path)
    }

    /// Verbosity and execution context both allow output.
    pub fn is_enabled(&self) -> bool {
        self.verbose && self.context.allows()
    }
}

fn executable_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
