//! Call-site prefixes for log lines.
//!
//! `capture_trace` walks the current stack and reports the frame `depth`
//! levels above the function that asked for the trace. The facade adds a
//! fixed number of frames between the user's call and the capture, which is
//! why the depth is configurable rather than hard-coded.

use backtrace::Symbol;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::logger::trace;

/// Frames between a named facade method's caller and the capture:
/// handler, `call`, named method, caller.
pub const DEFAULT_TRACE_DEPTH: usize = 3;

const RESOLVER_NAME: &str = "capture_trace";

/// Returns `"<file>:<line> [<timestamp>]: "` for the frame `depth` levels
/// above the caller of this function (0 is the caller itself), or an empty
/// string when that frame has no file or line information.
#[inline(never)]
pub fn capture_trace(depth: usize) -> String {
    let mut passed_resolver = false;
    let mut remaining = depth;
    let mut location: Option<Option<(String, u32)>> = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if location.is_some() {
                return;
            }
            if !passed_resolver {
                passed_resolver = is_resolver(symbol);
                return;
            }
            if remaining == 0 {
                location = Some(symbol_location(symbol));
            } else {
                remaining -= 1;
            }
        });
        location.is_none()
    });

    match location.flatten() {
        Some((file, line)) => format_trace(&file, line),
        None => {
            trace!("capture_trace: no source location at depth {}", depth);
            String::new()
        }
    }
}

/// Builds the prefix for an already known location.
pub fn format_trace(file: &str, line: u32) -> String {
    let name = Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    format!("{}:{} [{}]: ", name, line, timestamp())
}

/// Seconds since the epoch with microsecond precision.
pub fn timestamp() -> String {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => format!("{}.{:06}", elapsed.as_secs(), elapsed.subsec_micros()),
        Err(_) => "0.000000".to_string(),
    }
}

fn is_resolver(symbol: &Symbol) -> bool {
    symbol
        .name()
        .map(|name| {
            let name = format!("{:#}", name);
            // mangled hashes survive when the demangler does not recognise the scheme
            name.ends_with(RESOLVER_NAME) || name.contains(&format!("{}::h", RESOLVER_NAME))
        })
        .unwrap_or(false)
}

fn symbol_location(symbol: &Symbol) -> Option<(String, u32)> {
    let file = symbol.filename()?;
    let line = symbol.lineno()?;
    Some((file.to_string_lossy().into_owned(), line))
}
