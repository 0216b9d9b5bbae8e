//! Appends uncolored rows to a log file.
//!
//! Nothing here returns an error: a missing directory that cannot be created,
//! a read-only file or a failed write is reported once on the console at
//! error level and the call returns normally.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::LoggerConfig;
use crate::format::{compose, file_row};
use crate::logger::{debug, trace, warn};
use crate::printer::Printer;
use crate::severity::Severity;
use crate::value::Value;

pub fn append<W: Write>(
    printer: &mut Printer<W>,
    config: &mut LoggerConfig,
    payload: &Value,
    prefix: &str,
    suffix: &str,
    target: Option<&Path>,
) {
    let row = file_row(payload, prefix, suffix);
    let path: PathBuf = match target {
        Some(path) => path.to_path_buf(),
        None => config.resolve_file_path().to_path_buf(),
    };
    trace!("append: {} byte(s) to {}", row.len(), path.display());

    if let Err(err) = ensure_file(&path) {
        warn!("append: cannot create {}: {}", path.display(), err);
        report(
            printer,
            format!("Unable to create file {}: {}", path.display(), err),
            line!(),
        );
        return;
    }

    if !is_writable(&path) {
        warn!("append: {} is not writable", path.display());
        report(
            printer,
            format!("Permission denied: {}", path.display()),
            line!(),
        );
        return;
    }

    if let Err(err) = write_row(&path, &row) {
        warn!("append: write to {} failed: {}", path.display(), err);
        let message = if err.kind() == io::ErrorKind::PermissionDenied {
            format!("Permission denied: {}", path.display())
        } else {
            format!("Unable to write {}: {}", path.display(), err)
        };
        report(printer, message, line!());
    }
}

/// Creates the parent directory and an empty file when they are missing.
fn ensure_file(path: &Path) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            debug!("ensure_file: creating directory {}", parent.display());
            fs::create_dir_all(parent)?;
        }
    }
    debug!("ensure_file: creating {}", path.display());
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

fn is_writable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && !meta.permissions().readonly())
        .unwrap_or(false)
}

fn write_row(path: &Path, row: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(row.as_bytes())?;
    file.flush()
}

fn report<W: Write>(printer: &mut Printer<W>, message: String, line: u32) {
    let tagged = format!("{}:{} [Error]: {}", source_name(), line, message);
    printer.emit(&compose(&Value::Str(tagged), Severity::Error, "", ""));
}

fn source_name() -> &'static str {
    let path = file!();
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn output(printer: Printer<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).expect("utf8 output")
    }

    #[test]
    fn rows_are_appended_in_call_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut printer = Printer::new(Vec::new());
        let mut config = LoggerConfig::new();

        for word in ["first", "second", "third"] {
            let payload = Value::from(word);
            append(&mut printer, &mut config, &payload, "", "", Some(path.as_path()));
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\nthird\n");
        assert_eq!(output(printer), "");
    }

    #[test]
    fn default_path_is_created_under_base_dir() {
        let dir = tempdir().unwrap();
        let mut printer = Printer::new(Vec::new());
        let mut config = LoggerConfig::new().with_base_dir(dir.path());

        append(&mut printer, &mut config, &Value::from("a"), "t: ", "", None);
        append(&mut printer, &mut config, &Value::from("b"), "t: ", "", None);

        let expected = dir.path().join("logs").join("log.txt");
        assert_eq!(config.file_path(), Some(expected.as_path()));
        assert_eq!(fs::read_to_string(expected).unwrap(), "t: a\nt: b\n");
    }

    #[test]
    fn structured_payloads_are_written_without_color() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.log");
        let mut printer = Printer::new(Vec::new());
        let mut config = LoggerConfig::new();

        append(
            &mut printer,
            &mut config,
            &Value::from(vec![1, 2]),
            "",
            " <end>",
            Some(path.as_path()),
        );

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[\n  0 => 1,\n  1 => 2,\n] <end>\n");
        assert!(!contents.contains('\x1b'));
    }

    #[test]
    fn read_only_file_is_left_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locked.log");
        fs::write(&path, "existing\n").unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&path, perms).unwrap();

        let mut printer = Printer::new(Vec::new());
        let mut config = LoggerConfig::new();
        let payload = Value::from("x");
        append(&mut printer, &mut config, &payload, "", "", Some(path.as_path()));

        assert_eq!(fs::read_to_string(&path).unwrap(), "existing\n");
        let console = output(printer);
        assert_eq!(console.matches('\n').count(), 1);
        assert!(console.starts_with("\x1b[31mfile_sink.rs:"));
        assert!(console.contains("[Error]: Permission denied: "));
        assert!(console.ends_with("\x1b[0m\n"));

        let mut perms = fs::metadata(&path).unwrap().permissions();
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        fs::set_permissions(&path, perms).unwrap();
    }

    #[test]
    fn uncreatable_directory_is_reported_once() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join("log.txt");

        let mut printer = Printer::new(Vec::new());
        let mut config = LoggerConfig::new();
        let payload = Value::from("x");
        append(&mut printer, &mut config, &payload, "", "", Some(path.as_path()));

        assert!(!path.exists());
        let console = output(printer);
        assert_eq!(console.matches('\n').count(), 1);
        assert!(console.contains("[Error]: Unable to create file"));
    }

    #[test]
    fn directory_target_is_not_writable() {
        let dir = tempdir().unwrap();
        let mut printer = Printer::new(Vec::new());
        let mut config = LoggerConfig::new();
        append(
            &mut printer,
            &mut config,
            &Value::from("x"),
            "",
            "",
            Some(dir.path()),
        );

        assert!(output(printer).contains("Permission denied"));
    }
}
