use std::io::{self, Write};

use crate::logger::debug;

const CARRIAGE_RETURN: &str = "\r";
const ERASE_TO_END: &str = "\x1b[K";

/// Console sink. Text handed to it is already decorated.
#[derive(Debug)]
pub struct Printer<W: Write = io::Stdout> {
    target: W,
}

impl Default for Printer<io::Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Printer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Printer<W> {
    pub fn new(target: W) -> Self {
        Self { target }
    }

    pub fn emit(&mut self, text: &str) {
        write_text(&mut self.target, text);
    }

    /// Returns to the start of the line, clears it and writes `text` without
    /// a terminator so the next call replaces it.
    pub fn emit_overwrite(&mut self, text: &str) {
        let mut line = String::with_capacity(text.len() + 4);
        line.push_str(CARRIAGE_RETURN);
        line.push_str(ERASE_TO_END);
        line.push_str(text);
        write_text(&mut self.target, &line);
    }

    pub fn into_inner(self) -> W {
        self.target
    }
}

fn write_text(mut target: impl Write, text: &str) {
    if let Err(err) = target
        .write_all(text.as_bytes())
        .and_then(|_| target.flush())
    {
        debug!("printer: console write failed: {}", err);
    }
}
