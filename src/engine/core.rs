use rhai::{Dynamic, Engine, AST};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::bindings::{self, SharedLogger};
use crate::console_logger::ConsoleLogger;
use crate::error::{Error, Result};
use crate::logger::*;

/// Runs Rhai scripts that log through a shared [`ConsoleLogger`].
pub struct ScriptEngine {
    pub engine: Engine,
    pub logger: SharedLogger,
}

impl ScriptEngine {
    pub fn new(logger: ConsoleLogger) -> Result<Self> {
        let mut engine = Engine::new();
        // Bindings and the host share one logger; access is single-threaded.
        #[allow(clippy::arc_with_non_send_sync)]
        let logger = Arc::new(Mutex::new(logger));

        engine.set_max_expr_depths(256, 128);
        bindings::register_all(&mut engine, logger.clone())?;

        Ok(Self { engine, logger })
    }

    pub fn run_script(&mut self, path: &str) -> Result<()> {
        let script_path = resolve_script_path(path).map_err(|source| Error::ScriptNotFound {
            path: path.to_string(),
            source,
        })?;

        debug!("run_script({})", script_path.display());

        let mut ast = self.engine.compile_file(script_path.clone())?;
        set_source_name(&mut ast, &script_path);
        trace!("run_script: AST compiled successfully");
        self.engine.run_ast(&ast)?;
        trace!("run_script: AST executed successfully");
        Ok(())
    }

    /// Evaluates inline source; `name` is what trace prefixes report.
    pub fn eval_source(&mut self, name: &str, source: &str) -> Result<Dynamic> {
        let mut ast = self.engine.compile(source)?;
        ast.set_source(name);
        Ok(self.engine.eval_ast::<Dynamic>(&ast)?)
    }
}

fn set_source_name(ast: &mut AST, path: &Path) {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    ast.set_source(name);
}

fn resolve_script_path(path: &str) -> io::Result<PathBuf> {
    let candidate = Path::new(path);
    if candidate.is_file() {
        Ok(candidate.to_path_buf())
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("'{}' does not exist or is not a file", candidate.display()),
        ))
    }
}
