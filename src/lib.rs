#![doc = include_str!("../README.md")]

pub mod cli;
pub mod config;
pub mod console_logger;
pub mod engine;
pub mod error;
pub mod file_sink;
pub mod format;
pub mod logger;
pub mod printer;
pub mod severity;
pub mod trace;
pub mod value;

pub use config::{ContextPolicy, LoggerConfig};
pub use console_logger::{CallOptions, ConsoleLogger, OPERATIONS};
pub use error::{Error, Result};
pub use severity::Severity;
pub use value::Value;

use cli::{Cli, Commands, EmitOptions};
use engine::ScriptEngine;
use logger::*;
use std::io::{self, Write};

pub fn run() -> Result<()> {
    run_with_cli(cli::parse_args())
}

pub fn run_with_cli(cli: Cli) -> Result<()> {
    logger::init_with(cli.diagnostics.as_deref());
    info!("start");
    debug!("cli args: {:?}", cli);

    let config = config_from_cli(&cli);
    let traced = cli.trace_depth.is_some();

    match cli.cmd {
        Commands::Emit(opts) => emit(ConsoleLogger::new(config), &opts, traced)?,
        Commands::Run(opts) => {
            let mut script_engine = ScriptEngine::new(ConsoleLogger::new(config))?;
            script_engine.run_script(&opts.script)?;
        }
        Commands::Ops => print_operations(&ConsoleLogger::new(config)),
    }

    info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn config_from_cli(cli: &Cli) -> LoggerConfig {
    let mut config = LoggerConfig::new().with_verbose(!cli.quiet);
    if let Some(depth) = cli.trace_depth {
        config = config.with_trace_depth(depth);
    }
    if let Some(path) = &cli.log_file {
        config = config.with_file_path(path);
    }
    if cli.require_tty {
        config = config.with_context(ContextPolicy::Interactive);
    }
    config
}

/// A command line has no source location of its own, so the stack is only
/// consulted when `--trace-depth` asks for it.
fn emit(mut logger: ConsoleLogger, opts: &EmitOptions, traced: bool) -> Result<()> {
    let message = opts.message.join(" ");
    debug!("emit: '{}' with {} byte message", opts.operation, message.len());

    let options = if traced {
        CallOptions::default()
    } else {
        CallOptions::default().trace("")
    };
    let returned = logger
        .call(&opts.operation, message, options)
        .map_err(|err| {
            error!("failed to run operation: {}", err);
            err
        })?;

    if let Some(text) = returned {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
    Ok(())
}

fn print_operations(logger: &ConsoleLogger) {
    let mut stdout = io::BufWriter::new(io::stdout());
    for name in logger.operations() {
        let _ = writeln!(stdout, "{name}");
    }
    let _ = stdout.flush();
}
