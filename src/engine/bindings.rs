use rhai::{
    Array, Dynamic, Engine, EvalAltResult, ImmutableString, NativeCallContext, Position, INT,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::convert::to_value;
use crate::console_logger::{CallOptions, ConsoleLogger};
use crate::logger::trace;
use crate::trace::format_trace;

pub type SharedLogger = Arc<Mutex<ConsoleLogger>>;

/// Registers every logger operation under its own name, plus the
/// configuration helpers.
pub fn register_all(
    engine: &mut Engine,
    logger: SharedLogger,
) -> Result<(), Box<EvalAltResult>> {
    let names: Vec<&'static str> =
        with_logger(&logger, |logger| Ok(logger.operations().collect()))?;

    for name in names {
        let shared = logger.clone();
        engine.register_fn(
            name,
            move |ctx: NativeCallContext, payload: Dynamic| -> Result<Dynamic, Box<EvalAltResult>> {
                invoke(&ctx, &shared, name, payload, CallOptions::default())
            },
        );

        if name.ends_with("_file") {
            let shared = logger.clone();
            engine.register_fn(
                name,
                move |ctx: NativeCallContext,
                      payload: Dynamic,
                      path: ImmutableString|
                      -> Result<Dynamic, Box<EvalAltResult>> {
                    let options = CallOptions::default().path(PathBuf::from(path.as_str()));
                    invoke(&ctx, &shared, name, payload, options)
                },
            );
        }
    }

    register_config(engine, logger);
    Ok(())
}

fn register_config(engine: &mut Engine, logger: SharedLogger) {
    let shared = logger.clone();
    engine.register_fn(
        "set_verbose",
        move |verbose: bool| -> Result<(), Box<EvalAltResult>> {
            with_logger(&shared, |logger| {
                logger.config_mut().verbose = verbose;
                Ok(())
            })
        },
    );

    let shared = logger.clone();
    engine.register_fn(
        "set_trace_depth",
        move |depth: INT| -> Result<(), Box<EvalAltResult>> {
            let depth = usize::try_from(depth).map_err(|_| {
                runtime_error(format!("set_trace_depth(): depth must be >= 0, got {}", depth))
            })?;
            with_logger(&shared, |logger| {
                logger.config_mut().trace_depth = depth;
                Ok(())
            })
        },
    );

    let shared = logger.clone();
    engine.register_fn(
        "set_log_file",
        move |path: ImmutableString| -> Result<(), Box<EvalAltResult>> {
            with_logger(&shared, |logger| {
                logger.config_mut().set_file_path(path.as_str());
                Ok(())
            })
        },
    );

    let shared = logger;
    engine.register_fn(
        "operations",
        move || -> Result<Array, Box<EvalAltResult>> {
            with_logger(&shared, |logger| {
                Ok(logger.operations().map(|name| Dynamic::from(name.to_string())).collect())
            })
        },
    );
}

fn invoke(
    ctx: &NativeCallContext,
    logger: &SharedLogger,
    name: &'static str,
    payload: Dynamic,
    mut options: CallOptions,
) -> Result<Dynamic, Box<EvalAltResult>> {
    if !name.ends_with("_live") {
        options = options.trace(script_location(ctx));
    }
    trace!("invoke: '{}' at {:?}", name, ctx.call_position());

    let payload = to_value(payload);
    let result = with_logger(logger, |logger| {
        logger
            .call(name, payload, options)
            .map_err(|err| err.into_script_error())
    })?;

    Ok(result.map(Dynamic::from).unwrap_or(Dynamic::UNIT))
}

/// The stack of the host process says nothing useful about a script, so the
/// prefix names the script file and the line of the call instead.
fn script_location(ctx: &NativeCallContext) -> String {
    match ctx.call_position().line() {
        Some(line) => {
            let source = ctx.call_source().unwrap_or("script");
            format_trace(source, u32::try_from(line).unwrap_or(u32::MAX))
        }
        None => String::new(),
    }
}

fn with_logger<F, R>(logger: &SharedLogger, op: F) -> Result<R, Box<EvalAltResult>>
where
    F: FnOnce(&mut ConsoleLogger) -> Result<R, Box<EvalAltResult>>,
{
    let mut guard = logger
        .lock()
        .map_err(|_| runtime_error("logger state is poisoned"))?;
    op(&mut guard)
}

fn runtime_error(msg: impl Into<String>) -> Box<EvalAltResult> {
    EvalAltResult::ErrorRuntime(msg.into().into(), Position::NONE).into()
}
