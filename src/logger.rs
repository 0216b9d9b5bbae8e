// src/logger.rs
//
// Internal diagnostics for conlog itself. Product output goes through
// `ConsoleLogger`; these records go to stderr and are filtered by RUST_LOG.
use env_logger::{Builder, Env, Target};
use std::io::Write;

/// `filter` overrides both RUST_LOG and the build-dependent default.
pub fn init_with(filter: Option<&str>) {
    let env = if cfg!(debug_assertions) {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("off")
    };

    let mut builder = Builder::from_env(env);
    if let Some(filter) = filter {
        builder.parse_filters(filter);
    }

    builder.target(Target::Stderr).format(|buf, record| {
        writeln!(
            buf,
            "[{:>5} {}:{}] {}",
            record.level(),
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.args()
        )
    });

    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }
}

/// Re-export logging macros
#[allow(unused_imports)]
pub use log::{debug, error, info, trace, warn};
