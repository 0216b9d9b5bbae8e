use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "conlog",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
pub struct Cli {
    /// Turn every operation into a no-op
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Stack frames between the trace capture and the reported call site
    #[arg(long, value_name = "N", global = true)]
    pub trace_depth: Option<usize>,

    /// File used by the *_file operations (defaults to logs/log.txt next to the executable)
    #[arg(short = 'f', long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Only produce output when stdout is a terminal
    #[arg(long, global = true)]
    pub require_tty: bool,

    /// Filter for conlog's own diagnostics on stderr (RUST_LOG syntax)
    #[arg(long, value_name = "FILTER", global = true)]
    pub diagnostics: Option<String>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one logger operation by name (`conlog ops` lists them)
    Emit(EmitOptions),
    /// Run a Rhai script with every operation available as a function
    Run(RunOptions),
    /// List the operation names
    Ops,
}

#[derive(Args, Debug)]
#[command(trailing_var_arg = true)]
pub struct EmitOptions {
    /// Operation name, e.g. `log`, `error_file`, `warning_str`
    #[arg(name = "OPERATION")]
    pub operation: String,

    /// Message words, joined with single spaces
    #[arg(name = "MESSAGE", allow_hyphen_values = true)]
    pub message: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RunOptions {
    /// Path to the Rhai script
    #[arg(name = "SCRIPT")]
    pub script: String,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_from<I, T>(items: I) -> Cli
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Cli::parse_from(items)
    }

    #[test]
    fn parse_emit_with_message_words() {
        let cli = parse_from(["conlog", "emit", "warning", "disk", "--almost", "full"]);
        assert!(!cli.quiet);
        match cli.cmd {
            Commands::Emit(opts) => {
                assert_eq!(opts.operation, "warning");
                assert_eq!(
                    opts.message,
                    vec!["disk".to_string(), "--almost".to_string(), "full".to_string()]
                );
            }
            other => panic!("expected emit command, got {:?}", other),
        }
    }

    #[test]
    fn parse_global_options_after_subcommand() {
        let cli = parse_from([
            "conlog",
            "run",
            "job.rhai",
            "--quiet",
            "--trace-depth",
            "2",
            "-f",
            "/tmp/out.log",
            "--require-tty",
        ]);
        assert!(cli.quiet);
        assert!(cli.require_tty);
        assert_eq!(cli.trace_depth, Some(2));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/out.log")));
        match cli.cmd {
            Commands::Run(opts) => assert_eq!(opts.script, "job.rhai"),
            other => panic!("expected run command, got {:?}", other),
        }
    }

    #[test]
    fn parse_ops() {
        let cli = parse_from(["conlog", "ops"]);
        assert!(matches!(cli.cmd, Commands::Ops));
    }
}
