use rhai::{EvalAltResult, ParseError};
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The name is not in the logger's operation table.
    #[error("operation not found: '{0}'")]
    OperationNotFound(String),

    #[error("unable to locate script file '{path}': {source}")]
    ScriptNotFound {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("script failed: {0}")]
    Script(#[from] Box<EvalAltResult>),

    #[error("script does not parse: {0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Rhai only carries runtime errors across the script boundary.
    pub fn into_script_error(self) -> Box<EvalAltResult> {
        match self {
            Error::Script(err) => err,
            Error::Parse(err) => err.into(),
            other => EvalAltResult::ErrorRuntime(other.to_string().into(), rhai::Position::NONE)
                .into(),
        }
    }
}
