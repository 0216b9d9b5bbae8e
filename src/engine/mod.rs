mod bindings;
mod convert;
mod core;

pub use bindings::SharedLogger;
pub use convert::to_value;
pub use self::core::ScriptEngine;
