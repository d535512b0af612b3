//! Error types for the rule engine

use thiserror::Error;

/// Result type for rule-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling a rule
#[derive(Error, Debug)]
pub enum Error {
    /// Syntax or load-time error in the wrapped rule
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    /// The compiled rule failed its smoke-test call at the origin
    #[error("rule failed at (0, 0, 0): {0}")]
    SmokeTest(String),
}
