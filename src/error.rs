//! imsat error types

/// imsat result type
pub type Result<T> = std::result::Result<T, Error>;

/// imsat errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from tensor operations
    #[error("tensor error: {0}")]
    Candle(#[from] candle_core::Error),

    /// Invalid argument to an operation
    #[error("invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// Argument name
        arg: &'static str,
        /// Why it's invalid
        reason: String,
    },

    /// Autograd error
    #[error("autograd error: {reason}")]
    Autograd {
        /// Description of what went wrong
        reason: String,
    },
}
