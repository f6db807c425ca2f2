//! Inspector shell errors.

/// Errors that can occur while parsing or running a shell command.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The `position` command is missing `startpos` or `fen` keyword.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    /// Failed to parse a FEN string.
    #[error("invalid FEN: {fen}")]
    InvalidFen {
        /// The FEN string that failed to parse.
        fen: String,
    },

    /// A move is not legal in the current position.
    #[error("invalid move: {uci_move}")]
    InvalidMove {
        /// The UCI move string that failed to resolve.
        uci_move: String,
    },

    /// A keyword that takes an argument was given none.
    #[error("missing value for {param}")]
    MissingValue {
        /// The keyword missing its value.
        param: String,
    },

    /// An argument could not be parsed.
    #[error("invalid value for {param}: {value}")]
    InvalidValue {
        /// The keyword whose value was rejected.
        param: String,
        /// The rejected value.
        value: String,
    },

    /// `setoption` named an option the shell does not know.
    #[error("unknown option: {name}")]
    UnknownOption {
        /// The option name as given.
        name: String,
    },

    /// An I/O error occurred while reading input or writing output.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
