//! Error types for the Sprig interpreter

use thiserror::Error;

/// Sprig interpreter errors
///
/// Every variant carries the source line it is attributed to. The `Display`
/// form is the diagnostic printed by the command line driver: a two-digit
/// zero-padded line number, a colon and the message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Lexical and syntax errors
    /// The lexer produced a lexeme that belongs to no token category
    ///
    /// **Triggered by:** Unknown characters or bad escapes inside text literals
    /// **Example:** `def x = 1 @ 2`
    #[error("{line:02}: Invalid lexeme [{lexeme}]")]
    InvalidLexeme {
        /// Line number where error occurred
        line: usize,
        /// Offending source text
        lexeme: String,
    },

    /// Input ended while a construct was still open
    ///
    /// **Triggered by:** Unterminated text literal or block comment, or a
    /// statement cut off by the end of the file
    /// **Example:** `println("hello`
    #[error("{line:02}: Unexpected end of file")]
    UnexpectedEof {
        /// Line number where error occurred
        line: usize,
    },

    /// A token did not match what the grammar expected
    ///
    /// **Example:** `if x > 1 { ... }` (missing parentheses around condition)
    #[error("{line:02}: Unexpected lexeme [{lexeme}]")]
    UnexpectedLexeme {
        /// Line number where error occurred
        line: usize,
        /// Offending source text
        lexeme: String,
    },

    /// Assignment target is not a writable location
    ///
    /// **Triggered by:** Left-hand side that is not a variable or an access
    /// **Example:** `1 + 2 = x`
    #[error("{line:02}: Invalid assignment target")]
    Unassignable {
        /// Line number where error occurred
        line: usize,
    },

    // Runtime errors
    /// Operand shape violates an operator's contract
    ///
    /// **Triggered by:** Arithmetic on non-numbers, indexing a non-container
    /// **Example:** `def x = true - 1`
    #[error("{line:02}: Invalid operation: {message}")]
    TypeError {
        /// Line number where error occurred
        line: usize,
        /// Description of the offending operand types
        message: String,
    },

    /// Division or modulo by a zero Number
    ///
    /// **Example:** `def x = 10 / 0`, `def y = 5 % 0`
    #[error("{line:02}: Division by zero")]
    DivisionByZero {
        /// Line number where error occurred
        line: usize,
    },

    /// `read` reached the end of standard input
    #[error("{line:02}: Input error: {message}")]
    InputError {
        /// Line number where error occurred
        line: usize,
        /// Failure reason
        message: String,
    },

    /// A loop ran past the configured iteration limit
    #[error("{line:02}: Too many iterations (limit: {limit})")]
    IterationLimit {
        /// Line number of the loop
        line: usize,
        /// Maximum allowed iterations
        limit: usize,
    },

    /// Console write or read failed
    #[error("{line:02}: I/O error: {message}")]
    Io {
        /// Line number where error occurred
        line: usize,
        /// Error message from the operating system
        message: String,
    },
}

impl Error {
    /// Create a type error with a message
    pub fn type_error(line: usize, msg: impl Into<String>) -> Self {
        Error::TypeError {
            line,
            message: msg.into(),
        }
    }

    /// Line the error is attributed to
    pub fn line(&self) -> usize {
        match self {
            Error::InvalidLexeme { line, .. }
            | Error::UnexpectedEof { line }
            | Error::UnexpectedLexeme { line, .. }
            | Error::Unassignable { line }
            | Error::TypeError { line, .. }
            | Error::DivisionByZero { line }
            | Error::InputError { line, .. }
            | Error::IterationLimit { line, .. }
            | Error::Io { line, .. } => *line,
        }
    }

    /// True for errors raised before execution starts
    pub fn is_syntax_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidLexeme { .. }
                | Error::UnexpectedEof { .. }
                | Error::UnexpectedLexeme { .. }
                | Error::Unassignable { .. }
        )
    }
}

/// Result type for Sprig operations
pub type Result<T> = std::result::Result<T, Error>;
