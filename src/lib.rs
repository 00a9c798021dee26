//! # Sprig - A Small Imperative Scripting Language
//!
//! A tree-walking interpreter for a dynamically typed scripting language with
//! two declaration forms, compound assignment, `if`/`while`/`for`/`foreach`
//! control flow, `switch` expressions, arrays and maps, and explicit casts.
//!
//! ## Quick Start
//!
//! ```rust
//! use sprig::{BufferConsole, Interpreter, Parser, Value};
//!
//! # fn main() -> sprig::Result<()> {
//! let code = r#"
//!     def sum = 0
//!     for (def i = 1; i <= 10; i += 1)
//!         sum += i
//!     println("sum = " + sum)
//! "#;
//!
//! // Parse into a command tree
//! let program = Parser::from_source(code).parse()?;
//!
//! // Execute against an in-memory console
//! let mut interpreter = Interpreter::new(BufferConsole::new());
//! interpreter.run(&program)?;
//!
//! assert_eq!(interpreter.memory().get("sum"), Value::Number(55));
//! assert_eq!(interpreter.console().output(), "sum = 55\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! ### Data Types
//!
//! - **Null**: `null`
//! - **Boolean**: `true`, `false`
//! - **Number**: 32-bit signed integers with wrapping arithmetic
//! - **Text**: `"hello\n"`
//! - **Array**: `[1, 2, 3]`, `[]`
//! - **Map**: `[name: "sprig", year: 2024]`, `[:]`
//!
//! ### Declarations and Assignment
//!
//! ```text
//! def a, b = 5              // a is null
//! def (x, y, z) = [1, 2]    // z is null
//! b **= 2
//! m.name = "x"              // same as m["name"] = "x"
//! ```
//!
//! ### Control Flow
//!
//! ```text
//! if (x > 0) println("positive") else println("other")
//! while (n > 0) n -= 1
//! for (def i = 0; i < 3; i += 1) print(i)
//! foreach (def k in keys(m)) println(k)
//! def word = switch (n) { case 1 -> "one" default -> "many" }
//! ```
//!
//! ### Built-in Functions
//!
//! - `read(prompt)` - print a prompt and read one line of input
//! - `empty(x)`, `size(x)` - container and text length
//! - `keys(m)`, `values(m)` - map contents in key order
//!
//! ## Architecture
//!
//! 1. **Lexer** ([`lexer`]) - produces tokens on demand
//! 2. **Parser** ([`parser`]) - recursive descent over a one-token rewindable cursor
//! 3. **Runtime** ([`runtime`]) - evaluates the command tree against a global store
//!
//! ## Error Handling
//!
//! Every failure is an [`Error`] carrying the source line. Its `Display` is
//! the diagnostic a command line driver prints:
//!
//! ```rust
//! let err = sprig::run_source("def x = 1\ndef y = x / 0", sprig::BufferConsole::new())
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "02: Division by zero");
//! ```

/// Version of the Sprig interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

// Re-export main types
pub use error::{Error, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{BinaryOp, Command, Expr, Parser, UnaryOp};
pub use runtime::{BufferConsole, Console, ExecutionConfig, Interpreter, StdConsole, Value};

/// Parses and runs `source` with the default configuration
///
/// Returns the interpreter so callers can inspect memory and console output.
pub fn run_source<C: Console>(source: &str, console: C) -> Result<Interpreter<C>> {
    run_source_with_config(source, console, ExecutionConfig::default())
}

/// Parses and runs `source` with an explicit configuration
pub fn run_source_with_config<C: Console>(
    source: &str,
    console: C,
    config: ExecutionConfig,
) -> Result<Interpreter<C>> {
    let program = Parser::from_source(source).parse()?;
    let mut interpreter = Interpreter::with_config(console, config);
    interpreter.run(&program)?;
    Ok(interpreter)
}
