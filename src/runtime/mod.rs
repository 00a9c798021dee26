//! Runtime execution for Sprig programs by direct tree walking

pub mod config;
pub mod console;
mod evaluator;
mod memory;
pub mod operators;
mod value;

pub use config::ExecutionConfig;
pub use console::{BufferConsole, Console, ConsoleError, StdConsole};
pub use evaluator::Interpreter;
pub use memory::Memory;
pub use value::Value;
