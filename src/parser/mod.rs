//! Sprig Parser Module
//!
//! Parses the token stream into a command tree with a recursive descent
//! parser over a rewindable token cursor.

mod ast;
mod cursor;
#[allow(clippy::module_inception)]
mod parser;

pub use ast::{
    Assign, AssignOp, BinaryOp, CastType, Command, Declaration, Expr, SetExpr, UnaryOp,
};
pub use cursor::TokenCursor;
pub use parser::Parser;
