use serde::{Deserialize, Serialize};
use std::fmt;

use crate::runtime::Value;

/// Commands (statements)
///
/// Every node records the source line used for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Ordered sequence of commands; introduces no scope
    Blocks {
        /// Line where the block starts
        line: usize,
        /// Commands executed in order
        commands: Vec<Command>,
    },

    /// `print(expr)` / `println(expr)`
    Print {
        /// Source line
        line: usize,
        /// True for `println`
        newline: bool,
        /// Expression whose textual form is written
        expr: Expr,
    },

    /// `if (cond) body [else body]`
    If {
        /// Source line
        line: usize,
        /// Condition expression to evaluate
        condition: Expr,
        /// Command executed when the condition is truthy
        then_branch: Box<Command>,
        /// Optional command executed otherwise
        else_branch: Option<Box<Command>>,
    },

    /// `while (cond) body`
    While {
        /// Source line
        line: usize,
        /// Loop condition expression
        condition: Expr,
        /// Loop body
        body: Box<Command>,
    },

    /// `for (init; cond; post) body`
    For {
        /// Source line
        line: usize,
        /// Declarations from the left clause, run once
        declarations: Vec<Declaration>,
        /// Assignments from the left clause, run once after the declarations
        assignments: Vec<Assign>,
        /// Optional condition; without one the body never runs
        condition: Option<Expr>,
        /// Assignments run after each iteration of the body
        post: Vec<Assign>,
        /// Loop body
        body: Box<Command>,
    },

    /// `foreach ([def] name in expr) body`
    Foreach {
        /// Source line
        line: usize,
        /// Loop variable, written into the global store
        variable: String,
        /// Collection to iterate
        iterable: Expr,
        /// Loop body
        body: Box<Command>,
    },

    /// Plain or compound assignment
    Assign(Assign),

    /// `def` declaration of either form
    Declaration(Declaration),
}

/// `target op value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    /// Source line
    pub line: usize,
    /// Writable location
    pub target: SetExpr,
    /// `=` or one of the compound forms
    pub op: AssignOp,
    /// Right-hand side
    pub value: Expr,
}

/// The two `def` forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Declaration {
    /// `def a [= e], b [= e], ...` - each initializer independent, missing ones bind Null
    Type1 {
        /// Source line
        line: usize,
        /// Names paired with their optional initializer
        bindings: Vec<(String, Option<Expr>)>,
    },
    /// `def (a, b, ...) = [e1, e2, ...]` - positional, missing ones bind Null
    Type2 {
        /// Source line
        line: usize,
        /// Names bound left to right
        names: Vec<String>,
        /// Initializers; extras beyond `names` are never evaluated
        values: Vec<Expr>,
    },
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Literal fixed at parse time
    Const {
        /// Source line
        line: usize,
        /// Literal value
        value: Value,
    },

    /// Variable reference or indexed access; also assignable
    Location(SetExpr),

    /// Binary operation
    Binary {
        /// Source line
        line: usize,
        /// Left operand
        left: Box<Expr>,
        /// Operator
        op: BinaryOp,
        /// Right operand
        right: Box<Expr>,
    },

    /// Unary operation or builtin function call
    Unary {
        /// Source line
        line: usize,
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },

    /// `expr as Type`
    Cast {
        /// Source line
        line: usize,
        /// Operand
        operand: Box<Expr>,
        /// Target type
        target: CastType,
    },

    /// `[e1, e2, ...]` or `[]`
    ArrayLiteral {
        /// Source line
        line: usize,
        /// Element expressions
        items: Vec<Expr>,
    },

    /// `[k1: e1, k2: e2, ...]` or `[:]`
    MapLiteral {
        /// Source line
        line: usize,
        /// Key/value pairs in source order
        entries: Vec<(String, Expr)>,
    },

    /// `switch (e) { case a -> r ... default -> d }`
    Switch {
        /// Source line
        line: usize,
        /// Value compared against each case label
        subject: Box<Expr>,
        /// Case label and result pairs in source order
        cases: Vec<(Expr, Expr)>,
        /// Result when no case matches
        default: Option<Box<Expr>>,
    },
}

impl Expr {
    /// Source line of the node
    pub fn line(&self) -> usize {
        match self {
            Expr::Location(target) => target.line(),
            Expr::Const { line, .. }
            | Expr::Binary { line, .. }
            | Expr::Unary { line, .. }
            | Expr::Cast { line, .. }
            | Expr::ArrayLiteral { line, .. }
            | Expr::MapLiteral { line, .. }
            | Expr::Switch { line, .. } => *line,
        }
    }

    /// Consumes the expression, keeping it only if it denotes a writable location
    pub fn into_set_expr(self) -> Option<SetExpr> {
        match self {
            Expr::Location(target) => Some(target),
            _ => None,
        }
    }
}

/// Writable locations: the assignable subset of [`Expr`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SetExpr {
    /// Named variable in the global store
    Variable {
        /// Source line
        line: usize,
        /// Variable name
        name: String,
    },
    /// `base[index]`, or `base.name` (index is the Text `name`)
    Access {
        /// Source line
        line: usize,
        /// Container location
        base: Box<SetExpr>,
        /// Index or key expression
        index: Box<Expr>,
    },
}

impl SetExpr {
    /// Source line of the node
    pub fn line(&self) -> usize {
        match self {
            SetExpr::Variable { line, .. } | SetExpr::Access { line, .. } => *line,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Logical
    /// `&&`
    And,
    /// `||`
    Or,

    // Relational
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LowerThan,
    /// `<=`
    LowerEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterEqual,
    /// `in`
    Contains,
    /// `!in`
    NotContains,

    // Arithmetic
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `**`
    Power,
}

/// Unary operators and builtin functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `!x`
    Not,
    /// `-x`
    Neg,
    /// `read(prompt)`
    Read,
    /// `empty(x)`
    Empty,
    /// `size(x)`
    Size,
    /// `keys(m)`
    Keys,
    /// `values(m)`
    Values,
}

/// Targets of `as`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastType {
    /// `as Boolean`
    Boolean,
    /// `as Integer`
    Integer,
    /// `as String`
    String,
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    /// `=`
    Std,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Mod,
    /// `**=`
    Power,
}

impl AssignOp {
    /// Binary operator a compound assignment desugars to
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self {
            AssignOp::Std => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Mod => Some(BinaryOp::Mod),
            AssignOp::Power => Some(BinaryOp::Power),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOp::And => write!(f, "&&"),
            BinaryOp::Or => write!(f, "||"),
            BinaryOp::Equal => write!(f, "=="),
            BinaryOp::NotEqual => write!(f, "!="),
            BinaryOp::LowerThan => write!(f, "<"),
            BinaryOp::LowerEqual => write!(f, "<="),
            BinaryOp::GreaterThan => write!(f, ">"),
            BinaryOp::GreaterEqual => write!(f, ">="),
            BinaryOp::Contains => write!(f, "in"),
            BinaryOp::NotContains => write!(f, "!in"),
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::Mod => write!(f, "%"),
            BinaryOp::Power => write!(f, "**"),
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Read => write!(f, "read"),
            UnaryOp::Empty => write!(f, "empty"),
            UnaryOp::Size => write!(f, "size"),
            UnaryOp::Keys => write!(f, "keys"),
            UnaryOp::Values => write!(f, "values"),
        }
    }
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CastType::Boolean => write!(f, "Boolean"),
            CastType::Integer => write!(f, "Integer"),
            CastType::String => write!(f, "String"),
        }
    }
}
