use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token (content only, for text literals)
    pub lexeme: String,
    /// Line number where token appears (1-indexed)
    pub line: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}

/// All possible token types in Sprig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Keywords
    /// `def`
    Def,
    /// `print`
    Print,
    /// `println`
    Println,
    /// `if`
    If,
    /// `else`
    Else,
    /// `while`
    While,
    /// `for`
    For,
    /// `foreach`
    Foreach,
    /// `switch`
    Switch,
    /// `case`
    Case,
    /// `default`
    Default,
    /// `as`
    As,
    /// `in`
    Contains,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// `Boolean` cast target
    Boolean,
    /// `Integer` cast target
    Integer,
    /// `String` cast target
    String,
    /// `read`
    Read,
    /// `empty`
    Empty,
    /// `size`
    Size,
    /// `keys`
    Keys,
    /// `values`
    Values,

    // Operators
    /// `=`
    Assign,
    /// `+=`
    AssignAdd,
    /// `-=`
    AssignSub,
    /// `*=`
    AssignMul,
    /// `/=`
    AssignDiv,
    /// `%=`
    AssignMod,
    /// `**=`
    AssignPower,
    /// `==`
    Equals,
    /// `!=`
    NotEqual,
    /// `<`
    Lower,
    /// `>`
    Greater,
    /// `<=`
    LowerEqual,
    /// `>=`
    GreaterEqual,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,
    /// `!in`
    NotContains,
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

    // Delimiters
    /// `(`
    OpenPar,
    /// `)`
    ClosePar,
    /// `{`
    OpenCur,
    /// `}`
    CloseCur,
    /// `[`
    OpenBra,
    /// `]`
    CloseBra,
    /// `,`
    Comma,
    /// `;`
    SemiColon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `->`
    Arrow,

    // Literals
    /// Identifier
    Name,
    /// Decimal integer literal
    Number,
    /// Double-quoted text literal
    Text,

    // Sentinels
    /// Lexeme that matches no category
    InvalidToken,
    /// Input ended inside a literal or comment
    UnexpectedEof,
    /// Normal end of input
    EndOfFile,
}

impl TokenKind {
    /// Get keyword from string
    pub fn keyword(s: &str) -> Option<TokenKind> {
        let kind = match s {
            "def" => TokenKind::Def,
            "print" => TokenKind::Print,
            "println" => TokenKind::Println,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "foreach" => TokenKind::Foreach,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "as" => TokenKind::As,
            "in" => TokenKind::Contains,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "Boolean" => TokenKind::Boolean,
            "Integer" => TokenKind::Integer,
            "String" => TokenKind::String,
            "read" => TokenKind::Read,
            "empty" => TokenKind::Empty,
            "size" => TokenKind::Size,
            "keys" => TokenKind::Keys,
            "values" => TokenKind::Values,
            _ => return None,
        };
        Some(kind)
    }

    /// Check if token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Def
                | TokenKind::Print
                | TokenKind::Println
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Foreach
                | TokenKind::Switch
                | TokenKind::Case
                | TokenKind::Default
                | TokenKind::As
                | TokenKind::Contains
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::Boolean
                | TokenKind::Integer
                | TokenKind::String
                | TokenKind::Read
                | TokenKind::Empty
                | TokenKind::Size
                | TokenKind::Keys
                | TokenKind::Values
        )
    }

    /// True for the three end-of-stream and error sentinels
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            TokenKind::InvalidToken | TokenKind::UnexpectedEof | TokenKind::EndOfFile
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_detection() {
        assert_eq!(TokenKind::keyword("def"), Some(TokenKind::Def));
        assert_eq!(TokenKind::keyword("in"), Some(TokenKind::Contains));
        assert_eq!(TokenKind::keyword("Integer"), Some(TokenKind::Integer));
        assert_eq!(TokenKind::keyword("integer"), None);
        assert_eq!(TokenKind::keyword("not_a_keyword"), None);
    }

    #[test]
    fn test_is_keyword() {
        assert!(TokenKind::While.is_keyword());
        assert!(TokenKind::Values.is_keyword());
        assert!(!TokenKind::Name.is_keyword());
        assert!(!TokenKind::Number.is_keyword());
        assert!(TokenKind::EndOfFile.is_sentinel());
    }
}
