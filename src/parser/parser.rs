use super::ast::{
    Assign, AssignOp, BinaryOp, CastType, Command, Declaration, Expr, SetExpr, UnaryOp,
};
use super::cursor::TokenCursor;
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::runtime::Value;

/// Recursive descent parser for Sprig
///
/// Operator precedence, lowest first:
///
/// ```text
/// && ||  →  < > <= >= == != in !in  →  as  →  + -  →  * / %  →  **  →  ! -  →  primary
/// ```
///
/// Relational operators and casts do not chain; `**` folds to the left.
/// The only speculative step is inside bracket literals, where a leading
/// name is looked past once to decide between a list and a key/value form.
pub struct Parser {
    cursor: TokenCursor,
}

impl Parser {
    /// Creates a parser reading tokens from `lexer`
    pub fn new(lexer: Lexer) -> Self {
        Parser {
            cursor: TokenCursor::new(lexer),
        }
    }

    /// Creates a parser over source text
    pub fn from_source(source: &str) -> Self {
        Parser::new(Lexer::new(source))
    }

    /// Parses a whole program into a single `Blocks` command
    pub fn parse(&mut self) -> Result<Command> {
        let program = self.parse_code()?;
        self.eat(TokenKind::EndOfFile)?;

        if let Command::Blocks { commands, .. } = &program {
            tracing::debug!(commands = commands.len(), "parsed program");
        }
        Ok(program)
    }

    // <code> ::= { <cmd> }
    fn parse_code(&mut self) -> Result<Command> {
        let line = self.cursor.line();
        let mut commands = Vec::new();

        while Self::starts_command(self.cursor.kind()) {
            commands.push(self.parse_command()?);
        }

        Ok(Command::Blocks { line, commands })
    }

    fn starts_command(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Def
                | TokenKind::Print
                | TokenKind::Println
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Foreach
        ) || Self::starts_expression(kind)
    }

    fn starts_expression(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Not
                | TokenKind::Sub
                | TokenKind::OpenPar
                | TokenKind::Null
                | TokenKind::False
                | TokenKind::True
                | TokenKind::Number
                | TokenKind::Text
                | TokenKind::Read
                | TokenKind::Empty
                | TokenKind::Size
                | TokenKind::Keys
                | TokenKind::Values
                | TokenKind::Switch
                | TokenKind::OpenBra
                | TokenKind::Name
        )
    }

    // <cmd> ::= ( <decl> | <print> | <if> | <while> | <for> | <foreach> | <assign> ) [ ';' ]
    fn parse_command(&mut self) -> Result<Command> {
        let command = match self.cursor.kind() {
            TokenKind::Def => Command::Declaration(self.parse_declaration()?),
            TokenKind::Print | TokenKind::Println => self.parse_print()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::Foreach => self.parse_foreach()?,
            kind if Self::starts_expression(kind) => Command::Assign(self.parse_assign()?),
            _ => return Err(self.error()),
        };

        if self.cursor.kind() == TokenKind::SemiColon {
            self.cursor.advance();
        }

        Ok(command)
    }

    // <decl> ::= def ( <decl-type1> | <decl-type2> )
    fn parse_declaration(&mut self) -> Result<Declaration> {
        self.eat(TokenKind::Def)?;

        if self.cursor.kind() == TokenKind::Name {
            self.parse_declaration_type1()
        } else {
            self.parse_declaration_type2()
        }
    }

    // <decl-type1> ::= <name> [ '=' <expr> ] { ',' <name> [ '=' <expr> ] }
    fn parse_declaration_type1(&mut self) -> Result<Declaration> {
        let line = self.cursor.line();
        let mut bindings = Vec::new();

        loop {
            let name = self.parse_name()?;
            let init = if self.cursor.kind() == TokenKind::Assign {
                self.cursor.advance();
                Some(self.parse_expr()?)
            } else {
                None
            };
            bindings.push((name, init));

            if self.cursor.kind() != TokenKind::Comma {
                break;
            }
            self.cursor.advance();
        }

        Ok(Declaration::Type1 { line, bindings })
    }

    // <decl-type2> ::= '(' <name> { ',' <name> } ')' '=' '[' [ <expr> { ',' <expr> } ] ']'
    fn parse_declaration_type2(&mut self) -> Result<Declaration> {
        let line = self.cursor.line();
        self.eat(TokenKind::OpenPar)?;

        let mut names = vec![self.parse_name()?];
        while self.cursor.kind() == TokenKind::Comma {
            self.cursor.advance();
            names.push(self.parse_name()?);
        }

        self.eat(TokenKind::ClosePar)?;
        self.eat(TokenKind::Assign)?;
        self.eat(TokenKind::OpenBra)?;

        let mut values = Vec::new();
        if self.cursor.kind() != TokenKind::CloseBra {
            values = self.parse_expr_list()?;
        }
        self.eat(TokenKind::CloseBra)?;

        Ok(Declaration::Type2 {
            line,
            names,
            values,
        })
    }

    // <print> ::= (print | println) '(' <expr> ')'
    fn parse_print(&mut self) -> Result<Command> {
        let line = self.cursor.line();
        let newline = match self.cursor.kind() {
            TokenKind::Print => false,
            TokenKind::Println => true,
            _ => return Err(self.error()),
        };
        self.cursor.advance();

        self.eat(TokenKind::OpenPar)?;
        let expr = self.parse_expr()?;
        self.eat(TokenKind::ClosePar)?;

        Ok(Command::Print {
            line,
            newline,
            expr,
        })
    }

    // <if> ::= if '(' <expr> ')' <body> [ else <body> ]
    fn parse_if(&mut self) -> Result<Command> {
        let line = self.cursor.line();
        self.eat(TokenKind::If)?;
        let condition = self.parse_condition()?;
        let then_branch = Box::new(self.parse_body()?);

        let else_branch = if self.cursor.kind() == TokenKind::Else {
            self.cursor.advance();
            Some(Box::new(self.parse_body()?))
        } else {
            None
        };

        Ok(Command::If {
            line,
            condition,
            then_branch,
            else_branch,
        })
    }

    // <while> ::= while '(' <expr> ')' <body>
    fn parse_while(&mut self) -> Result<Command> {
        let line = self.cursor.line();
        self.eat(TokenKind::While)?;
        let condition = self.parse_condition()?;
        let body = Box::new(self.parse_body()?);

        Ok(Command::While {
            line,
            condition,
            body,
        })
    }

    // <for> ::= for '(' [ ( <decl> | <assign> ) { ',' ( <decl> | <assign> ) } ] ';'
    //           [ <expr> ] ';' [ <assign> { ',' <assign> } ] ')' <body>
    fn parse_for(&mut self) -> Result<Command> {
        let line = self.cursor.line();
        self.eat(TokenKind::For)?;
        self.eat(TokenKind::OpenPar)?;

        let mut declarations = Vec::new();
        let mut assignments = Vec::new();
        if self.cursor.kind() != TokenKind::SemiColon {
            loop {
                if self.cursor.kind() == TokenKind::Def {
                    declarations.push(self.parse_declaration()?);
                } else {
                    assignments.push(self.parse_assign()?);
                }

                if self.cursor.kind() != TokenKind::Comma {
                    break;
                }
                self.cursor.advance();
            }
        }
        self.eat(TokenKind::SemiColon)?;

        let condition = if self.cursor.kind() != TokenKind::SemiColon {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.eat(TokenKind::SemiColon)?;

        let mut post = Vec::new();
        if self.cursor.kind() != TokenKind::ClosePar {
            post.push(self.parse_assign()?);
            while self.cursor.kind() == TokenKind::Comma {
                self.cursor.advance();
                post.push(self.parse_assign()?);
            }
        }
        self.eat(TokenKind::ClosePar)?;

        let body = Box::new(self.parse_body()?);

        Ok(Command::For {
            line,
            declarations,
            assignments,
            condition,
            post,
            body,
        })
    }

    // <foreach> ::= foreach '(' [ def ] <name> in <expr> ')' <body>
    fn parse_foreach(&mut self) -> Result<Command> {
        let line = self.cursor.line();
        self.eat(TokenKind::Foreach)?;
        self.eat(TokenKind::OpenPar)?;

        if self.cursor.kind() == TokenKind::Def {
            self.cursor.advance();
        }
        let variable = self.parse_name()?;
        self.eat(TokenKind::Contains)?;
        let iterable = self.parse_expr()?;
        self.eat(TokenKind::ClosePar)?;

        let body = Box::new(self.parse_body()?);

        Ok(Command::Foreach {
            line,
            variable,
            iterable,
            body,
        })
    }

    // <body> ::= <cmd> | '{' <code> '}'
    fn parse_body(&mut self) -> Result<Command> {
        if self.cursor.kind() == TokenKind::OpenCur {
            self.cursor.advance();
            let code = self.parse_code()?;
            self.eat(TokenKind::CloseCur)?;
            Ok(code)
        } else {
            self.parse_command()
        }
    }

    /// `'(' <expr> ')'` as used by `if` and `while`
    fn parse_condition(&mut self) -> Result<Expr> {
        self.eat(TokenKind::OpenPar)?;
        let condition = self.parse_expr()?;
        self.eat(TokenKind::ClosePar)?;
        Ok(condition)
    }

    // <assign> ::= <expr> ( '=' | '+=' | '-=' | '*=' | '/=' | '%=' | '**=' ) <expr>
    fn parse_assign(&mut self) -> Result<Assign> {
        let left = self.parse_expr()?;
        let target = left.into_set_expr().ok_or(Error::Unassignable {
            line: self.cursor.line(),
        })?;

        let op = match self.cursor.kind() {
            TokenKind::Assign => AssignOp::Std,
            TokenKind::AssignAdd => AssignOp::Add,
            TokenKind::AssignSub => AssignOp::Sub,
            TokenKind::AssignMul => AssignOp::Mul,
            TokenKind::AssignDiv => AssignOp::Div,
            TokenKind::AssignMod => AssignOp::Mod,
            TokenKind::AssignPower => AssignOp::Power,
            _ => return Err(self.error()),
        };
        let line = self.cursor.advance().line;
        let value = self.parse_expr()?;

        Ok(Assign {
            line,
            target,
            op,
            value,
        })
    }

    // <expr> ::= <rel> { ('&&' | '||') <rel> }
    fn parse_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_rel()?;

        loop {
            let op = match self.cursor.kind() {
                TokenKind::And => BinaryOp::And,
                TokenKind::Or => BinaryOp::Or,
                _ => break,
            };
            let line = self.cursor.advance().line;
            let right = self.parse_rel()?;
            left = Self::binary(line, left, op, right);
        }

        Ok(left)
    }

    // <rel> ::= <cast> [ ('<' | '>' | '<=' | '>=' | '==' | '!=' | in | '!in') <cast> ]
    fn parse_rel(&mut self) -> Result<Expr> {
        let left = self.parse_cast()?;

        let op = match self.cursor.kind() {
            TokenKind::Lower => BinaryOp::LowerThan,
            TokenKind::Greater => BinaryOp::GreaterThan,
            TokenKind::LowerEqual => BinaryOp::LowerEqual,
            TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
            TokenKind::Equals => BinaryOp::Equal,
            TokenKind::NotEqual => BinaryOp::NotEqual,
            TokenKind::Contains => BinaryOp::Contains,
            TokenKind::NotContains => BinaryOp::NotContains,
            _ => return Ok(left),
        };
        let line = self.cursor.advance().line;
        let right = self.parse_cast()?;

        Ok(Self::binary(line, left, op, right))
    }

    // <cast> ::= <arith> [ as ( Boolean | Integer | String ) ]
    fn parse_cast(&mut self) -> Result<Expr> {
        let expr = self.parse_arith()?;

        if self.cursor.kind() != TokenKind::As {
            return Ok(expr);
        }
        self.cursor.advance();

        let target = match self.cursor.kind() {
            TokenKind::Boolean => CastType::Boolean,
            TokenKind::Integer => CastType::Integer,
            TokenKind::String => CastType::String,
            _ => return Err(self.error()),
        };
        let line = self.cursor.advance().line;

        Ok(Expr::Cast {
            line,
            operand: Box::new(expr),
            target,
        })
    }

    // <arith> ::= <term> { ('+' | '-') <term> }
    fn parse_arith(&mut self) -> Result<Expr> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.cursor.kind() {
                TokenKind::Add => BinaryOp::Add,
                TokenKind::Sub => BinaryOp::Sub,
                _ => break,
            };
            let line = self.cursor.advance().line;
            let right = self.parse_term()?;
            left = Self::binary(line, left, op, right);
        }

        Ok(left)
    }

    // <term> ::= <power> { ('*' | '/' | '%') <power> }
    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_power()?;

        loop {
            let op = match self.cursor.kind() {
                TokenKind::Mul => BinaryOp::Mul,
                TokenKind::Div => BinaryOp::Div,
                TokenKind::Mod => BinaryOp::Mod,
                _ => break,
            };
            let line = self.cursor.advance().line;
            let right = self.parse_power()?;
            left = Self::binary(line, left, op, right);
        }

        Ok(left)
    }

    // <power> ::= <factor> { '**' <factor> }
    fn parse_power(&mut self) -> Result<Expr> {
        let mut left = self.parse_factor()?;

        while self.cursor.kind() == TokenKind::Power {
            let line = self.cursor.advance().line;
            let right = self.parse_factor()?;
            left = Self::binary(line, left, BinaryOp::Power, right);
        }

        Ok(left)
    }

    // <factor> ::= [ '!' | '-' ] ( '(' <expr> ')' | <rvalue> )
    fn parse_factor(&mut self) -> Result<Expr> {
        let op = match self.cursor.kind() {
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::Sub => Some(UnaryOp::Neg),
            _ => None,
        };
        if op.is_some() {
            self.cursor.advance();
        }
        let line = self.cursor.line();

        let expr = if self.cursor.kind() == TokenKind::OpenPar {
            self.cursor.advance();
            let inner = self.parse_expr()?;
            self.eat(TokenKind::ClosePar)?;
            inner
        } else {
            self.parse_rvalue()?
        };

        Ok(match op {
            Some(op) => Expr::Unary {
                line,
                op,
                operand: Box::new(expr),
            },
            None => expr,
        })
    }

    // <rvalue> ::= <const> | <function> | <switch> | <struct> | <lvalue>
    fn parse_rvalue(&mut self) -> Result<Expr> {
        match self.cursor.kind() {
            TokenKind::Null
            | TokenKind::False
            | TokenKind::True
            | TokenKind::Number
            | TokenKind::Text => {
                let token = self.cursor.advance();
                Ok(Expr::Const {
                    line: token.line,
                    value: Self::literal(&token),
                })
            }
            TokenKind::Read
            | TokenKind::Empty
            | TokenKind::Size
            | TokenKind::Keys
            | TokenKind::Values => self.parse_function(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::OpenBra => self.parse_struct(),
            TokenKind::Name => Ok(Expr::Location(self.parse_lvalue()?)),
            _ => Err(self.error()),
        }
    }

    // <const> ::= null | false | true | <number> | <text>
    fn literal(token: &Token) -> Value {
        match token.kind {
            TokenKind::False => Value::Boolean(false),
            TokenKind::True => Value::Boolean(true),
            // Out-of-range literals read as zero
            TokenKind::Number => Value::Number(token.lexeme.parse().unwrap_or(0)),
            TokenKind::Text => Value::Text(token.lexeme.clone()),
            _ => Value::Null,
        }
    }

    // <lvalue> ::= <name> { '.' <name> | '[' <expr> ']' }
    fn parse_lvalue(&mut self) -> Result<SetExpr> {
        let line = self.cursor.line();
        let mut target = SetExpr::Variable {
            line,
            name: self.parse_name()?,
        };

        loop {
            match self.cursor.kind() {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let key_line = self.cursor.line();
                    let key = self.parse_name()?;
                    target = SetExpr::Access {
                        line: key_line,
                        base: Box::new(target),
                        index: Box::new(Expr::Const {
                            line: key_line,
                            value: Value::Text(key),
                        }),
                    };
                }
                TokenKind::OpenBra => {
                    let line = self.cursor.advance().line;
                    let index = self.parse_expr()?;
                    self.eat(TokenKind::CloseBra)?;
                    target = SetExpr::Access {
                        line,
                        base: Box::new(target),
                        index: Box::new(index),
                    };
                }
                _ => return Ok(target),
            }
        }
    }

    // <function> ::= (read | empty | size | keys | values) '(' <expr> ')'
    fn parse_function(&mut self) -> Result<Expr> {
        let op = match self.cursor.kind() {
            TokenKind::Read => UnaryOp::Read,
            TokenKind::Empty => UnaryOp::Empty,
            TokenKind::Size => UnaryOp::Size,
            TokenKind::Keys => UnaryOp::Keys,
            TokenKind::Values => UnaryOp::Values,
            _ => return Err(self.error()),
        };
        let line = self.cursor.advance().line;

        self.eat(TokenKind::OpenPar)?;
        let operand = self.parse_expr()?;
        self.eat(TokenKind::ClosePar)?;

        Ok(Expr::Unary {
            line,
            op,
            operand: Box::new(operand),
        })
    }

    // <switch> ::= switch '(' <expr> ')' '{' { case <expr> '->' <expr> } [ default '->' <expr> ] '}'
    fn parse_switch(&mut self) -> Result<Expr> {
        let line = self.cursor.line();
        self.eat(TokenKind::Switch)?;
        let subject = self.parse_condition()?;
        self.eat(TokenKind::OpenCur)?;

        let mut cases = Vec::new();
        while self.cursor.kind() == TokenKind::Case {
            self.cursor.advance();
            let label = self.parse_expr()?;
            self.eat(TokenKind::Arrow)?;
            let result = self.parse_expr()?;
            cases.push((label, result));
        }

        let default = if self.cursor.kind() == TokenKind::Default {
            self.cursor.advance();
            self.eat(TokenKind::Arrow)?;
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };

        self.eat(TokenKind::CloseCur)?;

        Ok(Expr::Switch {
            line,
            subject: Box::new(subject),
            cases,
            default,
        })
    }

    // <struct> ::= '[' [ ':' | <expr> { ',' <expr> } | <name> ':' <expr> { ',' <name> ':' <expr> } ] ']'
    fn parse_struct(&mut self) -> Result<Expr> {
        let line = self.cursor.line();
        self.eat(TokenKind::OpenBra)?;

        let expr = match self.cursor.kind() {
            TokenKind::Colon => {
                self.cursor.advance();
                Expr::MapLiteral {
                    line,
                    entries: Vec::new(),
                }
            }
            TokenKind::CloseBra => Expr::ArrayLiteral {
                line,
                items: Vec::new(),
            },
            TokenKind::Name if self.name_followed_by_colon() => {
                let mut entries = Vec::new();
                loop {
                    let key = self.parse_name()?;
                    self.eat(TokenKind::Colon)?;
                    entries.push((key, self.parse_expr()?));

                    if self.cursor.kind() != TokenKind::Comma {
                        break;
                    }
                    self.cursor.advance();
                }
                Expr::MapLiteral { line, entries }
            }
            _ => Expr::ArrayLiteral {
                line,
                items: self.parse_expr_list()?,
            },
        };

        self.eat(TokenKind::CloseBra)?;
        Ok(expr)
    }

    /// Looks one token past the current name and rewinds
    fn name_followed_by_colon(&mut self) -> bool {
        self.cursor.advance();
        let is_pair = self.cursor.kind() == TokenKind::Colon;
        self.cursor.rollback();
        is_pair
    }

    /// `<expr> { ',' <expr> }`
    fn parse_expr_list(&mut self) -> Result<Vec<Expr>> {
        let mut items = vec![self.parse_expr()?];
        while self.cursor.kind() == TokenKind::Comma {
            self.cursor.advance();
            items.push(self.parse_expr()?);
        }
        Ok(items)
    }

    fn parse_name(&mut self) -> Result<String> {
        Ok(self.eat(TokenKind::Name)?.lexeme)
    }

    fn binary(line: usize, left: Expr, op: BinaryOp, right: Expr) -> Expr {
        Expr::Binary {
            line,
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    // Helper methods

    fn eat(&mut self, kind: TokenKind) -> Result<Token> {
        if self.cursor.kind() == kind {
            Ok(self.cursor.advance())
        } else {
            Err(self.error())
        }
    }

    /// Diagnostic for the current lookahead token
    fn error(&self) -> Error {
        let token = self.cursor.current();
        match token.kind {
            TokenKind::InvalidToken => Error::InvalidLexeme {
                line: token.line,
                lexeme: token.lexeme.clone(),
            },
            TokenKind::UnexpectedEof | TokenKind::EndOfFile => {
                Error::UnexpectedEof { line: token.line }
            }
            _ => Error::UnexpectedLexeme {
                line: token.line,
                lexeme: token.lexeme.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(source: &str) -> Result<Command> {
        Parser::from_source(source).parse()
    }

    fn commands(source: &str) -> Vec<Command> {
        match parse_str(source).unwrap() {
            Command::Blocks { commands, .. } => commands,
            other => panic!("expected block, got {:?}", other),
        }
    }

    /// Parses `def x = <expr>` and returns the initializer
    fn init_expr(expr: &str) -> Expr {
        match commands(&format!("def x = {}", expr)).remove(0) {
            Command::Declaration(Declaration::Type1 { mut bindings, .. }) => {
                bindings.remove(0).1.unwrap()
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_program() {
        assert!(commands("").is_empty());
        assert!(commands("// only a comment").is_empty());
    }

    #[test]
    fn test_bracket_array_literal() {
        match init_expr("[1, 2, 3]") {
            Expr::ArrayLiteral { items, .. } => assert_eq!(items.len(), 3),
            other => panic!("expected array literal, got {:?}", other),
        }
    }

    #[test]
    fn test_bracket_map_literal() {
        match init_expr("[x: 1, y: 2]") {
            Expr::MapLiteral { entries, .. } => {
                let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["x", "y"]);
            }
            other => panic!("expected map literal, got {:?}", other),
        }
    }

    #[test]
    fn test_bracket_leading_name_without_colon() {
        // `[x, y]` must rewind past `x` and parse an expression list
        match init_expr("[x, y + 1]") {
            Expr::ArrayLiteral { items, .. } => {
                assert!(matches!(items[0], Expr::Location(SetExpr::Variable { .. })));
                assert!(matches!(items[1], Expr::Binary { op: BinaryOp::Add, .. }));
            }
            other => panic!("expected array literal, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_brackets() {
        assert!(matches!(
            init_expr("[]"),
            Expr::ArrayLiteral { ref items, .. } if items.is_empty()
        ));
        assert!(matches!(
            init_expr("[:]"),
            Expr::MapLiteral { ref entries, .. } if entries.is_empty()
        ));
    }

    #[test]
    fn test_declaration_type1_defaults() {
        match commands("def a, b = 5").remove(0) {
            Command::Declaration(Declaration::Type1 { bindings, .. }) => {
                assert_eq!(bindings.len(), 2);
                assert_eq!(bindings[0].0, "a");
                assert!(bindings[0].1.is_none());
                assert_eq!(bindings[1].0, "b");
                assert!(bindings[1].1.is_some());
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_declaration_type2() {
        match commands("def (a, b, c) = [1, 2]").remove(0) {
            Command::Declaration(Declaration::Type2 { names, values, .. }) => {
                assert_eq!(names, vec!["a", "b", "c"]);
                assert_eq!(values.len(), 2);
            }
            other => panic!("expected declaration, got {:?}", other),
        }

        match commands("def (a) = []\nprintln(a)").remove(0) {
            Command::Declaration(Declaration::Type2 { values, .. }) => assert!(values.is_empty()),
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_for_clauses() {
        let source = "for (def i = 0, j = 1, k = 2; i < 3; i += 1, k -= 1) print(i)";
        match commands(source).remove(0) {
            Command::For {
                declarations,
                assignments,
                condition,
                post,
                ..
            } => {
                // `j = 1` and `k = 2` continue the declaration list
                assert_eq!(declarations.len(), 1);
                assert!(assignments.is_empty());
                assert!(condition.is_some());
                assert_eq!(post.len(), 2);
            }
            other => panic!("expected for, got {:?}", other),
        }

        match commands("for (x = 0, def y; ; ) {}").remove(0) {
            Command::For {
                declarations,
                assignments,
                condition,
                post,
                ..
            } => {
                assert_eq!(declarations.len(), 1);
                assert_eq!(assignments.len(), 1);
                assert!(condition.is_none());
                assert!(post.is_empty());
            }
            other => panic!("expected for, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        // 1 + 2 * 3 == 7  parses as  (1 + (2 * 3)) == 7
        match init_expr("1 + 2 * 3 == 7") {
            Expr::Binary {
                op: BinaryOp::Equal,
                left,
                ..
            } => match *left {
                Expr::Binary {
                    op: BinaryOp::Add,
                    right,
                    ..
                } => assert!(matches!(*right, Expr::Binary { op: BinaryOp::Mul, .. })),
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }

        // cast binds looser than addition
        assert!(matches!(
            init_expr("1 + 2 as String"),
            Expr::Cast {
                target: CastType::String,
                ..
            }
        ));

        // unary binds tighter than power
        match init_expr("-2 ** 2") {
            Expr::Binary {
                op: BinaryOp::Power,
                left,
                ..
            } => assert!(matches!(*left, Expr::Unary { op: UnaryOp::Neg, .. })),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_power_folds_left() {
        match init_expr("2 ** 3 ** 2") {
            Expr::Binary {
                op: BinaryOp::Power,
                left,
                right,
                ..
            } => {
                assert!(matches!(*left, Expr::Binary { op: BinaryOp::Power, .. }));
                assert!(matches!(*right, Expr::Const { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lvalue_chain() {
        match commands("m.a[0] = 1").remove(0) {
            Command::Assign(Assign { target, .. }) => match target {
                SetExpr::Access { base, index, .. } => {
                    assert!(matches!(*index, Expr::Const { value: Value::Number(0), .. }));
                    match *base {
                        SetExpr::Access { index, .. } => assert!(matches!(
                            *index,
                            Expr::Const { value: Value::Text(ref k), .. } if k == "a"
                        )),
                        other => panic!("unexpected {:?}", other),
                    }
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_switch_expression() {
        match init_expr("switch (n) { case 1 -> \"one\" case 2 -> \"two\" default -> \"many\" }") {
            Expr::Switch { cases, default, .. } => {
                assert_eq!(cases.len(), 2);
                assert!(default.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_foreach_and_semicolons() {
        let cmds = commands("def xs = [1, 2];\nforeach (def x in xs) { println(x); }");
        assert_eq!(cmds.len(), 2);
        assert!(matches!(cmds[1], Command::Foreach { ref variable, .. } if variable == "x"));
    }

    #[test]
    fn test_if_else_nesting() {
        let source = r#"
if (a > 0)
    if (b > 0) println("both")
    else println("only a")
else println("none")
"#;
        match commands(source).remove(0) {
            Command::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert!(matches!(*then_branch, Command::If { else_branch: Some(_), .. }));
                assert!(else_branch.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unassignable_target() {
        let err = parse_str("def x = 1\n1 + 2 = x").unwrap_err();
        assert_eq!(err, Error::Unassignable { line: 2 });
        assert_eq!(err.to_string(), "02: Invalid assignment target");
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(
            parse_str("println(1").unwrap_err(),
            Error::UnexpectedEof { line: 1 }
        );
        assert_eq!(
            parse_str("def x = 1\nif x > 1 println(x)").unwrap_err(),
            Error::UnexpectedLexeme {
                line: 2,
                lexeme: "x".to_string()
            }
        );
        assert_eq!(
            parse_str("def x = 3 # 4").unwrap_err(),
            Error::InvalidLexeme {
                line: 1,
                lexeme: "#".to_string()
            }
        );
        assert_eq!(
            parse_str("x = 1 as Float").unwrap_err().to_string(),
            "01: Unexpected lexeme [Float]"
        );
        // a bare expression is not a command
        assert!(matches!(
            parse_str("x").unwrap_err(),
            Error::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_number_literal_overflow_reads_zero() {
        assert!(matches!(
            init_expr("99999999999"),
            Expr::Const {
                value: Value::Number(0),
                ..
            }
        ));
    }
}
