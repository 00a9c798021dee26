use super::token::{Token, TokenKind};

/// On-demand scanner for Sprig source text
///
/// Tokens are produced one at a time through [`Lexer::next_token`]. Lexical
/// problems never abort the scanner; they surface as the `InvalidToken` and
/// `UnexpectedEof` sentinel kinds and the parser turns them into diagnostics.
pub struct Lexer {
    /// Source code as character vector
    source: Vec<char>,
    /// Start position of current token
    start: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
}

impl Lexer {
    /// Creates a new scanner from source code
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Line the scanner is currently positioned on
    pub fn current_line(&self) -> usize {
        self.line
    }

    /// Scans the next token. Returns `EndOfFile` forever once input is exhausted.
    pub fn next_token(&mut self) -> Token {
        if let Some(sentinel) = self.skip_trivia() {
            return sentinel;
        }

        self.start = self.current;
        if self.is_at_end() {
            return Token::new(TokenKind::EndOfFile, "", self.line);
        }

        let c = self.advance();
        match c {
            '(' => self.make(TokenKind::OpenPar),
            ')' => self.make(TokenKind::ClosePar),
            '{' => self.make(TokenKind::OpenCur),
            '}' => self.make(TokenKind::CloseCur),
            '[' => self.make(TokenKind::OpenBra),
            ']' => self.make(TokenKind::CloseBra),
            ',' => self.make(TokenKind::Comma),
            ';' => self.make(TokenKind::SemiColon),
            ':' => self.make(TokenKind::Colon),
            '.' => self.make(TokenKind::Dot),

            '+' => self.with_assign(TokenKind::AssignAdd, TokenKind::Add),
            '%' => self.with_assign(TokenKind::AssignMod, TokenKind::Mod),
            '/' => self.with_assign(TokenKind::AssignDiv, TokenKind::Div),
            '-' => {
                if self.match_char('>') {
                    self.make(TokenKind::Arrow)
                } else {
                    self.with_assign(TokenKind::AssignSub, TokenKind::Sub)
                }
            }
            '*' => {
                if self.match_char('*') {
                    self.with_assign(TokenKind::AssignPower, TokenKind::Power)
                } else {
                    self.with_assign(TokenKind::AssignMul, TokenKind::Mul)
                }
            }

            '=' => self.with_assign(TokenKind::Equals, TokenKind::Assign),
            '<' => self.with_assign(TokenKind::LowerEqual, TokenKind::Lower),
            '>' => self.with_assign(TokenKind::GreaterEqual, TokenKind::Greater),
            '!' => {
                if self.match_char('=') {
                    self.make(TokenKind::NotEqual)
                } else if self.peek() == 'i'
                    && self.peek_at(1) == 'n'
                    && !is_name_char(self.peek_at(2))
                {
                    self.current += 2;
                    self.make(TokenKind::NotContains)
                } else {
                    self.make(TokenKind::Not)
                }
            }
            '&' => {
                if self.match_char('&') {
                    self.make(TokenKind::And)
                } else {
                    self.make(TokenKind::InvalidToken)
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.make(TokenKind::Or)
                } else {
                    self.make(TokenKind::InvalidToken)
                }
            }

            '"' => self.scan_text(),

            c if c.is_ascii_digit() => self.scan_number(),

            c if c.is_ascii_alphabetic() || c == '_' => self.scan_name_or_keyword(),

            _ => self.make(TokenKind::InvalidToken),
        }
    }

    /// Scans the whole input, including the final sentinel
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind.is_sentinel();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Skips whitespace and comments. Returns a sentinel for an unterminated
    /// block comment.
    fn skip_trivia(&mut self) -> Option<Token> {
        loop {
            match self.peek() {
                ' ' | '\r' | '\t' => {
                    self.current += 1;
                }
                '\n' => {
                    self.current += 1;
                    self.line += 1;
                }
                '/' if self.peek_at(1) == '/' => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.current += 1;
                    }
                }
                '/' if self.peek_at(1) == '*' => {
                    self.current += 2;
                    loop {
                        if self.is_at_end() {
                            return Some(Token::new(TokenKind::UnexpectedEof, "", self.line));
                        }
                        if self.peek() == '*' && self.peek_at(1) == '/' {
                            self.current += 2;
                            break;
                        }
                        if self.advance() == '\n' {
                            self.line += 1;
                        }
                    }
                }
                _ => return None,
            }
        }
    }

    /// Text tokens carry the line of their opening quote
    fn scan_text(&mut self) -> Token {
        let start_line = self.line;
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != '"' {
            let c = self.advance();
            match c {
                '\\' => {
                    if self.is_at_end() {
                        break;
                    }
                    let escaped = self.advance();
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        other => {
                            return Token::new(
                                TokenKind::InvalidToken,
                                format!("\\{}", other),
                                self.line,
                            );
                        }
                    }
                }
                '\n' => {
                    self.line += 1;
                    value.push(c);
                }
                _ => value.push(c),
            }
        }

        if self.is_at_end() {
            return Token::new(TokenKind::UnexpectedEof, value, self.line);
        }

        self.current += 1; // Closing "
        Token::new(TokenKind::Text, value, start_line)
    }

    fn scan_number(&mut self) -> Token {
        while self.peek().is_ascii_digit() {
            self.current += 1;
        }
        self.make(TokenKind::Number)
    }

    fn scan_name_or_keyword(&mut self) -> Token {
        while is_name_char(self.peek()) {
            self.current += 1;
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Name);
        Token::new(kind, text, self.line)
    }

    /// Emits `compound` when the next character is `=`, otherwise `plain`
    fn with_assign(&mut self, compound: TokenKind, plain: TokenKind) -> Token {
        if self.match_char('=') {
            self.make(compound)
        } else {
            self.make(plain)
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.source
            .get(self.current + offset)
            .copied()
            .unwrap_or('\0')
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() != expected || self.is_at_end() {
            false
        } else {
            self.current += 1;
            true
        }
    }

    fn make(&self, kind: TokenKind) -> Token {
        let lexeme: String = self.source[self.start..self.current].iter().collect();
        Token::new(kind, lexeme, self.line)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
