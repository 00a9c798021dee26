use crate::lexer::{Lexer, Token, TokenKind};

/// Token cursor with one token of lookahead and a single-step rewind
///
/// The cursor remembers the last consumed token. [`TokenCursor::rollback`]
/// moves that token back into the lookahead slot and parks the current one,
/// which the next [`TokenCursor::advance`] replays before the lexer is asked
/// for anything new. At most one rewind can be pending at a time.
pub struct TokenCursor {
    lexer: Lexer,
    /// Lookahead token
    current: Token,
    /// Last consumed token, available for one rewind
    previous: Option<Token>,
    /// Token parked by a rewind, replayed on the next advance
    pending: Option<Token>,
}

impl TokenCursor {
    /// Creates a cursor positioned on the first token of `lexer`
    pub fn new(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        TokenCursor {
            lexer,
            current,
            previous: None,
            pending: None,
        }
    }

    /// The lookahead token
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Kind of the lookahead token
    pub fn kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Line of the lookahead token
    pub fn line(&self) -> usize {
        self.current.line
    }

    /// Consumes the lookahead token and returns it
    pub fn advance(&mut self) -> Token {
        let next = match self.pending.take() {
            Some(token) => token,
            None => self.lexer.next_token(),
        };
        let consumed = std::mem::replace(&mut self.current, next);
        self.previous = Some(consumed.clone());
        consumed
    }

    /// Rewinds exactly one token
    pub fn rollback(&mut self) {
        debug_assert!(self.pending.is_none(), "only one rewind may be pending");
        let Some(previous) = self.previous.take() else {
            debug_assert!(false, "rollback without a consumed token");
            return;
        };
        tracing::trace!(token = %previous.lexeme, line = previous.line, "rollback");
        let parked = std::mem::replace(&mut self.current, previous);
        self.pending = Some(parked);
    }
}
