use model::{Program, Token, TokenKind};
use tracing::trace;
use crate::error::{Diagnostics, SyntaxError};
use crate::statements::StatementParser;

/// Outcome of trying one grammar alternative:
/// - `Ok(None)`: the alternative does not start here, nothing consumed
/// - `Ok(Some(_))`: matched
/// - `Err(_)`: started but failed; the cursor is back where it began
pub(crate) type Attempt<T> = Result<Option<T>, Diagnostics>;

/// Deepest conditional nesting accepted; parsing, code generation and
/// printing all recurse once per level.
pub(crate) const MAX_NESTING: usize = 256;

/// Core parser struct that maintains parsing state
pub(crate) struct Parser<'a> {
    pub(crate) tokens: &'a [Token],
    pub(crate) pos: usize,
    /// Conditionals currently open around the cursor
    pub(crate) depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, pos: 0, depth: 0 }
    }

    /// Parse statements until the tokens run out
    pub fn parse_program(&mut self) -> Result<Program, Vec<SyntaxError>> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let stmt = self.parse_statement().map_err(Diagnostics::into_vec)?;
            statements.push(stmt);
        }

        Ok(Program { statements })
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        matches!(self.peek(), Some(tok) if tok.kind == kind)
    }

    /// Consume the current token if its kind is one of `kinds`. On mismatch
    /// the cursor stays put and the error describes the current token.
    pub(crate) fn expect(&mut self, kinds: &[TokenKind]) -> Result<&'a Token, SyntaxError> {
        match self.peek() {
            Some(tok) if kinds.contains(&tok.kind) => {
                self.pos += 1;
                Ok(tok)
            }
            Some(tok) => Err(SyntaxError::unexpected(tok, kinds)),
            None => Err(SyntaxError::end_of_input(kinds)),
        }
    }

    /// Diagnostic for the current position without consuming anything
    pub(crate) fn unexpected_here(&self, kinds: &[TokenKind]) -> SyntaxError {
        match self.peek() {
            Some(tok) => SyntaxError::unexpected(tok, kinds),
            None => SyntaxError::end_of_input(kinds),
        }
    }

    /// Run a multi-token rule, restoring the cursor if it fails partway
    pub(crate) fn backtracking<T, F>(&mut self, rule: &'static str, body: F) -> Result<T, Diagnostics>
    where
        F: FnOnce(&mut Self) -> Result<T, Diagnostics>,
    {
        let checkpoint = self.pos;
        let result = body(self);
        if result.is_err() {
            trace!(rule, from = self.pos, to = checkpoint, "backtracking");
            self.pos = checkpoint;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens() -> Vec<Token> {
        vec![
            Token::new(TokenKind::Name, "f", 1, 1),
            Token::new(TokenKind::LParens, "(", 1, 2),
        ]
    }

    #[test]
    fn expect_advances_on_match() {
        let toks = tokens();
        let mut parser = Parser::new(&toks);
        let tok = parser.expect(&[TokenKind::Name, TokenKind::Number]).unwrap();
        assert_eq!(tok.text, "f");
        assert_eq!(parser.pos, 1);
    }

    #[test]
    fn expect_does_not_advance_on_mismatch() {
        let toks = tokens();
        let mut parser = Parser::new(&toks);
        let err = parser.expect(&[TokenKind::Val]).unwrap_err();
        assert_eq!(parser.pos, 0);
        assert_eq!(err.to_string(), "1:1 Unexpected 'f' of type NAME");
    }

    #[test]
    fn expect_at_end_reports_end_of_input() {
        let toks = tokens();
        let mut parser = Parser::new(&toks);
        parser.pos = 2;
        assert!(parser.expect(&[TokenKind::RParens]).unwrap_err().is_end_of_input());
    }

    #[test]
    fn backtracking_restores_cursor() {
        let toks = tokens();
        let mut parser = Parser::new(&toks);
        let result: Result<(), Diagnostics> = parser.backtracking("test", |p| {
            p.expect(&[TokenKind::Name])?;
            p.expect(&[TokenKind::LParens])?;
            p.expect(&[TokenKind::Number])?;
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(parser.pos, 0);
    }

    #[test]
    fn empty_input_is_empty_program() {
        let mut parser = Parser::new(&[]);
        assert_eq!(parser.parse_program().unwrap(), Program::default());
    }
}
