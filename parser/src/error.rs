use model::{Token, TokenKind};
use thiserror::Error;

/// A token of the wrong kind (or no token at all) where the grammar
/// required one of `expected`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("{line}:{column} Unexpected '{text}' of type {kind}")]
    UnexpectedToken {
        line: usize,
        column: usize,
        text: String,
        kind: TokenKind,
        expected: Vec<TokenKind>,
    },
    #[error("Unexpected end of input")]
    UnexpectedEof { expected: Vec<TokenKind> },
    #[error("{line}:{column} Conditional nested deeper than {limit} levels")]
    TooDeep {
        line: usize,
        column: usize,
        limit: usize,
    },
}

impl SyntaxError {
    pub fn unexpected(token: &Token, expected: &[TokenKind]) -> Self {
        SyntaxError::UnexpectedToken {
            line: token.line,
            column: token.column,
            text: token.text.clone(),
            kind: token.kind,
            expected: expected.to_vec(),
        }
    }

    pub fn end_of_input(expected: &[TokenKind]) -> Self {
        SyntaxError::UnexpectedEof { expected: expected.to_vec() }
    }

    pub fn too_deep(token: &Token, limit: usize) -> Self {
        SyntaxError::TooDeep {
            line: token.line,
            column: token.column,
            limit,
        }
    }

    pub fn expected(&self) -> &[TokenKind] {
        match self {
            SyntaxError::UnexpectedToken { expected, .. } | SyntaxError::UnexpectedEof { expected } => expected,
            SyntaxError::TooDeep { .. } => &[],
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self, SyntaxError::UnexpectedEof { .. })
    }
}

/// Diagnostics collected by one rule attempt. Only surfaced to the caller
/// when no statement alternative matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Diagnostics(Vec<SyntaxError>);

impl Diagnostics {
    pub(crate) fn push(&mut self, error: SyntaxError) {
        self.0.push(error);
    }

    pub(crate) fn merge(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<SyntaxError> {
        self.0
    }
}

impl From<SyntaxError> for Diagnostics {
    fn from(error: SyntaxError) -> Self {
        Diagnostics(vec![error])
    }
}
