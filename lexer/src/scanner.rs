use model::Token;
use tracing::warn;
use crate::patterns::{patterns, Rule};

const TAB_WIDTH: usize = 4;

pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while self.pos < self.input.len() {
            if let Some(token) = self.next_token() {
                tokens.push(token);
            }
        }

        tokens
    }

    /// Consume one match at the cursor. Returns `None` when the match was
    /// layout or an unrecognised character.
    fn next_token(&mut self) -> Option<Token> {
        let rest = &self.input[self.pos..];

        for pattern in patterns() {
            let Some(m) = pattern.regex.find(rest) else {
                continue;
            };
            let text = m.as_str();
            if text.is_empty() {
                continue;
            }

            let (line, column) = (self.line, self.column);
            self.pos += text.len();

            return match pattern.rule {
                Rule::Emit(kind) => {
                    self.column += text.chars().count();
                    Some(Token::new(kind, text, line, column))
                }
                Rule::Spaces => {
                    self.column += text.len();
                    None
                }
                Rule::Tabs => {
                    self.column += text.len() * TAB_WIDTH;
                    None
                }
                Rule::Newline => {
                    self.line += 1;
                    self.column = 1;
                    None
                }
            };
        }

        // Nothing matched: drop the character and keep going
        let ch = rest.chars().next()?;
        warn!(line = self.line, column = self.column, "skipping unrecognised character {:?}", ch);
        self.pos += ch.len_utf8();
        self.column += 1;
        None
    }
}
