mod patterns;
mod scanner;

use model::Token;
use scanner::Scanner;

/// Lexer entry point: turns source text into positioned tokens.
///
/// Layout (spaces, tabs, newlines) never reaches the token list, and
/// characters no pattern recognises are skipped with a warning.
pub fn lex(input: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(input);
    scanner.tokenize()
}
