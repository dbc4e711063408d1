use model::{Declaration, FunctionCall, If, Name, Stmt, TokenKind};
use crate::conditions::ConditionParser;
use crate::error::{Diagnostics, SyntaxError};
use crate::parser::{Attempt, MAX_NESTING, Parser};

/// Tokens that can start a statement, in dispatch order
const STATEMENT_START: &[TokenKind] = &[TokenKind::Val, TokenKind::If, TokenKind::Name];

/// Statement parsing functionality
pub(crate) trait StatementParser {
    fn parse_statement(&mut self) -> Result<Stmt, Diagnostics>;
    fn parse_declaration(&mut self) -> Attempt<Declaration>;
    fn parse_if(&mut self) -> Attempt<If>;
    fn parse_function_call(&mut self) -> Attempt<FunctionCall>;
}

/// Keep the match of one alternative, or fold its diagnostics into `pending`
fn take_alternative<T>(attempt: Attempt<T>, pending: &mut Diagnostics) -> Option<T> {
    match attempt {
        Ok(matched) => matched,
        Err(errors) => {
            pending.merge(errors);
            None
        }
    }
}

impl<'a> StatementParser for Parser<'a> {
    fn parse_statement(&mut self) -> Result<Stmt, Diagnostics> {
        // Errors from abandoned alternatives are dropped once one matches
        let mut pending = Diagnostics::default();

        if let Some(decl) = take_alternative(self.parse_declaration(), &mut pending) {
            return Ok(Stmt::Declaration(decl));
        }
        if let Some(if_stmt) = take_alternative(self.parse_if(), &mut pending) {
            return Ok(Stmt::If(if_stmt));
        }
        if let Some(call) = take_alternative(self.parse_function_call(), &mut pending) {
            return Ok(Stmt::FunctionCall(call));
        }

        if pending.is_empty() {
            // No alternative even started
            pending.push(self.unexpected_here(STATEMENT_START));
        }
        Err(pending)
    }

    /// `VAL NAME EQ NUMBER`
    fn parse_declaration(&mut self) -> Attempt<Declaration> {
        if !self.check(TokenKind::Val) {
            return Ok(None);
        }

        self.backtracking("declaration", |p| {
            p.expect(&[TokenKind::Val])?;
            let name = p.expect(&[TokenKind::Name])?;
            p.expect(&[TokenKind::Eq])?;
            let value = p.parse_number()?;
            Ok(Declaration {
                name: Name::new(name.text.as_str()),
                value,
            })
        })
        .map(Some)
    }

    /// `IF Condition LBRACE Statement* RBRACE`
    fn parse_if(&mut self) -> Attempt<If> {
        let Some(if_token) = self.peek().filter(|tok| tok.kind == TokenKind::If) else {
            return Ok(None);
        };
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::too_deep(if_token, MAX_NESTING).into());
        }

        self.depth += 1;
        let result = self.backtracking("conditional", |p| {
            p.expect(&[TokenKind::If])?;
            let condition = p.parse_condition()?;
            p.expect(&[TokenKind::LBrace])?;

            let mut body = Vec::new();
            while !p.is_at_end() && !p.check(TokenKind::RBrace) {
                body.push(p.parse_statement()?);
            }

            // Running out of tokens here is an error, not an implicit close
            p.expect(&[TokenKind::RBrace])?;
            Ok(If { condition, body })
        });
        self.depth -= 1;
        result.map(Some)
    }

    /// `NAME LPARENS (NAME|NUMBER) RPARENS`
    fn parse_function_call(&mut self) -> Attempt<FunctionCall> {
        if !self.check(TokenKind::Name) {
            return Ok(None);
        }

        self.backtracking("function call", |p| {
            let name = p.expect(&[TokenKind::Name])?;
            p.expect(&[TokenKind::LParens])?;
            let argument = p.parse_operand()?;
            p.expect(&[TokenKind::RParens])?;
            Ok(FunctionCall {
                name: name.text.clone(),
                argument,
            })
        })
        .map(Some)
    }
}
