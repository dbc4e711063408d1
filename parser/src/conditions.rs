use model::{CompareOp, Condition, Name, Number, Operand, Token, TokenKind};
use crate::error::{Diagnostics, SyntaxError};
use crate::parser::Parser;

const OPERAND: &[TokenKind] = &[TokenKind::Name, TokenKind::Number];

/// Operand and condition parsing
pub(crate) trait ConditionParser {
    fn parse_condition(&mut self) -> Result<Condition, Diagnostics>;
    fn parse_operand(&mut self) -> Result<Operand, SyntaxError>;
    fn parse_number(&mut self) -> Result<Operand, SyntaxError>;
}

/// Numeric literals are always read as f64; digits past the f64 range are
/// rejected since infinity has no literal form.
fn number_from(token: &Token) -> Result<Operand, SyntaxError> {
    match token.text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Operand::Number(Number { value })),
        _ => Err(SyntaxError::unexpected(token, &[TokenKind::Number])),
    }
}

impl<'a> ConditionParser for Parser<'a> {
    /// `(NAME|NUMBER) COND (NAME|NUMBER)`
    fn parse_condition(&mut self) -> Result<Condition, Diagnostics> {
        self.backtracking("condition", |p| {
            let left = p.parse_operand()?;
            let op_token = p.expect(&[TokenKind::Cond])?;
            let op = op_token
                .text
                .parse::<CompareOp>()
                .map_err(|_| SyntaxError::unexpected(op_token, &[TokenKind::Cond]))?;
            let right = p.parse_operand()?;
            Ok(Condition { left, op, right })
        })
    }

    fn parse_operand(&mut self) -> Result<Operand, SyntaxError> {
        let token = self.expect(OPERAND)?;
        match token.kind {
            TokenKind::Number => number_from(token),
            _ => Ok(Operand::Name(Name::new(token.text.as_str()))),
        }
    }

    fn parse_number(&mut self) -> Result<Operand, SyntaxError> {
        let token = self.expect(&[TokenKind::Number])?;
        number_from(token)
    }
}
