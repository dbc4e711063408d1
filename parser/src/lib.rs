// Parser module: Converts a list of tokens into an abstract syntax tree (AST)
//
// Module organization:
// - parser.rs: Core Parser struct, cursor handling and backtracking
// - statements.rs: Statement dispatch (declaration, conditional, function call)
// - conditions.rs: Conditions and their operands
// - error.rs: Syntax diagnostics

mod conditions;
mod error;
mod parser;
mod statements;

pub use error::SyntaxError;

use model::{Program, Token};
use parser::Parser;
use tracing::debug;

/// Parse a list of tokens into a Program AST
///
/// # Returns
/// * `Ok(Program)` - every token belongs to a statement
/// * `Err(Vec<SyntaxError>)` - at least one diagnostic; no partial tree
pub fn parse_tokens(tokens: &[Token]) -> Result<Program, Vec<SyntaxError>> {
    let mut parser = Parser::new(tokens);
    let result = parser.parse_program();
    match &result {
        Ok(program) => debug!(statements = program.statements.len(), "parsed program"),
        Err(errors) => debug!(errors = errors.len(), stopped_at = parser.pos, "parse failed"),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexer::lex;
    use model::{CompareOp, Condition, Declaration, FunctionCall, If, Name, Operand, Stmt, TokenKind};

    fn parse_src(src: &str) -> Result<Program, Vec<SyntaxError>> {
        parse_tokens(&lex(src))
    }

    #[test]
    fn parse_declaration() {
        let program = parse_src("val x = 3").unwrap();
        assert_eq!(
            program,
            Program {
                statements: vec![Stmt::Declaration(Declaration {
                    name: Name::new("x"),
                    value: Operand::number(3.0),
                })],
            }
        );
    }

    #[test]
    fn parse_if_with_call() {
        let program = parse_src("if x > 3 { y(2) }").unwrap();
        assert_eq!(
            program,
            Program {
                statements: vec![Stmt::If(If {
                    condition: Condition {
                        left: Operand::name("x"),
                        op: CompareOp::Greater,
                        right: Operand::number(3.0),
                    },
                    body: vec![Stmt::FunctionCall(FunctionCall {
                        name: "y".to_string(),
                        argument: Operand::number(2.0),
                    })],
                })],
            }
        );
    }

    #[test]
    fn parse_empty_if_body() {
        let program = parse_src("if 1 == 1 { }").unwrap();
        if let Stmt::If(if_stmt) = &program.statements[0] {
            assert!(if_stmt.body.is_empty());
        } else {
            panic!("Expected If");
        }
    }

    #[test]
    fn parse_nested_ifs() {
        let src = "if a < b {\n    if b <= c {\n        print(c)\n    }\n    val d = 4\n}\nprint(d)";
        let program = parse_src(src).unwrap();
        assert_eq!(program.statements.len(), 2);
        let Stmt::If(outer) = &program.statements[0] else {
            panic!("Expected If");
        };
        assert_eq!(outer.body.len(), 2);
        assert!(matches!(outer.body[0], Stmt::If(_)));
        assert!(matches!(outer.body[1], Stmt::Declaration(_)));
    }

    #[test]
    fn unclosed_if_reports_end_of_input() {
        let errors = parse_src("if x > 3 { ").unwrap_err();
        assert!(!errors.is_empty());
        assert!(errors.iter().any(|e| e.is_end_of_input()));
    }

    #[test]
    fn unclosed_if_with_body_reports_end_of_input() {
        let errors = parse_src("if x > 3 { y(1)").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_end_of_input());
        assert_eq!(errors[0].expected(), &[TokenKind::RBrace]);
    }

    #[test]
    fn two_argument_call_fails_at_second_argument() {
        let errors = parse_src("f(1,2)").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "1:5 Unexpected '2' of type NUMBER");
        assert_eq!(errors[0].expected(), &[TokenKind::RParens]);
    }

    #[test]
    fn bad_first_token_is_rejected() {
        for src in ["3", "= x", "{ }", ")", "> 1"] {
            let errors = parse_src(src).unwrap_err();
            assert!(!errors.is_empty(), "no diagnostics for {:?}", src);
        }
    }

    #[test]
    fn error_stops_at_first_bad_statement() {
        let errors = parse_src("val a = 1\nval b = c\nprint(a)").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "2:9 Unexpected 'c' of type NAME");
    }

    #[test]
    fn declaration_requires_number_value() {
        assert!(parse_src("val x = y").is_err());
    }

    #[test]
    fn literal_beyond_f64_range_is_rejected() {
        let src = format!("val x = {}", "9".repeat(400));
        let errors = parse_src(&src).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("1:9 Unexpected '999"));
        assert!(errors[0].to_string().ends_with("' of type NUMBER"));
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let src = format!("{}{}", "if a < b {\n".repeat(1000), "}\n".repeat(1000));
        let errors = parse_src(&src).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "257:1 Conditional nested deeper than 256 levels");
    }

    #[test]
    fn round_trip_through_display() {
        let src = "val x = 3\nif x != 4 {\n    if 2 >= x {\n        show(x)\n    }\n    val y = 10\n}\nif y < 1 {\n}\nprint(7)\n";
        let program = parse_src(src).unwrap();
        assert_eq!(program.to_string(), src);
        assert_eq!(parse_src(&program.to_string()).unwrap(), program);
    }

    #[test]
    fn round_trip_every_operator() {
        for op in ["==", "!=", ">", ">=", "<", "<="] {
            let src = format!("if a {} 1 {{\n    f(a)\n}}\n", op);
            let program = parse_src(&src).unwrap();
            assert_eq!(program.to_string(), src);
        }
    }
}
