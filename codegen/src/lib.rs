// Code generation: walks a Program once, in order, and hands each statement
// to a target backend.
//
// Module organization:
// - symbols.rs: pre-pass collecting globals and callees
// - asm.rs / x86.rs / calling_convention.rs: NASM x86-64 backend
// - llvm.rs: LLVM IR backend (on top of the `ir` crate)
// - toolchain.rs: assembler and linker handoff

mod asm;
mod calling_convention;
mod error;
mod llvm;
mod symbols;
pub mod toolchain;
mod x86;

pub use error::{CodegenError, ToolchainError};
pub use toolchain::{Executable, ObjectArtifact, ToolchainConfig, assemble, link};

use asm::AsmEmitter;
use calling_convention::SystemVConvention;
use llvm::IrEmitter;
use model::{Condition, Declaration, FunctionCall, Node, Program, Stmt, Target};
use symbols::Symbols;
use tracing::debug;

/// Per-target emission rules. The traversal in `emit_block` is shared, so
/// both backends see statements in the same order.
pub(crate) trait Emitter {
    /// Result of evaluating a condition, consumed by `begin_if`
    type Comparison;
    /// Handle for the point where a conditional's body ends
    type Block;

    fn declaration(&mut self, decl: &Declaration);
    fn condition(&mut self, cond: &Condition) -> Self::Comparison;
    /// Branch past the body when the comparison is false
    fn begin_if(&mut self, cmp: Self::Comparison) -> Self::Block;
    fn end_if(&mut self, block: Self::Block);
    fn function_call(&mut self, call: &FunctionCall);
    fn finish(self, symbols: &Symbols) -> String;
}

fn emit_block<E: Emitter>(emitter: &mut E, statements: &[Stmt]) {
    for stmt in statements {
        match stmt {
            Stmt::Declaration(decl) => emitter.declaration(decl),
            Stmt::If(if_stmt) => {
                let cmp = emitter.condition(&if_stmt.condition);
                let end = emitter.begin_if(cmp);
                emit_block(emitter, &if_stmt.body);
                emitter.end_if(end);
            }
            Stmt::FunctionCall(call) => emitter.function_call(call),
        }
    }
}

fn emit_with<E: Emitter>(mut emitter: E, program: &Program, symbols: &Symbols) -> String {
    emit_block(&mut emitter, &program.statements);
    emitter.finish(symbols)
}

pub struct Codegen {
    target: Target,
    module_name: String,
}

impl Codegen {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            module_name: "kay".to_string(),
        }
    }

    /// Name recorded in the IR module header; ignored by the assembly backend
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    /// Generate the complete target text for `program`. Label and temporary
    /// counters start from zero on every call.
    pub fn gen_program(&self, program: &Program) -> Result<String, CodegenError> {
        let symbols = Symbols::collect(program)?;
        let entry = match self.target {
            Target::Assembly => asm::ENTRY,
            Target::Ir => llvm::ENTRY,
        };
        if symbols.callees.contains(entry) {
            return Err(CodegenError::ReservedName { name: entry.to_string() });
        }
        debug!(
            target = %self.target,
            statements = program.statements.len(),
            variables = symbols.variables.len(),
            callees = symbols.callees.len(),
            "generating"
        );

        let text = match self.target {
            Target::Assembly => emit_with(AsmEmitter::new(SystemVConvention), program, &symbols),
            Target::Ir => emit_with(IrEmitter::new(&self.module_name), program, &symbols),
        };
        Ok(text)
    }

    /// Generate code for an arbitrary node. Statements are compiled as a
    /// one-statement program; expression-level nodes cannot stand alone.
    pub fn gen_node(&self, node: &Node) -> Result<String, CodegenError> {
        let stmt = match node {
            Node::Program(program) => return self.gen_program(program),
            Node::Declaration(decl) => Stmt::Declaration(decl.clone()),
            Node::If(if_stmt) => Stmt::If(if_stmt.clone()),
            Node::FunctionCall(call) => Stmt::FunctionCall(call.clone()),
            Node::Number(_) | Node::Name(_) | Node::Condition(_) => {
                return Err(CodegenError::UnsupportedNode { kind: node.kind_name() });
            }
        };
        self.gen_program(&Program { statements: vec![stmt] })
    }
}

/// Convenience wrapper around `Codegen::gen_program`
pub fn generate(program: &Program, target: Target) -> Result<String, CodegenError> {
    Codegen::new(target).gen_program(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexer::lex;
    use model::{CompareOp, FunctionCall, Operand};
    use parser::parse_tokens;

    fn compile(src: &str, target: Target) -> String {
        let program = parse_tokens(&lex(src)).unwrap();
        generate(&program, target).unwrap()
    }

    #[test]
    fn assembly_for_declaration_and_conditional_call() {
        let asm = compile("val x = 3\nif x > 3 { y(2) }", Target::Assembly);
        let expected = "\
bits 64
default rel

global _start
extern $y

section .bss
var_x: resq 1

section .text
_start:
  mov rax, 0x4008000000000000
  mov qword [var_x], rax
  mov rax, qword [var_x]
  movq xmm0, rax
  mov rax, 0x4008000000000000
  movq xmm1, rax
  ucomisd xmm0, xmm1
  jbe end_if_0
  mov rax, 0x4000000000000000
  movq xmm0, rax
  push rbp
  mov rbp, rsp
  and rsp, -16
  call $y
  mov rsp, rbp
  pop rbp
end_if_0:
  mov rax, 60
  xor rdi, rdi
  syscall
";
        assert_eq!(asm, expected);
    }

    #[test]
    fn ir_for_declaration_and_conditional_call() {
        let ir = compile("val x = 3\nif x > 3 { y(2) }", Target::Ir);
        let expected = "\
; ModuleID = 'kay'
source_filename = \"kay\"

@var.x = global double 0.0

declare void @y(double)

define i32 @main() {
entry:
  %t0 = fadd double 0x8000000000000000, 0x4008000000000000
  store double %t0, ptr @var.x
  %t1 = load double, ptr @var.x
  %t2 = fcmp ogt double %t1, 0x4008000000000000
  br i1 %t2, label %if.then.0, label %if.end.0

if.then.0:
  call void @y(double 0x4000000000000000)
  br label %if.end.0

if.end.0:
  ret i32 0
}
";
        assert_eq!(ir, expected);
    }

    #[test]
    fn generation_is_deterministic() {
        let src = "val b = 1\nval a = 2\nif a != b {\n    if b <= a {\n        z(a)\n    }\n    m(b)\n}\nk(1)";
        let program = parse_tokens(&lex(src)).unwrap();
        for target in [Target::Assembly, Target::Ir] {
            let codegen = Codegen::new(target);
            let first = codegen.gen_program(&program).unwrap();
            let second = codegen.gen_program(&program).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn symbols_are_emitted_sorted() {
        let asm = compile("val b = 1\nval a = 2\nz(a)\nk(b)", Target::Assembly);
        assert!(asm.contains("extern $k\nextern $z\n"));
        assert!(asm.contains("var_a: resq 1\nvar_b: resq 1\n"));

        let ir = compile("val b = 1\nval a = 2\nz(a)\nk(b)", Target::Ir);
        assert!(ir.contains("@var.a = global double 0.0\n@var.b = global double 0.0\n"));
        assert!(ir.contains("declare void @k(double)\ndeclare void @z(double)\n"));
    }

    #[test]
    fn nested_labels_follow_traversal_order() {
        let src = "if a > 1 {\n    if a > 2 {\n        f(a)\n    }\n}\nif a > 3 {\n    f(a)\n}";
        let asm = compile(src, Target::Assembly);
        let jumps: Vec<_> = asm.lines().filter(|l| l.starts_with("  jbe")).collect();
        assert_eq!(jumps, ["  jbe end_if_0", "  jbe end_if_1", "  jbe end_if_2"]);
        let labels: Vec<_> = asm.lines().filter(|l| l.starts_with("end_if_")).collect();
        assert_eq!(labels, ["end_if_1:", "end_if_0:", "end_if_2:"]);

        let ir = compile(src, Target::Ir);
        let blocks: Vec<_> = ir.lines().filter(|l| l.starts_with("if.")).collect();
        assert_eq!(
            blocks,
            ["if.then.0:", "if.end.0:", "if.then.1:", "if.end.1:", "if.then.2:", "if.end.2:"]
        );
    }

    #[test]
    fn each_operator_produces_distinct_code() {
        for target in [Target::Assembly, Target::Ir] {
            let outputs: Vec<String> = ["==", "!=", ">", ">=", "<", "<="]
                .iter()
                .map(|op| compile(&format!("if a {} 1 {{ f(a) }}", op), target))
                .collect();
            for (i, a) in outputs.iter().enumerate() {
                for b in &outputs[i + 1..] {
                    assert_ne!(a, b, "{} output collided", target);
                }
            }
        }
    }

    #[test]
    fn empty_program_generates_entry_only() {
        let ir = generate(&Program::default(), Target::Ir).unwrap();
        assert!(ir.ends_with("define i32 @main() {\nentry:\n  ret i32 0\n}\n"));
        assert!(!ir.contains("declare"));
    }

    #[test]
    fn module_name_is_configurable() {
        let ir = Codegen::new(Target::Ir)
            .with_module_name("demo.kay")
            .gen_program(&Program::default())
            .unwrap();
        assert!(ir.starts_with("; ModuleID = 'demo.kay'\nsource_filename = \"demo.kay\"\n"));
    }

    #[test]
    fn expression_nodes_are_unsupported() {
        let codegen = Codegen::new(Target::Assembly);
        let nodes = [
            Node::from(Operand::number(1.0)),
            Node::from(Operand::name("x")),
            Node::Condition(Condition {
                left: Operand::name("x"),
                op: CompareOp::Equal,
                right: Operand::number(1.0),
            }),
        ];
        for node in nodes {
            assert_eq!(
                codegen.gen_node(&node),
                Err(CodegenError::UnsupportedNode { kind: node.kind_name() })
            );
        }
    }

    #[test]
    fn statement_node_compiles_like_a_program() {
        let call = FunctionCall { name: "f".to_string(), argument: Operand::number(1.0) };
        let program = Program { statements: vec![Stmt::FunctionCall(call.clone())] };
        for target in [Target::Assembly, Target::Ir] {
            let codegen = Codegen::new(target);
            assert_eq!(
                codegen.gen_node(&Node::FunctionCall(call.clone())),
                codegen.gen_program(&program)
            );
            assert_eq!(codegen.gen_node(&Node::from(program.clone())), codegen.gen_program(&program));
        }
    }

    #[test]
    fn entry_point_names_are_reserved() {
        let program = parse_tokens(&lex("main(1)")).unwrap();
        assert_eq!(
            generate(&program, Target::Ir),
            Err(CodegenError::ReservedName { name: "main".to_string() })
        );
        assert!(generate(&program, Target::Assembly).is_ok());
    }

    #[test]
    fn callees_cannot_shadow_generated_labels() {
        for name in ["var_x", "end_if_0", "if_body_0", "_start"] {
            let program = Program {
                statements: vec![
                    Stmt::Declaration(model::Declaration {
                        name: model::Name::new("x"),
                        value: Operand::number(1.0),
                    }),
                    Stmt::FunctionCall(FunctionCall {
                        name: name.to_string(),
                        argument: Operand::name("x"),
                    }),
                ],
            };
            assert_eq!(
                generate(&program, Target::Assembly),
                Err(CodegenError::InvalidSymbol { name: name.to_string() })
            );
        }
    }

    #[test]
    fn invalid_symbols_are_rejected() {
        let program = Program {
            statements: vec![Stmt::FunctionCall(FunctionCall {
                name: "not valid".to_string(),
                argument: Operand::number(1.0),
            })],
        };
        assert!(matches!(
            generate(&program, Target::Ir),
            Err(CodegenError::InvalidSymbol { .. })
        ));
    }
}
