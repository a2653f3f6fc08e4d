//   Copyright 2025
//
//   Licensed under the Apache License, Version 2.0 (the "License");
//   you may not use this file except in compliance with the License.
//   You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
//   Unless required by applicable law or agreed to in writing, software
//   distributed under the License is distributed on an "AS IS" BASIS,
//   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//   See the License for the specific language governing permissions and
//   limitations under the License.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::ast::{ArithOp, Condition, Expr, Link, PrintItem, Program, RelOp, Statement, Variable, MAIN};

use super::indent::IndentWriter;

/// The inferred Rust type of a lowered variable: `LET`s whose right-hand
/// side is a [`Expr::Boolean`] produce `bool` state fields, everything else
/// (arithmetic and `INPUT`) produces `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VarKind {
    Integer,
    Boolean,
}

impl VarKind {
    fn rust_type(self) -> &'static str {
        match self {
            VarKind::Integer => "i32",
            VarKind::Boolean => "bool",
        }
    }

    fn default_value(self) -> &'static str {
        match self {
            VarKind::Integer => "0",
            VarKind::Boolean => "false",
        }
    }
}

/// Render `program` as a standalone Rust source file.
///
/// The emitted program is a literal `fn main()` plus one `fn f_<label>`
/// per `GOSUB` target, all driven by a single `struct State` holding every
/// lowered variable. This mirrors how the original Tiny BASIC interpreter
/// models variables: as a single flat, globally-visible namespace.
pub fn render(program: &Program) -> String {
    const INFALLIBLE: &str = "writing to an in-memory buffer cannot fail";

    let variables = collect_variables(program);
    let uses_input = program.iter().any(|(_, stmts)| contains_input(stmts));
    let uses_process_exit = program
        .iter()
        .any(|(name, stmts)| name != MAIN && contains_end(stmts));

    let mut out = Vec::new();

    if uses_input {
        writeln!(out, "use std::io;").expect(INFALLIBLE);
    }
    if uses_process_exit {
        writeln!(out, "use std::process;").expect(INFALLIBLE);
    }
    if uses_input || uses_process_exit {
        writeln!(out).expect(INFALLIBLE);
    }

    if !variables.is_empty() {
        writeln!(out, "struct State {{").expect(INFALLIBLE);
        for (name, kind) in &variables {
            writeln!(out, "    {name}: {},", kind.rust_type()).expect(INFALLIBLE);
        }
        writeln!(out, "}}\n").expect(INFALLIBLE);
    }

    for name in program.context_names() {
        let statements = program.context(name).expect("name came from context_names");
        render_function(&mut out, name, statements, &variables).expect(INFALLIBLE);
    }

    String::from_utf8(out).expect("the emitter only ever writes ASCII/UTF-8 source text")
}

fn render_function(
    out: &mut Vec<u8>,
    context: &str,
    statements: &[Statement],
    variables: &BTreeMap<String, VarKind>,
) -> io::Result<()> {
    if context == MAIN {
        writeln!(out, "fn main() {{")?;
    } else if variables.is_empty() {
        writeln!(out, "fn f_{context}() {{")?;
    } else {
        writeln!(out, "fn f_{context}(state: &mut State) {{")?;
    }

    let mut w = IndentWriter::new(&mut *out);
    w.indent_inc();

    if context == MAIN && !variables.is_empty() {
        writeln!(w, "let mut state: State = State {{")?;
        w.indent_inc();
        for (name, kind) in variables {
            writeln!(w, "{name}: {},", kind.default_value())?;
        }
        w.indent_dec();
        writeln!(w, "}};")?;
    }

    for statement in statements {
        emit_statement(&mut w, context, statement)?;
    }

    drop(w);
    writeln!(out, "}}\n")?;
    Ok(())
}

fn emit_statement<W: Write>(w: &mut IndentWriter<W>, context: &str, statement: &Statement) -> io::Result<()> {
    let in_function = context != MAIN;

    match statement {
        Statement::Let { lval, rval, .. } => {
            writeln!(w, "state.{} = {};", lval.0, render_expr(rval))?;
        }

        Statement::Print { items, .. } => {
            let format: String = "{}".repeat(items.len());
            let args: Vec<String> = items
                .iter()
                .map(|item| match item {
                    PrintItem::Str(s) => format!("{s:?}"),
                    PrintItem::Expr(e) => render_expr(e),
                })
                .collect();
            if args.is_empty() {
                writeln!(w, "println!();")?;
            } else {
                writeln!(w, "println!(\"{format}\", {});", args.join(", "))?;
            }
        }

        Statement::Input { variables, .. } => {
            for var in variables {
                writeln!(w, "loop {{")?;
                w.indent_inc();
                writeln!(w, "let mut input = String::new();")?;
                writeln!(w, "io::stdin().read_line(&mut input).unwrap();")?;
                writeln!(w, "match input.trim().parse::<i32>() {{")?;
                w.indent_inc();
                writeln!(w, "Ok(i) => {{ state.{} = i; break }}", var.0)?;
                writeln!(w, "Err(_) => println!(\"invalid number\"),")?;
                w.indent_dec();
                writeln!(w, "}}")?;
                w.indent_dec();
                writeln!(w, "}}")?;
            }
        }

        Statement::Gosub { target, .. } => {
            let arg = if in_function { "state" } else { "&mut state" };
            writeln!(w, "f_{target}({arg});")?;
        }

        Statement::Return { .. } => {
            writeln!(w, "return;")?;
        }

        Statement::End { .. } => {
            if in_function {
                writeln!(w, "process::exit(0);")?;
            } else {
                writeln!(w, "return;")?;
            }
        }

        Statement::Break { .. } => {
            writeln!(w, "break;")?;
        }

        Statement::If { conditions, statements, .. } => {
            writeln!(w, "if {} {{", render_conditions(conditions))?;
            w.indent_inc();
            for s in statements {
                emit_statement(w, context, s)?;
            }
            w.indent_dec();
            writeln!(w, "}}")?;
        }

        Statement::Loop { conditions, statements, .. } => {
            writeln!(w, "loop {{")?;
            w.indent_inc();
            for s in statements {
                emit_statement(w, context, s)?;
            }
            if let Some(conditions) = conditions {
                let inverted = crate::ast::invert_conditions(conditions);
                writeln!(w, "if {} {{", render_conditions(&inverted))?;
                w.indent_inc();
                writeln!(w, "break;")?;
                w.indent_dec();
                writeln!(w, "}}")?;
            }
            w.indent_dec();
            writeln!(w, "}}")?;
        }

        Statement::Goto { target, .. } => {
            // A goto-free tree never reaches here; if one did, the caller
            // has a bug in the elimination pass, not a malformed program.
            unreachable!("unresolved goto to {target} reached the backend");
        }
    }

    Ok(())
}

fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Number(n) => n.to_string(),
        Expr::Variable(v) => format!("state.{}", v.0),
        Expr::Arithmetic { left, op, right } => {
            format!("{} {} {}", render_expr(left), render_arith_op(*op), render_expr(right))
        }
        Expr::Boolean(conditions) => render_conditions(conditions),
        Expr::Paren(inner) => format!("({})", render_expr(inner)),
        Expr::Not(inner) => format!("!{}", render_expr(inner)),
    }
}

fn render_arith_op(op: ArithOp) -> &'static str {
    match op {
        ArithOp::Add => "+",
        ArithOp::Sub => "-",
        ArithOp::Mul => "*",
        ArithOp::Div => "/",
    }
}

fn render_rel_op(op: RelOp) -> &'static str {
    match op {
        RelOp::Lt => "<",
        RelOp::Le => "<=",
        RelOp::Gt => ">",
        RelOp::Ge => ">=",
        RelOp::Eq => "==",
        RelOp::Ne => "!=",
    }
}

fn render_conditions(conditions: &[Condition]) -> String {
    let mut code = String::new();
    for cond in conditions {
        match cond.link() {
            Link::Initial => {}
            Link::And => code.push_str(" && "),
            Link::Or => code.push_str(" || "),
        }

        match cond {
            Condition::Variable { name, .. } => code.push_str(&format!("state.{}", name.0)),
            Condition::NotVariable { name, .. } => code.push_str(&format!("!state.{}", name.0)),
            Condition::TrueFalse { value, .. } => code.push_str(if *value { "true" } else { "false" }),
            Condition::Relation { left, op, right, .. } => {
                code.push_str(&format!("{} {} {}", render_expr(left), render_rel_op(*op), render_expr(right)));
            }
        }
    }
    code
}

fn collect_variables(program: &Program) -> BTreeMap<String, VarKind> {
    let mut variables = BTreeMap::new();
    for (_, statements) in program.iter() {
        collect_from_statements(statements, &mut variables);
    }
    variables
}

fn collect_from_statements(statements: &[Statement], variables: &mut BTreeMap<String, VarKind>) {
    for statement in statements {
        match statement {
            Statement::Let { lval, rval, .. } => {
                let kind = if matches!(rval, Expr::Boolean(_)) { VarKind::Boolean } else { VarKind::Integer };
                upsert(variables, lval, kind);
            }
            Statement::Input { variables: vars, .. } => {
                for var in vars {
                    upsert(variables, var, VarKind::Integer);
                }
            }
            Statement::If { statements, .. } | Statement::Loop { statements, .. } => {
                collect_from_statements(statements, variables);
            }
            _ => {}
        }
    }
}

/// Boolean wins over integer if a variable is ever assigned both ways;
/// an integer default never overwrites a boolean one already recorded.
fn upsert(variables: &mut BTreeMap<String, VarKind>, var: &Variable, kind: VarKind) {
    let entry = variables.entry(var.0.clone()).or_insert(kind);
    if kind == VarKind::Boolean {
        *entry = VarKind::Boolean;
    }
}

fn contains_input(statements: &[Statement]) -> bool {
    statements.iter().any(|s| match s {
        Statement::Input { .. } => true,
        Statement::If { statements, .. } | Statement::Loop { statements, .. } => contains_input(statements),
        _ => false,
    })
}

fn contains_end(statements: &[Statement]) -> bool {
    statements.iter().any(|s| match s {
        Statement::End { .. } => true,
        Statement::If { statements, .. } | Statement::Loop { statements, .. } => contains_end(statements),
        _ => false,
    })
}
