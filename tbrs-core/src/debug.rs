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

//! A human-readable dump of a [`Program`], used by the CLI's `--ast` flag.
//! Prints the tree in something close to its own surface syntax rather than
//! `{:#?}` Rust debug formatting, which is unreadable once a handful of
//! rewrites have nested the tree a few levels deep.

use std::fmt::Write as _;

use crate::ast::{ArithOp, Condition, Expr, Link, PrintItem, Program, RelOp, Statement};

/// Render `program` as an indented listing, one context at a time.
pub fn dump(program: &Program) -> String {
    let mut out = String::new();
    for (name, statements) in program.iter() {
        let _ = writeln!(out, "\n{name}:");
        dump_statements(&mut out, statements, 1);
    }
    out
}

fn dump_statements(out: &mut String, statements: &[Statement], depth: usize) {
    for statement in statements {
        dump_statement(out, statement, depth);
    }
}

fn line(out: &mut String, label: Option<u32>, depth: usize, body: &str) {
    let label_str = label.map(|l| l.to_string()).unwrap_or_default();
    let _ = writeln!(out, "{label_str:<5}{}{body}", "  ".repeat(depth));
}

fn dump_statement(out: &mut String, statement: &Statement, depth: usize) {
    match statement {
        Statement::Let { label, lval, rval } => {
            line(out, *label, depth, &format!("LET {}={}", lval.0, render_expr(rval)));
        }
        Statement::Print { label, items } => {
            let args: Vec<String> = items
                .iter()
                .map(|item| match item {
                    PrintItem::Str(s) => format!("{s:?}"),
                    PrintItem::Expr(e) => render_expr(e),
                })
                .collect();
            line(out, *label, depth, &format!("PRINT {}", args.join(",")));
        }
        Statement::Input { label, variables } => {
            let names: Vec<String> = variables.iter().map(|v| v.0.clone()).collect();
            line(out, *label, depth, &format!("INPUT {}", names.join(", ")));
        }
        Statement::Gosub { label, target } => {
            line(out, *label, depth, &format!("GOSUB {target}"));
        }
        Statement::Goto { label, target } => {
            line(out, *label, depth, &format!("GOTO {target}"));
        }
        Statement::Return { label } => {
            line(out, *label, depth, "RETURN");
        }
        Statement::End { label } => {
            line(out, *label, depth, "END");
        }
        Statement::Break { label } => {
            line(out, *label, depth, "BREAK");
        }
        Statement::If { label, conditions, statements } => {
            line(out, *label, depth, &format!("IF {} THEN", render_conditions(conditions)));
            dump_statements(out, statements, depth + 1);
        }
        Statement::Loop { label, conditions, statements } => {
            line(out, *label, depth, "LOOP");
            dump_statements(out, statements, depth + 1);
            if let Some(conditions) = conditions {
                let inverted = crate::ast::invert_conditions(conditions);
                line(out, None, depth, &format!("IF {} THEN BREAK", render_conditions(&inverted)));
            }
        }
    }
}

fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Number(n) => n.to_string(),
        Expr::Variable(v) => v.0.clone(),
        Expr::Arithmetic { left, op, right } => {
            format!("{} {} {}", render_expr(left), render_arith_op(*op), render_expr(right))
        }
        Expr::Boolean(conditions) => render_conditions(conditions),
        Expr::Paren(inner) => format!("({})", render_expr(inner)),
        Expr::Not(inner) => format!("NOT {}", render_expr(inner)),
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
        RelOp::Eq => "=",
        RelOp::Ne => "<>",
    }
}

fn render_conditions(conditions: &[Condition]) -> String {
    let mut code = String::new();
    for cond in conditions {
        match cond.link() {
            Link::Initial => {}
            Link::And => code.push_str(" AND "),
            Link::Or => code.push_str(" OR "),
        }

        match cond {
            Condition::Variable { name, .. } => code.push_str(&name.0),
            Condition::NotVariable { name, .. } => {
                code.push_str("NOT ");
                code.push_str(&name.0);
            }
            Condition::TrueFalse { value, .. } => code.push_str(if *value { "TRUE" } else { "FALSE" }),
            Condition::Relation { left, op, right, .. } => {
                let _ = write!(code, "{} {} {}", render_expr(left), render_rel_op(*op), render_expr(right));
            }
        }
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn dumps_a_let_and_a_print() {
        let program = parse("10 LET A=1\n20 PRINT A\n30 END").unwrap();
        let out = dump(&program);
        assert!(out.contains("LET A=1"));
        assert!(out.contains("PRINT A"));
        assert!(out.contains("END"));
    }

    #[test]
    fn dumps_nested_if_with_indentation() {
        let program = parse("10 IF A=1 THEN GOTO 10").unwrap();
        let out = dump(&program);
        assert!(out.contains("IF A = 1 THEN"));
        assert!(out.contains("GOTO 10"));
    }

    #[test]
    fn dumps_one_section_per_context() {
        let program = parse("10 GOSUB 100\n20 END\n100 RETURN").unwrap();
        let out = dump(&program);
        assert!(out.contains("main:"));
        assert!(out.contains("100:"));
    }
}
