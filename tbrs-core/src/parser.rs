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

//! Recursive-descent parser building a [`Program`] from a [`Token`] stream.
//!
//! Deliberately does not pre-fold `GOTO`/`IF ... GOTO` patterns into
//! structured `Loop`/`If` nodes ahead of time: every `Goto` is handed to
//! [`crate::elim`] as-is, which must already support the fully general case.

use std::collections::HashSet;

use crate::ast::{ArithOp, Condition, Expr, Label, Link, Program, RelOp, Statement, Variable, MAIN};
use crate::error::ParseError;
use crate::lexer::{lex, Token, TokenKind};

/// Parse a complete Tiny BASIC program.
pub fn parse(source: &str) -> Result<Program, crate::Error> {
    let tokens = lex(source)?;
    Ok(Parser::new(tokens).parse_program()?)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    context: String,
    /// Line numbers that have been the target of a `GOSUB`, i.e. the start
    /// of a subroutine context.
    functions: HashSet<Label>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            context: MAIN.to_string(),
            functions: HashSet::new(),
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn err_unexpected(&self, expected: &'static str) -> ParseError {
        let tok = self.current();
        ParseError::Unexpected {
            expected,
            found: format!("{:?}", tok.kind),
            line: tok.line,
            col: tok.col,
        }
    }

    fn eat_statement_kw(&mut self, kw: &str) -> Result<(), ParseError> {
        match &self.current().kind {
            TokenKind::Statement(s) if s == kw => {
                self.advance();
                Ok(())
            }
            _ => Err(self.err_unexpected("keyword")),
        }
    }

    fn eat_variable(&mut self) -> Result<char, ParseError> {
        match self.current().kind {
            TokenKind::Variable(c) => {
                self.advance();
                Ok(c)
            }
            _ => Err(self.err_unexpected("variable")),
        }
    }

    fn eat_number(&mut self) -> Result<u32, ParseError> {
        match self.current().kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(n)
            }
            _ => Err(self.err_unexpected("number")),
        }
    }

    fn eat_relop(&mut self) -> Result<RelOp, ParseError> {
        let op = match &self.current().kind {
            TokenKind::RelationOp(s) => match s.as_str() {
                "<" => RelOp::Lt,
                "<=" => RelOp::Le,
                "<>" => RelOp::Ne,
                ">" => RelOp::Gt,
                ">=" => RelOp::Ge,
                "=" => RelOp::Eq,
                _ => return Err(self.err_unexpected("relational operator")),
            },
            _ => return Err(self.err_unexpected("relational operator")),
        };
        self.advance();
        Ok(op)
    }

    fn is_statement_kw(&self, kw: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Statement(s) if s == kw)
    }

    fn is_arith_op(&self) -> Option<char> {
        match self.current().kind {
            TokenKind::ArithmeticOp(c) => Some(c),
            _ => None,
        }
    }

    // factor ::= var | number | '(' expr ')'
    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        match self.current().kind {
            TokenKind::Variable(c) => {
                self.advance();
                Ok(Expr::Variable(Variable::new(c.to_ascii_lowercase().to_string())))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n as i32))
            }
            TokenKind::LParen => {
                self.advance();
                let node = self.parse_exp()?;
                match self.current().kind {
                    TokenKind::RParen => {
                        self.advance();
                        Ok(Expr::Paren(Box::new(node)))
                    }
                    _ => Err(self.err_unexpected(")")),
                }
            }
            _ => Err(self.err_unexpected("expression")),
        }
    }

    // term ::= factor ((* | /) factor)*
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_factor()?;
        while let Some(op) = self.is_arith_op() {
            if op != '*' && op != '/' {
                break;
            }
            self.advance();
            let right = self.parse_factor()?;
            let arith = if op == '*' { ArithOp::Mul } else { ArithOp::Div };
            node = Expr::Arithmetic {
                left: Box::new(node),
                op: arith,
                right: Box::new(right),
            };
        }
        Ok(node)
    }

    // expr ::= term ((+ | -) term)*
    fn parse_exp(&mut self) -> Result<Expr, ParseError> {
        let mut node = self.parse_term()?;
        while let Some(op) = self.is_arith_op() {
            if op != '+' && op != '-' {
                break;
            }
            self.advance();
            let right = self.parse_term()?;
            let arith = if op == '+' { ArithOp::Add } else { ArithOp::Sub };
            node = Expr::Arithmetic {
                left: Box::new(node),
                op: arith,
                right: Box::new(right),
            };
        }
        Ok(node)
    }

    fn parse_let(&mut self, label: Option<Label>) -> Result<Statement, ParseError> {
        let name = self.eat_variable()?;
        let lval = Variable::new(name.to_ascii_lowercase().to_string());

        match &self.current().kind {
            TokenKind::RelationOp(s) if s == "=" => self.advance(),
            _ => return Err(self.err_unexpected("=")),
        }

        let rval = self.parse_exp()?;
        Ok(Statement::Let { label, lval, rval })
    }

    fn parse_print(&mut self, label: Option<Label>) -> Result<Statement, ParseError> {
        use crate::ast::PrintItem;
        let mut items = Vec::new();
        loop {
            match &self.current().kind {
                TokenKind::String(s) => {
                    items.push(PrintItem::Str(s.clone()));
                    self.advance();
                }
                _ => items.push(PrintItem::Expr(self.parse_exp()?)),
            }

            if matches!(self.current().kind, TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(Statement::Print { label, items })
    }

    /// `conditions` accumulates across chained `IF` continuations
    /// (`IF a=1 THEN IF b=2 THEN ...`); `label` is `Some` only on the
    /// outermost call, matching the original.
    fn parse_if(&mut self, mut conditions: Vec<Condition>, label: Option<Label>) -> Result<Statement, ParseError> {
        let left = self.parse_exp()?;
        let op = self.eat_relop()?;
        let right = self.parse_exp()?;

        let link = if conditions.is_empty() { Link::Initial } else { Link::And };
        conditions.push(Condition::Relation { left, op, right, link });

        if !self.is_statement_kw("THEN") {
            return Err(self.err_unexpected("THEN"));
        }
        self.advance();

        if self.is_statement_kw("GOTO") {
            self.advance();
            let goto = self.parse_goto(label)?;
            return Ok(Statement::If {
                label,
                conditions,
                statements: vec![goto],
            });
        }

        if self.is_statement_kw("IF") {
            self.advance();
            return self.parse_if(conditions, None);
        }

        let inner = self
            .parse_statement(None)?
            .ok_or_else(|| self.err_unexpected("statement"))?;
        Ok(Statement::If {
            label,
            conditions,
            statements: vec![inner],
        })
    }

    fn parse_goto(&mut self, label: Option<Label>) -> Result<Statement, ParseError> {
        let target = self.eat_number()?;
        Ok(Statement::Goto { label, target })
    }

    fn parse_gosub(&mut self, label: Option<Label>) -> Result<Statement, ParseError> {
        let target = self.eat_number()?;
        self.functions.insert(target);
        Ok(Statement::Gosub { label, target })
    }

    fn parse_input(&mut self, label: Option<Label>) -> Result<Statement, ParseError> {
        let mut variables = Vec::new();
        loop {
            let name = self.eat_variable()?;
            variables.push(Variable::new(name.to_ascii_lowercase().to_string()));
            if matches!(self.current().kind, TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(Statement::Input { label, variables })
    }

    fn parse_statement(&mut self, label: Option<Label>) -> Result<Option<Statement>, ParseError> {
        let kw = match &self.current().kind {
            TokenKind::Eof => return Ok(None),
            TokenKind::Statement(s) => s.clone(),
            _ => return Err(self.err_unexpected("statement")),
        };
        self.advance();

        let stmt = match kw.as_str() {
            "RETURN" => Statement::Return { label },
            "LET" => self.parse_let(label)?,
            "PRINT" => self.parse_print(label)?,
            "IF" => self.parse_if(Vec::new(), label)?,
            "GOTO" => self.parse_goto(label)?,
            "GOSUB" => self.parse_gosub(label)?,
            "INPUT" => self.parse_input(label)?,
            "END" => Statement::End { label },
            other => {
                return Err(ParseError::Unexpected {
                    expected: "known statement",
                    found: other.to_string(),
                    line: self.current().line,
                    col: self.current().col,
                })
            }
        };
        Ok(Some(stmt))
    }

    fn process_line(&mut self) -> Result<Option<Statement>, ParseError> {
        let label = match self.current().kind {
            TokenKind::Number(n) => {
                self.advance();
                Some(n)
            }
            _ => None,
        };
        self.parse_statement(label)
    }

    fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();
        loop {
            let stmt = match self.process_line()? {
                Some(s) => s,
                None => break,
            };

            // A statement whose label matches a previously-seen GOSUB
            // target switches the parser permanently into that
            // subroutine's context; everything after (including this
            // statement itself) is appended there, not to main.
            if let Some(label) = stmt.label() {
                if self.functions.contains(&label) {
                    self.context = label.to_string();
                }
            }

            program.context_mut(&self.context).push(stmt);
        }
        validate_labels(&program)?;
        Ok(program)
    }
}

/// Every `GOTO`/`GOSUB` target must name a line number that exists
/// somewhere in the program; this is a compile-time certainty the
/// elimination pass otherwise only discovers partway through a rewrite.
fn validate_labels(program: &Program) -> Result<(), ParseError> {
    let mut known = HashSet::new();
    for (_, statements) in program.iter() {
        collect_labels(statements, &mut known);
    }
    for (_, statements) in program.iter() {
        check_targets(statements, &known)?;
    }
    Ok(())
}

fn collect_labels(statements: &[Statement], known: &mut HashSet<Label>) {
    for statement in statements {
        if let Some(label) = statement.label() {
            known.insert(label);
        }
        if let Some(inner) = statement.block() {
            collect_labels(inner, known);
        }
    }
}

fn check_targets(statements: &[Statement], known: &HashSet<Label>) -> Result<(), ParseError> {
    for statement in statements {
        match statement {
            Statement::Goto { target, .. } | Statement::Gosub { target, .. } if !known.contains(target) => {
                return Err(ParseError::UndefinedLabel(*target));
            }
            _ => {}
        }
        if let Some(inner) = statement.block() {
            check_targets(inner, known)?;
        }
    }
    Ok(())
}
