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

//! Algorithms 1.1 and 1.2: goto and label share an enclosing block.

use crate::ast::{invert_conditions, Condition, Label, Statement};
use crate::elim::path::get_block_mut;
use crate::error::EliminationError;

fn wrapping_if(block: &[Statement], idx: usize) -> Result<(Vec<Condition>, Option<Label>), EliminationError> {
    match block.get(idx) {
        Some(Statement::If { conditions, label, .. }) => Ok((conditions.clone(), *label)),
        _ => Err(EliminationError::Unsupported),
    }
}

/// Same block, goto before label: wrap the statements strictly between
/// them in an `If` guarded by the goto's inverted condition, and drop the
/// goto.
pub fn algo_1_1(goto_path: &[usize], label_path: &[usize], statements: &mut Vec<Statement>) -> Result<(), EliminationError> {
    let goto_idx = *goto_path.last().ok_or(EliminationError::Unsupported)?;
    let label_idx = *label_path.last().ok_or(EliminationError::Unsupported)?;
    let block = get_block_mut(statements, goto_path).ok_or(EliminationError::Unsupported)?;

    let (conditions, label) = wrapping_if(block, goto_idx)?;

    if label_idx > goto_idx + 1 {
        let between: Vec<Statement> = block.drain(goto_idx + 1..label_idx).collect();
        block[goto_idx] = Statement::If {
            label,
            conditions: invert_conditions(&conditions),
            statements: between,
        };
    } else {
        block.remove(goto_idx);
    }
    Ok(())
}

/// Same block, goto after label: turn the label-to-goto span into a
/// `Loop` whose condition is the goto's, and drop the goto.
pub fn algo_1_2(goto_path: &[usize], label_path: &[usize], statements: &mut Vec<Statement>) -> Result<(), EliminationError> {
    let goto_idx = *goto_path.last().ok_or(EliminationError::Unsupported)?;
    let label_idx = *label_path.last().ok_or(EliminationError::Unsupported)?;
    let block = get_block_mut(statements, goto_path).ok_or(EliminationError::Unsupported)?;

    let (conditions, _label) = wrapping_if(block, goto_idx)?;
    if goto_idx < label_idx {
        return Err(EliminationError::Unsupported);
    }

    let span: Vec<Statement> = block[label_idx..goto_idx].to_vec();
    block[label_idx] = Statement::Loop {
        label: None,
        conditions: Some(conditions),
        statements: span,
    };
    block.drain(label_idx + 1..goto_idx + 1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Link, PrintItem, Variable};

    fn goto_if(target: Label) -> Statement {
        Statement::If {
            label: None,
            conditions: vec![Condition::Variable {
                name: Variable::new("t1"),
                link: Link::Initial,
            }],
            statements: vec![Statement::Goto { label: None, target }],
        }
    }

    #[test]
    fn algo_1_1_wraps_between_statements_and_removes_goto() {
        let mut stmts = vec![
            goto_if(30),
            Statement::Print {
                label: None,
                items: vec![PrintItem::Str("skipped".into())],
            },
            Statement::Let {
                label: Some(30),
                lval: Variable::new("a"),
                rval: crate::ast::Expr::Number(1),
            },
        ];
        algo_1_1(&[0], &[2], &mut stmts).unwrap();
        assert_eq!(stmts.len(), 2);
        assert!(matches!(stmts[0], Statement::If { .. }));
        assert!(matches!(stmts[1], Statement::Let { label: Some(30), .. }));
    }

    #[test]
    fn algo_1_1_with_no_statements_between_just_deletes_goto() {
        let mut stmts = vec![goto_if(20), Statement::Let {
            label: Some(20),
            lval: Variable::new("a"),
            rval: crate::ast::Expr::Number(1),
        }];
        algo_1_1(&[0], &[1], &mut stmts).unwrap();
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Statement::Let { label: Some(20), .. }));
    }

    #[test]
    fn algo_1_2_turns_span_into_a_loop() {
        let mut stmts = vec![
            Statement::Let {
                label: Some(30),
                lval: Variable::new("a"),
                rval: crate::ast::Expr::Number(1),
            },
            Statement::Print {
                label: None,
                items: vec![],
            },
            goto_if(30),
        ];
        algo_1_2(&[2], &[0], &mut stmts).unwrap();
        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Statement::Loop { statements, conditions, .. } => {
                assert_eq!(statements.len(), 2);
                assert!(conditions.is_some());
            }
            other => panic!("expected Loop, got {other:?}"),
        }
    }
}
