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

//! Algorithm 3 (cases 3.1/3.2): the label sits in an ancestor block of the
//! goto. The goto ascends one block at a time until it lands in the
//! label's own block, then case 1 finishes the job.

use crate::ast::{invert_conditions, Condition, Link, Statement, Variable};
use crate::elim::normalize::{goto_temp_var, TempNameGen};
use crate::elim::path::{get_block_mut, parent_prefix, path_in_loop, Path};
use crate::error::EliminationError;

use super::case1::{algo_1_1, algo_1_2};
use super::common::{label_statement_label, reset_temp_before_label};

/// Move the goto up one block: if its current block is a loop, replace it
/// with `if temp { break }`; otherwise guard everything after it (in the
/// same block) with the inverted temp and splice the goto itself into the
/// parent block, immediately after the block it just left.
pub(in crate::elim) fn move_up_a_block(
    goto_path: &mut Path,
    label_path: &mut Path,
    statements: &mut Vec<Statement>,
    temp_name: &str,
    is_after: bool,
) -> Result<(), EliminationError> {
    let in_loop = path_in_loop(statements, goto_path);
    let goto_idx = *goto_path.last().ok_or(EliminationError::Unsupported)?;

    let goto_stmt = {
        let block = get_block_mut(statements, goto_path).ok_or(EliminationError::Unsupported)?;
        if goto_idx >= block.len() {
            return Err(EliminationError::Unsupported);
        }

        if in_loop {
            std::mem::replace(
                &mut block[goto_idx],
                Statement::If {
                    label: None,
                    conditions: vec![Condition::Variable {
                        name: Variable::new(temp_name),
                        link: Link::Initial,
                    }],
                    statements: vec![Statement::Break { label: None }],
                },
            )
        } else {
            let rest: Vec<Statement> = block.drain(goto_idx + 1..).collect();
            if rest.is_empty() {
                block.remove(goto_idx)
            } else {
                let guard = invert_conditions(&[Condition::Variable {
                    name: Variable::new(temp_name),
                    link: Link::Initial,
                }]);
                std::mem::replace(
                    &mut block[goto_idx],
                    Statement::If {
                        label: None,
                        conditions: guard,
                        statements: rest,
                    },
                )
            }
        }
    };

    // Move the goto up one block: drop the in-block index, then bump the
    // (now last) index by one to insert right after the block it just left.
    goto_path.pop();
    {
        let parent_last = goto_path.last_mut().ok_or(EliminationError::Unsupported)?;
        *parent_last += 1;
    }

    let new_block = get_block_mut(statements, goto_path).ok_or(EliminationError::Unsupported)?;
    let insert_idx = *goto_path.last().ok_or(EliminationError::Unsupported)?;
    new_block.insert(insert_idx, goto_stmt);

    if !is_after && goto_path.len() <= label_path.len() {
        let idx = goto_path.len() - 1;
        label_path[idx] += 1;
    }

    Ok(())
}

/// The ascent shared by 3.1 and 3.2: normalize the goto, then repeatedly
/// move it up a block until it shares an enclosing block with the label.
/// Returns the propagated temporary's name.
fn ascend(
    goto_path: &mut Path,
    label_path: &mut Path,
    statements: &mut Vec<Statement>,
    gen: &mut TempNameGen,
    is_after: bool,
) -> Result<String, EliminationError> {
    let temp_name = goto_temp_var(goto_path, label_path, statements, gen)?;

    loop {
        move_up_a_block(goto_path, label_path, statements, &temp_name, is_after)?;
        if parent_prefix(goto_path) == parent_prefix(label_path) {
            break;
        }
    }

    Ok(temp_name)
}

/// Label in an ancestor block of the goto, goto occurs before it.
pub fn algo_3_1(goto_path: &mut Path, label_path: &mut Path, statements: &mut Vec<Statement>, gen: &mut TempNameGen) -> Result<(), EliminationError> {
    ascend(goto_path, label_path, statements, gen, false)?;
    algo_1_1(goto_path, label_path, statements)
}

/// Label in an ancestor block of the goto, goto occurs after it. The
/// temporary is always reset right before the label, since case 1.2 always
/// re-wraps the label's statement in a fresh `Loop`.
pub fn algo_3_2(goto_path: &mut Path, label_path: &mut Path, statements: &mut Vec<Statement>, gen: &mut TempNameGen) -> Result<(), EliminationError> {
    let temp_name = ascend(goto_path, label_path, statements, gen, true)?;
    let target_label = label_statement_label(statements, label_path)?;
    algo_1_2(goto_path, label_path, statements)?;
    reset_temp_before_label(statements, target_label, &temp_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, RelOp};

    #[test]
    fn algo_3_1_ascends_then_applies_case_1_1() {
        // 10   IF A>0 THEN GOTO 30   (goto, nested in an outer If)
        //      PRINT "skipped"
        // 30   LET A=1               (label, in the outer block)
        let mut stmts = vec![
            Statement::If {
                label: None,
                conditions: vec![Condition::Relation {
                    left: Expr::Variable(Variable::new("b")),
                    op: RelOp::Gt,
                    right: Expr::Number(0),
                    link: Link::Initial,
                }],
                statements: vec![Statement::If {
                    label: Some(10),
                    conditions: vec![Condition::Relation {
                        left: Expr::Variable(Variable::new("a")),
                        op: RelOp::Gt,
                        right: Expr::Number(0),
                        link: Link::Initial,
                    }],
                    statements: vec![Statement::Goto { label: None, target: 30 }],
                }],
            },
            Statement::Let {
                label: Some(30),
                lval: Variable::new("a"),
                rval: Expr::Number(1),
            },
        ];
        let mut goto_path = vec![0, 0];
        let mut label_path = vec![1];
        let mut gen = TempNameGen::new();

        algo_3_1(&mut goto_path, &mut label_path, &mut stmts, &mut gen).unwrap();

        assert!(crate::elim::locate::find_goto(&mut stmts).is_none());
    }

    #[test]
    fn move_up_a_block_in_loop_emits_break() {
        let mut stmts = vec![Statement::Loop {
            label: None,
            conditions: None,
            statements: vec![Statement::If {
                label: None,
                conditions: vec![Condition::Variable {
                    name: Variable::new("t1"),
                    link: Link::Initial,
                }],
                statements: vec![Statement::Goto { label: None, target: 99 }],
            }],
        }];
        let mut goto_path = vec![0, 0];
        let mut label_path = vec![1];
        move_up_a_block(&mut goto_path, &mut label_path, &mut stmts, "t1", false).unwrap();

        match &stmts[0] {
            Statement::Loop { statements, .. } => match &statements[0] {
                Statement::If { statements, .. } => {
                    assert!(matches!(statements[0], Statement::Break { .. }));
                }
                other => panic!("expected If, got {other:?}"),
            },
            other => panic!("expected Loop, got {other:?}"),
        }
    }
}
