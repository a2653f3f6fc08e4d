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

//! Conditional-goto normalization: ensuring the wrapping `If` around a
//! `Goto` carries a single, bare-variable condition, extracting a
//! temporary when it doesn't.

use crate::ast::{Condition, Expr, Link, Statement, Variable};
use crate::error::EliminationError;

use super::path::{get_block_mut, Path};

/// Generates globally-unique temporary names (`t1`, `t2`, ...) for a
/// single [`super::eliminate`] call. Owned by the driver, never global
/// state, so nothing leaks between separate calls in the same process.
#[derive(Debug, Default)]
pub struct TempNameGen(u32);

impl TempNameGen {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn next_name(&mut self) -> String {
        self.0 += 1;
        format!("t{}", self.0)
    }
}

/// Ensure the goto's wrapping `If` has a single condition that is a bare
/// variable reference, extracting a temporary (`LET tN = <conditions>`)
/// immediately before it if not. Returns that variable's name.
///
/// Updates `goto_path` (and `label_path`, if it needs to shift) in place
/// to account for the newly-inserted statement.
pub fn goto_temp_var(
    goto_path: &mut Path,
    label_path: &mut Path,
    statements: &mut Vec<Statement>,
    gen: &mut TempNameGen,
) -> Result<String, EliminationError> {
    let last = goto_path.len().checked_sub(1).ok_or(EliminationError::Unsupported)?;
    let idx = goto_path[last];
    let block = get_block_mut(statements, goto_path).ok_or(EliminationError::Unsupported)?;

    let (conditions, label, inner_statements) = match block.get(idx) {
        Some(Statement::If {
            conditions,
            label,
            statements,
        }) => (conditions.clone(), *label, statements.clone()),
        _ => return Err(EliminationError::Unsupported),
    };

    if conditions.len() == 1 {
        if let Condition::Variable { name, .. } = &conditions[0] {
            return Ok(name.0.clone());
        }
    }

    let temp_name = gen.next_name();
    let temp_var = Statement::Let {
        label: None,
        lval: Variable::new(temp_name.clone()),
        rval: Expr::Boolean(conditions),
    };
    block.insert(idx, temp_var);

    goto_path[last] += 1;
    if goto_path.len() <= label_path.len() {
        let li = goto_path.len() - 1;
        if goto_path[last] < label_path[li] {
            label_path[li] += 1;
        }
    }

    let new_idx = goto_path[last];
    block[new_idx] = Statement::If {
        label,
        conditions: vec![Condition::Variable {
            name: Variable::new(temp_name.clone()),
            link: Link::Initial,
        }],
        statements: inner_statements,
    };

    Ok(temp_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RelOp;

    #[test]
    fn bare_variable_condition_needs_no_temp() {
        let mut statements = vec![Statement::If {
            label: None,
            conditions: vec![Condition::Variable {
                name: Variable::new("t1"),
                link: Link::Initial,
            }],
            statements: vec![Statement::Goto { label: None, target: 10 }],
        }];
        let mut goto_path = vec![0];
        let mut label_path = vec![1];
        let mut gen = TempNameGen::new();
        let name = goto_temp_var(&mut goto_path, &mut label_path, &mut statements, &mut gen).unwrap();
        assert_eq!(name, "t1");
        assert_eq!(statements.len(), 1, "no statement should have been inserted");
    }

    #[test]
    fn compound_condition_extracts_a_temp() {
        let mut statements = vec![Statement::If {
            label: None,
            conditions: vec![Condition::Relation {
                left: Expr::Variable(Variable::new("a")),
                op: RelOp::Eq,
                right: Expr::Number(1),
                link: Link::Initial,
            }],
            statements: vec![Statement::Goto { label: None, target: 10 }],
        }];
        let mut goto_path = vec![0];
        let mut label_path = vec![2];
        let mut gen = TempNameGen::new();
        let name = goto_temp_var(&mut goto_path, &mut label_path, &mut statements, &mut gen).unwrap();
        assert_eq!(name, "t1");
        assert_eq!(statements.len(), 2);
        assert!(matches!(statements[0], Statement::Let { .. }));
        assert_eq!(goto_path, vec![1]);
        assert_eq!(label_path, vec![3]);
        match &statements[1] {
            Statement::If { conditions, .. } => {
                assert_eq!(
                    conditions,
                    &vec![Condition::Variable {
                        name: Variable::new("t1"),
                        link: Link::Initial,
                    }]
                );
            }
            other => panic!("expected If, got {other:?}"),
        }
    }
}
