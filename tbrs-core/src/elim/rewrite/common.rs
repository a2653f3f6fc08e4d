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

//! Helpers shared by the cases that re-initialize a propagated temporary
//! right before the label it guards, once that label's position has moved
//! (cases 2.1 and 3.2).

use crate::ast::{Condition, Expr, Label, Link, Statement, Variable};
use crate::elim::locate::find_label;
use crate::elim::path::{get_block, get_block_mut};
use crate::error::EliminationError;

/// The original line number of the statement at `path`, if any.
pub(super) fn label_statement_label(statements: &[Statement], path: &[usize]) -> Result<Option<Label>, EliminationError> {
    let block = get_block(statements, path).ok_or(EliminationError::Unsupported)?;
    let idx = *path.last().ok_or(EliminationError::Unsupported)?;
    Ok(block.get(idx).and_then(Statement::label))
}

/// Insert `LET <temp_name> = false` immediately before the statement
/// labelled `target`, re-scanning the tree from scratch since earlier
/// rewrites may have moved it. A no-op if `target` is `None` (the label
/// was synthesized and carries no original line number).
pub(super) fn reset_temp_before_label(statements: &mut Vec<Statement>, target: Option<Label>, temp_name: &str) -> Result<(), EliminationError> {
    let Some(target) = target else {
        return Ok(());
    };
    let path = find_label(target, statements).ok_or(EliminationError::MissingLabel(target))?;
    let idx = *path.last().ok_or(EliminationError::Unsupported)?;
    let block = get_block_mut(statements, &path).ok_or(EliminationError::Unsupported)?;
    let reset = Statement::Let {
        label: None,
        lval: Variable::new(temp_name.to_string()),
        rval: Expr::Boolean(vec![Condition::TrueFalse {
            value: false,
            link: Link::Initial,
        }]),
    };
    block.insert(idx, reset);
    Ok(())
}
