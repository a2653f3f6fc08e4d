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

//! Locating the first goto/label pair in a context's statement list.

use crate::ast::{Condition, Label, Link, Statement};
use crate::error::EliminationError;

use super::path::Path;

/// Wrap a bare `Goto` at `statements[index]` into a single-statement
/// conditional `If(TrueFalse(true), [goto])`, preserving its label on both
/// the new `If` and the inner `Goto`.
fn convert_to_conditional(statements: &mut [Statement], index: usize) {
    let placeholder = Statement::End { label: None };
    let goto = std::mem::replace(&mut statements[index], placeholder);
    let label = goto.label();
    statements[index] = Statement::If {
        label,
        conditions: vec![Condition::TrueFalse {
            value: true,
            link: Link::Initial,
        }],
        statements: vec![goto],
    };
}

/// Find the first `Goto` in pre-order, wrapping it into a single-statement
/// conditional if needed. Returns its target label and a path that always
/// terminates at the wrapping `If` (never at the bare `Goto` itself), so
/// every rewrite can assume a goto is always conditional.
pub fn find_goto(statements: &mut Vec<Statement>) -> Option<(Label, Path)> {
    let len = statements.len();
    for index in 0..len {
        let goto_target = match &statements[index] {
            Statement::Goto { target, .. } => Some(*target),
            _ => None,
        };
        if let Some(target) = goto_target {
            if len != 1 {
                convert_to_conditional(statements, index);
                return Some((target, vec![index]));
            }
            // The goto is the sole statement of this block: the caller's
            // own index (one level up) already identifies the wrapping
            // container, so no index is added here.
            return Some((target, Vec::new()));
        }

        if statements[index].block().is_some() {
            let inner = statements[index].block_mut().expect("just checked block() is Some");
            if let Some((target, mut path)) = find_goto(inner) {
                path.insert(0, index);
                return Some((target, path));
            }
        }
    }
    None
}

/// Find the path to the statement labelled `target`.
pub fn find_label(target: Label, statements: &[Statement]) -> Option<Path> {
    for (index, statement) in statements.iter().enumerate() {
        if statement.label() == Some(target) {
            return Some(vec![index]);
        }
        if let Some(inner) = statement.block() {
            if let Some(mut path) = find_label(target, inner) {
                path.insert(0, index);
                return Some(path);
            }
        }
    }
    None
}

/// Find the next goto/label path pair in `statements`, or `None` if no
/// `Goto` remains.
pub fn find_pair(statements: &mut Vec<Statement>) -> Result<Option<(Path, Path)>, EliminationError> {
    let Some((target, goto_path)) = find_goto(statements) else {
        return Ok(None);
    };
    let label_path = find_label(target, statements).ok_or(EliminationError::MissingLabel(target))?;
    Ok(Some((goto_path, label_path)))
}
