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

//! Paths: index sequences locating a statement inside a context's nested
//! `If`/`Loop` blocks. Recomputed after every rewrite; never cached across
//! mutations.

use crate::ast::Statement;

/// An index path from a context's top-level statement list down to a
/// specific statement. `path[i]` selects an element of the `i`-th nested
/// block; the last element is the statement's position in its immediate
/// enclosing block.
pub type Path = Vec<usize>;

/// All but the last element of `path` ("which block is this statement
/// in", dropping "where in that block").
pub fn parent_prefix(path: &[usize]) -> &[usize] {
    if path.is_empty() {
        path
    } else {
        &path[..path.len() - 1]
    }
}

/// The statement list that directly contains the statement identified by
/// `path`'s last index (i.e. `result[path.last()]` is the target
/// statement).
pub fn get_block<'a>(statements: &'a [Statement], path: &[usize]) -> Option<&'a [Statement]> {
    if path.len() <= 1 {
        return Some(statements);
    }
    let inner = statements.get(path[0])?.block()?;
    get_block(inner, &path[1..])
}

/// Mutable counterpart of [`get_block`].
pub fn get_block_mut<'a>(statements: &'a mut Vec<Statement>, path: &[usize]) -> Option<&'a mut Vec<Statement>> {
    if path.len() <= 1 {
        return Some(statements);
    }
    let inner = statements.get_mut(path[0])?.block_mut()?;
    get_block_mut(inner, &path[1..])
}

/// Is the statement's immediate enclosing block (per `path`) a [`Statement::Loop`]?
pub fn path_in_loop(statements: &[Statement], path: &[usize]) -> bool {
    if path.len() <= 1 {
        return false;
    }
    path_in_loop_inner(statements, path)
}

fn path_in_loop_inner(statements: &[Statement], path: &[usize]) -> bool {
    for (i, &index) in path.iter().enumerate() {
        let Some(statement) = statements.get(index) else {
            return false;
        };
        if i == path.len() - 2 {
            return matches!(statement, Statement::Loop { .. });
        }
        if let Some(inner) = statement.block() {
            return path_in_loop_inner(inner, &path[1..]);
        }
        return false;
    }
    false
}
