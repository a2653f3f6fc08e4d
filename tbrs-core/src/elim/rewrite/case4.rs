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

//! Algorithm 4 (cases 4.1/4.2): goto and label live in disjoint blocks
//! that share no direct ancestor/descendant relationship. The goto
//! ascends a block at a time until it becomes an ancestor of the label's
//! block, at which point case 2 takes over.

use crate::ast::Statement;
use crate::elim::classify::classify;
use crate::elim::normalize::{goto_temp_var, TempNameGen};
use crate::elim::path::Path;
use crate::error::EliminationError;

use super::case2::{algo_2_1, algo_2_2};
use super::case3::move_up_a_block;

fn ascend(
    goto_path: &mut Path,
    label_path: &mut Path,
    statements: &mut Vec<Statement>,
    gen: &mut TempNameGen,
    is_after: bool,
) -> Result<(), EliminationError> {
    let temp_name = goto_temp_var(goto_path, label_path, statements, gen)?;

    loop {
        move_up_a_block(goto_path, label_path, statements, &temp_name, is_after)?;
        if classify(goto_path, label_path).is_case_2() {
            break;
        }
    }

    Ok(())
}

/// Disjoint blocks, goto occurs before the label.
pub fn algo_4_1(goto_path: &mut Path, label_path: &mut Path, statements: &mut Vec<Statement>, gen: &mut TempNameGen) -> Result<(), EliminationError> {
    ascend(goto_path, label_path, statements, gen, false)?;
    algo_2_1(goto_path, label_path, statements, gen)
}

/// Disjoint blocks, goto occurs after the label.
pub fn algo_4_2(goto_path: &mut Path, label_path: &mut Path, statements: &mut Vec<Statement>, gen: &mut TempNameGen) -> Result<(), EliminationError> {
    ascend(goto_path, label_path, statements, gen, true)?;
    algo_2_2(goto_path, label_path, statements, gen)
}
