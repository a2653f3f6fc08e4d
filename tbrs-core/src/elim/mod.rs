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

//! The GOTO-elimination pass: rewrites a [`Program`] until it contains no
//! [`crate::ast::Statement::Goto`] node, only sequencing, `If`, `Loop` and
//! `Break`.

pub mod classify;
pub mod locate;
pub mod normalize;
pub mod path;
mod rewrite;

use crate::ast::{Program, Statement};
use crate::error::EliminationError;

use classify::{classify, Case};
use locate::find_pair;
use normalize::TempNameGen;
use path::Path;

/// Eliminate every `Goto` in `program`, returning an equivalent program
/// built only from `If`, `Loop`, `Break` and straight-line statements.
///
/// Owns a fresh [`TempNameGen`] for the duration of this call; the
/// temporary-name counter never leaks across separate calls in the same
/// process.
pub fn eliminate(mut program: Program) -> Result<Program, EliminationError> {
    let mut gen = TempNameGen::new();

    loop {
        let mut progressed = false;

        for (_name, statements) in program.iter_mut() {
            let Some((mut goto_path, mut label_path)) = find_pair(statements)? else {
                continue;
            };
            progressed = true;

            let case = classify(&goto_path, &label_path);
            dispatch(case, &mut goto_path, &mut label_path, statements, &mut gen)?;

            // Any rewrite invalidates every path in this context; restart
            // the outer loop rather than carry stale paths into the next
            // context.
            break;
        }

        if !progressed {
            break;
        }
    }

    Ok(program)
}

fn dispatch(
    case: Case,
    goto_path: &mut Path,
    label_path: &mut Path,
    statements: &mut Vec<Statement>,
    gen: &mut TempNameGen,
) -> Result<(), EliminationError> {
    match case {
        Case::Case11 => rewrite::case1::algo_1_1(goto_path, label_path, statements),
        Case::Case12 => rewrite::case1::algo_1_2(goto_path, label_path, statements),
        Case::Case21 => rewrite::case2::algo_2_1(goto_path, label_path, statements, gen),
        Case::Case22 => rewrite::case2::algo_2_2(goto_path, label_path, statements, gen),
        Case::Case31 => rewrite::case3::algo_3_1(goto_path, label_path, statements, gen),
        Case::Case32 => rewrite::case3::algo_3_2(goto_path, label_path, statements, gen),
        Case::Case41 => rewrite::case4::algo_4_1(goto_path, label_path, statements, gen),
        Case::Case42 => rewrite::case4::algo_4_2(goto_path, label_path, statements, gen),
    }
}
