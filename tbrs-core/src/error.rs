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

use thiserror::Error;

/// An error during lexical analysis.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("syntax error: {message} [{line}:{col}]")]
pub struct LexError {
    pub(crate) message: String,
    pub(crate) line: usize,
    pub(crate) col: usize,
}

/// An error while building a [`crate::ast::Program`] from a token stream.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    /// Ran out of tokens while a construct still expected more.
    #[error("parse error: unexpected end of input")]
    UnexpectedEof,

    /// A specific token was expected but something else was found.
    #[error("parse error: expected {expected}, found {found:?} [{line}:{col}]")]
    Unexpected {
        expected: &'static str,
        found: String,
        line: usize,
        col: usize,
    },

    /// A `GOTO`/`GOSUB` named a line number that does not exist anywhere in
    /// the program.
    #[error("parse error: undefined line number {0}")]
    UndefinedLabel(u32),
}

/// An invariant was violated during goto elimination. Every variant here
/// indicates a bug in an earlier pipeline stage or in the elimination pass
/// itself, never a malformed input program (malformed input is rejected by
/// the parser first).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EliminationError {
    /// A `Goto`'s target label could not be located in its context.
    #[error("goto elimination: missing label {0}")]
    MissingLabel(u32),

    /// The classifier produced a pair shape no rewrite rule covers.
    #[error("goto elimination: unsupported goto/label arrangement")]
    Unsupported,
}

/// The union of every error this crate's pipeline can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Lexing failed.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Goto elimination failed.
    #[error(transparent)]
    Elimination(#[from] EliminationError),
}
