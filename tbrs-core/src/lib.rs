#![doc = include_str!("../README.md")]

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

pub mod ast;
mod backend;
pub mod debug;
pub mod elim;
pub mod error;
pub mod lexer;
pub mod parser;

pub use error::Error;

/// Translate a complete Tiny BASIC program into Rust source.
///
/// This runs the full pipeline: [`parser::parse`], [`elim::eliminate`],
/// then the Rust backend. The returned string is a complete, standalone
/// source file (its own `fn main()`, plus one `fn f_<label>` per `GOSUB`
/// target) ready to be written out and compiled.
pub fn translate(source: &str) -> Result<String, Error> {
    Ok(backend::render(&build_ast(source)?))
}

/// Parse and goto-eliminate `source`, stopping short of the Rust backend.
///
/// This is the tree [`translate`] hands to the backend; exposed on its own
/// for the CLI's `--ast` flag, which dumps it instead of rendering it.
pub fn build_ast(source: &str) -> Result<ast::Program, Error> {
    let program = parser::parse(source)?;
    Ok(elim::eliminate(program)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_a_goto_loop_into_structured_rust() {
        let out = translate("10 LET A=1\n20 LET A=A+1\n30 IF A<5 THEN GOTO 20\n40 PRINT A\n50 END").unwrap();
        assert!(out.contains("fn main() {"));
        assert!(out.contains("loop {"));
        assert!(!out.contains("GOTO"));
    }

    #[test]
    fn propagates_a_lex_error() {
        let err = translate("10 LET A=@").unwrap_err();
        assert!(matches!(err, Error::Lex(_)));
    }

    #[test]
    fn propagates_a_parse_error() {
        let err = translate("10 GOTO 999").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
