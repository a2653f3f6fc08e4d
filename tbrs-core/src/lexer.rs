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

//! Tiny BASIC lexical analysis: turns source text into a [`Token`] stream.

use crate::error::LexError;

const STATEMENTS: &[&str] = &[
    "PRINT", "IF", "THEN", "GOTO", "INPUT", "LET", "GOSUB", "RETURN", "CLEAR", "LIST", "RUN", "END",
];

/// A single lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

/// The kind of a [`Token`] and its literal text, where relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Number(u32),
    String(String),
    /// A reserved keyword, e.g. `PRINT` or `GOTO`.
    Statement(String),
    /// A single uppercase-letter variable name.
    Variable(char),
    ArithmeticOp(char),
    RelationOp(String),
    Comma,
    LParen,
    RParen,
    Eof,
}

/// Tokenize `source`.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    line: usize,
    col: usize,
}

const ARITHMETIC_OPS: &[char] = &['+', '-', '*', '/'];

fn is_relation_op(s: &str) -> bool {
    matches!(s, "<" | ">" | "=" | "<>" | "<=" | ">=")
}

fn is_symbol(s: &str) -> bool {
    s.len() == 1 && ARITHMETIC_OPS.contains(&s.chars().next().unwrap())
        || matches!(s, "(" | ")" | ",")
        || is_relation_op(s)
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            line: 1,
            col: 0,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut lexeme = String::new();
        let mut in_comment = false;
        let len = self.chars.len();

        let mut idx = 0;
        while idx < len {
            let ch = self.chars[idx];
            self.col += 1;
            if ch == '\n' {
                self.line += 1;
                self.col = 0;
            }

            if in_comment {
                if ch == '\n' {
                    in_comment = false;
                    lexeme.clear();
                }
                idx += 1;
                continue;
            }

            if ch == '"' || lexeme.starts_with('"') {
                lexeme.push(ch);
                if lexeme.len() > 1 && lexeme.ends_with('"') {
                    let (line, col) = (self.line, self.col - lexeme.chars().count() + 1);
                    tokens.push(Token {
                        kind: TokenKind::String(lexeme.trim_matches('"').to_string()),
                        line,
                        col,
                    });
                    lexeme.clear();
                }
                idx += 1;
                continue;
            }

            if !ch.is_whitespace() {
                lexeme.push(ch);
            }

            // Symbols never need surrounding whitespace, but a 2-char
            // symbol must win over its 1-char prefix: peek ahead before
            // emitting.
            let next = self.chars.get(idx + 1).copied();
            let double_candidate = next.map(|n| {
                let mut s = lexeme.clone();
                s.push(n);
                s
            });
            let about_to_form_longer_symbol = double_candidate.as_deref().is_some_and(is_symbol) && lexeme.len() == 1;

            if !lexeme.is_empty() && is_symbol(&lexeme) && !about_to_form_longer_symbol {
                let (line, col) = (self.line, self.col);
                tokens.push(self.symbol_token(&lexeme, line, col));
                lexeme.clear();
                idx += 1;
                continue;
            }

            if self.lexeme_complete(idx, &lexeme) {
                let start_col = (self.col + 1).saturating_sub(lexeme.chars().count());

                if STATEMENTS.contains(&lexeme.as_str()) {
                    tokens.push(Token {
                        kind: TokenKind::Statement(lexeme.clone()),
                        line: self.line,
                        col: start_col,
                    });
                    lexeme.clear();
                    idx += 1;
                    continue;
                }

                if lexeme == "REM" {
                    in_comment = true;
                    lexeme.clear();
                    idx += 1;
                    continue;
                }

                if !lexeme.is_empty() {
                    if lexeme.chars().count() == 1 {
                        let c = lexeme.chars().next().unwrap();
                        if c.is_ascii_uppercase() {
                            tokens.push(Token {
                                kind: TokenKind::Variable(c),
                                line: self.line,
                                col: start_col,
                            });
                            lexeme.clear();
                            idx += 1;
                            continue;
                        }
                    }

                    if lexeme.chars().all(|c| c.is_ascii_digit()) {
                        let n: u32 = lexeme.parse().map_err(|_| LexError {
                            message: format!("number out of range: {lexeme}"),
                            line: self.line,
                            col: start_col,
                        })?;
                        tokens.push(Token {
                            kind: TokenKind::Number(n),
                            line: self.line,
                            col: start_col,
                        });
                        lexeme.clear();
                        idx += 1;
                        continue;
                    }

                    return Err(LexError {
                        message: format!("unknown token: [{lexeme}]"),
                        line: self.line,
                        col: start_col,
                    });
                }
            }

            idx += 1;
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            line: self.line,
            col: self.col,
        });
        Ok(tokens)
    }

    fn symbol_token(&self, lexeme: &str, line: usize, col: usize) -> Token {
        if lexeme.len() == 1 && ARITHMETIC_OPS.contains(&lexeme.chars().next().unwrap()) {
            return Token {
                kind: TokenKind::ArithmeticOp(lexeme.chars().next().unwrap()),
                line,
                col,
            };
        }
        if is_relation_op(lexeme) {
            return Token {
                kind: TokenKind::RelationOp(lexeme.to_string()),
                line,
                col,
            };
        }
        match lexeme {
            "(" => Token {
                kind: TokenKind::LParen,
                line,
                col,
            },
            ")" => Token {
                kind: TokenKind::RParen,
                line,
                col,
            },
            "," => Token {
                kind: TokenKind::Comma,
                line,
                col,
            },
            _ => unreachable!("is_symbol guarantees one of the above"),
        }
    }

    /// Is the lexeme ending at `idx` complete, i.e. is the next character
    /// (or pair of characters) a separator: whitespace, a symbol, or the
    /// start of a 2-char symbol?
    fn lexeme_complete(&self, idx: usize, lexeme: &str) -> bool {
        if lexeme.is_empty() {
            return true;
        }
        let next = self.chars.get(idx + 1).copied();
        match next {
            None => true,
            Some(n) => {
                if n.is_whitespace() {
                    return true;
                }
                let one = n.to_string();
                if is_symbol(&one) {
                    return true;
                }
                if let Some(n2) = self.chars.get(idx + 2).copied() {
                    let two: String = [n, n2].iter().collect();
                    if is_symbol(&two) {
                        return true;
                    }
                }
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        lex(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_let_statement() {
        assert_eq!(
            kinds("10 LET A=1"),
            vec![
                TokenKind::Number(10),
                TokenKind::Statement("LET".into()),
                TokenKind::Variable('A'),
                TokenKind::RelationOp("=".into()),
                TokenKind::Number(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_two_char_relops_without_splitting() {
        assert_eq!(
            kinds("A<=B"),
            vec![
                TokenKind::Variable('A'),
                TokenKind::RelationOp("<=".into()),
                TokenKind::Variable('B'),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("A<>B"),
            vec![
                TokenKind::Variable('A'),
                TokenKind::RelationOp("<>".into()),
                TokenKind::Variable('B'),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_string_literal() {
        assert_eq!(
            kinds("PRINT \"HELLO\""),
            vec![
                TokenKind::Statement("PRINT".into()),
                TokenKind::String("HELLO".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn rem_consumes_to_end_of_line() {
        assert_eq!(
            kinds("REM this is ignored\nLET A=1"),
            vec![
                TokenKind::Statement("LET".into()),
                TokenKind::Variable('A'),
                TokenKind::RelationOp("=".into()),
                TokenKind::Number(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unknown_token_is_an_error() {
        let err = lex("LET A=1\nFOO B").unwrap_err();
        assert!(err.message.contains("FOO"));
    }
}
