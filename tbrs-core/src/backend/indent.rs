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

use std::io::Write;

const INDENT_STR: &str = "    ";

/// A [`Write`] decorator that inserts four spaces per indentation level
/// after every newline.
///
/// NOTE: this includes newlines embedded within a single `write_all` call.
pub(crate) struct IndentWriter<W> {
    out: W,

    /// The indentation depth applied to subsequent lines.
    depth: usize,

    /// True when the last byte written to `out` was a newline.
    last_char_newline: bool,
}

impl<W> IndentWriter<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            depth: 0,
            last_char_newline: true,
        }
    }

    pub(crate) fn indent_inc(&mut self) {
        self.depth += 1;
    }

    /// # Panics
    ///
    /// Panics if the indentation depth is 0.
    pub(crate) fn indent_dec(&mut self) {
        debug_assert_ne!(self.depth, 0);
        self.depth -= 1;
    }
}

impl<W> Write for IndentWriter<W>
where
    W: Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        for chunk in buf.split_inclusive(|&v| v == b'\n') {
            if self.last_char_newline {
                for _ in 0..self.depth {
                    self.out.write_all(INDENT_STR.as_bytes())?;
                }
            }

            self.out.write_all(chunk)?;
            self.last_char_newline = chunk.last().is_some_and(|v| *v == b'\n');
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_after_every_newline() {
        let mut buf = Vec::new();
        let mut out = IndentWriter::new(&mut buf);
        out.indent_inc();
        out.indent_inc();
        write!(out, "loop {{\n}}\n").unwrap();

        let got = String::from_utf8(buf).unwrap();
        assert_eq!(got, "        loop {\n        }\n");
    }

    #[test]
    fn dedent_drops_a_level() {
        let mut buf = Vec::new();
        let mut out = IndentWriter::new(&mut buf);
        out.indent_inc();
        write!(out, "a\n").unwrap();
        out.indent_dec();
        write!(out, "b\n").unwrap();

        let got = String::from_utf8(buf).unwrap();
        assert_eq!(got, "    a\nb\n");
    }
}
