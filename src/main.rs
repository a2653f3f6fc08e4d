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

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Translator from Tiny BASIC to Rust source.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the Tiny BASIC source file to translate.
    input: PathBuf,

    /// Write the output to this path instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the goto-eliminated tree instead of Rust source.
    #[arg(long)]
    ast: bool,
}

#[derive(Debug, Error)]
enum Error {
    #[error("failed to read input file: {0}")]
    ReadFile(std::io::Error),

    #[error("translation error: {0}")]
    Translate(#[from] tbrs_core::Error),

    /// Creating a temporary file for -o output.
    #[error("failed to create temporary file in current dir: {0}")]
    CreateTempFile(std::io::Error),

    /// Flushing the output through the buffered writer for -o.
    #[error("failed to flush output: {0}")]
    FlushTempFile(std::io::Error),

    /// Persisting the output for -o.
    #[error("failed to persist output: {0}")]
    SaveTempFile(std::io::Error),

    #[error("failed to write to stdout: {0}")]
    WriteStdout(std::io::Error),
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let input = std::fs::read_to_string(&args.input).map_err(Error::ReadFile)?;

    let output = if args.ast {
        let program = tbrs_core::build_ast(&input)?;
        tbrs_core::debug::dump(&program)
    } else {
        tbrs_core::translate(&input)?
    };

    match args.output {
        Some(path) => write_atomically(&path, &output),
        None => {
            std::io::stdout()
                .lock()
                .write_all(output.as_bytes())
                .map_err(Error::WriteStdout)?;
            Ok(())
        }
    }
}

/// Render to a temporary file and move it into place, so a crash or ctrl+c
/// mid-write never leaves `path` half-populated.
fn write_atomically(path: &std::path::Path, output: &str) -> Result<(), Error> {
    let mut file = tempfile::Builder::new()
        .prefix(".tbrs")
        .suffix(".rs")
        // Tempfiles across filesystems can be problematic, so use ./
        .tempfile_in("./")
        .map_err(Error::CreateTempFile)?;

    let mut buffered = BufWriter::new(&mut file);
    buffered
        .write_all(output.as_bytes())
        .map_err(Error::FlushTempFile)?;
    buffered.flush().map_err(Error::FlushTempFile)?;
    drop(buffered);

    file.persist(path).map_err(|v| Error::SaveTempFile(v.error))?;

    Ok(())
}
