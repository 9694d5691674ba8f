// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive printer selection.

use std::io::{BufRead, Write};

use tracing::debug;

use printsock_core::error::{PrintsockError, Result};
use printsock_core::types::PrinterDevice;

/// Show a numbered list of `printers` (found via `pattern`) and ask the user
/// to pick one.
///
/// Invalid answers (not a number, out of range, or not even UTF-8) re-prompt.
/// Running out of input returns `SelectionAborted` instead of prompting
/// forever.
pub fn select_printer<R: BufRead, W: Write>(
    printers: &[PrinterDevice],
    pattern: &str,
    mut input: R,
    mut output: W,
) -> Result<PrinterDevice> {
    if printers.is_empty() {
        return Err(PrintsockError::NoPrintersFound {
            pattern: pattern.into(),
        });
    }

    writeln!(output, "\nFound the following USB printers ({pattern}):")?;
    for (i, printer) in printers.iter().enumerate() {
        writeln!(output, "{}. {}", i + 1, printer)?;
    }

    let mut line = Vec::new();
    loop {
        write!(output, "Select the number of the printer to use: ")?;
        output.flush()?;

        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Err(PrintsockError::SelectionAborted);
        }

        match parse_choice(&String::from_utf8_lossy(&line), printers.len()) {
            Some(index) => {
                debug!(index, printer = %printers[index], "printer selected");
                return Ok(printers[index].clone());
            }
            None => {
                writeln!(output, "Invalid input. Please enter a number from the list.")?;
            }
        }
    }
}

/// Turn a 1-based answer into a 0-based index, if it is in range.
fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    let choice: usize = answer.trim().parse().ok()?;
    (1..=len).contains(&choice).then(|| choice - 1)
}
