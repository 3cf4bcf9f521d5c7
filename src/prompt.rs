//! Simple interactive yes/no prompt.

use std::io::{BufRead, Write};

/// Ask a yes/no question on the terminal, looping until an answer is
/// recognized. EOF on stdin counts as "no".
///
/// # Errors
///
/// Returns the underlying I/O error if stdin or stdout fails.
pub fn yes_no(msg: &str) -> std::io::Result<bool> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    yes_no_from(&mut stdin.lock(), &mut stdout, msg)
}

/// Testable core of [`yes_no`], reading from and writing to explicit streams.
pub(crate) fn yes_no_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    msg: &str,
) -> std::io::Result<bool> {
    loop {
        write!(output, "{msg} ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF: no interactive answer possible
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" | "yup" | "absolutely" => return Ok(true),
            "n" | "no" | "nope" | "cancel" => return Ok(false),
            _ => continue,
        }
    }
}
