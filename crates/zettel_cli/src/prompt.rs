//! Interactive yes/no confirmation.
//!
//! # Invariants
//! - An empty answer takes the default.
//! - Invalid answers re-prompt; end of input counts as "no".

use std::io::{self, BufRead, Write};

/// Asks `question` on `output` until `input` yields a recognizable answer.
pub fn query_yes_no<R: BufRead, W: Write>(
    question: &str,
    default_yes: bool,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    let hint = if default_yes { " [Y/n] " } else { " [y/N] " };
    loop {
        write!(output, "{question}{hint}")?;
        output.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }
        match answer.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default_yes),
            "y" | "ye" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?,
        }
    }
}
