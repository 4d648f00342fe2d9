//! Line-oriented prompt helpers.
//!
//! Every helper returns `Ok(None)` once input is exhausted so the caller can
//! leave the menu loop cleanly.

use std::io::{self, BufRead, Write};

/// Reads one line, trimmed. `None` at end of input.
pub(crate) fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompts until the user enters an integer within `min..=max`.
pub(crate) fn read_choice<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    min: usize,
    max: usize,
) -> io::Result<Option<usize>> {
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match line.parse::<usize>() {
            Ok(value) if (min..=max).contains(&value) => return Ok(Some(value)),
            _ => writeln!(output, "Please enter a number between {min} and {max}")?,
        }
    }
}

/// Prompts until the user enters non-blank text.
pub(crate) fn read_required_text<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    field: &str,
) -> io::Result<Option<String>> {
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        if !line.is_empty() {
            return Ok(Some(line));
        }
        writeln!(output, "{field} can not be empty.")?;
    }
}
