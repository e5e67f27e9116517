//! Deletion confirmation prompt.

use std::io::{self, BufRead, Write};

use super::delete::Decision;

/// Ask whether to delete `redundant` files and read one line of reply.
///
/// `y`, `yes` and `1` (any case) confirm; anything else, including end of
/// input, declines.
///
/// # Errors
///
/// Returns any error raised while writing the question or reading the reply.
///
/// # Example
///
/// ```
/// use flatdupe::actions::{prompt_confirmation, Decision};
/// use std::io::Cursor;
///
/// let mut out = Vec::new();
/// let decision = prompt_confirmation(Cursor::new("yes\n"), &mut out, 3).unwrap();
/// assert_eq!(decision, Decision::Confirmed);
/// ```
pub fn prompt_confirmation<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    redundant: usize,
) -> io::Result<Decision> {
    write!(
        writer,
        "Delete {redundant} duplicate file(s), keeping the first of each group? [y/N] "
    )?;
    writer.flush()?;

    let mut reply = String::new();
    reader.read_line(&mut reply)?;
    Ok(parse_reply(&reply))
}

fn parse_reply(reply: &str) -> Decision {
    match reply.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "1" => Decision::Confirmed,
        _ => Decision::Declined,
    }
}
