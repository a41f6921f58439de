//! Line filtering and final text output.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{ConvertError, Result};

/// Keep only the lines of `text` containing `term`, compared
/// case-insensitively. Line order is preserved; non-matching lines are
/// dropped entirely.
pub fn filter_lines(text: &str, term: &str) -> String {
    let needle = term.to_lowercase();
    text.lines()
        .filter(|line| line.to_lowercase().contains(&needle))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `text`, optionally filtered, to a file or to stdout.
///
/// With an output path the file is created or truncated and holds the
/// text exactly (no trailing newline is added); a confirmation naming
/// the path goes to stderr. Without one the text is printed to stdout
/// followed by a newline.
///
/// # Errors
/// `ConvertError::Write` when the destination file cannot be written.
pub fn write_output(text: &str, output: Option<&Path>, filter_term: Option<&str>) -> Result<()> {
    let filtered;
    let text = match filter_term {
        Some(term) => {
            filtered = filter_lines(text, term);
            filtered.as_str()
        }
        None => text,
    };

    match output {
        Some(path) => {
            fs::write(path, text).map_err(|source| ConvertError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            eprintln!("Text has been written to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
