//! Clipboard writes through the terminal (OSC 52).

use std::io::{self, Write};

use base64::Engine;

/// Escape sequence asking the terminal to put `text` on the clipboard.
pub(crate) fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

/// Write straight to stdout, bypassing the ratatui buffer.
pub(crate) fn copy(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.write_all(osc52_sequence(text).as_bytes())?;
    stdout.flush()
}
