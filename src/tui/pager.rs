//! External pager for the detail view.
//!
//! Runs only while the surface is suspended: the pager owns the real
//! terminal until it exits.

use log::{info, warn};
use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Pipes `text` through `command` (e.g. `less -r`) and waits for it to exit.
///
/// An empty command prints the text to stdout instead.
pub fn page_out(command: &str, text: &str) -> io::Result<()> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        let mut stdout = io::stdout();
        stdout.write_all(text.as_bytes())?;
        return stdout.flush();
    };

    info!("Paging {} bytes through {}", text.len(), command);
    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        // The pager may quit before reading everything
        if let Err(e) = stdin.write_all(text.as_bytes())
            && e.kind() != io::ErrorKind::BrokenPipe
        {
            warn!("Failed to write to pager: {}", e);
        }
    }

    let status = child.wait()?;
    if !status.success() {
        warn!("Pager exited with {}", status);
    }
    Ok(())
}
