// src/exec/output.rs

//! Line handling for child process output.

/// Which pipe a chunk of output came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    pub fn label(self) -> &'static str {
        match self {
            StreamKind::Stdout => "stdout",
            StreamKind::Stderr => "stderr",
        }
    }
}

/// Incremental splitter over raw bytes.
///
/// Any of `\n`, `\r` or `\r\n` ends a line. Partial lines (and a trailing `\r`
/// whose `\n` may arrive in the next chunk) are carried across `push` calls,
/// so the result does not depend on how the OS chunked the pipe.
#[derive(Debug, Default)]
pub struct LineSplitter {
    partial: Vec<u8>,
    pending_cr: bool,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in chunk {
            match byte {
                b'\n' if self.pending_cr => self.pending_cr = false,
                b'\n' | b'\r' => {
                    lines.push(String::from_utf8_lossy(&self.partial).into_owned());
                    self.partial.clear();
                    self.pending_cr = byte == b'\r';
                }
                other => {
                    self.pending_cr = false;
                    self.partial.push(other);
                }
            }
        }
        lines
    }

    /// Flush the unterminated tail, if any.
    pub fn finish(&mut self) -> Option<String> {
        self.pending_cr = false;
        if self.partial.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.partial).into_owned();
        self.partial.clear();
        Some(line)
    }
}

/// Format a batch of lines for the terminal:
///
/// ```text
///   stdout: first line
///           second line
/// ```
pub fn format_block(kind: StreamKind, lines: &[String]) -> String {
    let label = kind.label();
    let indent = " ".repeat(label.len() + 4);
    format!("  {label}: {}", lines.join(&format!("\n{indent}")))
}
