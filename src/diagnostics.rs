//! Development-only node dump
//!
//! A `Diagnostics` value lives for one extraction run. When enabled it
//! prints every recognized construct and the text of its children. It
//! only ever writes; nothing it does feeds back into the extracted schema.

use std::fmt;
use std::io::{self, Write};
use tree_sitter::Node;

const HEADER: &str = "────────── node dump ──────────";

/// Children longer than this are cut in the dump
const MAX_CHILD_TEXT: usize = 120;

pub struct Diagnostics {
    sink: Option<Box<dyn Write + Send>>,
    header_written: bool,
}

impl Diagnostics {
    /// A sink that drops everything
    pub fn disabled() -> Self {
        Self {
            sink: None,
            header_written: false,
        }
    }

    pub fn stderr() -> Self {
        Self::to_writer(io::stderr())
    }

    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Some(Box::new(writer)),
            header_written: false,
        }
    }

    /// `stderr()` when `enabled`, `disabled()` otherwise
    pub fn from_flag(enabled: bool) -> Self {
        if enabled { Self::stderr() } else { Self::disabled() }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Write one line, preceded by the header on first use.
    pub fn line(&mut self, text: impl fmt::Display) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let mut result = Ok(());
        if !self.header_written {
            result = writeln!(sink, "\n{HEADER}");
            self.header_written = true;
        }
        let result = result.and_then(|_| writeln!(sink, "{text}"));

        if let Err(e) = result {
            tracing::warn!("node dump disabled after write failure: {}", e);
            self.sink = None;
        }
    }

    /// Dump a recognized construct and the text of each of its children.
    pub fn dump_node(&mut self, label: &str, node: Node<'_>, source: &[u8]) {
        if !self.is_enabled() {
            return;
        }

        self.line(format_args!(
            "ENTERED {} ({}) at line {}",
            label,
            node.kind(),
            node.start_position().row + 1
        ));
        let mut cursor = node.walk();
        for (i, child) in node.children(&mut cursor).enumerate() {
            let text = child.utf8_text(source).unwrap_or("<invalid utf-8>");
            self.line(format_args!("{:>3} {}", i, truncate(text)));
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.is_enabled())
            .field("header_written", &self.header_written)
            .finish()
    }
}

fn truncate(text: &str) -> String {
    let single_line = text.replace('\n', "⏎");
    if single_line.chars().count() <= MAX_CHILD_TEXT {
        return single_line;
    }
    let cut: String = single_line.chars().take(MAX_CHILD_TEXT).collect();
    format!("{cut}…")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Writer whose contents stay readable after being moved into a sink
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_header_written_once_per_run() {
        let buffer = SharedBuffer::default();
        let mut diagnostics = Diagnostics::to_writer(buffer.clone());
        diagnostics.line("first");
        diagnostics.line("second");

        let out = buffer.contents();
        assert_eq!(out.matches(HEADER).count(), 1);
        assert!(out.find("first").unwrap() < out.find("second").unwrap());

        // A new run starts with its own header
        let mut next_run = Diagnostics::to_writer(buffer.clone());
        next_run.line("third");
        assert_eq!(buffer.contents().matches(HEADER).count(), 2);
    }

    #[test]
    fn test_disabled_is_inert() {
        let mut diagnostics = Diagnostics::disabled();
        diagnostics.line("ignored");
        assert!(!diagnostics.is_enabled());
        assert!(!Diagnostics::from_flag(false).is_enabled());
    }

    #[test]
    fn test_write_failure_disables_sink() {
        let mut diagnostics = Diagnostics::to_writer(BrokenPipe);
        diagnostics.line("lost");
        assert!(!diagnostics.is_enabled());
    }

    #[test]
    fn test_truncate_long_text() {
        let long = "x".repeat(MAX_CHILD_TEXT + 10);
        let cut = truncate(&long);
        assert!(cut.ends_with('…'));
        assert_eq!(cut.chars().count(), MAX_CHILD_TEXT + 1);
        assert_eq!(truncate("a\nb"), "a⏎b");
    }
}
