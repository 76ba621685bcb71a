use anyhow::{Context, Result};
use arboard::Clipboard;

/// Result-bearing clipboard write capability. The system implementation talks
/// to the real clipboard; tests use [`MemoryClipboard`].
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard backed by arboard.
///
/// Returns Ok(()) on success, or an error if the clipboard is unavailable.
/// On Linux, clipboard contents persist while the application is running.
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to access system clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to copy text to clipboard")?;
        Ok(())
    }
}

/// In-memory sink for tests: records what was written.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    write_count: usize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    pub fn write_count(&self) -> usize {
        self.write_count
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        self.write_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_clipboard_starts_empty() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.contents(), None);
        assert_eq!(clipboard.write_count(), 0);
    }

    #[test]
    fn test_memory_clipboard_overwrites() {
        let mut clipboard = MemoryClipboard::new();
        clipboard.write_text("first").unwrap();
        clipboard.write_text("second").unwrap();

        assert_eq!(clipboard.contents(), Some("second"));
        assert_eq!(clipboard.write_count(), 2);
    }

    #[test]
    fn test_memory_clipboard_accepts_empty_string() {
        let mut clipboard = MemoryClipboard::new();
        clipboard.write_text("").unwrap();
        assert_eq!(clipboard.contents(), Some(""));
    }
}
