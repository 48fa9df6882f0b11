//! Clipboard access for copying generated code.

use blockkit_core::{shared_none, SharedOption};
use thiserror::Error;

/// Clipboard failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write clipboard: {0}")]
    Write(String),
}

/// Something text can be copied into.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard, via `arboard`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Write(e.to_string()))?;
        // Keep clipboard alive for a moment to ensure managers see it
        std::thread::sleep(std::time::Duration::from_millis(100));
        Ok(())
    }
}

/// In-memory selectable text buffer shown when the system clipboard fails.
///
/// Clones share the same buffer, so the view holding one sees what the
/// copy action wrote into another.
#[derive(Debug, Clone)]
pub struct FallbackClipboard {
    contents: SharedOption<String>,
}

impl FallbackClipboard {
    pub fn new() -> Self {
        Self {
            contents: shared_none(),
        }
    }

    /// Text last copied into the buffer.
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    pub fn clear(&self) {
        self.contents.borrow_mut().take();
    }
}

impl Default for FallbackClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for FallbackClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// Copy `text` into `primary`, falling back to `fallback` if that fails.
///
/// Returns whether either clipboard took the text. Failures are only logged.
pub fn copy_with_fallback(
    text: &str,
    primary: &mut dyn Clipboard,
    fallback: &mut dyn Clipboard,
) -> bool {
    match primary.set_text(text) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Clipboard copy failed, using fallback: {}", e);
            match fallback.set_text(text) {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("Fallback clipboard copy failed: {}", e);
                    false
                }
            }
        }
    }
}
