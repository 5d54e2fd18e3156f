//! System clipboard access for the copy action.

use arboard::Clipboard;

/// Destination for copied pane text.
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

/// Arboard-backed clipboard.
///
/// The handle is opened on first use and then kept, since on X11 the copied
/// text is only served while it is alive.
#[derive(Default)]
pub struct ArboardClipboard {
    clipboard: Option<Clipboard>,
}

impl ClipboardWriter for ArboardClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        let mut clipboard = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().map_err(|e| format!("failed to open clipboard: {e}"))?,
        };
        let result = clipboard
            .set_text(text)
            .map_err(|e| format!("failed to copy to clipboard: {e}"));
        self.clipboard = Some(clipboard);
        result
    }
}
