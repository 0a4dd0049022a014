//! Text editor invocation

use crate::error::{Error, Result};

/// Something that lets the user edit a text buffer
pub trait Editor: Send + Sync {
    /// Edit `text` and return the result
    ///
    /// Returns `Ok(None)` when the user quit without saving.
    fn edit(&self, text: &str) -> Result<Option<String>>;
}

/// Editor from `$VISUAL` / `$EDITOR`, via dialoguer
pub struct SystemEditor {
    extension: &'static str,
}

impl SystemEditor {
    /// Editor for markdown buffers
    pub const fn markdown() -> Self {
        Self { extension: ".md" }
    }
}

impl Editor for SystemEditor {
    fn edit(&self, text: &str) -> Result<Option<String>> {
        dialoguer::Editor::new()
            .extension(self.extension)
            .require_save(true)
            .edit(text)
            .map_err(|e| Error::Editor(e.to_string()))
    }
}
