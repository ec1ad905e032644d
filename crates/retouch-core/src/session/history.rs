//! Linear undo/redo over edited images.

/// An image returned by the remote editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Append-only list of edit results with a cursor.
///
/// The cursor is `None` when the user has undone past the first edit, in
/// which case there is no current edited image.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<EditedImage>,
    index: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any redo tail and make `image` current.
    pub fn push(&mut self, image: EditedImage) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(image);
        self.index = Some(self.entries.len() - 1);
    }

    pub fn current(&self) -> Option<&EditedImage> {
        self.index.and_then(|i| self.entries.get(i))
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some()
    }

    pub fn can_redo(&self) -> bool {
        match self.index {
            Some(i) => i + 1 < self.entries.len(),
            None => !self.entries.is_empty(),
        }
    }

    /// Step back one entry; stepping back from the first entry leaves no
    /// current image.
    pub fn undo(&mut self) -> bool {
        match self.index {
            Some(0) => self.index = None,
            Some(i) => self.index = Some(i - 1),
            None => return false,
        }
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index = Some(self.index.map_or(0, |i| i + 1));
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }
}
