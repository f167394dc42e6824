/// Selection range within a text field's value.
use anyhow::Result;

/// A `[start, end)` char range. `start == end` is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A caret at `pos` with nothing selected.
    pub fn collapsed(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Checks `start <= end <= len_chars`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending offsets.
    pub fn validate(&self, len_chars: usize) -> Result<()> {
        if self.start > self.end {
            anyhow::bail!(
                "invalid selection: start ({}) > end ({})",
                self.start,
                self.end
            );
        }
        if self.end > len_chars {
            anyhow::bail!(
                "selection end {} out of bounds (text has {} chars)",
                self.end,
                len_chars
            );
        }
        Ok(())
    }
}
