/// Text buffer wrapping `ropey::Rope` for char-indexed editing of a field's value.
use std::fmt;

use anyhow::Result;
use ropey::Rope;

/// The line-break character. Text fields normalize line endings to `\n`.
pub const LINE_BREAK: char = '\n';

/// A text buffer backed by a rope data structure.
///
/// All positions are char (Unicode scalar value) indices.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl TextBuffer {
    /// Returns the total number of characters in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    fn check_position(&self, char_idx: usize) -> Result<()> {
        if char_idx > self.rope.len_chars() {
            anyhow::bail!(
                "char index {} out of bounds (buffer has {} chars)",
                char_idx,
                self.rope.len_chars()
            );
        }
        Ok(())
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end {
            anyhow::bail!("invalid range: start ({}) > end ({})", start, end);
        }
        self.check_position(end)
    }

    /// Returns the char index where the line containing `char_idx` begins.
    ///
    /// Scans backward to the previous line break, or to the start of the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn line_start_at(&self, char_idx: usize) -> Result<usize> {
        self.check_position(char_idx)?;
        let mut chars = self.rope.chars_at(char_idx);
        let mut pos = char_idx;
        while let Some(c) = chars.prev() {
            if c == LINE_BREAK {
                break;
            }
            pos -= 1;
        }
        Ok(pos)
    }

    /// Returns the char indices of every line break in `[start..end)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is out of bounds.
    pub fn line_breaks_in(&self, start: usize, end: usize) -> Result<Vec<usize>> {
        self.check_range(start, end)?;
        Ok(self
            .rope
            .slice(start..end)
            .chars()
            .enumerate()
            .filter(|(_, c)| *c == LINE_BREAK)
            .map(|(offset, _)| start + offset)
            .collect())
    }

    /// Returns true if the text at `char_idx` begins with `pattern`.
    ///
    /// A pattern running past the end of the buffer never matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn matches_at(&self, char_idx: usize, pattern: &str) -> Result<bool> {
        self.check_position(char_idx)?;
        let end = char_idx + pattern.chars().count();
        if end > self.rope.len_chars() {
            return Ok(false);
        }
        Ok(self.rope.slice(char_idx..end) == pattern)
    }

    /// Inserts text at the given char index.
    ///
    /// # Errors
    ///
    /// Returns an error if the char index is out of bounds.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> Result<()> {
        if char_idx > self.rope.len_chars() {
            anyhow::bail!(
                "insert position {} out of bounds (buffer has {} chars)",
                char_idx,
                self.rope.len_chars()
            );
        }
        self.rope.insert(char_idx, text);
        Ok(())
    }

    /// Removes the character range [start..end) from the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is out of bounds.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;
        self.rope.remove(start..end);
        Ok(())
    }
}
