/// Discovery of the lines a selection touches.
use anyhow::Result;

use crate::buffer::TextBuffer;
use crate::selection::Selection;

/// Returns true if the selected text contains at least one line break.
///
/// # Errors
///
/// Returns an error if the selection is out of bounds.
pub fn spans_multiple_lines(buffer: &TextBuffer, selection: Selection) -> Result<bool> {
    Ok(!buffer
        .line_breaks_in(selection.start, selection.end)?
        .is_empty())
}

/// Returns the start offset of every line the selection touches, ascending.
///
/// The first entry is the start of the line containing `selection.start`.
/// Every line break inside the selection contributes the offset after it,
/// except a line beginning exactly at `selection.end`: a selection ending
/// right after a line break does not touch the next line.
///
/// # Errors
///
/// Returns an error if the selection is out of bounds.
pub fn touched_line_starts(buffer: &TextBuffer, selection: Selection) -> Result<Vec<usize>> {
    let first = buffer.line_start_at(selection.start)?;
    let mut starts = vec![first];
    starts.extend(
        buffer
            .line_breaks_in(selection.start, selection.end)?
            .into_iter()
            .map(|brk| brk + 1)
            .filter(|&line_start| line_start < selection.end),
    );
    Ok(starts)
}
