//! Indent engine: computes the new field value and caret/selection for an
//! indent or outdent request.
//!
//! Both operations are pure. They take the field's current value and
//! selection, and return a fresh [`IndentEdit`] for the host to write back.
//!
//! - A caret or a selection within one line is edited at the caret:
//!   indent inserts one unit at `selection.start`, outdent deletes the unit
//!   right before it.
//! - A selection spanning several lines edits the start of every touched
//!   line and reports the adjusted selection.

use anyhow::Result;

use crate::buffer::TextBuffer;
use crate::indent::IndentUnit;
use crate::line_starts::{spans_multiple_lines, touched_line_starts};
use crate::selection::Selection;

/// Result of one engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentEdit {
    /// The complete new field value.
    pub new_text: String,
    /// Where the caret goes.
    pub cursor: usize,
    /// The selection to restore, or `None` to collapse to `cursor`.
    pub selection: Option<Selection>,
}

impl IndentEdit {
    fn collapsed(new_text: String, cursor: usize) -> Self {
        Self {
            new_text,
            cursor,
            selection: None,
        }
    }

    /// The selection the host should apply after writing `new_text`.
    pub fn resulting_selection(&self) -> Selection {
        self.selection
            .unwrap_or_else(|| Selection::collapsed(self.cursor))
    }
}

/// Moves `pos` right past every unit inserted strictly before it.
fn shift_past_insertions(pos: usize, inserted_at: &[usize], width: usize) -> usize {
    pos + width * inserted_at.iter().filter(|&&at| at < pos).count()
}

/// Moves `pos` left by the part of each removed unit that lay before it.
///
/// A position inside a removed unit lands on the unit's old start.
fn shift_past_removals(pos: usize, removed_at: &[usize], width: usize) -> usize {
    let removed_before: usize = removed_at
        .iter()
        .map(|&at| pos.saturating_sub(at).min(width))
        .sum();
    pos - removed_before
}

/// Moves a selection end left by one whole unit per removal before it,
/// never past the new selection start.
fn pull_back_end(end: usize, start: usize, removed_at: &[usize], width: usize) -> usize {
    let removed_before = removed_at.iter().filter(|&&at| at < end).count();
    end.saturating_sub(width * removed_before).max(start)
}

/// Adds one indent level.
///
/// Never returns `Ok` without an edit: indenting is always possible.
///
/// # Errors
///
/// Returns an error if `selection` is not within `text`.
pub fn apply_indent(text: &str, selection: Selection, unit: &IndentUnit) -> Result<IndentEdit> {
    let mut buffer = TextBuffer::from(text);
    selection.validate(buffer.len_chars())?;
    let width = unit.width();

    if !spans_multiple_lines(&buffer, selection)? {
        // Selected text on a single line is kept and pushed right.
        buffer.insert(selection.start, unit.as_str())?;
        return Ok(IndentEdit::collapsed(
            buffer.to_string(),
            selection.start + width,
        ));
    }

    let line_starts = touched_line_starts(&buffer, selection)?;
    for (i, &line_start) in line_starts.iter().enumerate() {
        buffer.insert(line_start + i * width, unit.as_str())?;
    }

    let start = shift_past_insertions(selection.start, &line_starts, width);
    let end = shift_past_insertions(selection.end, &line_starts, width);
    Ok(IndentEdit {
        new_text: buffer.to_string(),
        cursor: selection.start + width,
        selection: Some(Selection::new(start, end)),
    })
}

/// Removes one indent level.
///
/// Returns `Ok(None)` when no touched line starts with the unit; the host
/// must then leave the field untouched.
///
/// # Errors
///
/// Returns an error if `selection` is not within `text`.
pub fn remove_indent(
    text: &str,
    selection: Selection,
    unit: &IndentUnit,
) -> Result<Option<IndentEdit>> {
    let mut buffer = TextBuffer::from(text);
    selection.validate(buffer.len_chars())?;
    let width = unit.width();

    if !spans_multiple_lines(&buffer, selection)? {
        let line_start = buffer.line_start_at(selection.start)?;
        // Only the text before the caret counts, so it must hold a whole unit.
        let indented = selection.start - line_start >= width
            && buffer.matches_at(line_start, unit.as_str())?;
        if !indented {
            return Ok(None);
        }
        let cursor = selection.start - width;
        buffer.remove(cursor, selection.start)?;
        return Ok(Some(IndentEdit::collapsed(buffer.to_string(), cursor)));
    }

    let line_starts = touched_line_starts(&buffer, selection)?;
    let mut indented = Vec::with_capacity(line_starts.len());
    for &line_start in &line_starts {
        if buffer.matches_at(line_start, unit.as_str())? {
            indented.push(line_start);
        }
    }
    if indented.is_empty() {
        return Ok(None);
    }

    let mut removed = Vec::with_capacity(indented.len());
    for &line_start in &indented {
        let at = line_start - removed.len() * width;
        if buffer.matches_at(at, unit.as_str())? {
            buffer.remove(at, at + width)?;
            removed.push(line_start);
        }
    }

    let start = shift_past_removals(selection.start, &removed, width);
    let end = pull_back_end(selection.end, start, &removed, width);
    Ok(Some(IndentEdit {
        new_text: buffer.to_string(),
        cursor: start,
        selection: Some(Selection::new(start, end)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indent::IndentStyle;

    fn spaces(n: usize) -> IndentUnit {
        IndentStyle::Spaces(n).into()
    }

    fn tab() -> IndentUnit {
        IndentStyle::Tabs.into()
    }

    fn add(text: &str, start: usize, end: usize) -> IndentEdit {
        apply_indent(text, Selection::new(start, end), &spaces(2)).unwrap()
    }

    fn remove(text: &str, start: usize, end: usize) -> Option<IndentEdit> {
        remove_indent(text, Selection::new(start, end), &spaces(2)).unwrap()
    }

    // ── apply_indent: caret and single line ────────────────────────────

    #[test]
    fn test_add_at_caret() {
        let edit = add("Hello World", 5, 5);
        assert_eq!(edit.new_text, "Hello   World");
        assert_eq!(edit.cursor, 7);
        assert_eq!(edit.selection, None);
        assert_eq!(edit.resulting_selection(), Selection::collapsed(7));
    }

    #[test]
    fn test_add_at_line_start() {
        let edit = add("Hello World", 0, 0);
        assert_eq!(edit.new_text, "  Hello World");
        assert_eq!(edit.cursor, 2);
    }

    #[test]
    fn test_add_on_second_line() {
        let edit = add("Line 1\nLine 2", 7, 7);
        assert_eq!(edit.new_text, "Line 1\n  Line 2");
        assert_eq!(edit.cursor, 9);
    }

    #[test]
    fn test_add_keeps_single_line_selection_text() {
        let edit = add("Hello World", 5, 11);
        assert_eq!(edit.new_text, "Hello   World");
        assert_eq!(edit.cursor, 7);

        let edit = add("function test() {}", 9, 13);
        assert_eq!(edit.new_text, "function   test() {}");
        assert_eq!(edit.cursor, 11);
    }

    #[test]
    fn test_add_whole_line_selection_without_line_break() {
        let edit = add("Line 1\nLine 2\nLine 3", 7, 13);
        assert_eq!(edit.new_text, "Line 1\n  Line 2\nLine 3");
        assert_eq!(edit.cursor, 9);
        assert_eq!(edit.selection, None);
    }

    #[test]
    fn test_add_into_empty_text() {
        let edit = add("", 0, 0);
        assert_eq!(edit.new_text, "  ");
        assert_eq!(edit.cursor, 2);
    }

    #[test]
    fn test_add_tab() {
        let edit = apply_indent("Hello World", Selection::collapsed(5), &tab()).unwrap();
        assert_eq!(edit.new_text, "Hello\t World");
        assert_eq!(edit.cursor, 6);
    }

    #[test]
    fn test_add_four_spaces() {
        let edit = apply_indent("Hello World", Selection::collapsed(5), &spaces(4)).unwrap();
        assert_eq!(edit.new_text, "Hello     World");
        assert_eq!(edit.cursor, 9);
    }

    // ── apply_indent: multiple lines ───────────────────────────────────

    #[test]
    fn test_add_full_multi_line_selection() {
        let edit = add("Line 1\nLine 2\nLine 3", 0, 20);
        assert_eq!(edit.new_text, "  Line 1\n  Line 2\n  Line 3");
        assert_eq!(edit.cursor, 2);
        assert_eq!(edit.selection, Some(Selection::new(0, 26)));
    }

    #[test]
    fn test_add_from_second_line() {
        let edit = add("Line 1\nLine 2\nLine 3", 7, 20);
        assert_eq!(edit.new_text, "Line 1\n  Line 2\n  Line 3");
        assert_eq!(edit.cursor, 9);
        assert_eq!(edit.selection, Some(Selection::new(7, 24)));
    }

    #[test]
    fn test_add_selection_starting_mid_line_moves_start() {
        let edit = add("Line 1\nLine 2", 3, 10);
        assert_eq!(edit.new_text, "  Line 1\n  Line 2");
        assert_eq!(edit.cursor, 5);
        assert_eq!(edit.selection, Some(Selection::new(5, 14)));
    }

    #[test]
    fn test_add_selection_ending_after_line_break_skips_next_line() {
        let edit = add("Line 1\nLine 2\nLine 3", 0, 14);
        assert_eq!(edit.new_text, "  Line 1\n  Line 2\nLine 3");
        assert_eq!(edit.selection, Some(Selection::new(0, 18)));
    }

    #[test]
    fn test_add_indents_empty_lines_inside_selection() {
        let edit = add("a\n\nb", 0, 4);
        assert_eq!(edit.new_text, "  a\n  \n  b");
        assert_eq!(edit.selection, Some(Selection::new(0, 10)));
    }

    #[test]
    fn test_add_multi_line_with_unicode() {
        let edit = add("日本\n語", 0, 4);
        assert_eq!(edit.new_text, "  日本\n  語");
        assert_eq!(edit.selection, Some(Selection::new(0, 8)));
    }

    // ── remove_indent: caret and single line ───────────────────────────

    #[test]
    fn test_remove_at_caret_after_indent() {
        let edit = remove("  Hello World", 2, 2).unwrap();
        assert_eq!(edit.new_text, "Hello World");
        assert_eq!(edit.cursor, 0);
        assert_eq!(edit.selection, None);
    }

    #[test]
    fn test_remove_without_indent_is_absent() {
        assert!(remove("Hello World", 5, 5).is_none());
        assert!(remove("Hello World", 5, 5).is_none());
    }

    #[test]
    fn test_remove_on_second_line() {
        let edit = remove("Line 1\n  Line 2", 9, 9).unwrap();
        assert_eq!(edit.new_text, "Line 1\nLine 2");
        assert_eq!(edit.cursor, 7);
    }

    #[test]
    fn test_remove_partial_indent_is_absent() {
        assert!(remove(" Hello World", 1, 1).is_none());
    }

    #[test]
    fn test_remove_with_caret_inside_indent_is_absent() {
        // Only one of the two spaces lies before the caret
        assert!(remove("  Hello", 1, 1).is_none());
    }

    #[test]
    fn test_remove_keeps_single_line_selection_text() {
        let edit = remove("  Hello World", 2, 7).unwrap();
        assert_eq!(edit.new_text, "Hello World");
        assert_eq!(edit.cursor, 0);
    }

    #[test]
    fn test_remove_undoes_add_mid_line() {
        let added = add("  ab|c", 4, 4);
        assert_eq!(added.new_text, "  ab  |c");
        let removed = remove(&added.new_text, added.cursor, added.cursor).unwrap();
        assert_eq!(removed.new_text, "  ab|c");
        assert_eq!(removed.cursor, 4);
    }

    #[test]
    fn test_remove_tab() {
        let edit = remove_indent("\tHello World", Selection::collapsed(1), &tab())
            .unwrap()
            .unwrap();
        assert_eq!(edit.new_text, "Hello World");
        assert_eq!(edit.cursor, 0);
    }

    #[test]
    fn test_remove_tab_does_not_match_spaces() {
        let result = remove_indent("  Hello", Selection::collapsed(2), &tab()).unwrap();
        assert!(result.is_none());
    }

    // ── remove_indent: multiple lines ──────────────────────────────────

    #[test]
    fn test_remove_full_multi_line_selection() {
        let edit = remove("  Line 1\n  Line 2\n  Line 3", 0, 26).unwrap();
        assert_eq!(edit.new_text, "Line 1\nLine 2\nLine 3");
        assert_eq!(edit.cursor, 0);
        assert_eq!(edit.selection, Some(Selection::new(0, 20)));
    }

    #[test]
    fn test_remove_from_second_line() {
        let edit = remove("  Line 1\n  Line 2\n  Line 3", 9, 26).unwrap();
        assert_eq!(edit.new_text, "  Line 1\nLine 2\nLine 3");
        assert_eq!(edit.cursor, 9);
        assert_eq!(edit.selection, Some(Selection::new(9, 22)));
    }

    #[test]
    fn test_remove_skips_unindented_lines() {
        let edit = remove("  Line 1\nLine 2\n  Line 3", 0, 24).unwrap();
        assert_eq!(edit.new_text, "Line 1\nLine 2\nLine 3");
        assert_eq!(edit.cursor, 0);
        assert_eq!(edit.selection, Some(Selection::new(0, 20)));
    }

    #[test]
    fn test_remove_multi_line_without_any_indent_is_absent() {
        assert!(remove("Line 1\nLine 2", 0, 13).is_none());
        assert!(remove(" Line 1\n Line 2", 0, 15).is_none());
    }

    #[test]
    fn test_remove_start_inside_first_indent_clamps_to_line_start() {
        // Start at offset 1, inside the first line's indent
        let edit = remove("  ab\n  cd", 1, 9).unwrap();
        assert_eq!(edit.new_text, "ab\ncd");
        assert_eq!(edit.selection, Some(Selection::new(0, 5)));
        assert_eq!(edit.cursor, 0);
    }

    #[test]
    fn test_remove_start_after_first_indent_moves_left() {
        let edit = remove("x\n  ab\n  cd", 5, 11).unwrap();
        assert_eq!(edit.new_text, "x\nab\ncd");
        assert_eq!(edit.selection, Some(Selection::new(3, 7)));
        assert_eq!(edit.cursor, 3);
    }

    #[test]
    fn test_remove_start_on_unindented_first_line_is_kept() {
        let edit = remove("ab\n  cd", 1, 7).unwrap();
        assert_eq!(edit.new_text, "ab\ncd");
        assert_eq!(edit.selection, Some(Selection::new(1, 5)));
    }

    #[test]
    fn test_remove_end_inside_last_indent_drops_whole_units() {
        // End at offset 6 sits between the two spaces of line 2
        let edit = remove("  ab\n  cd", 0, 6).unwrap();
        assert_eq!(edit.new_text, "ab\ncd");
        assert_eq!(edit.selection, Some(Selection::new(0, 2)));
        assert_eq!(edit.cursor, 0);
    }

    #[test]
    fn test_remove_end_never_passes_start() {
        let edit = remove_indent("\n    cd", Selection::new(0, 2), &spaces(4))
            .unwrap()
            .unwrap();
        assert_eq!(edit.new_text, "\ncd");
        assert_eq!(edit.selection, Some(Selection::new(0, 0)));
    }

    #[test]
    fn test_remove_selection_ending_after_line_break_skips_next_line() {
        let edit = remove("  ab\n  cd", 0, 5).unwrap();
        assert_eq!(edit.new_text, "ab\n  cd");
        assert_eq!(edit.selection, Some(Selection::new(0, 3)));
    }

    #[test]
    fn test_remove_only_one_level() {
        let edit = remove("    a\n    b", 0, 11).unwrap();
        assert_eq!(edit.new_text, "  a\n  b");
    }

    // ── Round trips ────────────────────────────────────────────────────

    #[test]
    fn test_multi_line_add_then_remove_restores_text() {
        let original = "fn a() {\nlet x = 1;\n}";
        let added = add(original, 0, original.chars().count());
        let sel = added.resulting_selection();
        let removed = remove(&added.new_text, sel.start, sel.end).unwrap();
        assert_eq!(removed.new_text, original);
        assert_eq!(
            removed.selection,
            Some(Selection::new(0, original.chars().count()))
        );
    }

    // ── Preconditions ──────────────────────────────────────────────────

    #[test]
    fn test_invalid_selection_is_error() {
        let unit = spaces(2);
        assert!(apply_indent("abc", Selection::new(2, 1), &unit).is_err());
        assert!(apply_indent("abc", Selection::new(0, 4), &unit).is_err());
        assert!(remove_indent("abc", Selection::new(5, 5), &unit).is_err());
    }

    #[test]
    fn test_shift_helpers() {
        assert_eq!(shift_past_insertions(5, &[0, 5, 9], 2), 7);
        assert_eq!(shift_past_insertions(0, &[0], 2), 0);
        assert_eq!(shift_past_removals(10, &[0, 5], 2), 6);
        assert_eq!(shift_past_removals(6, &[5], 2), 5);
        assert_eq!(shift_past_removals(5, &[5], 2), 5);
    }
}
