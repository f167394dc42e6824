//! Key handling pipeline: classify, gate, run the engine, write back.
//!
//! Hosts implement [`EditableField`] for their text control and call
//! [`handle_key_press`] from their key-down handler.

use anyhow::Result;
use tab_indent_config::Settings;

use crate::action::{classify, IndentAction, KeyPress, TriggerToggles};
use crate::context::{detect_context, is_enabled_in_context, FieldDescriptor};
use crate::engine::{apply_indent, remove_indent, IndentEdit};
use crate::indent::IndentUnit;
use crate::selection::Selection;

/// Host adapter over a live text control.
pub trait EditableField {
    /// Describes the control for target and context checks.
    fn descriptor(&self) -> FieldDescriptor;

    /// The control's current value.
    fn value(&self) -> String;

    /// The current selection, or `None` if the control has none right now.
    fn selection(&self) -> Option<Selection>;

    fn set_value(&mut self, value: String);

    fn set_selection(&mut self, selection: Selection);

    /// Signals that the content changed, so page scripts see the edit.
    fn notify_changed(&mut self);
}

/// What happened to a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not ours: let the browser handle the key.
    Ignored,
    /// Ours, but nothing to change.
    Consumed,
    /// The field was rewritten with this edit.
    Edited(IndentEdit),
}

impl KeyOutcome {
    /// Whether the host must suppress the key's default behavior.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Engine entry point shared by both actions. `Ok(None)` means nothing to do.
pub type IndentOperation = fn(&str, Selection, &IndentUnit) -> Result<Option<IndentEdit>>;

fn add_operation(text: &str, selection: Selection, unit: &IndentUnit) -> Result<Option<IndentEdit>> {
    apply_indent(text, selection, unit).map(Some)
}

/// Looks up the engine function for an action.
pub fn indent_operation(action: IndentAction) -> Option<IndentOperation> {
    match action {
        IndentAction::Add => Some(add_operation as IndentOperation),
        IndentAction::Remove => Some(remove_indent),
        IndentAction::None => None,
    }
}

/// Handles one key press against `field` using the active `settings`.
///
/// # Errors
///
/// Returns an error if the field reports a selection outside its value.
pub fn handle_key_press<F: EditableField + ?Sized>(
    field: &mut F,
    press: &KeyPress,
    settings: &Settings,
) -> Result<KeyOutcome> {
    let action = classify(press, TriggerToggles::from(settings));
    let Some(operation) = indent_operation(action) else {
        return Ok(KeyOutcome::Ignored);
    };

    let descriptor = field.descriptor();
    if !descriptor.is_indentable() {
        return Ok(KeyOutcome::Ignored);
    }

    let context = detect_context(&descriptor);
    if !is_enabled_in_context(context, settings) {
        tracing::debug!("{action:?} disabled in {context:?}");
        return Ok(KeyOutcome::Ignored);
    }

    let Some(selection) = field.selection() else {
        tracing::debug!("Field has no selection, skipping {action:?}");
        return Ok(KeyOutcome::Consumed);
    };

    let unit = IndentUnit::from(settings);
    let Some(edit) = operation(&field.value(), selection, &unit)? else {
        return Ok(KeyOutcome::Consumed);
    };

    field.set_value(edit.new_text.clone());
    field.set_selection(edit.resulting_selection());
    field.notify_changed();
    tracing::debug!(
        "{action:?} in {context:?}: caret {} -> {}",
        selection.start,
        edit.cursor
    );
    Ok(KeyOutcome::Edited(edit))
}
