//! Tab-key indentation for browser text fields.
//!
//! The [`engine`] computes indent and outdent edits on a field's value;
//! [`pipeline`] wires key presses, page context, and settings to it.

pub mod action;
pub mod buffer;
pub mod context;
pub mod engine;
pub mod indent;
pub mod line_starts;
pub mod pipeline;
pub mod selection;

pub use action::{classify, IndentAction, Key, KeyPress, Modifiers, TriggerToggles};
pub use buffer::TextBuffer;
pub use context::{detect_context, is_enabled_in_context, FieldDescriptor, FieldKind, TextAreaContext};
pub use engine::{apply_indent, remove_indent, IndentEdit};
pub use indent::{IndentStyle, IndentUnit};
pub use pipeline::{handle_key_press, indent_operation, EditableField, IndentOperation, KeyOutcome};
pub use selection::Selection;
