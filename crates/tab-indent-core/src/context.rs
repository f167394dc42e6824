//! Page-context classification for the focused text field.
//!
//! The host describes the focused element with a [`FieldDescriptor`]; this
//! module decides whether the field can be indented at all and which kind
//! of editor it belongs to, so each kind can be switched off in settings.

use std::sync::LazyLock;

use regex::Regex;
use tab_indent_config::Settings;

static MARKDOWN_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(md|markdown)$").expect("valid markdown path regex"));

const CODE_EDITOR_CLASSES: &[&str] = &[
    "CodeMirror",
    "monaco-editor",
    "file-editor-textarea",
    "commit-create",
];

const COMMENT_CLASSES: &[&str] = &[
    "comment-form-textarea",
    "inline-comment-form",
    "review-comment",
];

const COMMENT_IDS: &[&str] = &["issue_body", "pull_request_body"];

const COMMENT_DATA_TARGET: &str = "comment-form.textarea";

const WIKI_CLASS: &str = "wiki-wrapper";

const FILE_EDITOR_CLASS: &str = "file-editor-textarea";

/// The kind of editor a text field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAreaContext {
    /// Issue, pull request, and review comments.
    Comments,
    /// File editing.
    CodeEditor,
    /// Wiki pages and markdown files.
    Markdown,
    Unknown,
}

/// Element kind of the focused field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    TextArea,
    Input,
    #[default]
    Other,
}

/// What the host knows about the focused element and its surroundings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    /// Whether the element reports selection offsets.
    pub has_selection: bool,
    pub id: Option<String>,
    /// Class names of the element and all its ancestors.
    pub ancestor_classes: Vec<String>,
    /// `data-target` values of the element and all its ancestors.
    pub ancestor_data_targets: Vec<String>,
    /// Path of the file being edited, if the page shows one.
    pub file_path: Option<String>,
}

impl FieldDescriptor {
    /// A textarea with selection support and no surrounding context.
    pub fn text_area() -> Self {
        Self {
            kind: FieldKind::TextArea,
            has_selection: true,
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.ancestor_classes.push(class.to_string());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_data_target(mut self, target: &str) -> Self {
        self.ancestor_data_targets.push(target.to_string());
        self
    }

    pub fn with_file_path(mut self, path: &str) -> Self {
        self.file_path = Some(path.to_string());
        self
    }

    /// True for textareas and inputs that expose a selection.
    pub fn is_indentable(&self) -> bool {
        matches!(self.kind, FieldKind::TextArea | FieldKind::Input) && self.has_selection
    }

    fn within(&self, class: &str) -> bool {
        self.ancestor_classes.iter().any(|c| c == class)
    }

    fn within_any(&self, classes: &[&str]) -> bool {
        classes.iter().any(|class| self.within(class))
    }

    fn is_markdown_editor(&self) -> bool {
        if self.within(WIKI_CLASS) {
            return true;
        }
        self.within(FILE_EDITOR_CLASS)
            && self
                .file_path
                .as_deref()
                .is_some_and(|path| MARKDOWN_PATH.is_match(path))
    }

    fn is_code_editor(&self) -> bool {
        self.within_any(CODE_EDITOR_CLASSES)
    }

    fn is_comment_area(&self) -> bool {
        self.within_any(COMMENT_CLASSES)
            || self
                .id
                .as_deref()
                .is_some_and(|id| COMMENT_IDS.contains(&id))
            || self
                .ancestor_data_targets
                .iter()
                .any(|t| t == COMMENT_DATA_TARGET)
    }
}

/// Classifies the field. Markdown wins over code editor, which wins over
/// comments, since a markdown file is edited in the code editor.
pub fn detect_context(field: &FieldDescriptor) -> TextAreaContext {
    if field.is_markdown_editor() {
        TextAreaContext::Markdown
    } else if field.is_code_editor() {
        TextAreaContext::CodeEditor
    } else if field.is_comment_area() {
        TextAreaContext::Comments
    } else {
        TextAreaContext::Unknown
    }
}

/// Whether indentation is switched on for `context`. Unknown is always on.
pub fn is_enabled_in_context(context: TextAreaContext, settings: &Settings) -> bool {
    match context {
        TextAreaContext::Comments => settings.apply_to_comments,
        TextAreaContext::CodeEditor => settings.apply_to_code_editor,
        TextAreaContext::Markdown => settings.apply_to_markdown,
        TextAreaContext::Unknown => true,
    }
}
