/// Indent style configuration and the unit the engine inserts or removes.
use tab_indent_config::{IndentType, Settings};

/// Indentation style chosen in the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    /// Use N spaces for indentation.
    Spaces(usize),
    /// Use a tab character for indentation.
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self::Spaces(2)
    }
}

impl std::fmt::Display for IndentStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spaces(n) => write!(f, "Spaces: {n}"),
            Self::Tabs => write!(f, "Tabs"),
        }
    }
}

impl IndentStyle {
    /// Resolves the active style. Tab mode ignores the repeat count.
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.indent_type {
            IndentType::Space => Self::Spaces(settings.indent_size.max(1)),
            IndentType::Tab => Self::Tabs,
        }
    }

    /// Returns the string to insert for one level of indentation.
    pub fn indent_text(&self) -> String {
        match self {
            Self::Spaces(n) => " ".repeat(*n),
            Self::Tabs => "\t".to_string(),
        }
    }

    /// Returns the number of characters that one indent level represents.
    pub fn indent_size(&self) -> usize {
        match self {
            Self::Spaces(n) => *n,
            Self::Tabs => 1,
        }
    }
}

/// One indent level: the literal text and its width in chars.
///
/// The unit is only ever inserted or removed as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentUnit {
    text: String,
    width: usize,
}

impl Default for IndentUnit {
    fn default() -> Self {
        IndentStyle::default().into()
    }
}

impl From<IndentStyle> for IndentUnit {
    fn from(style: IndentStyle) -> Self {
        Self {
            text: style.indent_text(),
            width: style.indent_size(),
        }
    }
}

impl From<&Settings> for IndentUnit {
    fn from(settings: &Settings) -> Self {
        IndentStyle::from_settings(settings).into()
    }
}

impl IndentUnit {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> usize {
        self.width
    }
}
