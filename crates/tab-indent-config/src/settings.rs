/// User settings record: defaults, field-level merge, and sanitize.
use serde::{Deserialize, Serialize};

/// Smallest accepted indent repeat count.
pub const MIN_INDENT_SIZE: usize = 1;

/// Largest accepted indent repeat count.
pub const MAX_INDENT_SIZE: usize = 16;

/// Which character an indent unit is made of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentType {
    /// `indent_size` copies of a space.
    #[default]
    Space,
    /// A single tab character, regardless of `indent_size`.
    Tab,
}

/// The flat settings record persisted under a single key.
///
/// Keys are camelCase so a record written by the options page can be read
/// back unchanged. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Number of spaces per indent when `indent_type` is `Space`.
    pub indent_size: usize,
    pub indent_type: IndentType,
    /// Whether Tab / Shift+Tab trigger indentation.
    pub enable_tab: bool,
    /// Whether Ctrl/Cmd+] and Ctrl/Cmd+[ trigger indentation.
    pub enable_bracket: bool,
    pub apply_to_comments: bool,
    pub apply_to_code_editor: bool,
    pub apply_to_markdown: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indent_size: 2,
            indent_type: IndentType::Space,
            enable_tab: true,
            enable_bracket: true,
            apply_to_comments: true,
            apply_to_code_editor: true,
            apply_to_markdown: true,
        }
    }
}

impl Settings {
    /// Parses a stored JSON record, filling missing fields from defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Serializes the record as compact JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        self.indent_size = self.indent_size.clamp(MIN_INDENT_SIZE, MAX_INDENT_SIZE);
    }
}
