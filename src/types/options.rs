//! Trailing arguments accepted by language service operations.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionOptions {
    /// Character that triggered the request, if any.
    pub trigger_character: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCodeSettings {
    pub tab_size: u32,
    pub indent_size: u32,
    pub convert_tabs_to_spaces: bool,
    pub new_line_character: String,
}

impl Default for FormatCodeSettings {
    fn default() -> Self {
        Self {
            tab_size: 4,
            indent_size: 4,
            convert_tabs_to_spaces: true,
            new_line_character: "\n".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureHelpOptions {
    pub trigger_character: Option<char>,
    /// True when the request re-triggers an already visible signature help.
    pub is_retrigger: bool,
}
