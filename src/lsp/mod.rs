//! LSP protocol conversions.
//!
//! This module converts service payloads (byte offsets) into LSP types
//! (line/UTF-16 positions):
//! - Diagnostics for publishing and code action requests
//! - Hover from quick info
//! - Completion items and their resolve payload
//! - Definition links and reference locations
//! - Text edits, folding ranges, code actions and signature help

mod completion;
mod diagnostics;
mod edits;
mod hover;
mod navigation;

pub use completion::{apply_details, to_completion_response, ResolveData};
pub use diagnostics::{error_codes, to_diagnostics};
pub use edits::{
    format_settings, to_code_actions, to_folding_ranges, to_signature_help, to_text_edits,
};
pub use hover::to_hover;
pub use navigation::{to_definition_response, to_locations};
