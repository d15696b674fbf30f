//! Documents, text utilities and the template position model.
//!
//! This module provides:
//! - `LineIndex` for byte offset <-> LSP position conversion
//! - `Document` and `DocumentStore` for document lifecycle management
//! - `Template` for embedded regions and local <-> global offset mapping
//! - a lexical scanner that finds comments and literals in host text

pub mod lexical;
mod state;
mod template;
mod text;

pub use state::{Document, DocumentStore};
pub use template::Template;
pub use text::LineIndex;
