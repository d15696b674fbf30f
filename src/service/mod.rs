//! Service contracts: the host language service and the template-aware service.

mod host;
mod template;

pub use host::LanguageService;
pub use template::{Capabilities, TemplateLanguageService};
