// Core modules
pub mod assets;
pub mod compile;
pub mod config;
pub mod error;
pub mod output;
pub mod path;
pub mod scaffold;
pub mod template;
pub mod validate;
pub mod variables;

// Re-export commonly used types
pub use error::{LatexlabError, Result};
pub use template::{Template, TemplateEngine};
