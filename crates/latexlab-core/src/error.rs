use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LatexlabError {
    // Template errors
    #[error("TEMPLATE_NOT_FOUND: template '{name}' not found (missing {})", .path.display())]
    TemplateNotFound { name: String, path: PathBuf },

    #[error("CONFIG_MALFORMED: invalid template configuration {}: {reason}", .path.display())]
    ConfigMalformed { path: PathBuf, reason: String },

    #[error("TEMPLATE_SYNTAX_ERROR: {template}: {reason}")]
    TemplateSyntax { template: String, reason: String },

    #[error("RENDER_FAILED: {template}: {reason}")]
    RenderFailed { template: String, reason: String },

    // Field validation errors
    #[error("MISSING_REQUIRED_FIELD: field '{field}' is required and has no default")]
    MissingRequiredField { field: String },

    #[error("TYPE_MISMATCH: field '{field}' expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("OUT_OF_RANGE: field '{field}' value {value} is outside {bounds}")]
    OutOfRange {
        field: String,
        value: String,
        bounds: String,
    },

    #[error("INVALID_CHOICE: field '{field}' value '{value}' is not one of: {}", .choices.join(", "))]
    InvalidChoice {
        field: String,
        value: String,
        choices: Vec<String>,
    },

    // Input/output errors
    #[error("VARIABLES_INVALID: {}: {reason}", .path.display())]
    VariablesInvalid { path: PathBuf, reason: String },

    #[error("OUTPUT_EXISTS: '{}' already exists (use --force to overwrite)", .path.display())]
    OutputExists { path: PathBuf },

    #[error("ASSET_NOT_FOUND: '{}' does not exist", .0.display())]
    AssetNotFound(PathBuf),

    // Compilation errors
    #[error("COMPILATION_FAILED: {engine}: {reason}")]
    CompilationFailed { engine: String, reason: String },

    // Project errors
    #[error("PROJECT_CONFIG_INVALID: failed to parse latexlab.toml: {0}")]
    ProjectConfigInvalid(String),

    #[error("INVALID_NAME: {0}")]
    InvalidName(String),

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

impl LatexlabError {
    /// Whether the error comes from checking a single field value.
    ///
    /// Interactive prompts use this to ask again instead of aborting.
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            LatexlabError::MissingRequiredField { .. }
                | LatexlabError::TypeMismatch { .. }
                | LatexlabError::OutOfRange { .. }
                | LatexlabError::InvalidChoice { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LatexlabError>;
