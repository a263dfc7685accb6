use miette::Diagnostic;
use thiserror::Error;

/// Main error type for ptasm operations
#[derive(Error, Diagnostic, Debug)]
pub enum AsmError {
    #[error("IO error: {0}")]
    #[diagnostic(code(ptasm::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(ptasm::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(ptasm::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(ptasm::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Load error: {message}")]
    #[diagnostic(code(ptasm::load))]
    Load {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(ptasm::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl AsmError {
    /// Machine-readable code used when an error is downgraded to a report diagnostic.
    pub fn code(&self) -> &'static str {
        match self {
            AsmError::IoError(_) | AsmError::Io { .. } => "ptasm::io",
            AsmError::Parse { .. } => "ptasm::parse",
            AsmError::Config { .. } => "ptasm::config",
            AsmError::Load { .. } => "ptasm::load",
            AsmError::Build { .. } => "ptasm::build",
        }
    }

    /// Help text attached to the error, if any.
    pub fn help_text(&self) -> Option<&str> {
        match self {
            AsmError::Parse { help, .. }
            | AsmError::Config { help, .. }
            | AsmError::Load { help, .. }
            | AsmError::Build { help, .. } => help.as_deref(),
            AsmError::IoError(_) | AsmError::Io { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AsmError>;
