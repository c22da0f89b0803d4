use thiserror::Error;

#[derive(Error, Debug)]
pub enum AimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record at line {line}: {message}")]
    Ingest { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl AimError {
    pub fn ingest(line: usize, message: impl Into<String>) -> Self {
        AimError::Ingest {
            line,
            message: message.into(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            AimError::Io(_) => true,
            AimError::Export(_) => true,
            AimError::Ingest { .. } => false,
            AimError::InvalidConfig(_) => false,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AimError>;
