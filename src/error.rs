use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("unbalanced braces in {}: body starting at line {line} never closes", path.display())]
    UnbalancedBody { path: PathBuf, line: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
