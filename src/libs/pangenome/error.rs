use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PangenomeError {
    /// A name or id is already registered for a different object
    DuplicateKey(String),
    /// An edge or region would break the graph model (missing family, mixed organisms, ...)
    InvalidGraph(String),
    /// A post-condition or cross-record check failed
    Consistency(String),
    /// A position, name or id is absent from a registry
    Lookup(String),
    /// Malformed input in the tab-separated interchange files
    ParseError {
        /// A human-readable message explaining the error
        message: String,
        /// The line number (1-based)
        line: usize,
    },
}

impl fmt::Display for PangenomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PangenomeError::DuplicateKey(msg) => write!(f, "Duplicate key: {}", msg),
            PangenomeError::InvalidGraph(msg) => write!(f, "Invalid graph: {}", msg),
            PangenomeError::Consistency(msg) => write!(f, "Consistency error: {}", msg),
            PangenomeError::Lookup(msg) => write!(f, "Lookup error: {}", msg),
            PangenomeError::ParseError { message, line } => {
                write!(f, "Parse error at line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for PangenomeError {}

pub type Result<T> = std::result::Result<T, PangenomeError>;
