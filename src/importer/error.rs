//! Importer Error Handling
//!
//! Error types for the discovery pipeline: locating the unit directory,
//! loading individual units, and validating discovery options.

use crate::core::error_handling::ContextualError;
use std::path::PathBuf;

/// Result type alias for importer operations
pub type ImportResult<T> = std::result::Result<T, ImportError>;

/// Errors raised while building a component registry
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The unit root does not exist, is not a directory, or cannot be listed
    #[error("Unit directory not found: {} ({source})", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A unit could not be read, compiled, or evaluated
    #[error("Failed to load unit '{unit_name}' from {}: {cause}", unit_path.display())]
    UnitLoad {
        unit_name: String,
        unit_path: PathBuf,
        cause: String,
    },

    /// An exclusion pattern in the discovery configuration is not a valid glob
    #[error("Invalid exclusion pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ImportError {
    /// Name of the unit involved, when the error concerns a single unit
    pub fn unit_name(&self) -> Option<&str> {
        match self {
            ImportError::UnitLoad { unit_name, .. } => Some(unit_name),
            _ => None,
        }
    }
}

impl ContextualError for ImportError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            ImportError::NotFound { .. } | ImportError::InvalidPattern { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ImportError::NotFound { .. } => Some("The unit directory does not exist or cannot be read"),
            ImportError::InvalidPattern { .. } => Some("An exclusion pattern is not a valid glob"),
            ImportError::UnitLoad { .. } => None,
        }
    }
}
