//! Configuration-level compiler failures.

/// Errors that stop a compiler from running at all.
///
/// Problems in the sources themselves are reported as diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// A compiler option has a value the backend does not accept.
    #[error("invalid compiler option '{option}': {message}")]
    InvalidOption {
        /// The option name as written in the project file.
        option: String,
        /// What is wrong with the value.
        message: String,
    },

    /// The backend failed for a reason of its own.
    #[error("compiler backend '{backend}' failed: {message}")]
    Backend {
        /// Name of the failing backend.
        backend: String,
        /// Description of the failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_option() {
        let err = CompileError::InvalidOption {
            option: "target".into(),
            message: "unknown target 'es4'".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid compiler option 'target': unknown target 'es4'"
        );
    }

    #[test]
    fn display_backend() {
        let err = CompileError::Backend {
            backend: "identity".into(),
            message: "out of memory".into(),
        };
        assert!(err.to_string().contains("'identity'"));
    }
}
