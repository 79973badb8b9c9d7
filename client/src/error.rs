use thiserror::Error;

/// Failure reported by (or while talking to) the gateway.
///
/// Errors are `Clone` because a single in-flight fetch may be awaited by
/// several readers, each of which receives the same outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Input rejected before any gateway call is made
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Name is required")]
    EmptyName,

    #[error("Please select a milk type")]
    MissingMilkType,
}

/// Error surfaced to the user by a page controller.
///
/// Gateway failures are deliberately collapsed into one generic message per
/// operation; the underlying cause stays available through `source()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Failed {
        message: &'static str,
        #[source]
        source: GatewayError,
    },
}

impl ClientError {
    pub fn failed(message: &'static str, source: GatewayError) -> Self {
        ClientError::Failed { message, source }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

/// Attach a user-facing failure message to a gateway result
pub(crate) trait FailureContext<T> {
    fn or_fail(self, message: &'static str) -> Result<T, ClientError>;
}

impl<T> FailureContext<T> for GatewayResult<T> {
    fn or_fail(self, message: &'static str) -> Result<T, ClientError> {
        self.map_err(|source| {
            tracing::warn!("{}: {}", message, source);
            ClientError::failed(message, source)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_failed_error_shows_generic_message() {
        let err = ClientError::failed(
            "Failed to save household",
            GatewayError::Server {
                status: 500,
                message: "disk full".to_string(),
            },
        );

        assert_eq!(err.to_string(), "Failed to save household");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("Server error 500: disk full".to_string())
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: ClientError = ValidationError::EmptyName.into();
        assert_eq!(err.to_string(), "Name is required");
        assert!(err.is_validation());
    }
}
