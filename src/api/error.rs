//! Errors crossing the external HTTP boundary.

use thiserror::Error;

/// Shown for a rejection whose body yielded no usable reason
pub const GENERIC_REJECTION: &str = "Something went wrong while sending. Please try again.";

/// Shown when the endpoint could not be reached at all
pub const GENERIC_NETWORK: &str = "Network error. Check your connection and try again.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The endpoint answered with a non-success status
    #[error("rejected (HTTP {status}): {reason}")]
    Rejected { status: u16, reason: String },

    /// The request never completed (DNS, connect, TLS, timeout)
    #[error("network error: {message}")]
    Network { message: String },

    /// An attachment could not be read off disk
    #[error("cannot read attachment {path}: {message}")]
    Attachment { path: String, message: String },
}

impl ApiError {
    pub fn rejected(status: u16, reason: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network {
            message: message.into(),
        }
    }

    pub fn attachment(path: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Attachment {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The message surfaced to the person filling in the form.
    ///
    /// Rejection reasons come from the endpoint and are shown as-is;
    /// transport problems collapse to a generic connectivity message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { reason, .. } => reason.clone(),
            ApiError::Network { .. } => GENERIC_NETWORK.to_string(),
            ApiError::Attachment { path, .. } => {
                format!("Could not read attachment: {path}")
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_surfaces_its_reason() {
        let err = ApiError::rejected(422, "Invalid email");
        assert_eq!(err.user_message(), "Invalid email");
        assert_eq!(err.to_string(), "rejected (HTTP 422): Invalid email");
    }

    #[test]
    fn test_network_collapses_to_generic_message() {
        let err = ApiError::network("dns error for formspree.io");
        assert_eq!(err.user_message(), GENERIC_NETWORK);
    }

    #[test]
    fn test_attachment_names_the_file() {
        let err = ApiError::attachment("/tmp/plan.pdf", "permission denied");
        assert!(err.user_message().contains("/tmp/plan.pdf"));
    }
}
