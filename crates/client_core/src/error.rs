//! Failure modes of the portal client. Local validation problems and backend
//! failures share one type so callers can surface either the same way.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortalError {
    /// A required input field was blank; no request is issued for these.
    #[error("the {0} field is empty")]
    EmptyInput(&'static str),

    #[error("no document is currently loaded")]
    NoActiveDocument,

    #[error("no deletion is awaiting confirmation")]
    NoPendingDelete,

    /// A `{0}` call is still running; the new operation was not started.
    #[error("a {0} operation is already in flight")]
    OperationInFlight(&'static str),

    #[error("request to {endpoint} failed")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unusable response from {endpoint}: {reason}")]
    InvalidPayload { endpoint: String, reason: String },
}

impl PortalError {
    pub fn http(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub fn invalid_payload(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// One-line text suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            PortalError::EmptyInput(field) => {
                format!("Please fill in the {field} before continuing.")
            }
            PortalError::Http { endpoint, source } => {
                format!("The server request to {endpoint} failed: {source}.")
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_message_names_the_field() {
        let err = PortalError::EmptyInput("Gherkin scenarios");
        assert!(err.user_message().contains("Gherkin scenarios"));
    }

    #[test]
    fn invalid_payload_message_names_the_endpoint() {
        let err = PortalError::invalid_payload("/api/documentos", "missing id");
        let message = err.user_message();
        assert!(message.contains("/api/documentos"));
        assert!(message.contains("missing id"));
    }
}
