//! Error types for port operations.

/// Failures of an option provider.
///
/// The resolver never propagates these: they end up as the message of a
/// `Failed` stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Network or service failure; worth retrying.
    #[error("Option provider unavailable: {0}")]
    Unavailable(String),

    /// An attempt exceeded its time budget.
    #[error("Option provider timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The service refused the request (bad context, unknown stage, 4xx).
    #[error("Option request rejected: {0}")]
    Rejected(String),

    /// The service answered with something that is not an option list.
    #[error("Invalid option response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn unavailable(message: impl ToString) -> Self {
        Self::Unavailable(message.to_string())
    }

    pub fn rejected(message: impl ToString) -> Self {
        Self::Rejected(message.to_string())
    }

    pub fn invalid_response(message: impl ToString) -> Self {
        Self::InvalidResponse(message.to_string())
    }

    /// Transient failures are retried; refusals and malformed payloads are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout { .. })
    }
}

/// Commerce API errors with enough context for logs and retry decisions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommerceError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("Commerce request failed: {0}")]
    RequestFailed(String),

    /// The service answered with a non-success status.
    #[error("Commerce API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The body could not be decoded.
    #[error("Invalid commerce response: {0}")]
    InvalidResponse(String),

    /// Client-side configuration problem (e.g. unusable base URL).
    #[error("Commerce client misconfigured: {0}")]
    Config(String),
}

impl CommerceError {
    pub fn api(status: u16, message: impl ToString) -> Self {
        Self::Api {
            status,
            message: message.to_string(),
        }
    }

    /// Text to show the shopper: the service's own message when it refused
    /// the request, a generic line when it could not be reached.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::RequestFailed(_) | Self::InvalidResponse(_) | Self::Config(_) => {
                "The store could not be reached, please try again".to_string()
            }
        }
    }

    /// Server-side failures and throttling are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidResponse(_) | Self::Config(_) => false,
        }
    }
}

impl From<CommerceError> for ProviderError {
    fn from(err: CommerceError) -> Self {
        match err {
            e if e.is_transient() => Self::Unavailable(e.to_string()),
            CommerceError::InvalidResponse(message) => Self::InvalidResponse(message),
            e => Self::Rejected(e.to_string()),
        }
    }
}
