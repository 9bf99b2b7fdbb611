//! Error types for the provider gateway.

use std::time::Duration;
use thiserror::Error;

/// Additional context from provider errors for debugging.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// HTTP status code from the provider.
    pub http_status: Option<u16>,
    /// Provider-specific error code (e.g. "rate_limit_exceeded").
    pub provider_code: Option<String>,
    /// Request ID from provider (x-request-id header).
    pub request_id: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }
}

/// Errors that can occur when calling providers.
///
/// Any of these is fatal to the trial it occurs in; the orchestrator does not
/// retry. Variants are kept fine-grained so the caller can tell a missing
/// credential from an unavailable model when deciding what to tell the user.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Rate limited / quota exhausted by the provider.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        retry_after: Duration,
        context: Option<ErrorContext>,
    },

    /// Authentication rejected by the provider (401/403).
    #[error("authentication failed: {message}")]
    Auth {
        message: String,
        context: Option<ErrorContext>,
    },

    /// The requested model is not available on this provider.
    #[error("model not available: {model}")]
    ModelUnavailable {
        model: String,
        context: Option<ErrorContext>,
    },

    /// Invalid request - the provider rejected the payload.
    #[error("invalid request: {message}")]
    InvalidRequest {
        message: String,
        context: Option<ErrorContext>,
    },

    /// The response arrived but did not have the expected shape.
    ///
    /// This is deliberately an error rather than an empty answer: a provider
    /// response with no extractable text usually masks a provider-side
    /// failure, and treating it as "blank but valid" would present a broken
    /// trial as a real comparison.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Any other provider-side error.
    #[error("{provider} error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
        context: Option<ErrorContext>,
    },

    /// Request exceeded its deadline.
    #[error("timeout after {0:?}")]
    Timeout(Duration, Option<ErrorContext>),

    /// HTTP/network error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error (missing API key, etc.).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Create a rate limited error.
    pub fn rate_limited(retry_after: Duration, context: ErrorContext) -> Self {
        Self::RateLimited {
            retry_after,
            context: Some(context),
        }
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Auth {
            message: message.into(),
            context: Some(context),
        }
    }

    /// Create a model-unavailable error.
    pub fn model_unavailable(model: impl Into<String>, context: ErrorContext) -> Self {
        Self::ModelUnavailable {
            model: model.into(),
            context: Some(context),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            context: None,
        }
    }

    /// Create a provider error.
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
            context: None,
        }
    }

    /// Create a provider error with context.
    pub fn provider_with_context(
        provider: &'static str,
        message: impl Into<String>,
        context: ErrorContext,
    ) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
            context: Some(context),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Get a short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limited",
            Self::Auth { .. } => "auth_failed",
            Self::ModelUnavailable { .. } => "model_unavailable",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Provider { .. } => "provider_error",
            Self::Timeout(_, _) => "timeout",
            Self::Http(_) => "http_error",
            Self::Config(_) => "config_error",
        }
    }

    /// User-facing remediation hint, when there is an obvious one.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) | Self::Auth { .. } => {
                Some("API credential is missing or rejected; check OPENROUTER_API_KEY")
            }
            Self::ModelUnavailable { .. } => {
                Some("model not available; check the configured model identifiers")
            }
            Self::RateLimited { .. } => Some("provider rate limit hit; wait and retry the trial"),
            _ => None,
        }
    }

    /// Get the error context if available.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::RateLimited { context, .. } => context.as_ref(),
            Self::Auth { context, .. } => context.as_ref(),
            Self::ModelUnavailable { context, .. } => context.as_ref(),
            Self::InvalidRequest { context, .. } => context.as_ref(),
            Self::Provider { context, .. } => context.as_ref(),
            Self::Timeout(_, context) => context.as_ref(),
            Self::MalformedResponse(_) | Self::Http(_) | Self::Config(_) => None,
        }
    }

    /// Get the request ID if available.
    pub fn request_id(&self) -> Option<&str> {
        self.context().and_then(|c| c.request_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ProviderError::config("x").code(), "config_error");
        assert_eq!(
            ProviderError::auth("denied", ErrorContext::new()).code(),
            "auth_failed"
        );
        assert_eq!(
            ProviderError::model_unavailable("openai/o3", ErrorContext::new()).code(),
            "model_unavailable"
        );
        assert_eq!(
            ProviderError::MalformedResponse("no choices".into()).code(),
            "malformed_response"
        );
    }

    #[test]
    fn remediation_distinguishes_credential_from_model() {
        let auth = ProviderError::auth("denied", ErrorContext::new());
        assert!(auth.remediation().unwrap().contains("credential"));

        let model = ProviderError::model_unavailable("openai/o3", ErrorContext::new());
        assert!(model.remediation().unwrap().contains("model"));

        let malformed = ProviderError::MalformedResponse("no choices".into());
        assert!(malformed.remediation().is_none());
    }

    #[test]
    fn context_is_reachable_through_variants() {
        let err = ProviderError::rate_limited(
            Duration::from_secs(60),
            ErrorContext::new().with_status(429).with_request_id("abc"),
        );
        assert_eq!(err.context().unwrap().http_status, Some(429));
        assert_eq!(err.request_id(), Some("abc"));
    }
}
