//! Error types for `pitchdeck-core`.
//!
//! Each error variant carries enough context to show the user (or the
//! operator, for configuration problems) what went wrong. Secret values are
//! never included; only the name of the key that was missing or invalid.

use std::fmt;

/// A single problem with one configuration key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required key is absent or blank.
    #[error("missing required setting `{key}`")]
    Missing { key: &'static str },

    /// A key is present but its value cannot be used.
    #[error("invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    /// The configuration key this error refers to.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Missing { key } | Self::Invalid { key, .. } => key,
        }
    }
}

/// Every configuration problem found during one load, in key order.
///
/// Loading never stops at the first bad key, so the operator sees the full
/// list in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrors(pub Vec<ConfigError>);

impl ConfigErrors {
    /// Individual errors, one per offending key.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.0
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration error")?;
        for err in &self.0 {
            write!(f, "\n  - {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}

/// Errors from the access-code gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// The submitted code does not match. Deliberately generic.
    #[error("Invalid code. Please check your checkout receipt.")]
    InvalidCredential,
}

/// Reasons a pitch form submission is rejected before any generation call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Product name is empty.
    #[error("Product name is required.")]
    MissingProductName,

    /// Key features are empty.
    #[error("Key features are required.")]
    MissingKeyFeatures,

    /// The tone label is not one of the offered options.
    #[error("unknown tone '{label}'")]
    UnknownTone { label: String },
}

/// Errors from the text-generation API.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The API answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never completed (DNS, TLS, connection reset).
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not the expected JSON shape.
    #[error("failed to decode generation response: {0}")]
    Decode(String),

    /// The model refused the prompt.
    #[error("prompt blocked by the model: {reason}")]
    Blocked { reason: String },

    /// The model returned no text.
    #[error("the model returned no text")]
    Empty,

    /// The request was abandoned before the model answered.
    #[error("generation was cancelled before the model answered; please submit again")]
    Cancelled,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_list_every_key() {
        let errs = ConfigErrors(vec![
            ConfigError::Missing { key: "GOOGLE_API_KEY" },
            ConfigError::Missing { key: "WHOP_URL" },
        ]);
        let text = errs.to_string();
        assert!(text.contains("`GOOGLE_API_KEY`"));
        assert!(text.contains("`WHOP_URL`"));
        assert!(!text.contains("ACCESS_CODE"));
        assert_eq!(errs.errors()[1].key(), "WHOP_URL");
    }

    #[test]
    fn api_error_displays_remote_message_verbatim() {
        let err = GenerationError::Api {
            status: 429,
            message: "quota exceeded".to_owned(),
        };
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
