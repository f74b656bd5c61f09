//! Required application secrets.
//!
//! Three values must be present before anything is rendered: the Gemini API
//! key, the shared access code, and the checkout URL. They are loaded once
//! at startup and never change afterwards. Loading reports every missing or
//! invalid key at once instead of stopping at the first.

use std::fmt;

use reqwest::Url;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::{ConfigError, ConfigErrors};

/// Credential for the generation API.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Plaintext gate secret.
pub const ACCESS_CODE: &str = "ACCESS_CODE";
/// External checkout destination.
pub const WHOP_URL: &str = "WHOP_URL";

/// Every key that must be set, in the order errors are reported.
pub const REQUIRED_KEYS: [&str; 3] = [GOOGLE_API_KEY, ACCESS_CODE, WHOP_URL];

/// API key for the generation service. Zeroized on drop, redacted in `Debug`.
#[derive(Clone)]
pub struct ApiKey(Zeroizing<String>);

impl ApiKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(Zeroizing::new(key.into()))
    }

    /// The raw key, for placing in a request header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([redacted])")
    }
}

/// The shared access code gating the tool view.
///
/// Comparison is exact byte equality, done in constant time.
#[derive(Clone)]
pub struct AccessCode(Zeroizing<String>);

impl AccessCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(Zeroizing::new(code.into()))
    }

    /// Whether `candidate` is byte-for-byte equal to the configured code.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessCode([redacted])")
    }
}

/// Immutable application configuration shared by every session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Credential for the generation API.
    pub google_api_key: ApiKey,
    /// Gate secret compared against login attempts.
    pub access_code: AccessCode,
    /// Where the "get access" button sends the user.
    pub checkout_url: Url,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigErrors`] naming each required key that is missing,
    /// blank, or unusable.
    pub fn from_env() -> Result<Self, ConfigErrors> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Values consisting only of whitespace count as missing. The access
    /// code itself is kept exactly as given, surrounding whitespace included.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigErrors`] naming each required key that is missing,
    /// blank, or unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigErrors>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();

        let mut required = |key: &'static str| -> Option<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Some(value),
                _ => {
                    errors.push(ConfigError::Missing { key });
                    None
                }
            }
        };

        let api_key = required(GOOGLE_API_KEY);
        let access_code = required(ACCESS_CODE);
        let checkout = required(WHOP_URL);

        let checkout_url = checkout.and_then(|raw| match parse_checkout_url(raw.trim()) {
            Ok(url) => Some(url),
            Err(reason) => {
                errors.push(ConfigError::Invalid {
                    key: WHOP_URL,
                    reason,
                });
                None
            }
        });

        match (api_key, access_code, checkout_url) {
            (Some(api_key), Some(access_code), Some(checkout_url)) if errors.is_empty() => {
                Ok(Self {
                    google_api_key: ApiKey::new(api_key),
                    access_code: AccessCode::new(access_code),
                    checkout_url,
                })
            }
            _ => Err(ConfigErrors(errors)),
        }
    }
}

fn parse_checkout_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("expected an http(s) URL, got scheme '{other}'")),
    }
}
