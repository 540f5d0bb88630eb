//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `LIFTMOSQUE_MISSING_PROFILE_POLICY` - What to do when an authenticated
//!   identity has no profile document: `grant_global_admin` (default, matches
//!   the historical behavior) or `deny` (sign the credential back out).

use std::str::FromStr;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Policy applied when a signed-in identity has no profile document.
///
/// Granting global admin is a bootstrap convenience but also a privilege
/// escalation hazard if a profile write ever fails silently, so the choice
/// is configuration, not a hard-wired default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingProfilePolicy {
    /// Treat the identity as an unrestricted global administrator.
    #[default]
    GrantGlobalAdmin,
    /// Refuse the session: the credential is signed back out and the
    /// sign-in fails with an access-denied error.
    Deny,
}

impl FromStr for MissingProfilePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grant_global_admin" => Ok(Self::GrantGlobalAdmin),
            "deny" => Ok(Self::Deny),
            other => Err(format!(
                "expected 'grant_global_admin' or 'deny', got {other:?}"
            )),
        }
    }
}

/// Console core configuration.
#[derive(Debug, Clone, Default)]
pub struct ConsoleConfig {
    /// Policy for identities without a profile document.
    pub missing_profile_policy: MissingProfilePolicy,
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let missing_profile_policy =
            match get_optional_env("LIFTMOSQUE_MISSING_PROFILE_POLICY") {
                Some(raw) => raw.parse().map_err(|e| {
                    ConfigError::InvalidEnvVar("LIFTMOSQUE_MISSING_PROFILE_POLICY".to_owned(), e)
                })?,
                None => MissingProfilePolicy::default(),
            };

        Ok(Self {
            missing_profile_policy,
        })
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "grant_global_admin".parse::<MissingProfilePolicy>().unwrap(),
            MissingProfilePolicy::GrantGlobalAdmin
        );
        assert_eq!(
            " DENY ".parse::<MissingProfilePolicy>().unwrap(),
            MissingProfilePolicy::Deny
        );
        assert!("allow".parse::<MissingProfilePolicy>().is_err());
    }

    #[test]
    fn test_default_policy_grants_global_admin() {
        let config = ConsoleConfig::default();
        assert_eq!(
            config.missing_profile_policy,
            MissingProfilePolicy::GrantGlobalAdmin
        );
    }
}
