//! Error types.
//!
//! Cache operations themselves never fail: absent keys are reported as
//! `None`, and missing publish directives are handled as a renewal policy.
//! The only fallible surface is building a configuration from untrusted
//! input.

/// Errors raised while validating a cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A capacity of zero slots was requested.
    #[error("cache capacity must be at least one slot")]
    ZeroCapacity,
}
