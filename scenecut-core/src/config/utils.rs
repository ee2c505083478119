//! Configuration utility functions
//!
//! This module provides helper functions for reading configuration
//! values from environment variables.

/// Get a f64 value from an environment variable or use the default
pub fn get_env_f64(key: &str, default: f64) -> f64 {
    match std::env::var(key) {
        Ok(val) => val.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable value '{}' for {}", val, key);
            default
        }),
        Err(_) => default,
    }
}

/// Get a usize value from an environment variable or use the default
pub fn get_env_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unparsable value '{}' for {}", val, key);
            default
        }),
        Err(_) => default,
    }
}

/// Get an optional usize from an environment variable; unset or unparsable means `None`
pub fn get_env_optional_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|val| val.parse().ok())
}
