//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use log::SetLoggerError;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::security::sanitize_error_message;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),

    /// Error loading the rules document.
    #[error("Rules initialization error: {0}")]
    RulesError(#[from] RulesError),
}

/// Failure of a single resolver operation.
///
/// Lookup failures are data, not exceptions: they travel inside
/// [`crate::DnsRecord`] and [`crate::WhoisRecord`] values so one failing
/// query never aborts a snapshot. Messages are already sanitized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The name failed syntactic validation.
    #[error("Invalid domain format")]
    InvalidDomain,

    /// The name is blocked before any network I/O.
    #[error("Domain not allowed")]
    NotAllowed,

    /// No answer before the deadline.
    #[error("DNS lookup timed out")]
    Timeout,

    /// The queried name does not exist.
    #[error("Domain does not exist")]
    NxDomain,

    /// No authoritative nameserver could be found or reached.
    #[error("Could not find authoritative nameservers")]
    NoAuthoritativeNameservers,

    /// The direct query against an authoritative server failed.
    #[error("Direct lookup failed: {0}")]
    DirectLookupFailed(String),

    /// WHOIS could not be queried at all.
    #[error("WHOIS lookup unavailable")]
    WhoisUnavailable,

    /// Any other upstream failure.
    #[error("{0}")]
    Upstream(String),
}

impl LookupError {
    /// Builds an upstream failure from a raw message, sanitizing it first.
    pub fn upstream(message: impl AsRef<str>) -> Self {
        LookupError::Upstream(sanitize_error_message(message.as_ref()))
    }

    /// Builds a direct-lookup failure from a raw message, sanitizing it first.
    pub fn direct(message: impl AsRef<str>) -> Self {
        LookupError::DirectLookupFailed(sanitize_error_message(message.as_ref()))
    }
}

impl Serialize for LookupError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of a raw transport query that produced no usable answer.
///
/// Separates "the name has no data of this type" from real failures so callers
/// can map the first to an empty list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// NXDOMAIN.
    #[error("Domain does not exist")]
    NxDomain,

    /// The name exists but has no records of the requested type.
    #[error("No records found")]
    NoRecords,

    /// The query exceeded its timeout.
    #[error("DNS lookup timed out")]
    Timeout,

    /// Anything else, with the upstream message.
    #[error("{0}")]
    Failed(String),
}

impl From<TransportError> for LookupError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::NxDomain => LookupError::NxDomain,
            TransportError::Timeout => LookupError::Timeout,
            TransportError::NoRecords => LookupError::upstream("No records found"),
            TransportError::Failed(msg) => LookupError::upstream(msg),
        }
    }
}

/// Error types for the rules document.
#[derive(Error, Debug)]
pub enum RulesError {
    /// The rules file could not be read.
    #[error("Failed to read rules file: {0}")]
    Io(#[from] std::io::Error),

    /// The rules YAML is malformed.
    #[error("Failed to parse rules: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The platform id is not defined in the rules.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

/// Errors that abort a whole diagnosis.
#[derive(Error, Debug)]
pub enum DiagnoseError {
    /// The target domain was rejected before any lookup.
    #[error("Invalid target domain: {0}")]
    InvalidTarget(LookupError),

    /// The rules could not answer for the requested platform.
    #[error(transparent)]
    Rules(#[from] RulesError),
}
