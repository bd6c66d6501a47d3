//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    CNAME_DEPTH_LIMIT, DEFAULT_NAMESERVERS, DNS_LIFETIME, DNS_TIMEOUT, MAX_CONCURRENT_QUERIES,
    MAX_RECORDS_PER_TYPE,
};
use crate::decision::Intent;
use crate::dns::RecordType;
use crate::snapshot::Section;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Immutable resolver configuration shared by every query of a process.
///
/// Built once and handed to [`crate::ResolverClient`] at construction; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Upstream recursive resolvers
    pub nameservers: Vec<IpAddr>,
    /// Per-server query timeout
    pub timeout: Duration,
    /// Hard lifetime of one query
    pub lifetime: Duration,
    /// Records kept per query before truncation
    pub max_records_per_type: usize,
    /// CNAME hops followed before a chain counts as broken
    pub cname_depth_limit: usize,
    /// Snapshot sub-queries in flight at once
    pub max_concurrent_queries: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            nameservers: DEFAULT_NAMESERVERS.to_vec(),
            timeout: DNS_TIMEOUT,
            lifetime: DNS_LIFETIME,
            max_records_per_type: MAX_RECORDS_PER_TYPE,
            cname_depth_limit: CNAME_DEPTH_LIMIT,
            max_concurrent_queries: MAX_CONCURRENT_QUERIES,
        }
    }
}

impl ResolverSettings {
    /// Replaces zero durations, zero limits and an empty nameserver list with
    /// the defaults, so a query can never run without a deadline.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            nameservers: if self.nameservers.is_empty() {
                defaults.nameservers
            } else {
                self.nameservers
            },
            timeout: non_zero(self.timeout, defaults.timeout),
            lifetime: non_zero(self.lifetime, defaults.lifetime),
            max_records_per_type: if self.max_records_per_type == 0 {
                defaults.max_records_per_type
            } else {
                self.max_records_per_type
            },
            cname_depth_limit: if self.cname_depth_limit == 0 {
                defaults.cname_depth_limit
            } else {
                self.cname_depth_limit
            },
            max_concurrent_queries: self.max_concurrent_queries.max(1),
        }
    }
}

fn non_zero(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

/// Library configuration (no CLI dependencies).
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Resolver settings
    pub resolver: ResolverSettings,

    /// Rules document; the built-in rules are used when absent
    pub rules_path: Option<PathBuf>,

    /// Whether `www.<domain>` is looked up alongside the root
    pub include_www: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            resolver: ResolverSettings::default(),
            rules_path: None,
            include_www: true,
        }
    }
}

/// Command-line options.
#[derive(Debug, Parser)]
#[command(
    name = "dns_diagnostic",
    about = "Checks a domain's DNS against a hosting platform's requirements and prints an action plan as JSON."
)]
pub struct Opt {
    /// Domain to analyze
    #[arg(long)]
    pub domain: String,

    /// Target platform (id or alias)
    #[arg(long, default_value = "attractwell")]
    pub platform: String,

    /// The domain has external dependencies or services
    #[arg(long = "has-external")]
    pub has_external_dependencies: bool,

    /// Email is managed by the platform
    #[arg(long = "email-managed")]
    pub email_managed_by_platform: bool,

    /// The user is comfortable editing DNS
    #[arg(long = "comfortable")]
    pub comfortable_editing_dns: bool,

    /// The user knows their registrar
    #[arg(long)]
    pub registrar_known: bool,

    /// The user wants the platform to manage DNS
    #[arg(long = "delegate-dns")]
    pub delegate_dns_management: bool,

    /// Sections to check: all, web, email, SPF or a record type
    #[arg(long, num_args = 1..)]
    pub sections: Vec<String>,

    /// Rules YAML file (defaults to the built-in rules)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Upstream resolver IP (repeatable)
    #[arg(long = "nameserver")]
    pub nameservers: Vec<IpAddr>,

    /// Per-server DNS timeout in seconds
    #[arg(long, default_value_t = DNS_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Total lifetime of one DNS query in seconds
    #[arg(long, default_value_t = DNS_LIFETIME.as_secs())]
    pub lifetime_secs: u64,

    /// Skip the www.<domain> lookups
    #[arg(long)]
    pub no_www: bool,

    /// Compare cached and authoritative answers for this record type instead of diagnosing
    #[arg(long, value_name = "TYPE")]
    pub trace: Option<RecordType>,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Library configuration described by these options.
    pub fn config(&self) -> Config {
        Config {
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            resolver: ResolverSettings {
                nameservers: self.nameservers.clone(),
                timeout: Duration::from_secs(self.timeout_secs),
                lifetime: Duration::from_secs(self.lifetime_secs),
                ..ResolverSettings::default()
            }
            .sanitized(),
            rules_path: self.rules.clone(),
            include_www: !self.no_www,
        }
    }

    /// Caller intent described by these options.
    pub fn intent(&self) -> Intent {
        let queried_sections = if self.sections.is_empty() {
            None
        } else {
            Some(self.sections.iter().map(|s| Section::parse(s)).collect())
        };
        Intent {
            has_external_dependencies: self.has_external_dependencies,
            email_managed_by_platform: self.email_managed_by_platform,
            comfortable_editing_dns: self.comfortable_editing_dns,
            registrar_known: self.registrar_known,
            delegate_dns_management: self.delegate_dns_management,
            queried_sections,
        }
    }
}
