//! DNS resolver initialization.
//!
//! This module builds hickory resolvers from [`ResolverSettings`]: one shared
//! resolver pointed at the configured recursive nameservers, and one-shot
//! resolvers pointed at a single authoritative server.

use std::net::IpAddr;
use std::sync::Arc;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::{ResolverSettings, DNS_PORT};
use crate::error_handling::InitializationError;

fn resolver_opts(settings: &ResolverSettings) -> ResolverOpts {
    let mut opts = ResolverOpts::default();
    opts.timeout = settings.timeout;
    opts.attempts = 1; // No retry policy; one attempt per server
    opts.ndots = 0; // Never append search domains
    opts.use_hosts_file = false;
    opts.cache_size = 0; // Every lookup goes to the network
    opts
}

/// Initializes the shared resolver used for cached lookups.
///
/// Queries go to `settings.nameservers` over UDP/TCP port 53 with the
/// configured per-server timeout. The total lifetime of a query is enforced by
/// the caller's deadline, not here.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if no nameserver is
/// configured.
pub fn init_resolver(
    settings: &ResolverSettings,
) -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    if settings.nameservers.is_empty() {
        return Err(InitializationError::DnsResolverError(
            "no nameservers configured".to_string(),
        ));
    }

    let group = NameServerConfigGroup::from_ips_clear(&settings.nameservers, DNS_PORT, true);
    let config = ResolverConfig::from_parts(None, vec![], group);

    Ok(Arc::new(TokioAsyncResolver::tokio(
        config,
        resolver_opts(settings),
    )))
}

/// Builds a one-shot resolver that only talks to `server`.
///
/// Used for authoritative lookups, which must be sent to a nameserver IP.
pub fn init_direct_resolver(server: IpAddr, settings: &ResolverSettings) -> TokioAsyncResolver {
    let group = NameServerConfigGroup::from_ips_clear(&[server], DNS_PORT, true);
    let config = ResolverConfig::from_parts(None, vec![], group);
    TokioAsyncResolver::tokio(config, resolver_opts(settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_resolver_with_defaults() {
        let settings = ResolverSettings::default();
        assert!(init_resolver(&settings).is_ok());
    }

    #[tokio::test]
    async fn test_init_resolver_rejects_empty_nameservers() {
        let settings = ResolverSettings {
            nameservers: vec![],
            ..ResolverSettings::default()
        };
        assert!(matches!(
            init_resolver(&settings),
            Err(InitializationError::DnsResolverError(_))
        ));
    }

    #[test]
    fn test_resolver_opts_follow_settings() {
        let settings = ResolverSettings::default();
        let opts = resolver_opts(&settings);
        assert_eq!(opts.timeout, settings.timeout);
        assert_eq!(opts.attempts, 1);
        assert_eq!(opts.ndots, 0);
        assert_eq!(opts.cache_size, 0);
        assert!(!opts.use_hosts_file);
    }
}
