//! Input security.
//!
//! This module guards every lookup before it reaches the network:
//! - Query-name validation (RFC-1035 shape, underscore service labels)
//! - SSRF policy (internal TLDs, `localhost`, non-public IP literals)
//! - Sanitizing of upstream error messages

mod ip;
mod name_policy;
mod sanitize;

pub use ip::is_public_ip;
pub use name_policy::{check_query_name, check_whois_name, is_blocked_name, is_valid_domain};
pub use sanitize::sanitize_error_message;
