//! Resolver error categorization.
//!
//! Maps hickory resolver failures onto [`TransportError`] so the rest of the
//! crate never depends on hickory's error shapes.

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;

use super::types::TransportError;

/// Categorizes a `ResolveError` into a `TransportError`.
///
/// NXDOMAIN is reported through `NoRecordsFound` with a response code, so that
/// case is inspected before falling back to "no records".
pub fn categorize_resolve_error(error: &ResolveError) -> TransportError {
    match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            if *response_code == ResponseCode::NXDomain {
                TransportError::NxDomain
            } else {
                TransportError::NoRecords
            }
        }
        ResolveErrorKind::Timeout => TransportError::Timeout,
        _ => TransportError::Failed(error.to_string()),
    }
}
