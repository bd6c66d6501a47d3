//! Shaping of raw answers into [`DnsRecord`]s.
//!
//! - TXT character-strings are joined into one logical string
//! - MX answers carry their preference as `priority`
//! - Hostnames lose their trailing root-label dot
//! - At most `cap` records are kept; a truncation marker follows if more arrived

use log::warn;

use super::transport::{RawAnswer, RawData};
use super::types::{DnsRecord, RecordType};

/// Converts raw answers for `host`/`record_type` into records, in answer order.
pub(crate) fn shape_answers(
    host: &str,
    record_type: RecordType,
    answers: Vec<RawAnswer>,
    cap: usize,
) -> Vec<DnsRecord> {
    let total = answers.len();
    let mut records: Vec<DnsRecord> = answers
        .into_iter()
        .take(cap)
        .map(|answer| shape_answer(host, record_type, answer))
        .collect();

    if total > cap {
        warn!(
            "DNS response truncated for {}/{}: {} records, keeping {}",
            host, record_type, total, cap
        );
        records.push(DnsRecord::truncation_marker(record_type, host, cap));
    }

    records
}

fn shape_answer(host: &str, record_type: RecordType, answer: RawAnswer) -> DnsRecord {
    match answer.data {
        RawData::Address(ip) => DnsRecord::answer(record_type, host, ip.to_string(), answer.ttl),
        RawData::Name(target) => {
            DnsRecord::answer(record_type, host, strip_root_dot(&target), answer.ttl)
        }
        RawData::Mx {
            preference,
            exchange,
        } => DnsRecord::answer(record_type, host, strip_root_dot(&exchange), answer.ttl)
            .with_priority(preference),
        RawData::Txt(chunks) => {
            let value: String = chunks
                .iter()
                .map(|chunk| String::from_utf8_lossy(chunk))
                .collect();
            DnsRecord::answer(record_type, host, value, answer.ttl)
        }
    }
}

fn strip_root_dot(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_string()
}
