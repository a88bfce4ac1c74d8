//! Message Normalization and Ordering
//!
//! Turns raw manifest records into normalized messages and orders them:
//! newest first when both records carry a parseable timestamp, by filename
//! otherwise. Pairs where exactly one side has a timestamp keep their
//! input order, which the stable sort guarantees for an Equal comparison.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Ordering;

use super::model::{Manifest, Message};

/// Normalize every record of a manifest, preserving input order
pub fn normalize(manifest: &Manifest) -> Vec<Message> {
    manifest.messages.iter().map(Message::from_raw).collect()
}

/// Sort messages in place with the manifest ordering rules (stable)
pub fn sort(messages: &mut [Message]) {
    messages.sort_by(compare);
}

/// Manifest ordering comparator.
///
/// Both timestamps parse: newest first. Neither record has a timestamp:
/// filename ascending. Anything else (one-sided timestamp, unparseable
/// date): Equal, so the stable sort keeps input order.
pub fn compare(a: &Message, b: &Message) -> Ordering {
    match (a.timestamp.as_deref(), b.timestamp.as_deref()) {
        (Some(ta), Some(tb)) => match (parse_timestamp(ta), parse_timestamp(tb)) {
            (Some(da), Some(db)) => db.cmp(&da),
            _ => Ordering::Equal,
        },
        (None, None) => a.filename.cmp(&b.filename),
        _ => Ordering::Equal,
    }
}

/// Parse an ISO-ish timestamp string.
///
/// Accepts RFC 3339, a naive datetime with or without the `T` separator,
/// and a bare date (taken as midnight). Naive values are read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
