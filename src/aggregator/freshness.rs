//! Newest-first ordering of feed entries.
//!
//! Providers disagree on date formats: the JSON APIs send RFC 3339, RSS
//! sends RFC 2822, and some entries carry nothing at all. Anything that
//! does not parse sorts after every dated entry, as do error sentinels.

use crate::models::FeedEntry;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::cmp::Reverse;

/// Parse a provider timestamp into UTC.
///
/// Accepts RFC 3339, RFC 2822, an ISO 8601 timestamp without offset
/// (taken as UTC) and a bare `YYYY-MM-DD` date.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// Sort newest first. Stable, so entries with equal (or no) dates keep
/// their provider order, and sorting twice changes nothing.
pub fn sort_by_freshness(entries: &mut [FeedEntry]) {
    entries.sort_by_cached_key(|entry| Reverse(entry.published_date().and_then(parse_published)));
}
