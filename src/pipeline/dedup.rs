use std::collections::HashSet;

use crate::models::ProxyRecord;

/// Collapse records sharing a dedup key, keeping the first one seen.
///
/// Returns the surviving records in input order and how many were dropped.
/// Running it again on its own output drops nothing.
pub fn dedup(records: Vec<ProxyRecord>) -> (Vec<ProxyRecord>, usize) {
    let mut seen = HashSet::with_capacity(records.len());
    let total = records.len();

    let kept: Vec<ProxyRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.dedup_key.clone()))
        .collect();

    let dropped = total - kept.len();
    (kept, dropped)
}
