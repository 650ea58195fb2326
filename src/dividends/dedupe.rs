use std::collections::HashSet;

use crate::models::DividendRecord;

/// Identity of a payment: asset, verbatim payment date and value.
fn dedupe_key(record: &DividendRecord) -> (String, String, String) {
    (
        record.asset.clone(),
        record.payment_date.clone(),
        record.value.to_string(),
    )
}

/// Drop repeated payments, keeping the first occurrence and input order.
///
/// Records are never filtered on date validity here; a malformed
/// `payment_date` is just part of the key.
pub fn dedupe(records: &[DividendRecord]) -> Vec<DividendRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .filter(|record| seen.insert(dedupe_key(record)))
        .cloned()
        .collect()
}

/// [`dedupe`] over an optional collection; `None` yields an empty result.
pub fn dedupe_opt(records: Option<&[DividendRecord]>) -> Vec<DividendRecord> {
    records.map(dedupe).unwrap_or_default()
}
