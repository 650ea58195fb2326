//! Dividend deduplication and aggregation over [`DividendRecord`]s.
//!
//! [`DividendRecord`]: crate::models::DividendRecord

mod aggregate;
mod dedupe;

pub use aggregate::*;
pub use dedupe::*;
