use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DataSource, DividendRecord};

/// Bank account linked through Open Finance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenFinanceAccount {
    pub id: String,
    pub institution: String,
    pub kind: String,
    pub balance: f64,
}

/// Investment position reported by a linked institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenFinanceInvestment {
    pub id: String,
    pub institution: String,
    pub name: String,
    pub kind: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenFinanceTransaction {
    pub id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub kind: String,
}

const EARNING_KINDS: [&str; 5] = [
    "dividend",
    "dividendo",
    "jcp",
    "rendimento",
    "juros sobre capital",
];

impl OpenFinanceTransaction {
    pub fn is_earning(&self) -> bool {
        let kind = self.kind.trim().to_lowercase();
        EARNING_KINDS.iter().any(|k| kind.contains(k))
    }

    /// Convert an earning credit into a dividend record. Debits and
    /// non-earning transactions yield `None`.
    pub fn to_dividend(&self) -> Option<DividendRecord> {
        if !self.is_earning() || self.amount <= 0.0 {
            return None;
        }
        Some(
            DividendRecord::new(
                self.description.trim(),
                self.date.format("%Y-%m-%d").to_string(),
                self.amount,
                DataSource::OpenFinance,
            )
            .with_kind(self.kind.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(kind: &str, amount: f64) -> OpenFinanceTransaction {
        OpenFinanceTransaction {
            id: "t1".to_string(),
            account_id: "a1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            description: " ITSA4 ".to_string(),
            amount,
            kind: kind.to_string(),
        }
    }

    #[test]
    fn earning_credit_becomes_open_finance_dividend() {
        let record = tx("Dividendo", 42.5).to_dividend().unwrap();
        assert_eq!(record.asset, "ITSA4");
        assert_eq!(record.payment_date, "2024-03-05");
        assert_eq!(record.value, 42.5);
        assert_eq!(record.kind, "Dividendo");
        assert_eq!(record.source, DataSource::OpenFinance);
    }

    #[test]
    fn non_earnings_and_debits_are_ignored() {
        assert!(tx("PIX", 42.5).to_dividend().is_none());
        assert!(tx("JCP", -1.0).to_dividend().is_none());
    }
}
