use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::timestamp;

/// A payment issued against a contract.
///
/// Amounts are decimals, never `f64`. They encode as decimal strings and
/// decode from either strings or JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    pub amount: Decimal,
    #[serde(with = "timestamp::required")]
    pub date_of_issuance: OffsetDateTime,
    /// Index of the issuing signatory in the contract's signatory list.
    pub issuer: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn amount_decodes_from_number_and_string() {
        let p: Payment = serde_json::from_str(
            r#"{"Amount":1250.5,"DateOfIssuance":"2018-07-01T00:00:00Z","Issuer":0}"#,
        )
        .unwrap();
        assert_eq!(p.amount, Decimal::from_str("1250.5").unwrap());

        let p: Payment = serde_json::from_str(
            r#"{"Amount":"1250.50","DateOfIssuance":"2018-07-01T00:00:00Z","Issuer":1}"#,
        )
        .unwrap();
        assert_eq!(p.amount, Decimal::from_str("1250.50").unwrap());
        assert_eq!(p.issuer, 1);
    }

    #[test]
    fn amount_encodes_as_string() {
        let p = Payment {
            amount: Decimal::from_str("99.90").unwrap(),
            date_of_issuance: time::macros::datetime!(2018-07-01 00:00 UTC),
            issuer: 0,
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["Amount"], "99.90");
    }
}
