//! The contract aggregate and its lifecycle operations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ModelError;
use crate::payment::Payment;
use crate::signatory::{Signatory, SignatoryRole};
use crate::state::{ContractState, StateHeading};
use crate::timestamp;

/// Evidence that one of the contract's signatories signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContractSignature {
    /// Index of the signing party in [`Contract::signatories`].
    pub signatory: usize,
    /// Role held by the signatory when signing.
    #[serde(rename = "StatusOfSignatory")]
    pub role: SignatoryRole,
    #[serde(with = "timestamp::required")]
    pub date_of_signature: OffsetDateTime,
    pub signature_digest: String,
}

/// A bilateral contract, stored as one ledger value.
///
/// State and payment histories are append-only. Signatures and payments
/// reference signatories by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Contract {
    /// Object of the contract.
    pub contract_heading: String,
    #[serde(with = "timestamp::required")]
    pub starting_date: OffsetDateTime,
    #[serde(default, with = "timestamp::optional")]
    pub ending_date: Option<OffsetDateTime>,
    #[serde(default)]
    pub state_records: Vec<ContractState>,
    #[serde(default)]
    pub payment_records: Vec<Payment>,
    #[serde(default)]
    pub signatories: Vec<Signatory>,
    #[serde(default)]
    pub signatures: Vec<ContractSignature>,
}

impl Contract {
    /// Start a contract awaiting signatures.
    ///
    /// The state history begins with one open `WAITING_FOR_SIGNATURE`
    /// record starting at `started_at`.
    pub fn new(
        heading: impl Into<String>,
        signatories: Vec<Signatory>,
        started_at: OffsetDateTime,
    ) -> Result<Self, ModelError> {
        let contract_heading = heading.into();
        if contract_heading.trim().is_empty() {
            return Err(ModelError::EmptyHeading);
        }
        Ok(Contract {
            contract_heading,
            starting_date: started_at,
            ending_date: None,
            state_records: vec![ContractState::open(
                StateHeading::WaitingForSignature,
                started_at,
            )],
            payment_records: Vec::new(),
            signatories,
            signatures: Vec::new(),
        })
    }

    pub fn signatory(&self, index: usize) -> Option<&Signatory> {
        self.signatories.get(index)
    }

    /// The open state record, if any.
    pub fn current_state(&self) -> Option<&ContractState> {
        self.state_records.iter().rev().find(|s| s.is_current())
    }

    pub fn current_heading(&self) -> Option<StateHeading> {
        self.current_state().map(|s| s.heading)
    }

    pub fn signature_for(&self, role: SignatoryRole) -> Option<&ContractSignature> {
        self.signatures.iter().find(|s| s.role == role)
    }

    /// True once every required role has signed exactly once.
    pub fn is_signed(&self) -> bool {
        SignatoryRole::REQUIRED
            .iter()
            .all(|role| self.signatures.iter().filter(|s| s.role == *role).count() == 1)
    }

    /// Sum of all recorded payments.
    pub fn total_paid(&self) -> Decimal {
        self.payment_records.iter().map(|p| p.amount).sum()
    }

    /// Record a signature from the signatory at `index`, using its role tag.
    pub fn sign(
        &mut self,
        index: usize,
        at: OffsetDateTime,
    ) -> Result<&ContractSignature, ModelError> {
        let signatory = self.signatories.get(index).ok_or(ModelError::UnknownSignatory {
            index,
            len: self.signatories.len(),
        })?;
        let role = signatory.role.ok_or(ModelError::MissingRole { index })?;
        if self.signature_for(role).is_some() {
            return Err(ModelError::DuplicateRole { role });
        }
        let signature = ContractSignature {
            signatory: index,
            role,
            date_of_signature: at,
            signature_digest: signatory.digest(),
        };
        self.signatures.push(signature);
        Ok(&self.signatures[self.signatures.len() - 1])
    }

    /// Move the contract to `heading` at time `at`.
    ///
    /// Closes the current state by setting its end timestamp to `at`, then
    /// appends a new open state. Only forward moves are accepted.
    pub fn transition_to(
        &mut self,
        heading: StateHeading,
        at: OffsetDateTime,
    ) -> Result<(), ModelError> {
        let current = self
            .state_records
            .iter_mut()
            .rev()
            .find(|s| s.is_current())
            .ok_or(ModelError::NoStateRecords)?;
        if heading <= current.heading {
            return Err(ModelError::InvalidTransition {
                from: current.heading,
                to: heading,
            });
        }
        if at < current.starting_date {
            return Err(ModelError::TimestampRegression);
        }
        current.ending_date = Some(at);
        self.state_records.push(ContractState::open(heading, at));
        Ok(())
    }

    /// Append a payment issued by the signatory at `issuer`.
    ///
    /// The issue date may not precede the start of the current state.
    pub fn record_payment(
        &mut self,
        amount: Decimal,
        issuer: usize,
        at: OffsetDateTime,
    ) -> Result<(), ModelError> {
        if amount < Decimal::ZERO {
            return Err(ModelError::NegativeAmount {
                index: self.payment_records.len(),
            });
        }
        if issuer >= self.signatories.len() {
            return Err(ModelError::UnknownSignatory {
                index: issuer,
                len: self.signatories.len(),
            });
        }
        if let Some(current) = self.current_state() {
            if at < current.starting_date {
                return Err(ModelError::TimestampRegression);
            }
        }
        self.payment_records.push(Payment {
            amount,
            date_of_issuance: at,
            issuer,
        });
        Ok(())
    }

    /// Check every aggregate invariant.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.contract_heading.trim().is_empty() {
            return Err(ModelError::EmptyHeading);
        }
        if self.state_records.is_empty() {
            return Err(ModelError::NoStateRecords);
        }

        let open = self.state_records.iter().filter(|s| s.is_current()).count();
        if open > 1 {
            return Err(ModelError::OpenStates { count: open });
        }
        for (index, pair) in self.state_records.windows(2).enumerate() {
            if pair[1].starting_date < pair[0].starting_date {
                return Err(ModelError::StatesOutOfOrder { index: index + 1 });
            }
        }

        let len = self.signatories.len();
        for (index, signature) in self.signatures.iter().enumerate() {
            let signatory =
                self.signatories
                    .get(signature.signatory)
                    .ok_or(ModelError::UnknownSignatory {
                        index: signature.signatory,
                        len,
                    })?;
            if signatory.role != Some(signature.role) {
                return Err(ModelError::RoleMismatch { index });
            }
            if signature.signature_digest != signatory.digest() {
                return Err(ModelError::DigestMismatch { index });
            }
        }
        for role in SignatoryRole::REQUIRED {
            if self.signatures.iter().filter(|s| s.role == role).count() > 1 {
                return Err(ModelError::DuplicateRole { role });
            }
        }

        for (index, payment) in self.payment_records.iter().enumerate() {
            if payment.amount < Decimal::ZERO {
                return Err(ModelError::NegativeAmount { index });
            }
            if payment.issuer >= len {
                return Err(ModelError::UnknownSignatory {
                    index: payment.issuer,
                    len,
                });
            }
        }
        Ok(())
    }

    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ModelError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use time::macros::datetime;

    fn parties() -> Vec<Signatory> {
        vec![
            Signatory::new("Client Co", "1 Rue A", "Alice", "111 111 111", Some(SignatoryRole::Client)),
            Signatory::new("Vendor SA", "2 Rue B", "Bob", "222 222 222", Some(SignatoryRole::Contractor)),
        ]
    }

    fn fresh() -> Contract {
        Contract::new("Support agreement", parties(), datetime!(2018-06-01 09:00 UTC)).unwrap()
    }

    // ──────────────────────────────────────────────
    // Construction
    // ──────────────────────────────────────────────

    #[test]
    fn new_contract_waits_for_signature() {
        let c = fresh();
        assert_eq!(c.state_records.len(), 1);
        assert_eq!(c.current_heading(), Some(StateHeading::WaitingForSignature));
        assert!(c.ending_date.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn new_contract_rejects_blank_heading() {
        let err = Contract::new("  ", parties(), datetime!(2018-06-01 09:00 UTC)).unwrap_err();
        assert!(matches!(err, ModelError::EmptyHeading));
    }

    // ──────────────────────────────────────────────
    // Signing
    // ──────────────────────────────────────────────

    #[test]
    fn signing_uses_role_and_registration_digest() {
        let mut c = fresh();
        let sig = c.sign(1, datetime!(2018-06-02 10:00 UTC)).unwrap().clone();
        assert_eq!(sig.role, SignatoryRole::Contractor);
        assert_eq!(sig.signature_digest, crate::signature_digest("222 222 222"));
        assert!(!c.is_signed());
        c.sign(0, datetime!(2018-06-02 11:00 UTC)).unwrap();
        assert!(c.is_signed());
    }

    #[test]
    fn second_signature_for_role_is_rejected() {
        let mut c = fresh();
        c.sign(0, datetime!(2018-06-02 10:00 UTC)).unwrap();
        let err = c.sign(0, datetime!(2018-06-02 11:00 UTC)).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateRole { role: SignatoryRole::Client }));
        assert_eq!(c.signatures.len(), 1);
    }

    #[test]
    fn signatory_without_role_cannot_sign() {
        let mut c = fresh();
        c.signatories.push(Signatory::new("Witness", "3 Rue C", "Carol", "333", None));
        let err = c.sign(2, datetime!(2018-06-02 10:00 UTC)).unwrap_err();
        assert!(matches!(err, ModelError::MissingRole { index: 2 }));
    }

    #[test]
    fn unknown_signatory_cannot_sign() {
        let mut c = fresh();
        let err = c.sign(7, datetime!(2018-06-02 10:00 UTC)).unwrap_err();
        assert!(matches!(err, ModelError::UnknownSignatory { index: 7, len: 2 }));
    }

    // ──────────────────────────────────────────────
    // Transitions
    // ──────────────────────────────────────────────

    #[test]
    fn transition_closes_previous_state() {
        let mut c = fresh();
        let at = datetime!(2018-06-03 08:00 UTC);
        c.transition_to(StateHeading::Signed, at).unwrap();
        assert_eq!(c.state_records.len(), 2);
        assert_eq!(c.state_records[0].ending_date, Some(at));
        assert_eq!(c.state_records[1].starting_date, at);
        assert_eq!(c.current_heading(), Some(StateHeading::Signed));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn transition_may_skip_forward() {
        let mut c = fresh();
        c.transition_to(StateHeading::WaitingForPayment, datetime!(2018-06-03 08:00 UTC))
            .unwrap();
        assert_eq!(c.current_heading(), Some(StateHeading::WaitingForPayment));
    }

    #[test]
    fn backward_transition_is_rejected() {
        let mut c = fresh();
        c.transition_to(StateHeading::WaitingForPayment, datetime!(2018-06-03 08:00 UTC))
            .unwrap();
        let err = c
            .transition_to(StateHeading::Signed, datetime!(2018-06-04 08:00 UTC))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidTransition {
                from: StateHeading::WaitingForPayment,
                to: StateHeading::Signed
            }
        ));
        assert_eq!(c.state_records.len(), 2);
    }

    #[test]
    fn transition_before_current_start_is_rejected() {
        let mut c = fresh();
        let err = c
            .transition_to(StateHeading::Signed, datetime!(2018-05-01 08:00 UTC))
            .unwrap_err();
        assert!(matches!(err, ModelError::TimestampRegression));
        assert!(c.state_records[0].is_current());
    }

    // ──────────────────────────────────────────────
    // Payments
    // ──────────────────────────────────────────────

    #[test]
    fn payments_accumulate() {
        let mut c = fresh();
        let at = datetime!(2018-07-01 00:00 UTC);
        c.record_payment(Decimal::from_str("1000.00").unwrap(), 0, at).unwrap();
        c.record_payment(Decimal::from_str("250.50").unwrap(), 0, at).unwrap();
        assert_eq!(c.total_paid(), Decimal::from_str("1250.50").unwrap());
    }

    #[test]
    fn zero_payment_is_allowed() {
        let mut c = fresh();
        c.record_payment(Decimal::ZERO, 1, datetime!(2018-07-01 00:00 UTC)).unwrap();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn negative_payment_is_rejected() {
        let mut c = fresh();
        let err = c
            .record_payment(Decimal::from_str("-1").unwrap(), 0, datetime!(2018-07-01 00:00 UTC))
            .unwrap_err();
        assert!(matches!(err, ModelError::NegativeAmount { index: 0 }));
        assert!(c.payment_records.is_empty());
    }

    #[test]
    fn payment_from_unknown_issuer_is_rejected() {
        let mut c = fresh();
        let err = c
            .record_payment(Decimal::ONE, 5, datetime!(2018-07-01 00:00 UTC))
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownSignatory { index: 5, .. }));
    }

    #[test]
    fn payment_before_current_state_is_rejected() {
        let mut c = fresh();
        c.transition_to(StateHeading::WaitingForPayment, datetime!(2018-06-10 00:00 UTC))
            .unwrap();
        let err = c
            .record_payment(Decimal::ONE, 0, datetime!(2018-06-09 23:59 UTC))
            .unwrap_err();
        assert!(matches!(err, ModelError::TimestampRegression));
        assert!(c.payment_records.is_empty());

        c.record_payment(Decimal::ONE, 0, datetime!(2018-06-10 00:00 UTC))
            .unwrap();
        assert_eq!(c.payment_records.len(), 1);
    }

    // ──────────────────────────────────────────────
    // Validation
    // ──────────────────────────────────────────────

    #[test]
    fn validate_rejects_two_open_states() {
        let mut c = fresh();
        c.state_records
            .push(ContractState::open(StateHeading::Signed, datetime!(2018-06-05 00:00 UTC)));
        assert!(matches!(c.validate(), Err(ModelError::OpenStates { count: 2 })));
    }

    #[test]
    fn validate_rejects_out_of_order_states() {
        let mut c = fresh();
        c.state_records[0].ending_date = Some(datetime!(2018-06-05 00:00 UTC));
        c.state_records
            .push(ContractState::open(StateHeading::Signed, datetime!(2018-01-01 00:00 UTC)));
        assert!(matches!(c.validate(), Err(ModelError::StatesOutOfOrder { index: 1 })));
    }

    #[test]
    fn validate_rejects_empty_history() {
        let mut c = fresh();
        c.state_records.clear();
        assert!(matches!(c.validate(), Err(ModelError::NoStateRecords)));
    }

    #[test]
    fn validate_rejects_dangling_signature() {
        let mut c = fresh();
        c.sign(0, datetime!(2018-06-02 10:00 UTC)).unwrap();
        c.signatures[0].signatory = 9;
        assert!(matches!(c.validate(), Err(ModelError::UnknownSignatory { index: 9, .. })));
    }

    #[test]
    fn validate_rejects_signature_under_another_role() {
        let mut c = fresh();
        c.sign(0, datetime!(2018-06-02 10:00 UTC)).unwrap();
        let mut forged = c.signatures[0].clone();
        forged.role = SignatoryRole::Contractor;
        c.signatures.push(forged);
        assert!(matches!(c.validate(), Err(ModelError::RoleMismatch { index: 1 })));
    }

    #[test]
    fn validate_rejects_tampered_digest() {
        let mut c = fresh();
        c.sign(0, datetime!(2018-06-02 10:00 UTC)).unwrap();
        c.sign(1, datetime!(2018-06-02 11:00 UTC)).unwrap();
        c.signatures[1].signature_digest = crate::signature_digest("999 999 999");
        assert!(matches!(c.validate(), Err(ModelError::DigestMismatch { index: 1 })));
    }

    #[test]
    fn validate_accepts_signatures_from_sign() {
        let mut c = fresh();
        c.sign(1, datetime!(2018-06-02 10:00 UTC)).unwrap();
        c.sign(0, datetime!(2018-06-02 11:00 UTC)).unwrap();
        assert!(c.validate().is_ok());
    }

    // ──────────────────────────────────────────────
    // Codec
    // ──────────────────────────────────────────────

    #[test]
    fn json_uses_pascal_case_fields() {
        let mut c = fresh();
        c.sign(0, datetime!(2018-06-02 10:00 UTC)).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&c.to_json_bytes().unwrap()).unwrap();
        assert_eq!(v["ContractHeading"], "Support agreement");
        assert_eq!(v["StateRecords"][0]["Heading"], "WAITING_FOR_SIGNATURE");
        assert!(v["StateRecords"][0]["EndingDate"].is_null());
        assert_eq!(v["Signatures"][0]["StatusOfSignatory"], "CLIENT");
        assert_eq!(v["Signatures"][0]["Signatory"], 0);
        assert!(v["PaymentRecords"].as_array().unwrap().is_empty());
    }

    #[test]
    fn legacy_record_without_signatories_decodes() {
        let legacy = r#"{
            "ContractHeading": "Maintenance",
            "StartingDate": "2018-06-01T09:00:00.123456789+02:00",
            "EndingDate": "0001-01-01T00:00:00Z",
            "StateRecords": [
                {"Heading": 0, "StartingDate": "2018-06-01T09:00:00+02:00", "EndingDate": "0001-01-01T00:00:00Z"}
            ],
            "PaymentRecords": []
        }"#;
        let c = Contract::from_json_bytes(legacy.as_bytes()).unwrap();
        assert!(c.ending_date.is_none());
        assert!(c.signatories.is_empty());
        assert_eq!(c.current_heading(), Some(StateHeading::WaitingForSignature));
    }

    #[test]
    fn decode_rejects_non_contract_json() {
        let err = Contract::from_json_bytes(br#"{"hello":"world"}"#).unwrap_err();
        assert!(matches!(err, ModelError::Codec(_)));
    }
}
