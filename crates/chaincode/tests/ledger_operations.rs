//! End-to-end tests of the chaincode operations against an in-memory ledger.

use std::str::FromStr;

use digicon_chaincode::{Chaincode, ChaincodeError, ContractRepository, ErrorKind, GENESIS_KEY};
use digicon_core::{Contract, Signatory, SignatoryRole, StateHeading};
use digicon_storage::{LedgerGateway, MemoryLedger};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use time::macros::datetime;
use time::OffsetDateTime;

fn fixed_now() -> OffsetDateTime {
    datetime!(2018-06-01 09:30 UTC)
}

fn chaincode() -> Chaincode {
    Chaincode::with_clock(fixed_now)
}

const NO_ARGS: [&str; 0] = [];

// ──────────────────────────────────────────────
// 1. initLedger
// ──────────────────────────────────────────────

#[test]
fn init_ledger_writes_genesis_contract() {
    let mut ledger = MemoryLedger::new();
    let payload = chaincode().invoke(&mut ledger, "initLedger", &NO_ARGS).unwrap();

    assert_eq!(ledger.get(GENESIS_KEY).unwrap(), Some(payload.clone()));

    let contract = Contract::from_json_bytes(&payload).unwrap();
    assert_eq!(contract.state_records.len(), 1);
    assert_eq!(contract.state_records[0].heading, StateHeading::WaitingForSignature);
    assert_eq!(contract.signatures.len(), 2);
    assert_eq!(
        contract
            .signatures
            .iter()
            .filter(|s| s.role == SignatoryRole::Client)
            .count(),
        1
    );
    assert_eq!(
        contract
            .signatures
            .iter()
            .filter(|s| s.role == SignatoryRole::Contractor)
            .count(),
        1
    );
    assert_eq!(contract.starting_date, fixed_now());
}

#[test]
fn init_ledger_twice_fails_without_writing() {
    let mut ledger = MemoryLedger::new();
    let first = chaincode().invoke(&mut ledger, "initLedger", &NO_ARGS).unwrap();

    let later = Chaincode::with_clock(|| datetime!(2019-01-01 00:00 UTC));
    let err = later.invoke(&mut ledger, "initLedger", &NO_ARGS).unwrap_err();

    assert!(matches!(err, ChaincodeError::AlreadyInitialized));
    assert_eq!(err.kind(), ErrorKind::AlreadyInitialized);
    assert_eq!(ledger.get(GENESIS_KEY).unwrap(), Some(first));
    assert_eq!(ledger.len(), 1);
}

#[test]
fn init_ledger_refuses_when_key_zero_was_added_manually() {
    let mut ledger = MemoryLedger::new();
    chaincode()
        .invoke(&mut ledger, "addContract", &["0", "not a contract"])
        .unwrap();
    let err = chaincode().invoke(&mut ledger, "initLedger", &NO_ARGS).unwrap_err();
    assert!(matches!(err, ChaincodeError::AlreadyInitialized));
    assert_eq!(ledger.get("0").unwrap(), Some(b"not a contract".to_vec()));
}

#[test]
fn init_ledger_propagates_read_failure_without_writing() {
    let mut ledger = MemoryLedger::new();
    ledger.fail_reads(true);
    let err = chaincode().invoke(&mut ledger, "initLedger", &NO_ARGS).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreError);
    assert!(ledger.is_empty());
}

#[test]
fn init_ledger_surfaces_write_failure() {
    let mut ledger = MemoryLedger::new();
    ledger.fail_writes(true);
    let err = chaincode().invoke(&mut ledger, "initLedger", &NO_ARGS).unwrap_err();
    assert!(matches!(err, ChaincodeError::Store(_)));
    assert!(ledger.is_empty());
}

#[test]
fn genesis_digests_match_independent_sha256() {
    let mut ledger = MemoryLedger::new();
    let payload = chaincode().invoke(&mut ledger, "initLedger", &NO_ARGS).unwrap();
    let contract = Contract::from_json_bytes(&payload).unwrap();

    for signature in &contract.signatures {
        let signatory = &contract.signatories[signature.signatory];
        let expected: String = Sha256::digest(signatory.registration_number.as_bytes())
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();
        assert_eq!(signature.signature_digest, expected);
    }
    assert_eq!(
        contract.signatures[0].signature_digest.len(),
        64,
        "digest must be hex-encoded SHA-256"
    );
}

#[test]
fn init_ledger_rejects_arguments() {
    let mut ledger = MemoryLedger::new();
    let err = chaincode().invoke(&mut ledger, "initLedger", &[""]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadArguments);
    assert!(ledger.is_empty());
}

// ──────────────────────────────────────────────
// 2. addContract / getContract
// ──────────────────────────────────────────────

#[test]
fn add_then_get_round_trips_bytes() {
    let mut ledger = MemoryLedger::new();
    let cases: [(&str, &[u8]); 4] = [
        ("1", br#"{"ContractHeading":"Hosting"}"#),
        ("2", b"plain text, not json"),
        ("contrat-é", "gestion financière".as_bytes()),
        ("4", br#"{ "spaced" :  true }"#),
    ];
    for (key, value) in cases {
        let echoed = chaincode()
            .invoke(&mut ledger, "addContract", &[key.as_bytes(), value])
            .unwrap();
        assert_eq!(echoed, value);
        let read = chaincode()
            .invoke(&mut ledger, "getContract", &[key])
            .unwrap();
        assert_eq!(read, value, "round trip for key {}", key);
    }
}

#[test]
fn add_existing_key_fails_and_keeps_first_value() {
    let mut ledger = MemoryLedger::new();
    chaincode()
        .invoke(&mut ledger, "addContract", &["7", "first"])
        .unwrap();
    let err = chaincode()
        .invoke(&mut ledger, "addContract", &["7", "second"])
        .unwrap_err();

    assert!(matches!(&err, ChaincodeError::AlreadyExists { key } if key == "7"));
    assert_eq!(err.to_string(), "asset 7 already exists");
    assert_eq!(ledger.get("7").unwrap(), Some(b"first".to_vec()));
}

#[test]
fn get_unknown_key_is_not_found() {
    let mut ledger = MemoryLedger::new();
    let err = chaincode()
        .invoke(&mut ledger, "getContract", &["missing"])
        .unwrap_err();
    assert!(matches!(&err, ChaincodeError::NotFound { key } if key == "missing"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn get_returns_stored_bytes_even_when_not_a_contract() {
    let mut ledger = MemoryLedger::new();
    ledger.put("raw", &[0xff, 0x00, 0x01]).unwrap();
    let read = chaincode().invoke(&mut ledger, "getContract", &["raw"]).unwrap();
    assert_eq!(read, vec![0xff, 0x00, 0x01]);
}

#[test]
fn get_returns_genesis_record_unchanged() {
    let mut ledger = MemoryLedger::new();
    let payload = chaincode().invoke(&mut ledger, "initLedger", &NO_ARGS).unwrap();
    let read = chaincode().invoke(&mut ledger, "getContract", &["0"]).unwrap();
    assert_eq!(read, payload);
}

#[test]
fn add_with_wrong_argument_count_is_rejected() {
    let mut ledger = MemoryLedger::new();
    for args in [vec!["k"], vec!["k", "v", "extra"], vec![]] {
        let err = chaincode()
            .invoke(&mut ledger, "addContract", args.as_slice())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArguments, "args: {:?}", args);
    }
    assert!(ledger.is_empty());
}

#[test]
fn get_with_wrong_argument_count_is_rejected() {
    let mut ledger = MemoryLedger::new();
    for args in [vec![], vec!["a", "b"]] {
        let err = chaincode()
            .invoke(&mut ledger, "getContract", args.as_slice())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArguments, "args: {:?}", args);
    }
}

#[test]
fn add_rejects_empty_key_and_value() {
    let mut ledger = MemoryLedger::new();
    let err = chaincode()
        .invoke(&mut ledger, "addContract", &["", "v"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadArguments);
    let err = chaincode()
        .invoke(&mut ledger, "addContract", &["k", ""])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadArguments);
    assert!(ledger.is_empty());
}

#[test]
fn non_utf8_key_is_rejected() {
    let mut ledger = MemoryLedger::new();
    let args: [&[u8]; 2] = [&[0xff, 0xfe], b"v"];
    let err = chaincode()
        .invoke(&mut ledger, "addContract", &args)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadArguments);
}

#[test]
fn add_propagates_store_failures() {
    let mut ledger = MemoryLedger::new();
    ledger.fail_writes(true);
    let err = chaincode()
        .invoke(&mut ledger, "addContract", &["k", "v"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreError);

    ledger.fail_writes(false);
    ledger.fail_reads(true);
    let err = chaincode()
        .invoke(&mut ledger, "getContract", &["k"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreError);
}

// ──────────────────────────────────────────────
// 3. Dispatch
// ──────────────────────────────────────────────

#[test]
fn unknown_operation_is_named_in_error() {
    let mut ledger = MemoryLedger::new();
    let err = chaincode().invoke(&mut ledger, "bogusOp", &NO_ARGS).unwrap_err();
    assert!(matches!(&err, ChaincodeError::UnknownOperation { name } if name == "bogusOp"));
    assert!(err.to_string().contains("bogusOp"));
    assert_eq!(err.kind(), ErrorKind::UnknownOperation);
}

#[test]
fn error_envelope_carries_kind() {
    let mut ledger = MemoryLedger::new();
    let err = chaincode().invoke(&mut ledger, "getContract", &["x"]).unwrap_err();
    let v = err.to_json_value();
    assert_eq!(v["kind"], "NotFound");
    assert_eq!(v["error"], "asset with key x doesn't exist");
}

#[test]
fn dispatch_through_boxed_gateway() {
    let mut ledger: Box<dyn LedgerGateway> = Box::new(MemoryLedger::new());
    chaincode()
        .invoke(ledger.as_mut(), "addContract", &["k", "v"])
        .unwrap();
    assert_eq!(
        chaincode().invoke(ledger.as_mut(), "getContract", &["k"]).unwrap(),
        b"v"
    );
}

// ──────────────────────────────────────────────
// 4. Typed repository path
// ──────────────────────────────────────────────

fn sample_contract() -> Contract {
    let mut c = Contract::new(
        "Hosting and support",
        vec![
            Signatory::new("Client Co", "1 Rue A", "Alice", "111", Some(SignatoryRole::Client)),
            Signatory::new("Vendor SA", "2 Rue B", "Bob", "222", Some(SignatoryRole::Contractor)),
        ],
        datetime!(2018-06-01 09:00 UTC),
    )
    .unwrap();
    c.sign(0, datetime!(2018-06-02 09:00 UTC)).unwrap();
    c.sign(1, datetime!(2018-06-02 10:00 UTC)).unwrap();
    c.transition_to(StateHeading::Signed, datetime!(2018-06-02 10:00 UTC))
        .unwrap();
    c.transition_to(StateHeading::WaitingForPayment, datetime!(2018-06-03 10:00 UTC))
        .unwrap();
    c.record_payment(
        Decimal::from_str("1200.00").unwrap(),
        0,
        datetime!(2018-07-01 10:00 UTC),
    )
    .unwrap();
    c.transition_to(StateHeading::InOrder, datetime!(2018-07-01 10:00 UTC))
        .unwrap();
    c
}

#[test]
fn typed_contract_round_trips() {
    let mut repo = ContractRepository::new(MemoryLedger::new());
    let contract = sample_contract();
    repo.create_contract("12", &contract).unwrap();

    let read = repo.read_contract("12").unwrap();
    assert_eq!(read, contract);
    assert_eq!(read.current_heading(), Some(StateHeading::InOrder));
    assert_eq!(read.state_records.iter().filter(|s| s.is_current()).count(), 1);
}

#[test]
fn typed_create_rejects_invalid_contract() {
    let mut repo = ContractRepository::new(MemoryLedger::new());
    let mut contract = sample_contract();
    contract.payment_records[0].issuer = 9;

    let err = repo.create_contract("12", &contract).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidContract);
    assert!(repo.into_inner().is_empty());
}

#[test]
fn typed_create_rejects_signature_copied_to_other_role() {
    let mut repo = ContractRepository::new(MemoryLedger::new());
    let mut contract = sample_contract();
    contract.signatures[1] = contract.signatures[0].clone();
    contract.signatures[1].role = SignatoryRole::Contractor;

    let err = repo.create_contract("12", &contract).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidContract);
    assert!(repo.into_inner().is_empty());
}

#[test]
fn typed_read_of_foreign_bytes_is_serialization_error() {
    let mut repo = ContractRepository::new(MemoryLedger::new());
    repo.create("x", b"[1, 2, 3]").unwrap();
    let err = repo.read_contract("x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SerializationError);
}
