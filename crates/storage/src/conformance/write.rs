use super::{expect_value, read, write, CheckKind, CheckOutcome};
use crate::LedgerGateway;

pub(super) fn upsert_checks<G, F>(factory: &F) -> Vec<CheckOutcome>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    vec![
        CheckOutcome::new(
            CheckKind::Upsert,
            "put_overwrites_existing_value",
            put_overwrites_existing_value(factory),
        ),
        CheckOutcome::new(
            CheckKind::Upsert,
            "empty_value_is_distinct_from_absent",
            empty_value_is_distinct_from_absent(factory),
        ),
        CheckOutcome::new(
            CheckKind::Upsert,
            "binary_values_round_trip",
            binary_values_round_trip(factory),
        ),
        CheckOutcome::new(
            CheckKind::Upsert,
            "utf8_keys_and_values_round_trip",
            utf8_keys_and_values_round_trip(factory),
        ),
        CheckOutcome::new(
            CheckKind::Upsert,
            "large_value_round_trips",
            large_value_round_trips(factory),
        ),
        CheckOutcome::new(CheckKind::Upsert, "many_keys_round_trip", many_keys_round_trip(factory)),
    ]
}

// ── 1. put is an upsert: the gateway never refuses an existing key ───────────

fn put_overwrites_existing_value<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut ledger = factory();
    write(&mut ledger, "0", b"first")?;
    write(&mut ledger, "0", b"second")?;
    expect_value(read(&ledger, "0")?, b"second", "0")
}

// ── 2. An empty value is stored, not treated as a missing key ────────────────

fn empty_value_is_distinct_from_absent<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut ledger = factory();
    write(&mut ledger, "empty", b"")?;
    expect_value(read(&ledger, "empty")?, b"", "empty")?;
    write(&mut ledger, "empty", b"filled")?;
    write(&mut ledger, "empty", b"")?;
    expect_value(read(&ledger, "empty")?, b"", "empty")
}

// ── 3. Arbitrary bytes, including NUL and invalid UTF-8 ──────────────────────

fn binary_values_round_trip<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut ledger = factory();
    let value = [0u8, 1, 2, 0xfe, 0xff, 0xc3, 0x28];
    write(&mut ledger, "bin", &value)?;
    expect_value(read(&ledger, "bin")?, &value, "bin")
}

// ── 4. Non-ASCII text survives byte-for-byte ─────────────────────────────────

fn utf8_keys_and_values_round_trip<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut ledger = factory();
    let value = "Place Georges Frêche, gestion financière".as_bytes();
    write(&mut ledger, "contrat-é", value)?;
    expect_value(read(&ledger, "contrat-é")?, value, "contrat-é")
}

// ── 5. A value well beyond typical record size ───────────────────────────────

fn large_value_round_trips<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut ledger = factory();
    let value: Vec<u8> = (0..256 * 1024).map(|i| (i % 251) as u8).collect();
    write(&mut ledger, "big", &value)?;
    expect_value(read(&ledger, "big")?, &value, "big")
}

// ── 6. Many distinct keys each keep their own value ──────────────────────────

fn many_keys_round_trip<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut ledger = factory();
    for i in 0..100 {
        write(&mut ledger, &i.to_string(), format!("value-{}", i).as_bytes())?;
    }
    for i in 0..100 {
        let key = i.to_string();
        expect_value(read(&ledger, &key)?, format!("value-{}", i).as_bytes(), &key)?;
    }
    Ok(())
}
