use super::{expect_value, read, write, CheckKind, CheckOutcome};
use crate::LedgerGateway;

pub(super) fn lookup_checks<G, F>(factory: &F) -> Vec<CheckOutcome>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    vec![
        CheckOutcome::new(
            CheckKind::Lookup,
            "get_absent_key_returns_none",
            get_absent_key_returns_none(factory),
        ),
        CheckOutcome::new(
            CheckKind::Lookup,
            "get_after_put_returns_value",
            get_after_put_returns_value(factory),
        ),
        CheckOutcome::new(CheckKind::Lookup, "get_is_repeatable", get_is_repeatable(factory)),
        CheckOutcome::new(CheckKind::Lookup, "keys_are_independent", keys_are_independent(factory)),
        CheckOutcome::new(
            CheckKind::Lookup,
            "keys_are_case_sensitive",
            keys_are_case_sensitive(factory),
        ),
    ]
}

// ── 1. A fresh ledger has nothing under any key ─────────────────────────────

fn get_absent_key_returns_none<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let ledger = factory();
    for key in ["0", "contract-1", ""] {
        if let Some(v) = read(&ledger, key)? {
            return Err(format!("key '{}': expected none, got {} bytes", key, v.len()));
        }
    }
    Ok(())
}

// ── 2. Read-after-write within one handle ────────────────────────────────────

fn get_after_put_returns_value<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut ledger = factory();
    write(&mut ledger, "42", br#"{"ContractHeading":"x"}"#)?;
    expect_value(read(&ledger, "42")?, br#"{"ContractHeading":"x"}"#, "42")
}

// ── 3. Reads do not consume or alter the value ───────────────────────────────

fn get_is_repeatable<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut ledger = factory();
    write(&mut ledger, "k", b"v")?;
    expect_value(read(&ledger, "k")?, b"v", "k")?;
    expect_value(read(&ledger, "k")?, b"v", "k")
}

// ── 4. Writing one key leaves others untouched ───────────────────────────────

fn keys_are_independent<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut ledger = factory();
    write(&mut ledger, "a", b"alpha")?;
    write(&mut ledger, "b", b"beta")?;
    expect_value(read(&ledger, "a")?, b"alpha", "a")?;
    expect_value(read(&ledger, "b")?, b"beta", "b")?;
    match read(&ledger, "c")? {
        None => Ok(()),
        Some(_) => Err("key 'c' was never written but has a value".to_string()),
    }
}

// ── 5. Keys are opaque strings compared exactly ──────────────────────────────

fn keys_are_case_sensitive<G, F>(factory: &F) -> Result<(), String>
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut ledger = factory();
    write(&mut ledger, "Key", b"upper")?;
    match read(&ledger, "key")? {
        None => Ok(()),
        Some(_) => Err("lookup of 'key' matched 'Key'".to_string()),
    }
}
