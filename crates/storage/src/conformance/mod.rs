//! Checks that a `LedgerGateway` backend honours the gateway contract.
//!
//! Every check runs against a fresh, empty ledger from the caller's
//! factory. Lookup checks cover absent keys, read-after-write and key
//! independence; upsert checks cover overwrites, empty and binary values,
//! large values and many keys.
//!
//! ```ignore
//! use digicon_storage::conformance::run_conformance_suite;
//! use digicon_storage::MemoryLedger;
//!
//! #[test]
//! fn memory_conformance() {
//!     let report = run_conformance_suite(MemoryLedger::new);
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod read;
mod write;

use std::fmt;

use crate::LedgerGateway;

/// The gateway operation a check exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// `get` semantics.
    Lookup,
    /// `put` semantics, observed through `get`.
    Upsert,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckKind::Lookup => "lookup",
            CheckKind::Upsert => "upsert",
        })
    }
}

/// What one check observed. `failure` is `None` when the backend behaved.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub check: &'static str,
    pub failure: Option<String>,
}

impl CheckOutcome {
    fn new(kind: CheckKind, check: &'static str, result: Result<(), String>) -> Self {
        Self {
            kind,
            check,
            failure: result.err(),
        }
    }

    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

/// Every outcome of one suite run, with the tallies.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub outcomes: Vec<CheckOutcome>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl ConformanceReport {
    fn from_outcomes(outcomes: Vec<CheckOutcome>) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed()).count();
        Self {
            outcomes,
            passed,
            failed: total - passed,
            total,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ledger gateway: {} of {} checks held",
            self.passed, self.total
        )?;
        for outcome in self.failures() {
            writeln!(
                f,
                "  {} `{}` broke: {}",
                outcome.kind,
                outcome.check,
                outcome.failure.as_deref().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

/// Run every lookup and upsert check, each against `factory()`.
pub fn run_conformance_suite<G, F>(factory: F) -> ConformanceReport
where
    G: LedgerGateway,
    F: Fn() -> G,
{
    let mut outcomes = read::lookup_checks(&factory);
    outcomes.extend(write::upsert_checks(&factory));
    ConformanceReport::from_outcomes(outcomes)
}

/// Read `key`, mapping a storage error to a test failure message.
fn read<G: LedgerGateway>(ledger: &G, key: &str) -> Result<Option<Vec<u8>>, String> {
    ledger
        .get(key)
        .map_err(|e| format!("get('{}') failed: {}", key, e))
}

/// Write `key`, mapping a storage error to a test failure message.
fn write<G: LedgerGateway>(ledger: &mut G, key: &str, value: &[u8]) -> Result<(), String> {
    ledger
        .put(key, value)
        .map_err(|e| format!("put('{}') failed: {}", key, e))
}

fn expect_value(actual: Option<Vec<u8>>, expected: &[u8], key: &str) -> Result<(), String> {
    match actual {
        Some(v) if v == expected => Ok(()),
        Some(v) => Err(format!(
            "key '{}': expected {} bytes {:?}, got {} bytes {:?}",
            key,
            expected.len(),
            String::from_utf8_lossy(expected),
            v.len(),
            String::from_utf8_lossy(&v)
        )),
        None => Err(format!("key '{}': expected a value, got none", key)),
    }
}
