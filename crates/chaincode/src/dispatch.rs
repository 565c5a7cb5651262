//! Operation routing: operation name + argument list -> repository call.

use std::fmt;
use std::str::FromStr;

use digicon_storage::LedgerGateway;
use time::OffsetDateTime;

use crate::error::ChaincodeError;
use crate::genesis;
use crate::repository::ContractRepository;

/// Source of "now" for timestamps written by operations.
pub type Clock = fn() -> OffsetDateTime;

/// The closed set of operations the chaincode answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    InitLedger,
    AddContract,
    GetContract,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::InitLedger,
        Operation::AddContract,
        Operation::GetContract,
    ];

    /// Wire name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            Operation::InitLedger => "initLedger",
            Operation::AddContract => "addContract",
            Operation::GetContract => "getContract",
        }
    }

    /// Exact number of arguments the operation takes.
    pub fn arity(self) -> usize {
        match self {
            Operation::InitLedger => 0,
            Operation::AddContract => 2,
            Operation::GetContract => 1,
        }
    }

    /// Names of the expected arguments, for messages and help text.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Operation::InitLedger => &[],
            Operation::AddContract => &["key", "value"],
            Operation::GetContract => &["key"],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ChaincodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| ChaincodeError::UnknownOperation {
                name: s.to_string(),
            })
    }
}

/// Stateless request handler for ledger operations.
///
/// One instance serves every invocation; the gateway is handed in per
/// call. Each invocation is a single synchronous read-then-write chain.
#[derive(Debug, Clone, Copy)]
pub struct Chaincode {
    clock: Clock,
}

impl Default for Chaincode {
    fn default() -> Self {
        Self::new()
    }
}

impl Chaincode {
    pub fn new() -> Self {
        Chaincode {
            clock: digicon_core::timestamp::now,
        }
    }

    /// Use `clock` instead of the system clock for written timestamps.
    pub fn with_clock(clock: Clock) -> Self {
        Chaincode { clock }
    }

    /// Route `function` with `args` to the matching operation.
    pub fn invoke<G, A>(
        &self,
        ledger: &mut G,
        function: &str,
        args: &[A],
    ) -> Result<Vec<u8>, ChaincodeError>
    where
        G: LedgerGateway + ?Sized,
        A: AsRef<[u8]>,
    {
        let operation: Operation = function.parse()?;
        tracing::debug!(operation = %operation, args = args.len(), "dispatching");

        if args.len() != operation.arity() {
            return Err(ChaincodeError::bad_arguments(arity_message(operation, args.len())));
        }

        match operation {
            Operation::InitLedger => genesis::initialize(ledger, (self.clock)()),
            Operation::AddContract => {
                let key = utf8_key(operation, args[0].as_ref())?;
                ContractRepository::new(ledger).create(key, args[1].as_ref())
            }
            Operation::GetContract => {
                let key = utf8_key(operation, args[0].as_ref())?;
                ContractRepository::new(ledger).read(key)
            }
        }
    }
}

fn arity_message(operation: Operation, given: usize) -> String {
    let params = operation.parameters();
    if params.is_empty() {
        format!("{} takes no arguments, given {}", operation, given)
    } else {
        format!(
            "{} expects {} argument(s) ({}), given {}",
            operation,
            params.len(),
            params.join(", "),
            given
        )
    }
}

fn utf8_key(operation: Operation, raw: &[u8]) -> Result<&str, ChaincodeError> {
    std::str::from_utf8(raw).map_err(|_| {
        ChaincodeError::bad_arguments(format!("{}: key must be valid UTF-8", operation))
    })
}
