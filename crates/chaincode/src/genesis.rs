//! Ledger bootstrap: the seed contract written once at key `"0"`.

use digicon_core::{Contract, Signatory, SignatoryRole};
use digicon_storage::LedgerGateway;
use time::OffsetDateTime;

use crate::error::ChaincodeError;

/// Key reserved for the genesis record.
pub const GENESIS_KEY: &str = "0";

/// Title of the seed contract.
pub const GENESIS_HEADING: &str =
    "Maintenance gestion des ressources humaines et gestion financière";

/// Index of the client in the genesis contract's signatories.
pub const GENESIS_CLIENT: usize = 0;
/// Index of the contractor in the genesis contract's signatories.
pub const GENESIS_CONTRACTOR: usize = 1;

fn genesis_client() -> Signatory {
    Signatory::new(
        "Ville de Montpellier",
        "1, Place Georges Frêche, 34000 Montpellier",
        "Philippe Saurel",
        "213 401 722",
        Some(SignatoryRole::Client),
    )
}

fn genesis_contractor() -> Signatory {
    Signatory::new(
        "Berger-Levrault",
        "892, Rue Yves Kermen, 92100 Boulogne-Billancourt",
        "Antoine Rouillard",
        "755 800 646",
        Some(SignatoryRole::Contractor),
    )
}

/// Build the seed contract with every timestamp set to `now`.
///
/// Both parties have signed, and the single state is still
/// `WAITING_FOR_SIGNATURE`.
pub fn genesis_contract(now: OffsetDateTime) -> Result<Contract, ChaincodeError> {
    let mut contract = Contract::new(
        GENESIS_HEADING,
        vec![genesis_client(), genesis_contractor()],
        now,
    )?;
    contract.sign(GENESIS_CLIENT, now)?;
    contract.sign(GENESIS_CONTRACTOR, now)?;
    Ok(contract)
}

/// Write the genesis record unless the ledger already has one.
///
/// Returns the serialized record. Fails with `AlreadyInitialized` and
/// writes nothing when key `"0"` is occupied; a failed existence check
/// is propagated as a store error, also without writing.
pub fn initialize<G: LedgerGateway + ?Sized>(
    ledger: &mut G,
    now: OffsetDateTime,
) -> Result<Vec<u8>, ChaincodeError> {
    if ledger.get(GENESIS_KEY)?.is_some() {
        return Err(ChaincodeError::AlreadyInitialized);
    }

    let contract = genesis_contract(now)?;
    let bytes = contract.to_json_bytes()?;
    ledger.put(GENESIS_KEY, &bytes)?;

    tracing::info!(
        key = GENESIS_KEY,
        heading = %contract.contract_heading,
        signatures = contract.signatures.len(),
        "ledger initialized"
    );
    Ok(bytes)
}
