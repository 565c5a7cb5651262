//! Human-readable labels for contract enums.
//!
//! Labels are presentation only; the canonical values are the enums
//! themselves and their wire names.

use std::str::FromStr;

use crate::contract::Contract;
use crate::signatory::SignatoryRole;
use crate::state::StateHeading;

/// Language used when rendering labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            other => Err(format!("unsupported locale '{}' (expected en or fr)", other)),
        }
    }
}

pub fn heading_label(heading: StateHeading, locale: Locale) -> &'static str {
    match (locale, heading) {
        (Locale::En, StateHeading::WaitingForSignature) => "waiting for signature",
        (Locale::En, StateHeading::Signed) => "signed",
        (Locale::En, StateHeading::WaitingForPayment) => "waiting for payment",
        (Locale::En, StateHeading::InOrder) => "in order",
        (Locale::Fr, StateHeading::WaitingForSignature) => "en attente de signature",
        (Locale::Fr, StateHeading::Signed) => "signé",
        (Locale::Fr, StateHeading::WaitingForPayment) => "en attente de paiement",
        (Locale::Fr, StateHeading::InOrder) => "en règle",
    }
}

pub fn role_label(role: SignatoryRole, locale: Locale) -> &'static str {
    match (locale, role) {
        (Locale::En, SignatoryRole::Client) => "client",
        (Locale::En, SignatoryRole::Contractor) => "contractor",
        (Locale::Fr, SignatoryRole::Client) => "client",
        (Locale::Fr, SignatoryRole::Contractor) => "prestataire",
    }
}

/// Multi-line summary of a contract for terminal output.
pub fn render_summary(contract: &Contract, locale: Locale) -> String {
    let (state_title, parties_title, signatures_title, payments_title, none) = match locale {
        Locale::En => ("State", "Signatories", "Signatures", "Payments", "none"),
        Locale::Fr => ("État", "Signataires", "Signatures", "Paiements", "aucun"),
    };
    let (signed_title, yes, no, by) = match locale {
        Locale::En => ("Signed by all parties", "yes", "no", "by"),
        Locale::Fr => ("Signé par toutes les parties", "oui", "non", "par"),
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", contract.contract_heading));
    let state = contract
        .current_heading()
        .map(|h| heading_label(h, locale))
        .unwrap_or(none);
    out.push_str(&format!("{}: {}\n", state_title, state));

    let signed = if contract.is_signed() { yes } else { no };
    out.push_str(&format!("{}: {}\n", signed_title, signed));

    out.push_str(&format!("{}:\n", parties_title));
    if contract.signatories.is_empty() {
        out.push_str(&format!("  {}\n", none));
    }
    for (i, s) in contract.signatories.iter().enumerate() {
        let role = s.role.map(|r| role_label(r, locale)).unwrap_or("-");
        out.push_str(&format!(
            "  [{}] {} ({}) - {}, {}\n",
            i, s.business_name, role, s.holder, s.registration_number
        ));
    }

    out.push_str(&format!("{}:\n", signatures_title));
    if contract.signatures.is_empty() {
        out.push_str(&format!("  {}\n", none));
    }
    for sig in &contract.signatures {
        let who = contract
            .signatory(sig.signatory)
            .map(|s| s.business_name.as_str())
            .unwrap_or("?");
        out.push_str(&format!(
            "  {} ({}) {}\n",
            who,
            role_label(sig.role, locale),
            sig.signature_digest
        ));
    }

    out.push_str(&format!("{}:\n", payments_title));
    if contract.payment_records.is_empty() {
        out.push_str(&format!("  {}\n", none));
    }
    for p in &contract.payment_records {
        let who = contract
            .signatory(p.issuer)
            .map(|s| s.business_name.as_str())
            .unwrap_or("?");
        out.push_str(&format!("  {} EUR {} {}\n", p.amount, by, who));
    }
    out
}
