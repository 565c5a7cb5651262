use std::process;

use digicon_chaincode::ContractRepository;
use digicon_core::display::{heading_label, render_summary};
use digicon_core::Locale;

use super::open_or_exit;
use crate::config::LedgerConfig;
use crate::{report_chaincode_error, OutputFormat};

pub(crate) fn cmd_show(
    config: &LedgerConfig,
    key: &str,
    locale: Locale,
    output: OutputFormat,
    quiet: bool,
) {
    let ledger = open_or_exit(config, output, quiet);
    let repo = ContractRepository::new(ledger);

    let contract = match repo.read_contract(key) {
        Ok(c) => c,
        Err(e) => {
            report_chaincode_error(&e, output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Text => print!("{}", render_summary(&contract, locale)),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "key": key,
                "heading": contract.contract_heading,
                "state": contract.current_heading().map(|h| h.as_str()),
                "state_label": contract.current_heading().map(|h| heading_label(h, locale)),
                "signed": contract.is_signed(),
                "signatories": contract.signatories.len(),
                "payments": contract.payment_records.len(),
                "total_paid": contract.total_paid().to_string(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
}
