use std::process;

use digicon_chaincode::Chaincode;

use super::open_or_exit;
use crate::config::LedgerConfig;
use crate::envelope::{payload_value, write_payload};
use crate::{report_chaincode_error, report_error, OutputFormat};

pub(crate) fn cmd_invoke(
    config: &LedgerConfig,
    operation: &str,
    args: &[String],
    output: OutputFormat,
    quiet: bool,
) {
    let mut ledger = open_or_exit(config, output, quiet);

    match Chaincode::new().invoke(ledger.as_mut(), operation, args) {
        Ok(payload) => match output {
            OutputFormat::Text => {
                let mut out = std::io::stdout().lock();
                if let Err(e) = write_payload(&mut out, &payload) {
                    report_error(&format!("error writing output: {}", e), output, quiet);
                    process::exit(1);
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "success": format!("{} succeeded", operation),
                    "payload": payload_value(&payload),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                );
            }
        },
        Err(e) => {
            report_chaincode_error(&e, output, quiet);
            process::exit(1);
        }
    }
}
