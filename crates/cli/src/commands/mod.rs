pub(crate) mod invoke;
pub(crate) mod operations;
pub(crate) mod show;
pub(crate) mod validate;

use std::process;

use crate::config::LedgerConfig;
use crate::ledger::{open_ledger, SharedLedger};
use crate::{report_error, OutputFormat};

/// Open the configured ledger or exit with status 1.
fn open_or_exit(config: &LedgerConfig, output: OutputFormat, quiet: bool) -> SharedLedger {
    match open_ledger(config) {
        Ok(ledger) => ledger,
        Err(e) => {
            report_error(&format!("error opening ledger: {}", e), output, quiet);
            process::exit(1);
        }
    }
}
