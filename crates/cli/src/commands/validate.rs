use std::path::Path;
use std::process;

use digicon_core::Contract;

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_validate(file: &Path, output: OutputFormat, quiet: bool) {
    let bytes = match std::fs::read(file) {
        Ok(b) => b,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let problem = match Contract::from_json_bytes(&bytes) {
        Ok(contract) => contract.validate().err().map(|e| e.to_string()),
        Err(e) => Some(format!("error decoding contract in '{}': {}", file.display(), e)),
    };

    match problem {
        None => {
            if !quiet {
                match output {
                    OutputFormat::Text => println!("valid"),
                    OutputFormat::Json => println!("{}", serde_json::json!({ "valid": true })),
                }
            }
        }
        Some(error) => {
            match output {
                OutputFormat::Text => {
                    if !quiet {
                        eprintln!("invalid contract");
                        eprintln!("  - {}", error);
                    }
                }
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "valid": false,
                        "errors": [error],
                    });
                    eprintln!(
                        "{}",
                        serde_json::to_string_pretty(&json).unwrap_or_default()
                    );
                }
            }
            process::exit(1);
        }
    }
}
