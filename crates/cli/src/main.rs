mod commands;
mod config;
mod envelope;
mod ledger;
mod serve;
mod telemetry;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use digicon_chaincode::ChaincodeError;
use digicon_core::Locale;

use crate::config::{Backend, Config};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Digital contract ledger.
#[derive(Parser)]
#[command(name = "digicon", version, about = "Digital contract ledger")]
struct Cli {
    /// Path to a TOML config file (default: ./digicon.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ledger file to use; selects the file backend
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch an operation against the ledger
    Invoke {
        /// Operation name (initLedger, addContract, getContract)
        operation: String,
        /// Operation arguments, in order
        args: Vec<String>,
    },

    /// Write the genesis contract (same as `invoke initLedger`)
    Init,

    /// Render the contract stored under a key
    Show {
        /// Ledger key of the contract
        key: String,
        /// Label language (en or fr)
        #[arg(long, default_value = "en")]
        locale: Locale,
    },

    /// Check a contract JSON document against the contract invariants
    Validate {
        /// Path to the contract JSON file
        file: PathBuf,
    },

    /// List the operations the ledger answers to
    Operations,

    /// Start the HTTP gateway
    Serve {
        /// Port to listen on (default from config: 8081)
        #[arg(long)]
        port: Option<u16>,
        /// Address to bind (default from config: 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e.to_string(), cli.output, cli.quiet);
            process::exit(1);
        }
    };
    if let Some(path) = cli.ledger {
        config.ledger.backend = Backend::File;
        config.ledger.path = path;
    }

    telemetry::init_telemetry(&config.log.level);

    match cli.command {
        Commands::Invoke { operation, args } => {
            commands::invoke::cmd_invoke(&config.ledger, &operation, &args, cli.output, cli.quiet);
        }
        Commands::Init => {
            let no_args: [String; 0] = [];
            commands::invoke::cmd_invoke(
                &config.ledger,
                "initLedger",
                &no_args,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Show { key, locale } => {
            commands::show::cmd_show(&config.ledger, &key, locale, cli.output, cli.quiet);
        }
        Commands::Validate { file } => {
            commands::validate::cmd_validate(&file, cli.output, cli.quiet);
        }
        Commands::Operations => {
            commands::operations::cmd_operations(cli.output);
        }
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    report_error(&format!("failed to start runtime: {}", e), cli.output, cli.quiet);
                    process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(serve::start_server(config)) {
                report_error(&format!("server error: {}", e), cli.output, cli.quiet);
                process::exit(1);
            }
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}

/// Like [`report_error`], with the error kind in JSON output.
pub(crate) fn report_chaincode_error(err: &ChaincodeError, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", err),
        OutputFormat::Json => eprintln!("{}", err.to_json_value()),
    }
}
