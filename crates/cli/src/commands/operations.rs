use digicon_chaincode::Operation;

use crate::OutputFormat;

pub(crate) fn cmd_operations(output: OutputFormat) {
    match output {
        OutputFormat::Text => {
            for op in Operation::ALL {
                if op.parameters().is_empty() {
                    println!("{}", op);
                } else {
                    println!("{} <{}>", op, op.parameters().join("> <"));
                }
            }
        }
        OutputFormat::Json => {
            let ops: Vec<serde_json::Value> = Operation::ALL
                .iter()
                .map(|op| {
                    serde_json::json!({
                        "name": op.name(),
                        "arity": op.arity(),
                        "parameters": op.parameters(),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "operations": ops }))
                    .unwrap_or_default()
            );
        }
    }
}
